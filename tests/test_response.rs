use palisade::http::response::{Response, ResponseBuilder, StatusCode};
use palisade::http::writer::serialize_response;

#[test]
fn test_status_code_as_u16() {
    assert_eq!(StatusCode::Ok.as_u16(), 200);
    assert_eq!(StatusCode::BadRequest.as_u16(), 400);
    assert_eq!(StatusCode::NotFound.as_u16(), 404);
}

#[test]
fn test_status_code_reason_phrase() {
    assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    assert_eq!(StatusCode::BadRequest.reason_phrase(), "Bad Request");
    assert_eq!(StatusCode::NotFound.reason_phrase(), "Not Found");
}

#[test]
fn test_response_builder_basic() {
    let response = ResponseBuilder::new(StatusCode::Ok).build();

    assert_eq!(response.status, StatusCode::Ok);
    assert!(response.headers.is_empty());
}

#[test]
fn test_response_builder_with_headers() {
    let response = ResponseBuilder::new(StatusCode::Ok)
        .header("Content-Type", "text/plain")
        .header("Content-Length", "12")
        .build();

    assert_eq!(response.headers.get("Content-Type").unwrap(), "text/plain");
    assert_eq!(response.headers.get("Content-Length").unwrap(), "12");
}

#[test]
fn test_response_builder_header_overwrites() {
    let response = ResponseBuilder::new(StatusCode::Ok)
        .header("Content-Type", "text/plain")
        .header("Content-Type", "text/html")
        .build();

    assert_eq!(response.headers.get("Content-Type").unwrap(), "text/html");
    assert_eq!(response.headers.len(), 1);
}

#[test]
fn test_error_helpers_mark_connection_close() {
    let response = Response::bad_request();
    assert_eq!(response.status, StatusCode::BadRequest);
    assert_eq!(response.headers.get("Connection").unwrap(), "close");

    let response = Response::not_found();
    assert_eq!(response.status, StatusCode::NotFound);
    assert_eq!(response.headers.get("Connection").unwrap(), "close");
}

#[test]
fn test_serialize_status_line() {
    let wire = serialize_response(&Response::not_found());
    let text = String::from_utf8(wire).unwrap();

    assert!(text.starts_with("HTTP/1.1 404 Not Found\r\n"));
}

#[test]
fn test_serialize_head_ends_with_blank_line() {
    let wire = serialize_response(&Response::bad_request());
    let text = String::from_utf8(wire).unwrap();

    assert!(text.ends_with("\r\n\r\n"));
}

#[test]
fn test_serialize_includes_server_header() {
    let wire = serialize_response(&ResponseBuilder::new(StatusCode::Ok).build());
    let text = String::from_utf8(wire).unwrap();

    assert!(text.contains("Server: palisade/0.1\r\n"));
}

#[test]
fn test_serialize_round_trip_status_and_headers() {
    let response = ResponseBuilder::new(StatusCode::Ok)
        .header("Content-Type", "text/html")
        .header("Content-Length", "10")
        .header("Last-Modified", "Mon, 01 Jan 2024 00:00:00 GMT")
        .build();

    let wire = serialize_response(&response);
    let text = String::from_utf8(wire).unwrap();
    let (head, body) = text.split_once("\r\n\r\n").unwrap();
    assert_eq!(body, "");

    let mut lines = head.split("\r\n");
    let status_line = lines.next().unwrap();
    let mut parts = status_line.split(' ');
    assert_eq!(parts.next(), Some("HTTP/1.1"));
    let code: u16 = parts.next().unwrap().parse().unwrap();
    assert_eq!(code, response.status.as_u16());

    let mut reparsed = std::collections::HashMap::new();
    for line in lines {
        let (key, value) = line.split_once(": ").unwrap();
        reparsed.insert(key.to_string(), value.to_string());
    }
    assert_eq!(reparsed.remove("Server").as_deref(), Some("palisade/0.1"));
    assert_eq!(reparsed, response.headers);
}
