use std::collections::HashMap;

use crate::http::request::{Method, Request};

/// Headers every request must carry.
const REQUIRED_HEADERS: [&str; 1] = ["Host"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    InvalidEncoding,
    InvalidRequestLine(String),
    UnsupportedMethod(String),
    UnsupportedVersion(String),
    MalformedHeader(String),
    MissingHeader(&'static str),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::InvalidEncoding => write!(f, "request is not valid UTF-8"),
            ParseError::InvalidRequestLine(line) => {
                write!(f, "request line must have 3 parts: {}", line)
            }
            ParseError::UnsupportedMethod(method) => {
                write!(f, "only GET is supported: {}", method)
            }
            ParseError::UnsupportedVersion(version) => {
                write!(f, "only HTTP/1.1 is supported: {}", version)
            }
            ParseError::MalformedHeader(line) => {
                write!(f, "malformed key-value header: {}", line)
            }
            ParseError::MissingHeader(name) => write!(f, "required header: {}", name),
        }
    }
}

impl std::error::Error for ParseError {}

/// Parses one complete frame (terminator already stripped) into a request.
///
/// Header values are not validated further; duplicate headers overwrite
/// silently, last occurrence wins.
pub fn parse_request(frame: &[u8]) -> Result<Request, ParseError> {
    let text = std::str::from_utf8(frame).map_err(|_| ParseError::InvalidEncoding)?;

    let mut lines = text.split("\r\n");

    // i.e. 'GET /index.html HTTP/1.1'
    let request_line = lines.next().unwrap_or("");
    let parts: Vec<&str> = request_line.split(' ').collect();
    if parts.len() != 3 {
        return Err(ParseError::InvalidRequestLine(request_line.to_string()));
    }

    let method = Method::from_str(parts[0])
        .ok_or_else(|| ParseError::UnsupportedMethod(parts[0].to_string()))?;
    let path = parts[1];
    if parts[2] != "HTTP/1.1" {
        return Err(ParseError::UnsupportedVersion(parts[2].to_string()));
    }

    let mut headers = HashMap::new();
    for line in lines {
        let key_value: Vec<&str> = line.split(": ").collect();
        if key_value.len() != 2 {
            return Err(ParseError::MalformedHeader(line.to_string()));
        }
        headers.insert(key_value[0].to_string(), key_value[1].to_string());
    }

    for required in REQUIRED_HEADERS {
        if !headers.contains_key(required) {
            return Err(ParseError::MissingHeader(required));
        }
    }

    Ok(Request {
        method,
        path: path.to_string(),
        headers,
    })
}
