use std::collections::HashMap;

/// HTTP request methods.
///
/// The server speaks a GET-only subset of HTTP/1.1; any other method is
/// rejected at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET - Retrieve a resource
    GET,
}

impl Method {
    /// Parses an HTTP method from a string.
    ///
    /// # Returns
    ///
    /// `Some(Method)` if the string matches a supported method, `None` otherwise.
    ///
    /// # Example
    ///
    /// ```
    /// # use palisade::http::request::Method;
    /// assert_eq!(Method::from_str("GET"), Some(Method::GET));
    /// assert_eq!(Method::from_str("POST"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "GET" => Some(Method::GET),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::GET => "GET",
        }
    }
}

/// Represents a parsed HTTP request from a client.
///
/// Built from exactly one complete frame by the parser. Immutable once
/// parsed; consumed by the dispatch logic and discarded after the response
/// is sent.
#[derive(Debug, Clone)]
pub struct Request {
    /// The HTTP method (only GET is accepted)
    pub method: Method,
    /// The request path (e.g., "/index.html")
    pub path: String,
    /// Request headers as key-value pairs; duplicates overwrite, last wins
    pub headers: HashMap<String, String>,
}

impl Request {
    /// Retrieves a header value by name.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.get(key).map(|v| v.as_str())
    }

    /// Determines whether the connection should remain open after the
    /// response.
    ///
    /// Requires an explicit `Connection: keep-alive`; anything else closes.
    pub fn keep_alive(&self) -> bool {
        self.header("Connection") == Some("keep-alive")
    }
}
