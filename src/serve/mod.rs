//! File serving: docroot resolution and shared per-session context.

pub mod resolve;

use std::sync::Arc;
use std::time::Duration;

use crate::http::request::Request;
use crate::serve::resolve::DocRoot;

/// Observation hook invoked with each parsed request before file serving.
pub type RequestHook = Arc<dyn Fn(&Request) + Send + Sync>;

/// Read-only context shared by every connection session.
#[derive(Clone)]
pub struct ServeState {
    pub docroot: DocRoot,
    pub recv_timeout: Duration,
    pub on_request: Option<RequestHook>,
}

impl ServeState {
    pub fn new(docroot: DocRoot, recv_timeout: Duration) -> Self {
        Self {
            docroot,
            recv_timeout,
            on_request: None,
        }
    }
}
