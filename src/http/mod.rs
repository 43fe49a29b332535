//! HTTP protocol implementation.
//!
//! A GET-only HTTP/1.1 server layer with support for keep-alive connections.
//!
//! # Architecture
//!
//! The HTTP layer is organized into several submodules:
//!
//! - **`framer`**: detects complete request frames in the connection byte stream
//! - **`parser`**: turns one frame into a structured request
//! - **`request`**: HTTP request representation
//! - **`response`**: HTTP response representation with builder pattern
//! - **`writer`**: serializes response heads and streams bodies to the client
//! - **`connection`**: the per-connection session state machine
//! - **`mime`**: MIME type detection based on file extensions
//!
//! # Connection State Machine
//!
//! Each client connection goes through a state machine:
//!
//! ```text
//!        ┌───────────────┐
//!        │ AwaitingFrame │ ← Wait for one complete request
//!        └───────┬───────┘
//!                │ Frame parsed
//!                ▼
//!        ┌───────────────┐
//!        │  Dispatching  │ ← Resolve the file, send one response
//!        └───────┬───────┘
//!                │ Response sent
//!                ├─ Keep-Alive → AwaitingFrame (same connection)
//!                └─ Otherwise  → Closed
//! ```
//!
//! A read timeout with a partial request pending and any parse failure send
//! a 400 and end in Closed; the peer closing ends the session cleanly.

pub mod request;
pub mod response;
pub mod parser;
pub mod framer;
pub mod connection;
pub mod writer;
pub mod mime;
