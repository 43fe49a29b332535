use std::path::PathBuf;
use std::sync::Arc;

use tokio::net::TcpStream;
use tracing::{debug, warn};

use crate::http::framer::{Frame, Framer};
use crate::http::mime;
use crate::http::parser::parse_request;
use crate::http::request::Request;
use crate::http::response::{Response, ResponseBuilder, StatusCode};
use crate::http::writer::{ResponseWriter, send_file};
use crate::serve::ServeState;
use crate::serve::resolve::{Resolution, ServedFile};

pub struct Connection {
    stream: TcpStream,
    framer: Framer,
    state: ConnectionState,
    serve: Arc<ServeState>,
}

pub enum ConnectionState {
    /// Waiting for the framer to produce the next complete request.
    AwaitingFrame,
    /// One request parsed; deciding on and sending the response.
    Dispatching(Request),
    Closed,
}

impl Connection {
    pub fn new(stream: TcpStream, serve: Arc<ServeState>) -> Self {
        let framer = Framer::new(serve.recv_timeout);
        Self {
            stream,
            framer,
            state: ConnectionState::AwaitingFrame,
            serve,
        }
    }

    /// Drives the session to completion.
    ///
    /// Requests on one connection are handled strictly sequentially; the
    /// next frame is not read until the current response is fully sent.
    /// The socket is closed exactly once, when the connection is dropped
    /// after this returns.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            match std::mem::replace(&mut self.state, ConnectionState::Closed) {
                ConnectionState::AwaitingFrame => {
                    match self.framer.next_frame(&mut self.stream).await? {
                        Frame::Complete(frame) => match parse_request(&frame) {
                            Ok(request) => {
                                self.state = ConnectionState::Dispatching(request);
                            }
                            Err(e) => {
                                warn!("Bad request: {}", e);
                                self.send_head(&Response::bad_request()).await?;
                                self.state = ConnectionState::Closed;
                            }
                        },
                        Frame::Closed => {
                            self.state = ConnectionState::Closed;
                        }
                        Frame::TimedOut => {
                            // A partial request stuck in the buffer is a
                            // malformed request; an empty buffer is just an
                            // idle peer and gets no response.
                            if self.framer.has_pending() {
                                warn!("Read timed out with a partial request pending");
                                self.send_head(&Response::bad_request()).await?;
                            }
                            self.state = ConnectionState::Closed;
                        }
                    }
                }

                ConnectionState::Dispatching(request) => {
                    if let Some(hook) = &self.serve.on_request {
                        hook(&request);
                    }

                    self.serve_file(&request).await?;

                    if request.keep_alive() {
                        self.state = ConnectionState::AwaitingFrame;
                    } else {
                        self.state = ConnectionState::Closed;
                    }
                }

                ConnectionState::Closed => {
                    break;
                }
            }
        }

        Ok(())
    }

    async fn serve_file(&mut self, request: &Request) -> anyhow::Result<()> {
        match self.serve.docroot.resolve(&request.path) {
            Resolution::File(file) => self.send_ok(request, &file).await,
            Resolution::Escape => {
                warn!(path = %request.path, "Refusing path outside docroot");
                let page = self.serve.docroot.bad_request_page();
                self.send_error(&Response::bad_request(), page).await
            }
            Resolution::Missing => {
                debug!(path = %request.path, "File not found");
                let page = self.serve.docroot.not_found_page();
                self.send_error(&Response::not_found(), page).await
            }
        }
    }

    async fn send_ok(&mut self, request: &Request, file: &ServedFile) -> anyhow::Result<()> {
        let response = ResponseBuilder::new(StatusCode::Ok)
            .header("Content-Type", mime::content_type(&file.path))
            .header("Content-Length", file.len.to_string())
            .header("Last-Modified", httpdate::fmt_http_date(file.modified))
            .build();
        self.send_head(&response).await?;

        let sent = send_file(&mut self.stream, &file.path).await?;
        if sent != file.len {
            anyhow::bail!(
                "short write for {}: sent {} of {} bytes",
                file.path.display(),
                sent,
                file.len
            );
        }
        debug!(path = %request.path, bytes = sent, "Served file");

        Ok(())
    }

    async fn send_error(
        &mut self,
        response: &Response,
        page: Option<PathBuf>,
    ) -> anyhow::Result<()> {
        self.send_head(response).await?;
        if let Some(path) = page {
            // A misconfigured error page only loses the body, not the
            // response.
            if let Err(e) = send_file(&mut self.stream, &path).await {
                warn!("Failed to stream error page {}: {}", path.display(), e);
            }
        }
        Ok(())
    }

    async fn send_head(&mut self, response: &Response) -> anyhow::Result<()> {
        let mut writer = ResponseWriter::new(response);
        writer.write_head(&mut self.stream).await
    }
}
