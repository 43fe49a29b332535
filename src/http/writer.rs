use std::path::Path;

use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::http::response::Response;

const HTTP_VERSION: &str = "HTTP/1.1";

/// Fixed Server header sent with every response.
const SERVER_NAME: &str = "palisade/0.1";

/// Chunk size for streaming file bodies.
const FILE_CHUNK_SIZE: usize = 8192;

/// Renders a response head into wire format: status line, Server header,
/// response headers, blank line.
pub fn serialize_response(resp: &Response) -> Vec<u8> {
    let mut buf = Vec::new();

    // Status line
    let status_line = format!(
        "{} {} {}\r\n",
        HTTP_VERSION,
        resp.status.as_u16(),
        resp.status.reason_phrase()
    );
    buf.extend_from_slice(status_line.as_bytes());
    buf.extend_from_slice(format!("Server: {}\r\n", SERVER_NAME).as_bytes());

    // Headers
    for (k, v) in &resp.headers {
        buf.extend_from_slice(k.as_bytes());
        buf.extend_from_slice(b": ");
        buf.extend_from_slice(v.as_bytes());
        buf.extend_from_slice(b"\r\n");
    }

    // Header/body separator
    buf.extend_from_slice(b"\r\n");

    buf
}

pub struct ResponseWriter {
    buffer: Vec<u8>,
    written: usize,
}

impl ResponseWriter {
    pub fn new(response: &Response) -> Self {
        Self {
            buffer: serialize_response(response),
            written: 0,
        }
    }

    pub async fn write_head<W>(&mut self, stream: &mut W) -> anyhow::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        while self.written < self.buffer.len() {
            let n = stream.write(&self.buffer[self.written..]).await?;

            if n == 0 {
                return Err(anyhow::anyhow!("connection closed while writing"));
            }

            self.written += n;
        }

        Ok(())
    }
}

/// Streams a file's bytes verbatim to the stream.
///
/// Returns the number of bytes sent; the caller checks it against the
/// declared Content-Length.
pub async fn send_file<W>(stream: &mut W, path: &Path) -> anyhow::Result<u64>
where
    W: AsyncWrite + Unpin,
{
    let mut file = File::open(path).await?;
    let mut chunk = [0u8; FILE_CHUNK_SIZE];
    let mut total: u64 = 0;

    loop {
        let n = file.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        stream.write_all(&chunk[..n]).await?;
        total += n as u64;
    }
    stream.flush().await?;

    Ok(total)
}
