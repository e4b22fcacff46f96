//! Line-delimited transport for MCP messages.
//!
//! This module implements the stdio transport as specified by MCP:
//!
//! - Messages are UTF-8 encoded JSON-RPC (checked per line by the server)
//! - Messages are delimited by newlines
//! - Messages must not contain embedded newlines
//! - stdin: receives messages from client
//! - stdout: sends messages to client
//! - stderr: may be used for logging (not MCP messages)
//!
//! [`LineTransport`] works over any buffered reader and writer, so the same
//! code drives stdio in production and in-memory buffers in tests.

use std::io;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::mcp::protocol::Envelope;

/// The transport used by the server binary.
pub type StdioTransport = LineTransport<BufReader<tokio::io::Stdin>, tokio::io::Stdout>;

/// Reads request lines from `R` and writes response lines to `W`.
pub struct LineTransport<R, W> {
    reader: R,
    writer: W,
}

impl StdioTransport {
    /// Creates a transport over the process's stdin and stdout.
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
    }
}

impl<R, W> LineTransport<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    /// Creates a transport over `reader` and `writer`.
    pub const fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Consumes the transport, returning the writer.
    pub fn into_writer(self) -> W {
        self.writer
    }

    /// Reads the next message line as raw bytes, without its terminator.
    ///
    /// Returns `None` once the input is closed (EOF). The bytes are not
    /// checked for UTF-8 here; a line that fails to decode is answered on its
    /// own and must not end the session.
    ///
    /// # Errors
    ///
    /// Returns an error if reading fails.
    pub async fn read_line(&mut self) -> io::Result<Option<Vec<u8>>> {
        let mut line = Vec::new();
        let bytes_read = self.reader.read_until(b'\n', &mut line).await?;

        if bytes_read == 0 {
            return Ok(None);
        }

        if line.last() == Some(&b'\n') {
            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }
        }

        Ok(Some(line))
    }

    /// Writes one envelope, terminated with a newline.
    ///
    /// # Errors
    ///
    /// Returns an error if serialisation or writing fails.
    pub async fn write_envelope(&mut self, envelope: &Envelope) -> io::Result<()> {
        let json = serde_json::to_string(envelope)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        self.write_raw(&json).await
    }

    /// Writes a raw JSON string with newline termination.
    async fn write_raw(&mut self, json: &str) -> io::Result<()> {
        // MCP spec: messages must not contain embedded newlines
        debug_assert!(
            !json.contains('\n'),
            "JSON message must not contain embedded newlines"
        );

        self.writer.write_all(json.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::mcp::protocol::{JsonRpcError, JsonRpcResponse, RequestId};

    #[tokio::test]
    async fn read_lines_strips_terminators() {
        let input: &[u8] = b"first\r\nsecond\nlast";
        let mut transport = LineTransport::new(input, Vec::new());

        assert_eq!(transport.read_line().await.unwrap().as_deref(), Some(&b"first"[..]));
        assert_eq!(transport.read_line().await.unwrap().as_deref(), Some(&b"second"[..]));
        assert_eq!(transport.read_line().await.unwrap().as_deref(), Some(&b"last"[..]));
        assert_eq!(transport.read_line().await.unwrap(), None);
    }

    #[tokio::test]
    async fn undecodable_bytes_are_returned_not_rejected() {
        let input: &[u8] = b"bad \xff byte\r\ncut \xe2\x82\nnext\n";
        let mut transport = LineTransport::new(input, Vec::new());

        assert_eq!(
            transport.read_line().await.unwrap().as_deref(),
            Some(&b"bad \xff byte"[..])
        );
        assert_eq!(
            transport.read_line().await.unwrap().as_deref(),
            Some(&b"cut \xe2\x82"[..])
        );
        assert_eq!(transport.read_line().await.unwrap().as_deref(), Some(&b"next"[..]));
        assert_eq!(transport.read_line().await.unwrap(), None);
    }

    #[tokio::test]
    async fn response_with_embedded_newlines_stays_on_one_line() {
        let input: &[u8] = b"";
        let mut transport = LineTransport::new(input, Vec::new());
        let response = JsonRpcResponse::success(
            RequestId::from(1),
            json!({"content": [{"type": "text", "text": "a\nb \"quoted\""}]}),
        );

        transport.write_envelope(&response.into()).await.unwrap();
        let output = String::from_utf8(transport.into_writer()).unwrap();

        assert_eq!(output.matches('\n').count(), 1);
        assert!(output.ends_with('\n'));
        let decoded: serde_json::Value = serde_json::from_str(output.trim_end()).unwrap();
        assert_eq!(decoded["result"]["content"][0]["text"], "a\nb \"quoted\"");
    }

    #[tokio::test]
    async fn error_envelope_written_as_line() {
        let input: &[u8] = b"";
        let mut transport = LineTransport::new(input, Vec::new());

        transport
            .write_envelope(&JsonRpcError::parse_error().into())
            .await
            .unwrap();
        let output = String::from_utf8(transport.into_writer()).unwrap();
        assert_eq!(
            output,
            "{\"jsonrpc\":\"2.0\",\"id\":null,\"error\":{\"code\":-32700,\"message\":\"Parse error\"}}\n"
        );
    }
}
