//! MCP server session loop.
//!
//! The server reads one line, answers it, and only then reads the next. One
//! request is in flight at a time and responses leave in the order requests
//! arrived. A line that cannot be decoded costs one `Parse error` response;
//! the session carries on. The loop ends cleanly when the input closes.

use std::io;

use tokio::io::{AsyncBufRead, AsyncWrite};
use tracing::{debug, info};

use crate::mcp::dispatcher::Dispatcher;
use crate::mcp::protocol::{parse_message, Envelope, JsonRpcError};
use crate::mcp::transport::{LineTransport, StdioTransport};

/// The echoserver MCP server.
pub struct McpServer {
    dispatcher: Dispatcher,
}

impl McpServer {
    /// Creates a server answering requests with `dispatcher`.
    #[must_use]
    pub const fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    /// Returns the dispatcher.
    #[must_use]
    pub const fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Runs the server over stdio with graceful shutdown handling.
    ///
    /// # Errors
    ///
    /// Returns an error if transport I/O fails.
    pub async fn run(&self) -> io::Result<()> {
        let mut transport = StdioTransport::stdio();
        self.run_with_shutdown(&mut transport).await
    }

    /// Serves requests from `transport` until its input closes.
    ///
    /// # Errors
    ///
    /// Returns an error if transport I/O fails.
    pub async fn serve<R, W>(&self, transport: &mut LineTransport<R, W>) -> io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        while let Some(line) = transport.read_line().await? {
            self.answer(transport, &line).await?;
        }
        info!("Input closed, ending session");
        Ok(())
    }

    /// Runs the main loop and handles shutdown.
    #[cfg(unix)]
    async fn run_with_shutdown(&self, transport: &mut StdioTransport) -> io::Result<()> {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigint = signal(SignalKind::interrupt())?;
        let mut sigterm = signal(SignalKind::terminate())?;

        loop {
            tokio::select! {
                _ = sigint.recv() => {
                    info!("Received SIGINT, initiating graceful shutdown");
                    return Ok(());
                }

                _ = sigterm.recv() => {
                    info!("Received SIGTERM, initiating graceful shutdown");
                    return Ok(());
                }

                line_result = transport.read_line() => {
                    let Some(line) = line_result? else {
                        info!("Input closed, ending session");
                        return Ok(());
                    };
                    self.answer(transport, &line).await?;
                }
            }
        }
    }

    /// Runs the main loop and handles shutdown.
    #[cfg(windows)]
    async fn run_with_shutdown(&self, transport: &mut StdioTransport) -> io::Result<()> {
        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        loop {
            tokio::select! {
                _ = &mut ctrl_c => {
                    info!("Received Ctrl+C, initiating graceful shutdown");
                    return Ok(());
                }

                line_result = transport.read_line() => {
                    let Some(line) = line_result? else {
                        info!("Input closed, ending session");
                        return Ok(());
                    };
                    self.answer(transport, &line).await?;
                }
            }
        }
    }

    /// Handles one line and writes its response, if any.
    async fn answer<R, W>(&self, transport: &mut LineTransport<R, W>, line: &[u8]) -> io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        if let Some(envelope) = self.handle_bytes(line).await {
            transport.write_envelope(&envelope).await?;
        }
        Ok(())
    }

    /// Handles a single raw line of input.
    ///
    /// A line that is not valid UTF-8 is answered with a parse error.
    pub async fn handle_bytes(&self, line: &[u8]) -> Option<Envelope> {
        match std::str::from_utf8(line) {
            Ok(text) => self.handle_line(text).await,
            Err(error) => {
                debug!(%error, "Discarding line that is not valid UTF-8");
                Some(JsonRpcError::parse_error().into())
            }
        }
    }

    /// Handles a single line of input.
    ///
    /// Returns `None` for blank lines, which carry no request.
    pub async fn handle_line(&self, line: &str) -> Option<Envelope> {
        if line.trim().is_empty() {
            return None;
        }

        let envelope = match parse_message(line) {
            Ok(message) => self.dispatcher.handle(&message).await,
            Err(error) => {
                debug!("Discarding undecodable line");
                error.into()
            }
        };
        Some(envelope)
    }
}
