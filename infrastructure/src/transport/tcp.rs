//! TCP adapter for the [`EventTransport`] port.
//!
//! Each connection owns its socket. The read half lives in a background
//! task that turns frames into [`TransportSignal`]s on an unbounded channel,
//! so [`EventConnection::recv`] is a plain channel receive and therefore
//! cancel-safe. The write half stays with the connection for outbound
//! payloads.

use super::framing::{read_frame, write_frame};
use async_trait::async_trait;
use mdt_application::ports::event_transport::{
    EventConnection, EventTransport, TransportError, TransportSignal,
};
use serde_json::{Value, json};
use tokio::io::{AsyncWriteExt, BufReader, BufWriter};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

/// Connects to the consultation server's event port.
pub struct TcpEventTransport {
    addr: String,
}

impl TcpEventTransport {
    pub fn new(addr: impl Into<String>) -> Self {
        Self { addr: addr.into() }
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }
}

#[async_trait]
impl EventTransport for TcpEventTransport {
    async fn connect(&self, session_id: &str) -> Result<Box<dyn EventConnection>, TransportError> {
        debug!("Connecting to event stream at {}", self.addr);
        let stream = TcpStream::connect(&self.addr)
            .await
            .map_err(|e| TransportError::ConnectionFailed(format!("{}: {}", self.addr, e)))?;
        let connection = TcpEventConnection::open(stream, session_id).await?;
        info!("Subscribed to session {} at {}", session_id, self.addr);
        Ok(Box::new(connection))
    }
}

/// One subscribed event stream.
pub struct TcpEventConnection {
    writer: BufWriter<OwnedWriteHalf>,
    rx: mpsc::UnboundedReceiver<TransportSignal>,
    cancel: CancellationToken,
    _reader_handle: JoinHandle<()>,
    closed: bool,
}

impl TcpEventConnection {
    /// Subscribe `stream` to `session_id` and start the reader task.
    pub async fn open(stream: TcpStream, session_id: &str) -> Result<Self, TransportError> {
        let (read_half, write_half) = stream.into_split();
        let mut writer = BufWriter::new(write_half);
        write_frame(&mut writer, &json!({ "session_id": session_id })).await?;

        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let reader_handle = tokio::spawn(Self::reader_loop(read_half, tx, cancel.clone()));

        Ok(Self {
            writer,
            rx,
            cancel,
            _reader_handle: reader_handle,
            closed: false,
        })
    }

    /// Background reader: single owner of the read half.
    ///
    /// Ends on cancellation, end of stream, or the first I/O error. Every
    /// exit other than cancellation is announced with a final `Closed`.
    async fn reader_loop(
        read_half: OwnedReadHalf,
        tx: mpsc::UnboundedSender<TransportSignal>,
        cancel: CancellationToken,
    ) {
        let mut reader = BufReader::new(read_half);
        let mut line = String::new();

        loop {
            let frame = tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("Event stream reader cancelled");
                    return;
                }
                frame = read_frame(&mut reader, &mut line) => frame,
            };

            match frame {
                Ok(Some(body)) => {
                    trace!("Event stream received: {}", body);
                    if tx.send(TransportSignal::Message(body)).is_err() {
                        return;
                    }
                }
                Ok(None) => {
                    info!("Event stream closed by server");
                    break;
                }
                Err(e) => {
                    warn!("Event stream read failed: {}", e);
                    let _ = tx.send(TransportSignal::Error(e.to_string()));
                    break;
                }
            }
        }

        let _ = tx.send(TransportSignal::Closed);
    }
}

#[async_trait]
impl EventConnection for TcpEventConnection {
    async fn send(&mut self, payload: &Value) -> Result<(), TransportError> {
        if self.closed {
            return Err(TransportError::Closed);
        }
        write_frame(&mut self.writer, payload)
            .await
            .map_err(|e| TransportError::SendFailed(e.to_string()))
    }

    async fn recv(&mut self) -> TransportSignal {
        if self.closed {
            return TransportSignal::Closed;
        }
        match self.rx.recv().await {
            Some(TransportSignal::Closed) | None => {
                self.closed = true;
                TransportSignal::Closed
            }
            Some(signal) => signal,
        }
    }

    async fn close(&mut self) {
        self.closed = true;
        if self.cancel.is_cancelled() {
            return;
        }
        self.cancel.cancel();
        if let Err(e) = self.writer.shutdown().await {
            debug!("Event stream shutdown: {}", e);
        }
    }
}

impl Drop for TcpEventConnection {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
