//! # TCP Transport
//!
//! One connection to the remote runtime. Each message travels as
//! `[len: u32 LE][payload]`; a request is answered by exactly one reply.
//!
//! A call that fails after its request started going out leaves the stream
//! at an unknown offset, with part of a request or reply still in flight.
//! The transport is then marked broken and every later call fails with
//! `ConnectionLost` instead of reading stray bytes as a length header.

use std::net::SocketAddr;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use tokio::io::AsyncRead;
use tokio::io::AsyncReadExt;
use tokio::io::AsyncWrite;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::net::ToSocketAddrs;
use tokio::sync::Mutex as AsyncMutex;

use crate::transport::Result;
use crate::transport::Transport;
use crate::transport::TransportError;

#[derive(Debug)]
pub struct TcpTransport {
    stream: AsyncMutex<TcpStream>,
    peer_addr: SocketAddr,
    max_frame_len: usize,
    broken: AtomicBool,
}

impl TcpTransport {
    pub async fn connect(addr: impl ToSocketAddrs, max_frame_len: usize) -> Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        Self::from_stream(stream, max_frame_len)
    }

    pub fn from_stream(stream: TcpStream, max_frame_len: usize) -> Result<Self> {
        stream.set_nodelay(true)?;
        let peer_addr = stream.peer_addr()?;
        tracing::info!(%peer_addr, "connected to remote runtime");
        Ok(Self {
            stream: AsyncMutex::new(stream),
            peer_addr,
            max_frame_len,
            broken: AtomicBool::new(false),
        })
    }

    pub fn peer_addr(&self) -> SocketAddr {
        self.peer_addr
    }

    /// Whether an earlier failure left the stream unusable.
    pub fn is_broken(&self) -> bool {
        self.broken.load(Ordering::Acquire)
    }
}

#[async_trait::async_trait]
impl Transport for TcpTransport {
    async fn call(&self, payload: &[u8]) -> Result<Vec<u8>> {
        // Rejected before a byte is written, so the stream stays in step.
        if payload.len() > self.max_frame_len {
            return Err(TransportError::PayloadTooLarge { len: payload.len(), max: self.max_frame_len });
        }

        let mut stream = self.stream.lock().await;
        if self.is_broken() {
            return Err(TransportError::ConnectionLost(format!(
                "connection to {} is out of step after an earlier failure",
                self.peer_addr
            )));
        }

        let exchange = async {
            write_frame(&mut *stream, payload, self.max_frame_len).await?;
            read_frame(&mut *stream, self.max_frame_len).await
        };
        let reply = exchange.await;
        if let Err(e) = &reply {
            self.broken.store(true, Ordering::Release);
            tracing::warn!(peer_addr = %self.peer_addr, error = %e, "connection marked broken");
        }
        reply
    }
}

/// Writes one length-prefixed frame.
pub async fn write_frame<W>(writer: &mut W, payload: &[u8], max_frame_len: usize) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    if payload.len() > max_frame_len {
        return Err(TransportError::PayloadTooLarge { len: payload.len(), max: max_frame_len });
    }
    let len = u32::try_from(payload.len())
        .map_err(|_| TransportError::PayloadTooLarge { len: payload.len(), max: u32::MAX as usize })?;
    writer.write_all(&len.to_le_bytes()).await?;
    writer.write_all(payload).await?;
    writer.flush().await?;
    Ok(())
}

/// Reads one length-prefixed frame.
///
/// A clean EOF before the header is reported as `ConnectionLost`.
pub async fn read_frame<R>(reader: &mut R, max_frame_len: usize) -> Result<Vec<u8>>
where
    R: AsyncRead + Unpin,
{
    let mut header = [0u8; 4];
    reader.read_exact(&mut header).await.map_err(|e| match e.kind() {
        std::io::ErrorKind::UnexpectedEof => TransportError::ConnectionLost("peer closed the connection".into()),
        _ => TransportError::from(e),
    })?;

    let len = u32::from_le_bytes(header) as usize;
    if len > max_frame_len {
        return Err(TransportError::PayloadTooLarge { len, max: max_frame_len });
    }

    let mut payload = vec![0u8; len];
    reader.read_exact(&mut payload).await?;
    Ok(payload)
}
