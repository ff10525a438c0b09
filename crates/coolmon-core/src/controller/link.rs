//! TCP link to the cooling controller

use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::{TcpSocket, TcpStream};
use tokio::time::timeout;

use super::{clean_response, encode_command, ControllerConfig, ControllerError, STATUS_COMMAND};

/// Open connection to the cooling controller
pub struct ControllerLink {
    /// Connected stream
    stream: TcpStream,
    /// Receive timeout
    timeout: Duration,
    /// Maximum bytes read per response
    recv_buffer: usize,
    /// Controller address
    peer: SocketAddr,
}

impl ControllerLink {
    /// Connect to the controller described by `config`.
    ///
    /// When a local address is configured the socket is bound to it first,
    /// with address (and on Unix, port) reuse enabled.
    pub async fn connect(config: &ControllerConfig) -> Result<Self, ControllerError> {
        let peer = config.cooler_addr()?;
        let socket = if peer.is_ipv4() {
            TcpSocket::new_v4()?
        } else {
            TcpSocket::new_v6()?
        };
        socket.set_reuseaddr(true)?;
        #[cfg(unix)]
        socket.set_reuseport(true)?;

        if let Some(local) = config.local_addr()? {
            tracing::debug!("Binding controller socket to {}", local);
            socket.bind(local)?;
        }

        let timeout_dur = config.timeout();
        let stream = match timeout(timeout_dur, socket.connect(peer)).await {
            Ok(Ok(stream)) => stream,
            Ok(Err(e)) => return Err(ControllerError::ConnectionFailed(format!("{peer}: {e}"))),
            Err(_) => return Err(ControllerError::Timeout),
        };
        tracing::info!("Connected to controller at {}", peer);

        Ok(Self {
            stream,
            timeout: timeout_dur,
            recv_buffer: config.recv_buffer.max(1),
            peer,
        })
    }

    /// Controller address
    pub fn peer(&self) -> SocketAddr {
        self.peer
    }

    /// Send one command line
    pub async fn send(&mut self, command: &str) -> Result<(), ControllerError> {
        write_command(&mut self.stream, command).await
    }

    /// Receive one response and split it into cleaned lines.
    ///
    /// Reads at most one buffer's worth of bytes.
    pub async fn recv(&mut self) -> Result<Vec<String>, ControllerError> {
        read_response(&mut self.stream, self.timeout, self.recv_buffer).await
    }

    /// Request controller status and return the response lines
    pub async fn poll_status(&mut self) -> Result<Vec<String>, ControllerError> {
        self.send(STATUS_COMMAND).await?;
        self.recv().await
    }

    /// Shut down the write half of the connection
    pub async fn shutdown(&mut self) -> Result<(), ControllerError> {
        self.stream.shutdown().await?;
        Ok(())
    }

    /// Split into independently owned read and write halves
    pub fn into_split(self) -> (ControllerReader, ControllerWriter) {
        let (read, write) = self.stream.into_split();
        (
            ControllerReader {
                read,
                timeout: self.timeout,
                recv_buffer: self.recv_buffer,
            },
            ControllerWriter { write },
        )
    }
}

/// Receiving half of a [`ControllerLink`]
pub struct ControllerReader {
    read: tokio::net::tcp::OwnedReadHalf,
    timeout: Duration,
    recv_buffer: usize,
}

impl ControllerReader {
    /// Receive one response; see [`ControllerLink::recv`]
    pub async fn recv(&mut self) -> Result<Vec<String>, ControllerError> {
        read_response(&mut self.read, self.timeout, self.recv_buffer).await
    }
}

/// Sending half of a [`ControllerLink`]
pub struct ControllerWriter {
    write: tokio::net::tcp::OwnedWriteHalf,
}

impl ControllerWriter {
    /// Send one command line
    pub async fn send(&mut self, command: &str) -> Result<(), ControllerError> {
        write_command(&mut self.write, command).await
    }
}

async fn write_command<W>(writer: &mut W, command: &str) -> Result<(), ControllerError>
where
    W: AsyncWrite + Unpin,
{
    let bytes = encode_command(command)?;
    writer.write_all(&bytes).await?;
    writer.flush().await?;
    Ok(())
}

async fn read_response<R>(
    reader: &mut R,
    limit: Duration,
    capacity: usize,
) -> Result<Vec<String>, ControllerError>
where
    R: AsyncRead + Unpin,
{
    let mut buf = vec![0u8; capacity];
    let n = match timeout(limit, reader.read(&mut buf)).await {
        Ok(result) => result?,
        Err(_) => return Err(ControllerError::Timeout),
    };
    if n == 0 {
        return Err(ControllerError::Closed);
    }
    Ok(clean_response(&buf[..n]))
}
