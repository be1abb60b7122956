//! TCP realization of [`Channel`], grounded in
//! `turnkey_network::client::TcpClient`'s shape (config struct + `connect`/
//! `close`, tracing at the same granularity) but carrying raw bytes instead
//! of framed `HenryCodec` messages: the SDN recognizer does its own framing
//! one byte at a time.

use std::net::SocketAddr;
use std::time::Duration;

use sdn_core::{Error, Result};
use tokio::io::{AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::time::{self, Instant};
use tracing::{debug, error, info, trace};

use crate::channel::Channel;

/// Configuration for [`TcpChannel`].
#[derive(Debug, Clone)]
pub struct TcpChannelConfig {
    pub server_addr: SocketAddr,
    pub connect_timeout: Duration,
}

impl TcpChannelConfig {
    #[must_use]
    pub fn new(server_addr: SocketAddr, connect_timeout: Duration) -> Self {
        Self { server_addr, connect_timeout }
    }
}

/// A byte-stream channel backed by `tokio::net::TcpStream`.
pub struct TcpChannel {
    config: TcpChannelConfig,
    stream: Option<BufReader<TcpStream>>,
    last_activity: Instant,
}

impl TcpChannel {
    #[must_use]
    pub fn new(config: TcpChannelConfig) -> Self {
        Self { config, stream: None, last_activity: Instant::now() }
    }
}

impl Channel for TcpChannel {
    async fn open(&mut self) -> Result<()> {
        if self.stream.is_some() {
            return Ok(());
        }
        debug!(addr = %self.config.server_addr, "connecting tcp channel");
        let stream = time::timeout(self.config.connect_timeout, TcpStream::connect(self.config.server_addr))
            .await
            .map_err(|_| Error::Config(format!("connect to {} timed out", self.config.server_addr)))?
            .map_err(Error::Io)?;
        info!(addr = %self.config.server_addr, "tcp channel connected");
        self.stream = Some(BufReader::new(stream));
        self.last_activity = Instant::now();
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(mut stream) = self.stream.take() {
            let _ = stream.shutdown().await;
            info!(addr = %self.config.server_addr, "tcp channel closed");
        }
        Ok(())
    }

    async fn read_byte(&mut self) -> Result<u8> {
        let stream = self.stream.as_mut().ok_or(Error::ChannelClosed)?;
        let mut buf = [0u8; 1];
        match stream.read_exact(&mut buf).await {
            Ok(_) => {
                trace!(byte = buf[0], "tcp channel read byte");
                self.last_activity = Instant::now();
                Ok(buf[0])
            }
            Err(err) => {
                error!(error = %err, "tcp channel read failed");
                self.stream = None;
                Err(Error::Io(err))
            }
        }
    }

    async fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        let stream = self.stream.as_mut().ok_or(Error::ChannelClosed)?;
        match stream.get_mut().write_all(bytes).await.and(stream.get_mut().flush().await) {
            Ok(()) => {
                trace!(len = bytes.len(), "tcp channel wrote bytes");
                self.last_activity = Instant::now();
                Ok(())
            }
            Err(err) => {
                error!(error = %err, "tcp channel write failed");
                self.stream = None;
                Err(Error::Io(err))
            }
        }
    }

    fn last_activity(&self) -> Instant {
        self.last_activity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn read_and_write_round_trip_over_loopback() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 3];
            socket.read_exact(&mut buf).await.unwrap();
            socket.write_all(&[buf[0], buf[1], buf[2]]).await.unwrap();
        });

        let mut channel = TcpChannel::new(TcpChannelConfig::new(addr, Duration::from_secs(1)));
        channel.open().await.unwrap();
        channel.write_bytes(&[0x01, 0x02, 0x03]).await.unwrap();

        let mut echoed = Vec::new();
        for _ in 0..3 {
            echoed.push(channel.read_byte().await.unwrap());
        }
        assert_eq!(echoed, vec![0x01, 0x02, 0x03]);

        channel.close().await.unwrap();
        server.await.unwrap();
    }

    #[tokio::test]
    async fn read_on_closed_channel_fails() {
        let mut channel =
            TcpChannel::new(TcpChannelConfig::new("127.0.0.1:1".parse().unwrap(), Duration::from_secs(1)));
        assert!(channel.read_byte().await.is_err());
    }
}
