//! Serial realization of [`Channel`] over the `serialport` crate (already a
//! reference-crate dependency, gated there behind `hardware-serial`; gated
//! here behind `transport-serial`). `serialport::SerialPort` is a blocking
//! API, so each operation hands the port to `tokio::task::spawn_blocking`
//! and gets it back, rather than re-implementing a serial driver on top of
//! raw file descriptors.

use std::io::{Read, Write};
use std::time::Duration;

use sdn_core::constants::SERIAL_BAUD_RATE;
use sdn_core::{Error, Result};
use serialport::SerialPort;
use tokio::time::Instant;
use tracing::{debug, error, info, trace};

use crate::channel::Channel;

/// Configuration for [`SerialChannel`].
#[derive(Debug, Clone)]
pub struct SerialChannelConfig {
    pub device_path: String,
    pub read_timeout: Duration,
}

impl SerialChannelConfig {
    #[must_use]
    pub fn new(device_path: impl Into<String>) -> Self {
        Self { device_path: device_path.into(), read_timeout: Duration::from_millis(100) }
    }
}

/// A byte-stream channel backed by a physical or virtual serial port at
/// 4800 baud, odd parity, 8 data bits, 1 stop bit (SDN protocol, page 9).
pub struct SerialChannel {
    config: SerialChannelConfig,
    port: Option<Box<dyn SerialPort>>,
    last_activity: Instant,
}

impl SerialChannel {
    #[must_use]
    pub fn new(config: SerialChannelConfig) -> Self {
        Self { config, port: None, last_activity: Instant::now() }
    }
}

impl Channel for SerialChannel {
    async fn open(&mut self) -> Result<()> {
        if self.port.is_some() {
            return Ok(());
        }
        let path = self.config.device_path.clone();
        let read_timeout = self.config.read_timeout;
        debug!(path = %path, baud = SERIAL_BAUD_RATE, "opening serial channel");
        let port = tokio::task::spawn_blocking(move || {
            serialport::new(&path, SERIAL_BAUD_RATE)
                .data_bits(serialport::DataBits::Eight)
                .parity(serialport::Parity::Odd)
                .stop_bits(serialport::StopBits::One)
                .timeout(read_timeout)
                .open()
        })
        .await
        .map_err(|err| Error::Config(format!("serial open task panicked: {err}")))?
        .map_err(|err| Error::Config(format!("failed to open {}: {err}", self.config.device_path)))?;
        info!(path = %self.config.device_path, "serial channel opened");
        self.port = Some(port);
        self.last_activity = Instant::now();
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        if self.port.take().is_some() {
            info!(path = %self.config.device_path, "serial channel closed");
        }
        Ok(())
    }

    async fn read_byte(&mut self) -> Result<u8> {
        let mut port = self.port.take().ok_or(Error::ChannelClosed)?;
        let (result, port) = tokio::task::spawn_blocking(move || {
            let mut buf = [0u8; 1];
            let result = port.read_exact(&mut buf).map(|()| buf[0]);
            (result, port)
        })
        .await
        .map_err(|err| Error::Config(format!("serial read task panicked: {err}")))?;

        match result {
            Ok(byte) => {
                trace!(byte, "serial channel read byte");
                self.port = Some(port);
                self.last_activity = Instant::now();
                Ok(byte)
            }
            Err(err) => {
                error!(error = %err, "serial channel read failed");
                Err(Error::Io(err))
            }
        }
    }

    async fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        let mut port = self.port.take().ok_or(Error::ChannelClosed)?;
        let owned = bytes.to_vec();
        let (result, port) = tokio::task::spawn_blocking(move || {
            let result = port.write_all(&owned).and_then(|()| port.flush());
            (result, port)
        })
        .await
        .map_err(|err| Error::Config(format!("serial write task panicked: {err}")))?;

        match result {
            Ok(()) => {
                trace!(len = bytes.len(), "serial channel wrote bytes");
                self.port = Some(port);
                self.last_activity = Instant::now();
                Ok(())
            }
            Err(err) => {
                error!(error = %err, "serial channel write failed");
                Err(Error::Io(err))
            }
        }
    }

    fn last_activity(&self) -> Instant {
        self.last_activity
    }
}
