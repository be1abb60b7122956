//! The transport-agnostic [`Channel`] trait and an enum-dispatch wrapper
//! (`AnyChannel`) for call sites that need to hold either realization behind
//! one type (the reconnecting supervisor's channel factory, for instance).
//!
//! `async fn` in traits (Edition 2024 RPITIT) isn't object-safe, so `Channel`
//! cannot be used as `dyn Channel` — the same constraint and the same
//! enum-wrapper workaround the reference crate uses for its hardware device
//! traits (`turnkey_hardware::devices::AnyKeypadDevice` and friends).

#![allow(async_fn_in_trait)]

use sdn_core::Result;
use tokio::time::Instant;

/// A byte-stream transport carrying SDN frames, with no knowledge of the
/// frame format itself. `open`/`close` are idempotent; `close` must
/// interrupt any pending read.
pub trait Channel: Send {
    /// Open the underlying transport. Calling `open` on an already-open
    /// channel is a no-op.
    async fn open(&mut self) -> Result<()>;

    /// Close the transport, interrupting any in-flight [`Channel::read_byte`].
    /// Calling `close` on an already-closed channel is a no-op.
    async fn close(&mut self) -> Result<()>;

    /// Block until one byte is available. Updates [`Channel::last_activity`]
    /// on success. Fails with `Error::ChannelClosed` or `Error::Io` if the
    /// channel is closed or the transport errors — either failure also
    /// transitions the channel to closed.
    async fn read_byte(&mut self) -> Result<u8>;

    /// Write `bytes` atomically and flush. Updates
    /// [`Channel::last_activity`] on success; same failure semantics as
    /// [`Channel::read_byte`].
    async fn write_bytes(&mut self, bytes: &[u8]) -> Result<()>;

    /// Monotonic timestamp of the most recent successful I/O.
    fn last_activity(&self) -> Instant;
}

/// Enum-dispatch wrapper over the concrete channel realizations, used
/// wherever a single value needs to be either kind (the supervisor's
/// reconnection factory, mock channels in tests).
pub enum AnyChannel {
    #[cfg(feature = "transport-tcp")]
    Tcp(crate::tcp::TcpChannel),
    #[cfg(feature = "transport-serial")]
    Serial(crate::serial::SerialChannel),
}

impl Channel for AnyChannel {
    async fn open(&mut self) -> Result<()> {
        match self {
            #[cfg(feature = "transport-tcp")]
            AnyChannel::Tcp(channel) => channel.open().await,
            #[cfg(feature = "transport-serial")]
            AnyChannel::Serial(channel) => channel.open().await,
        }
    }

    async fn close(&mut self) -> Result<()> {
        match self {
            #[cfg(feature = "transport-tcp")]
            AnyChannel::Tcp(channel) => channel.close().await,
            #[cfg(feature = "transport-serial")]
            AnyChannel::Serial(channel) => channel.close().await,
        }
    }

    async fn read_byte(&mut self) -> Result<u8> {
        match self {
            #[cfg(feature = "transport-tcp")]
            AnyChannel::Tcp(channel) => channel.read_byte().await,
            #[cfg(feature = "transport-serial")]
            AnyChannel::Serial(channel) => channel.read_byte().await,
        }
    }

    async fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        match self {
            #[cfg(feature = "transport-tcp")]
            AnyChannel::Tcp(channel) => channel.write_bytes(bytes).await,
            #[cfg(feature = "transport-serial")]
            AnyChannel::Serial(channel) => channel.write_bytes(bytes).await,
        }
    }

    fn last_activity(&self) -> Instant {
        match self {
            #[cfg(feature = "transport-tcp")]
            AnyChannel::Tcp(channel) => channel.last_activity(),
            #[cfg(feature = "transport-serial")]
            AnyChannel::Serial(channel) => channel.last_activity(),
        }
    }
}
