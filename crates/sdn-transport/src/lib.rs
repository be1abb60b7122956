//! Byte-stream transports for the Somfy SDN bus.
//!
//! This crate knows nothing about frames or payloads; it exposes
//! [`Channel`], a small async trait for a half-duplex byte stream, plus two
//! concrete realizations gated behind Cargo features so a consumer that
//! only needs the codec doesn't pull in `serialport`.

pub mod channel;
#[cfg(feature = "transport-serial")]
pub mod serial;
#[cfg(feature = "transport-tcp")]
pub mod tcp;

pub use channel::{AnyChannel, Channel};
#[cfg(feature = "transport-serial")]
pub use serial::{SerialChannel, SerialChannelConfig};
#[cfg(feature = "transport-tcp")]
pub use tcp::{TcpChannel, TcpChannelConfig};
