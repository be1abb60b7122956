use thiserror::Error;

use crate::NackReason;

/// Errors that can surface from the Somfy SDN runtime.
///
/// Decode rejection (bad checksum, length mismatch) and payload-variant
/// mismatch are deliberately *not* represented here: the former is a silent
/// `None` from `Frame::try_parse`, the latter degrades to
/// `Payload::Opaque`. Only conditions that a caller must react to surface as
/// `Error`.
#[derive(Error, Debug)]
pub enum Error {
    /// No reply satisfied the exchange's consumer before `COMM_TIMEOUT`
    /// elapsed.
    #[error("exchange timed out waiting for a reply")]
    ExchangeTimeout,

    /// The remote node responded with a NACK instead of an ACK.
    #[error("received NACK (reason {reason:?}) for message {msg_id:#04x}")]
    Nack { reason: NackReason, msg_id: u8 },

    /// The channel has been closed and no further I/O is possible.
    #[error("channel is closed")]
    ChannelClosed,

    /// An I/O error occurred on the underlying transport.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A `Frame` could not be constructed because a field violated the wire
    /// format's invariants (e.g. payload longer than 21 bytes).
    #[error("invalid frame: {0}")]
    InvalidFrame(String),

    /// A transport or exchanger was misconfigured.
    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
