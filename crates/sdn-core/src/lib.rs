//! Core types shared across the Somfy SDN workspace: addresses, node types,
//! message ids, NACK reasons, the crate-wide error type, and protocol
//! constants. No I/O, no async — everything here is a pure value type.

pub mod address;
pub mod constants;
pub mod error;
pub mod message_id;
pub mod nack;
pub mod node_type;

pub use address::Address;
pub use error::{Error, Result};
pub use message_id::{KnownMessageId, MessageId};
pub use nack::{KnownNackReason, NackReason};
pub use node_type::{KnownNodeType, NodeType};

/// Crate version, exposed for diagnostics/logging.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
