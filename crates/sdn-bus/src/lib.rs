//! Drainer/exchange rendezvous, the reconnecting supervisor, and the
//! derived bus operations layered on top of `sdn-transport::Channel` and
//! `sdn-protocol::Frame`.

pub mod backoff;
pub mod exchanger;
pub mod mock;
pub mod ops;
pub mod reconnect;

pub use backoff::BackoffPolicy;
pub use exchanger::{Exchanger, ExchangerConfig, Sniffer};
pub use ops::{detect_devices, move_with_ack, try_exchange_one, wait_for_completion};
pub use reconnect::{ChannelFactory, ReconnectingSupervisor};
