//! Frame codec and byte-stream recognition for the Somfy SDN protocol.
//!
//! This crate has no knowledge of a physical transport; it turns bytes into
//! [`Frame`]s and back. See `sdn-transport` for channels and `sdn-bus` for
//! the request/reply exchange built on top of this codec.

mod builder;
mod enum_or_int;
mod frame;
mod payload;
mod recognizer;
mod validation;

pub use builder::FrameBuilder;
pub use frame::Frame;
pub use payload::{
    CtrlMoveToFunction, KnownCtrlMoveToFunction, KnownLocalUiFunction, KnownLocalUiIndex,
    KnownMotorCommandSource, KnownMotorDirection, KnownMotorIpFunction,
    KnownMotorRotationDirection, KnownMotorStatus, KnownMotorStatusCause,
    KnownNetworkLockFunction, KnownRelativeMoveFunction, KnownSetLimitsFunction,
    KnownSomfyDirection, LocalUiFunction, LocalUiIndex, MotorCommandSource, MotorDirection,
    MotorIpFunction, MotorRotationDirection, MotorStatus, MotorStatusCause, NetworkLockFunction,
    Payload, RelativeMoveFunction, SetLimitsFunction, SomfyDirection,
};
pub use recognizer::Recognizer;
