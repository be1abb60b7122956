//! A fluent constructor for outgoing [`Frame`]s, mirroring the ergonomics
//! the source gets for free from `SomfyMessage`'s keyword-argument
//! constructor (`examples/original_source/somfy/messages.py`). Rust has no
//! keyword arguments, so a builder is the idiomatic stand-in.

use sdn_core::{Address, MessageId, NodeType, Result};

use crate::frame::Frame;
use crate::payload::Payload;
use crate::validation::validate_payload_len;

/// Builds a [`Frame`] one field at a time, validating on [`FrameBuilder::build`].
///
/// Defaults: no ack requested, both node types [`NodeType::ALL`], both
/// addresses [`Address::BROADCAST`], and an [`Payload::Empty`] payload.
#[derive(Debug, Clone)]
pub struct FrameBuilder {
    msg_id: Option<MessageId>,
    need_ack: bool,
    from_node_type: NodeType,
    to_node_type: NodeType,
    from_addr: Address,
    to_addr: Address,
    payload: Payload,
}

impl FrameBuilder {
    #[must_use]
    pub fn new(msg_id: MessageId) -> Self {
        Self {
            msg_id: Some(msg_id),
            need_ack: false,
            from_node_type: NodeType::ALL,
            to_node_type: NodeType::ALL,
            from_addr: Address::BROADCAST,
            to_addr: Address::BROADCAST,
            payload: Payload::Empty,
        }
    }

    #[must_use]
    pub fn need_ack(mut self, need_ack: bool) -> Self {
        self.need_ack = need_ack;
        self
    }

    #[must_use]
    pub fn from_node_type(mut self, node_type: NodeType) -> Self {
        self.from_node_type = node_type;
        self
    }

    #[must_use]
    pub fn to_node_type(mut self, node_type: NodeType) -> Self {
        self.to_node_type = node_type;
        self
    }

    #[must_use]
    pub fn from_addr(mut self, addr: Address) -> Self {
        self.from_addr = addr;
        self
    }

    #[must_use]
    pub fn to_addr(mut self, addr: Address) -> Self {
        self.to_addr = addr;
        self
    }

    #[must_use]
    pub fn payload(mut self, payload: Payload) -> Self {
        self.payload = payload;
        self
    }

    /// Validates the assembled payload length and produces the final frame.
    pub fn build(self) -> Result<Frame> {
        let payload_len = self.payload.encode().len();
        validate_payload_len(payload_len)?;
        Ok(Frame {
            msg_id: self.msg_id.expect("msg_id is set in FrameBuilder::new"),
            need_ack: self.need_ack,
            from_node_type: self.from_node_type,
            to_node_type: self.to_node_type,
            from_addr: self.from_addr,
            to_addr: self.to_addr,
            payload: self.payload,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_fills_in_sensible_defaults() {
        let frame = FrameBuilder::new(MessageId::from(0x02)).build().unwrap();
        assert!(!frame.need_ack);
        assert_eq!(frame.from_addr, Address::BROADCAST);
        assert_eq!(frame.payload, Payload::Empty);
    }

    #[test]
    fn builder_rejects_an_oversized_payload() {
        let oversized = Payload::Opaque(bytes::Bytes::from(vec![0u8; 22]));
        let err = FrameBuilder::new(MessageId::from(0x31)).payload(oversized).build();
        assert!(err.is_err());
    }

    #[test]
    fn builder_round_trips_through_encode_and_parse() {
        let frame = FrameBuilder::new(MessageId::from(0x02))
            .need_ack(true)
            .from_addr(Address::new(0x01, 0x02, 0x03))
            .to_addr(Address::MASTER)
            .payload(Payload::CtrlStop { reserved: 0 })
            .build()
            .unwrap();
        let bytes = frame.encode();
        assert_eq!(Frame::try_parse(&bytes), Some(frame));
    }
}
