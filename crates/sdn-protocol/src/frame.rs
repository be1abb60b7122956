//! The SDN frame envelope: msg id, length/ack byte, node type pair, address
//! pair, payload, and a whole-frame-inverted 16-bit checksum.
//!
//! Grounded in `examples/original_source/somfy/messages.py`'s
//! `SomfyMessage.serialize` / `SomfyMessage.try_parse`. The wire algorithm
//! (hand-verified against two captured frames before any of this crate was
//! written) is:
//!
//! ```text
//! data[0]       = msg_id
//! data[1]       = frame_len | (0x80 if need_ack else 0x00)
//! data[2]       = (from_node_type << 4) | to_node_type
//! data[3..6]    = from_addr, wire order (c, b, a)
//! data[6..9]    = to_addr, wire order (c, b, a)
//! data[9..9+n]  = payload bytes
//! ---- the bytes above are then bitwise-inverted in place ----
//! checksum      = sum(inverted data) & 0xFFFF, big-endian
//! data[9+n..]   = checksum
//! ```
//!
//! Decoding recomputes the checksum directly over the still-inverted bytes
//! as received, then inverts them back to recover the logical fields.

use sdn_core::constants::{LENGTH_MASK, MAX_FRAME_LEN, MIN_FRAME_LEN, NEED_ACK_BIT};
use sdn_core::{Address, MessageId, NodeType};

use crate::payload::Payload;

/// A fully decoded (or about-to-be-encoded) SDN frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub msg_id: MessageId,
    pub need_ack: bool,
    pub from_node_type: NodeType,
    pub to_node_type: NodeType,
    pub from_addr: Address,
    pub to_addr: Address,
    pub payload: Payload,
}

impl Frame {
    /// Serialize to wire bytes: envelope + payload + inversion + checksum.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let payload_bytes = self.payload.encode();
        let frame_len = MIN_FRAME_LEN + payload_bytes.len();

        let mut data = Vec::with_capacity(frame_len);
        data.push(u8::from(self.msg_id));
        let length_byte = (frame_len as u8) | if self.need_ack { NEED_ACK_BIT } else { 0 };
        data.push(length_byte);
        data.push((u8::from(self.from_node_type) << 4) | u8::from(self.to_node_type));
        data.extend_from_slice(&self.from_addr.to_wire_bytes());
        data.extend_from_slice(&self.to_addr.to_wire_bytes());
        data.extend_from_slice(&payload_bytes);

        let checksum: u32 = data.iter().map(|b| u32::from(!b)).sum();
        for byte in &mut data {
            *byte = !*byte;
        }
        let checksum = (checksum & 0xFFFF) as u16;
        data.push((checksum >> 8) as u8);
        data.push((checksum & 0xFF) as u8);
        data
    }

    /// Validate and decode a complete frame from `bytes`. Returns `None` if
    /// the length is out of range, the declared length doesn't match the
    /// slice, or the checksum fails — never panics on malformed input.
    #[must_use]
    pub fn try_parse(bytes: &[u8]) -> Option<Frame> {
        if bytes.len() < MIN_FRAME_LEN || bytes.len() > MAX_FRAME_LEN {
            return None;
        }
        let body_len = bytes.len() - 2;
        let body = &bytes[..body_len];
        let received_checksum = u16::from(bytes[body_len]) << 8 | u16::from(bytes[body_len + 1]);
        let computed_checksum: u32 = body.iter().map(|b| u32::from(*b)).sum();
        if (computed_checksum & 0xFFFF) as u16 != received_checksum {
            return None;
        }

        let inverted: Vec<u8> = body.iter().map(|b| !b).collect();
        let length_byte = inverted[1];
        let declared_len = usize::from(length_byte & LENGTH_MASK);
        if declared_len != bytes.len() {
            return None;
        }
        let need_ack = length_byte & NEED_ACK_BIT != 0;

        let msg_id = MessageId::from(inverted[0]);
        let node_types = inverted[2];
        let from_node_type = NodeType::from(node_types >> 4);
        let to_node_type = NodeType::from(node_types & 0x0F);
        let from_addr = Address::from_wire_bytes(&inverted[3..6]).ok()?;
        let to_addr = Address::from_wire_bytes(&inverted[6..9]).ok()?;
        let payload = Payload::decode(msg_id, &inverted[9..]);

        Some(Frame {
            msg_id,
            need_ack,
            from_node_type,
            to_node_type,
            from_addr,
            to_addr,
            payload,
        })
    }
}

impl std::fmt::Display for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {}->{} [{:?} -> {:?}] ack={} {:?}",
            self.msg_id,
            self.from_addr,
            self.to_addr,
            self.from_node_type,
            self.to_node_type,
            self.need_ack,
            self.payload
        )
    }
}
