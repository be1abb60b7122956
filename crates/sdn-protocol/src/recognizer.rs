//! Byte-at-a-time frame recognition over a noisy half-duplex bus.
//!
//! Ported 1:1 from `examples/original_source/somfy/recognizer.py`'s
//! `MessageRecognizer`: a 32-byte ring buffer, a backward checksum scan from
//! the two most-recently-arrived bytes, and innermost-match-only give-up
//! semantics (a failed parse at the first candidate start position aborts
//! the whole scan rather than trying to extend further left). This is what
//! lets a [`Frame`] be pulled out of an RS-485 stream that may carry
//! leading/trailing noise or unrelated third-party traffic.

use sdn_core::NodeType;

use crate::frame::Frame;

const RING_SIZE: usize = sdn_core::constants::RING_SIZE;
const MIN_FRAME_LEN: usize = sdn_core::constants::MIN_FRAME_LEN;

/// Feeds bytes in one at a time and yields frames as they're recognized.
///
/// One recognizer instance corresponds to one physical bus / channel; it
/// is not `Send`-restricted but is meant to be owned by a single reader
/// loop (see `sdn-bus`'s drainer).
pub struct Recognizer {
    ring: [u8; RING_SIZE],
    pos: usize,
    node_type_filter: Option<NodeType>,
}

impl Recognizer {
    #[must_use]
    pub fn new() -> Self {
        Self { ring: [0u8; RING_SIZE], pos: 0, node_type_filter: None }
    }

    /// Only frames whose `from_node_type` matches `filter` are surfaced;
    /// everything else is silently dropped once recognized.
    #[must_use]
    pub fn with_node_type_filter(filter: NodeType) -> Self {
        Self { ring: [0u8; RING_SIZE], pos: 0, node_type_filter: Some(filter) }
    }

    fn ring_at(&self, index: usize) -> u8 {
        self.ring[index % RING_SIZE]
    }

    fn copy(&self, from: usize, count: usize) -> Vec<u8> {
        (from..from + count).map(|i| self.ring_at(i)).collect()
    }

    fn blank_out(&mut self, from: usize, count: usize) {
        for i in from..from + count {
            self.ring[i % RING_SIZE] = 0xFF;
        }
    }

    /// Feed one received byte. Returns `Some(frame)` the instant a complete,
    /// checksum-valid frame has been recognized ending at this byte.
    pub fn add_byte(&mut self, cur_byte: u8) -> Option<Frame> {
        let prev_byte = self.ring_at(self.pos.wrapping_add(RING_SIZE - 1));
        self.ring[self.pos] = cur_byte;
        let possible_checksum = u32::from(prev_byte) * 256 + u32::from(cur_byte);
        self.pos = (self.pos + 1) % RING_SIZE;

        if possible_checksum >= (RING_SIZE as u32) * 256 || possible_checksum == 0 {
            return None;
        }

        let mut probable_start = (self.pos + RING_SIZE - 3) % RING_SIZE;
        let mut remaining_sum = possible_checksum;
        let mut count = 3usize;

        while probable_start != self.pos {
            remaining_sum = remaining_sum.wrapping_sub(u32::from(self.ring_at(probable_start)));
            if remaining_sum == 0 {
                if count < MIN_FRAME_LEN {
                    return None;
                }
                let buf = self.copy(probable_start, count);
                match Frame::try_parse(&buf) {
                    Some(frame) => {
                        self.blank_out(probable_start, count);
                        match self.node_type_filter {
                            None => return Some(frame),
                            Some(filter) if filter == frame.from_node_type => return Some(frame),
                            Some(_) => {
                                // Filtered out: not our message, but the
                                // recognized region is already blanked, so
                                // keep scanning further left in case a
                                // second candidate start also sums to zero.
                            }
                        }
                    }
                    None => return None,
                }
            }
            probable_start = (probable_start + RING_SIZE - 1) % RING_SIZE;
            count += 1;
        }
        None
    }

    /// Feed a whole byte slice, collecting every frame recognized along the
    /// way. Convenience wrapper around repeated [`Recognizer::add_byte`].
    pub fn add_bytes(&mut self, bytes: &[u8]) -> Vec<Frame> {
        bytes.iter().filter_map(|&b| self.add_byte(b)).collect()
    }
}

impl Default for Recognizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::Payload;
    use sdn_core::{Address, MessageId};

    fn from_hex(hex: &str) -> Vec<u8> {
        (0..hex.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(&hex[i..i + 2], 16).unwrap())
            .collect()
    }

    #[test]
    fn recognizes_a_single_frame_with_no_noise() {
        let bytes = from_hex("cef07f39c2ec808080ffff28c5088f");
        let mut recognizer = Recognizer::new();
        let frames = recognizer.add_bytes(&bytes);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].msg_id, MessageId::from(0x31));
    }

    #[test]
    fn recognizes_a_frame_preceded_by_random_noise() {
        let mut stream = vec![0x11, 0x42, 0x00, 0xAB, 0xCD];
        stream.extend(from_hex("cef07f39c2ec808080ffff28c5088f"));
        let mut recognizer = Recognizer::new();
        let frames = recognizer.add_bytes(&stream);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].msg_id, MessageId::from(0x31));
    }

    #[test]
    fn recognizes_two_consecutive_frames() {
        let frame_a = from_hex("cef07f39c2ec808080ffff28c5088f");
        let frame_b = Frame {
            msg_id: MessageId::from(0x02),
            need_ack: false,
            from_node_type: NodeType::ALL,
            to_node_type: NodeType::ALL,
            from_addr: Address::new(0x01, 0x02, 0x03),
            to_addr: Address::MASTER,
            payload: Payload::CtrlStop { reserved: 0 },
        }
        .encode();

        let mut stream = frame_a.clone();
        stream.extend(frame_b.clone());

        let mut recognizer = Recognizer::new();
        let frames = recognizer.add_bytes(&stream);
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].encode(), frame_a);
        assert_eq!(frames[1].encode(), frame_b);
    }

    #[test]
    fn node_type_filter_drops_non_matching_frames() {
        let bytes = from_hex("cef07f39c2ec808080ffff28c5088f");
        let mut recognizer = Recognizer::with_node_type_filter(NodeType::ALL);
        let frames = recognizer.add_bytes(&bytes);
        assert!(frames.is_empty(), "frame's from_node_type is Type50Dc, not ALL");
    }

    #[test]
    fn trailing_garbage_after_a_valid_frame_does_not_panic() {
        let mut stream = from_hex("cef07f39c2ec808080ffff28c5088f");
        stream.extend_from_slice(&[0xFF, 0x00, 0x42]);
        let mut recognizer = Recognizer::new();
        let frames = recognizer.add_bytes(&stream);
        assert_eq!(frames.len(), 1);
    }

    /// A representative prefix of the capture in
    /// `examples/original_source/tests/test_decoding.py`'s `message_stream`:
    /// a node-discovery exchange followed by a limits/position poll. Each
    /// line is one already-framed message (no noise in this corpus).
    const CAPTURE_PREFIX: [&str; 8] = [
        "bff4ff8080800000000432",
        "9ff47f39c2ec8080800579",
        "9ff47f6bc2ec80808005ab",
        "def4ff80808039c2ec0638",
        "def4ff80808039c2ec0638",
        "cef07f39c2ec808080ffff28c5088f",
        "f3f4ff80808039c2ec064d",
        "f2ef7f39c2ec8080809cf6ef00000848",
    ];

    // S1 — decode a corpus prefix and check both the decoded fields and
    // that every frame round-trips back to its own captured bytes.
    #[test]
    fn capture_prefix_decodes_and_round_trips() {
        let mut recognizer = Recognizer::new();
        let mut frames = Vec::new();
        for line in CAPTURE_PREFIX {
            frames.extend(recognizer.add_bytes(&from_hex(line)));
        }
        assert_eq!(frames.len(), CAPTURE_PREFIX.len());

        for (frame, line) in frames.iter().zip(CAPTURE_PREFIX) {
            assert_eq!(frame.encode(), from_hex(line), "frame must round-trip to its captured bytes");
        }

        assert_eq!(frames[0].msg_id, MessageId::from(0x40)); // GET_NODE_ADDR
        assert_eq!(frames[0].payload, Payload::Empty);
        assert_eq!(frames[0].from_addr.to_string(), "7F7F7F");
        assert_eq!(frames[0].to_addr.to_string(), "FFFFFF");

        assert_eq!(frames[1].msg_id, MessageId::from(0x60)); // POST_NODE_ADDR
        assert_eq!(frames[1].from_addr.to_string(), "133DC6");
        assert_eq!(frames[2].from_addr.to_string(), "133D94");

        assert_eq!(frames[5].msg_id, MessageId::from(0x31)); // POST_MOTOR_LIMITS
        assert_eq!(frames[5].payload, Payload::PostMotorLimits { reserved: 0, limit: 15063 });

        assert_eq!(frames[7].msg_id, MessageId::from(0x0D)); // POST_MOTOR_POSITION
        let Payload::PostMotorPosition { position_pulses, position_percent, tilt_percent, ip, tilt_degrees } =
            &frames[7].payload
        else {
            panic!("expected PostMotorPosition");
        };
        assert_eq!(*position_pulses, 2403);
        assert_eq!(*position_percent, 16);
        assert_eq!(*tilt_percent, 255);
        assert_eq!(*ip, None);
        assert_eq!(*tilt_degrees, None);
    }

    /// A small deterministic xorshift, seeded fixed, standing in for the
    /// source's `random.Random(x=4)`: reproducible noise, not bit-identical
    /// to CPython's generator. The property under test (recognizer
    /// recovers every real frame, in order, despite surrounding noise)
    /// doesn't depend on which PRNG produced the noise.
    struct Xorshift32(u32);

    impl Xorshift32 {
        fn next(&mut self) -> u32 {
            let mut x = self.0;
            x ^= x << 13;
            x ^= x >> 17;
            x ^= x << 5;
            self.0 = x;
            x
        }

        fn below(&mut self, bound: u32) -> u32 {
            if bound == 0 { 0 } else { self.next() % bound }
        }
    }

    // S2 — seeded noise injected around every frame in the corpus prefix;
    // the recognizer must still recover every real frame, in order.
    #[test]
    fn capture_prefix_survives_seeded_noise_injection() {
        let mut rng = Xorshift32(0xC0FF_EE01);
        let mut recognizer = Recognizer::new();
        let mut frames = Vec::new();

        for line in CAPTURE_PREFIX {
            let leading = rng.below(100);
            for _ in 0..leading {
                frames.extend(recognizer.add_byte((rng.next() & 0xFF) as u8));
            }
            frames.extend(recognizer.add_bytes(&from_hex(line)));
            let trailing = rng.below(100);
            for _ in 0..trailing {
                frames.extend(recognizer.add_byte((rng.next() & 0xFF) as u8));
            }
        }

        // The real frames must appear, in order, as a subsequence of what
        // was recognized — noise is allowed to additionally spawn a ghost
        // frame of its own, so indices aren't assumed to line up 1:1.
        let mut expected = CAPTURE_PREFIX.into_iter().map(from_hex);
        let mut next_expected = expected.next();
        for frame in &frames {
            let Some(expected_bytes) = &next_expected else { break };
            if &frame.encode() == expected_bytes {
                next_expected = expected.next();
            }
        }
        assert!(next_expected.is_none(), "not every real frame was recovered, in order");
    }
}
