//! Protocol constants for the Somfy SDN wire format.
//!
//! ```text
//!  byte:   0      1      2      3..5      6..8      9..L-3    L-2..L-1
//!        +------+------+------+---------+---------+---------+----------+
//!        |msg_id| L|ACK| types| from_addr| to_addr |  payload | checksum |
//!        +------+------+------+---------+---------+---------+----------+
//! ```
//!
//! Bytes `0..L-2` are transmitted bitwise-inverted; the checksum is
//! transmitted as-is. See [`crate::Frame`] for the encode/decode logic built
//! on these constants.

use std::time::Duration;

/// Smallest legal frame length in bytes: `[msg_id, len, types] + from_addr(3)
/// + to_addr(3) + checksum(2)`, with zero payload bytes.
///
/// ```
/// assert_eq!(sdn_core::constants::MIN_FRAME_LEN, 11);
/// ```
pub const MIN_FRAME_LEN: usize = 11;

/// Largest legal frame length in bytes (11 header/checksum bytes + 21
/// payload bytes).
///
/// ```
/// assert_eq!(sdn_core::constants::MAX_FRAME_LEN, 32);
/// ```
pub const MAX_FRAME_LEN: usize = 32;

/// Largest permitted payload length, derived from `MAX_FRAME_LEN -
/// MIN_FRAME_LEN`.
pub const MAX_PAYLOAD_LEN: usize = MAX_FRAME_LEN - MIN_FRAME_LEN;

/// Bit set in byte 1 of a frame when the sender requests an acknowledgement.
pub const NEED_ACK_BIT: u8 = 0x80;

/// Mask isolating the declared length from byte 1 (the top bit is
/// `NEED_ACK_BIT`).
pub const LENGTH_MASK: u8 = 0x7F;

/// Size in bytes of the recognizer's ring buffer; equal to [`MAX_FRAME_LEN`]
/// since that is the largest window a valid frame can occupy.
pub const RING_SIZE: usize = MAX_FRAME_LEN;

/// Minimum bus idle time a master must observe before initiating a new
/// transmission (SDN protocol, page 10).
///
/// ```
/// use std::time::Duration;
/// assert_eq!(sdn_core::constants::BUS_QUIET_TIME, Duration::from_millis(25));
/// ```
pub const BUS_QUIET_TIME: Duration = Duration::from_millis(25);

/// End-to-end deadline for a single foreground exchange.
///
/// ```
/// use std::time::Duration;
/// assert_eq!(sdn_core::constants::COMM_TIMEOUT, Duration::from_secs(1));
/// ```
pub const COMM_TIMEOUT: Duration = Duration::from_secs(1);

/// Default initial backoff wait for the reconnecting supervisor, in seconds.
/// The very first failure after a success always waits 0 s regardless of
/// this value; see [`crate::Error`] and the `sdn-bus` `BackoffPolicy`.
pub const DEFAULT_INITIAL_WAIT_SECS: u64 = 1;

/// Default maximum backoff wait for the reconnecting supervisor, in seconds.
pub const DEFAULT_MAX_WAIT_SECS: u64 = 100;

/// Serial transport line parameters (SDN protocol, page 9): 4800 baud, odd
/// parity, 8 data bits, 1 stop bit.
pub const SERIAL_BAUD_RATE: u32 = 4800;

/// Poll interval used by `wait_for_completion` while a motor is in motion.
pub const MOTOR_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Minimum duration a polled motor position must be unchanged before motion
/// is considered complete.
pub const MOTOR_STABLE_WINDOW: Duration = Duration::from_secs(1);

/// Reserved node-type wildcard matching any device family.
pub const NODE_TYPE_ALL: u8 = 0x00;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_len_bounds_are_consistent() {
        assert_eq!(MIN_FRAME_LEN + MAX_PAYLOAD_LEN, MAX_FRAME_LEN);
        assert_eq!(RING_SIZE, MAX_FRAME_LEN);
    }
}
