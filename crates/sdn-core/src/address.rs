use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// A three-octet SDN node address, `(a, b, c)`.
///
/// On the wire the bytes are transmitted in reverse order `(c, b, a)`; see
/// [`Address::to_wire_bytes`] and [`Address::from_wire_bytes`]. The textual
/// form used throughout logging and tests is six upper-case hex digits
/// `aabbcc`, matching `examples/original_source/somfy/messages.py`'s
/// `SomfyAddress.__str__`.
///
/// ```
/// use sdn_core::Address;
/// let addr = Address::new(0x13, 0x3d, 0xc6);
/// assert_eq!(addr.to_string(), "133DC6");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address {
    a: u8,
    b: u8,
    c: u8,
}

impl Address {
    /// The pseudo-address used by a master/controller that originates
    /// commands.
    pub const MASTER: Address = Address::new(0x7F, 0x7F, 0x7F);

    /// The broadcast address: all nodes accept and (if queried) reply.
    pub const BROADCAST: Address = Address::new(0xFF, 0xFF, 0xFF);

    /// Construct an address from its three logical octets (not wire order).
    #[must_use]
    pub const fn new(a: u8, b: u8, c: u8) -> Self {
        Address { a, b, c }
    }

    /// Serialize to the three wire bytes, in reverse order `(c, b, a)`.
    #[must_use]
    pub fn to_wire_bytes(self) -> [u8; 3] {
        [self.c, self.b, self.a]
    }

    /// Parse three wire bytes (already in `(c, b, a)` order) back into an
    /// `Address`.
    ///
    /// # Errors
    /// Returns `Error::InvalidFrame` if `bytes` is not exactly 3 bytes long.
    pub fn from_wire_bytes(bytes: &[u8]) -> Result<Self> {
        match bytes {
            [c, b, a] => Ok(Address::new(*a, *b, *c)),
            _ => Err(Error::InvalidFrame(format!(
                "address requires exactly 3 bytes, got {}",
                bytes.len()
            ))),
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X}{:02X}{:02X}", self.a, self.b, self.c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn wire_bytes_are_reversed() {
        let addr = Address::new(0x13, 0x3d, 0xc6);
        assert_eq!(addr.to_wire_bytes(), [0xc6, 0x3d, 0x13]);
    }

    #[test]
    fn round_trips_through_wire_bytes() {
        let addr = Address::new(0x08, 0xAA, 0x01);
        let round_tripped = Address::from_wire_bytes(&addr.to_wire_bytes()).unwrap();
        assert_eq!(addr, round_tripped);
    }

    #[rstest]
    #[case(Address::MASTER, "7F7F7F")]
    #[case(Address::BROADCAST, "FFFFFF")]
    fn reserved_addresses_format_as_expected(#[case] addr: Address, #[case] expected: &str) {
        assert_eq!(addr.to_string(), expected);
    }

    #[test]
    fn from_wire_bytes_rejects_wrong_length() {
        assert!(Address::from_wire_bytes(&[1, 2]).is_err());
        assert!(Address::from_wire_bytes(&[1, 2, 3, 4]).is_err());
    }
}
