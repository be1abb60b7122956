use serde::{Deserialize, Serialize};
use std::fmt;

/// The documented device-family values of the 4-bit node-type field.
///
/// This is not exhaustive: the SDN bus carries device families this crate
/// has no documentation for. See [`NodeType`], the enum-or-int wrapper that
/// preserves undocumented values instead of rejecting them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum KnownNodeType {
    /// Wildcard matching any device family.
    All = 0x00,
    Type30Dc = 0x02,
    RtsTransmitter = 0x05,
    Glydea = 0x06,
    Type50Ac = 0x07,
    Type50Dc = 0x08,
    Type40Ac = 0x09,
}

impl KnownNodeType {
    fn from_raw(value: u8) -> Option<Self> {
        match value {
            0x00 => Some(KnownNodeType::All),
            0x02 => Some(KnownNodeType::Type30Dc),
            0x05 => Some(KnownNodeType::RtsTransmitter),
            0x06 => Some(KnownNodeType::Glydea),
            0x07 => Some(KnownNodeType::Type50Ac),
            0x08 => Some(KnownNodeType::Type50Dc),
            0x09 => Some(KnownNodeType::Type40Ac),
            _ => None,
        }
    }

    fn to_raw(self) -> u8 {
        self as u8
    }

    fn label(self) -> &'static str {
        match self {
            KnownNodeType::All => "TYPE_ALL",
            KnownNodeType::Type30Dc => "TYPE_30DC_SERIES",
            KnownNodeType::RtsTransmitter => "TYPE_RTS_TRANSMITTER",
            KnownNodeType::Glydea => "TYPE_GLYDEA",
            KnownNodeType::Type50Ac => "TYPE_50AC_SERIES",
            KnownNodeType::Type50Dc => "TYPE_50DC_SERIES",
            KnownNodeType::Type40Ac => "TYPE_40AC_SERIES",
        }
    }
}

/// A 4-bit SDN node-type value: either one of the documented
/// [`KnownNodeType`] families, or an undocumented raw value the recognizer
/// and decoder must still round-trip faithfully.
///
/// ```
/// use sdn_core::NodeType;
/// let wildcard = NodeType::from(0x00);
/// assert!(wildcard.is_all());
///
/// let unknown = NodeType::from(0x0F);
/// assert_eq!(u8::from(unknown), 0x0F);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeType {
    Known(KnownNodeType),
    Raw(u8),
}

impl NodeType {
    /// The wildcard node type matching any device family.
    pub const ALL: NodeType = NodeType::Known(KnownNodeType::All);

    /// Returns `true` if this is the `ALL` wildcard.
    #[must_use]
    pub fn is_all(self) -> bool {
        matches!(self, NodeType::Known(KnownNodeType::All))
    }

    /// Returns `true` if `self` matches `filter`, where `ALL` on either side
    /// matches anything (used by the recognizer's optional node-type
    /// filter).
    #[must_use]
    pub fn matches(self, filter: NodeType) -> bool {
        filter.is_all() || self == filter
    }
}

impl From<u8> for NodeType {
    fn from(value: u8) -> Self {
        match KnownNodeType::from_raw(value) {
            Some(known) => NodeType::Known(known),
            None => NodeType::Raw(value),
        }
    }
}

impl From<NodeType> for u8 {
    fn from(value: NodeType) -> Self {
        match value {
            NodeType::Known(known) => known.to_raw(),
            NodeType::Raw(raw) => raw,
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let raw = u8::from(*self);
        match self {
            NodeType::Known(known) => write!(f, "{raw:02X}({})", known.label()),
            NodeType::Raw(raw) => write!(f, "{raw:02X}(UNKNOWN)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0x00, true)]
    #[case(0x08, false)]
    fn known_round_trips(#[case] raw: u8, #[case] is_all: bool) {
        let node_type = NodeType::from(raw);
        assert!(matches!(node_type, NodeType::Known(_)));
        assert_eq!(u8::from(node_type), raw);
        assert_eq!(node_type.is_all(), is_all);
    }

    #[test]
    fn unknown_value_round_trips_as_raw() {
        let node_type = NodeType::from(0x0F);
        assert_eq!(node_type, NodeType::Raw(0x0F));
        assert_eq!(u8::from(node_type), 0x0F);
    }

    #[test]
    fn all_matches_everything_either_direction() {
        let dc = NodeType::from(0x08);
        assert!(dc.matches(NodeType::ALL));
        assert!(NodeType::ALL.matches(dc));
        assert!(!dc.matches(NodeType::from(0x09)));
    }

    #[test]
    fn display_matches_reference_format() {
        assert_eq!(NodeType::from(0x08).to_string(), "08(TYPE_50DC_SERIES)");
        assert_eq!(NodeType::from(0x00).to_string(), "00(TYPE_ALL)");
    }
}
