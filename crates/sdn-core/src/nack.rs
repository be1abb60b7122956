use serde::{Deserialize, Serialize};
use std::fmt;

/// The documented NACK reason codes (spec.md §6, "observed values").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum KnownNackReason {
    DataOutOfRange = 0x01,
    UnknownMessage = 0x10,
    MessageLengthError = 0x11,
    InSecurity = 0x27,
    LastIpReached = 0x28,
    Busy = 0xFF,
}

impl KnownNackReason {
    fn from_raw(value: u8) -> Option<Self> {
        match value {
            0x01 => Some(KnownNackReason::DataOutOfRange),
            0x10 => Some(KnownNackReason::UnknownMessage),
            0x11 => Some(KnownNackReason::MessageLengthError),
            0x27 => Some(KnownNackReason::InSecurity),
            0x28 => Some(KnownNackReason::LastIpReached),
            0xFF => Some(KnownNackReason::Busy),
            _ => None,
        }
    }

    fn to_raw(self) -> u8 {
        self as u8
    }

    fn label(self) -> &'static str {
        match self {
            KnownNackReason::DataOutOfRange => "DATA_OUT_OF_RANGE",
            KnownNackReason::UnknownMessage => "UNKNOWN_MESSAGE",
            KnownNackReason::MessageLengthError => "MESSAGE_LENGTH_ERROR",
            KnownNackReason::InSecurity => "IN_SECURITY",
            KnownNackReason::LastIpReached => "LAST_IP_REACHED",
            KnownNackReason::Busy => "BUSY",
        }
    }
}

/// A NACK reason byte: either a documented [`KnownNackReason`], or an
/// undocumented raw value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NackReason {
    Known(KnownNackReason),
    Raw(u8),
}

impl From<u8> for NackReason {
    fn from(value: u8) -> Self {
        match KnownNackReason::from_raw(value) {
            Some(known) => NackReason::Known(known),
            None => NackReason::Raw(value),
        }
    }
}

impl From<NackReason> for u8 {
    fn from(value: NackReason) -> Self {
        match value {
            NackReason::Known(known) => known.to_raw(),
            NackReason::Raw(raw) => raw,
        }
    }
}

impl fmt::Display for NackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let raw = u8::from(*self);
        match self {
            NackReason::Known(known) => write!(f, "{raw:02X}({})", known.label()),
            NackReason::Raw(raw) => write!(f, "{raw:02X}(UNKNOWN)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_reason_round_trips() {
        let reason = NackReason::from(0x28);
        assert_eq!(u8::from(reason), 0x28);
        assert_eq!(reason.to_string(), "28(LAST_IP_REACHED)");
    }

    #[test]
    fn unknown_reason_round_trips_as_raw() {
        let reason = NackReason::from(0x42);
        assert_eq!(reason, NackReason::Raw(0x42));
    }
}
