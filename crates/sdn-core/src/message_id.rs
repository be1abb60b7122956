use serde::{Deserialize, Serialize};
use std::fmt;

/// The documented SDN message-id catalog.
///
/// Covers the normative subset plus the supplemented ids drawn from
/// `examples/original_source/somfy/messages.py` (see `SPEC_FULL.md` §3).
/// Any id not listed here decodes to [`MessageId::Raw`] rather than being
/// rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum KnownMessageId {
    CtrlMoveForced = 0x01,
    CtrlStop = 0x02,
    CtrlMoveTo = 0x03,
    CtrlMoveRelative = 0x04,
    CtrlWink = 0x05,
    GetMotorPosition = 0x0C,
    PostMotorPosition = 0x0D,
    GetMotorStatus = 0x0E,
    PostMotorStatus = 0x0F,
    SetMotorLimits = 0x11,
    SetMotorRotationDirection = 0x12,
    SetMotorRollingSpeed = 0x13,
    SetMotorIp = 0x15,
    SetNetworkLock = 0x16,
    SetLocalUi = 0x17,
    GetMotorLimits = 0x21,
    GetMotorRotationDirection = 0x22,
    GetMotorRollingSpeed = 0x23,
    GetMotorIp = 0x25,
    GetNetworkLock = 0x26,
    GetLocalUi = 0x27,
    PostMotorLimits = 0x31,
    PostMotorRotationDirection = 0x32,
    PostMotorRollingSpeed = 0x33,
    PostMotorIp = 0x35,
    PostNetworkLock = 0x36,
    PostLocalUi = 0x37,
    GetNodeAddr = 0x40,
    GetGroupAddr = 0x41,
    GetNodeLabel = 0x45,
    SetNodeLabel = 0x55,
    PostNodeLabel = 0x65,
    GetNodeAppVersion = 0x74,
    PostNodeAppVersion = 0x75,
    PostNodeAddr = 0x60,
    PostGroupAddr = 0x61,
    SetGroupAddr = 0x51,
    Nack = 0x6F,
    Ack = 0x7F,
}

impl KnownMessageId {
    fn from_raw(value: u8) -> Option<Self> {
        use KnownMessageId::*;
        Some(match value {
            0x01 => CtrlMoveForced,
            0x02 => CtrlStop,
            0x03 => CtrlMoveTo,
            0x04 => CtrlMoveRelative,
            0x05 => CtrlWink,
            0x0C => GetMotorPosition,
            0x0D => PostMotorPosition,
            0x0E => GetMotorStatus,
            0x0F => PostMotorStatus,
            0x11 => SetMotorLimits,
            0x12 => SetMotorRotationDirection,
            0x13 => SetMotorRollingSpeed,
            0x15 => SetMotorIp,
            0x16 => SetNetworkLock,
            0x17 => SetLocalUi,
            0x21 => GetMotorLimits,
            0x22 => GetMotorRotationDirection,
            0x23 => GetMotorRollingSpeed,
            0x25 => GetMotorIp,
            0x26 => GetNetworkLock,
            0x27 => GetLocalUi,
            0x31 => PostMotorLimits,
            0x32 => PostMotorRotationDirection,
            0x33 => PostMotorRollingSpeed,
            0x35 => PostMotorIp,
            0x36 => PostNetworkLock,
            0x37 => PostLocalUi,
            0x40 => GetNodeAddr,
            0x41 => GetGroupAddr,
            0x45 => GetNodeLabel,
            0x51 => SetGroupAddr,
            0x55 => SetNodeLabel,
            0x60 => PostNodeAddr,
            0x61 => PostGroupAddr,
            0x65 => PostNodeLabel,
            0x6F => Nack,
            0x74 => GetNodeAppVersion,
            0x75 => PostNodeAppVersion,
            0x7F => Ack,
            _ => return None,
        })
    }

    fn to_raw(self) -> u8 {
        self as u8
    }

    fn label(self) -> &'static str {
        use KnownMessageId::*;
        match self {
            CtrlMoveForced => "CTRL_MOVE_FORCED",
            CtrlStop => "CTRL_STOP",
            CtrlMoveTo => "CTRL_MOVETO",
            CtrlMoveRelative => "CTRL_MOVE_RELATIVE",
            CtrlWink => "CTRL_WINK",
            GetMotorPosition => "GET_MOTOR_POSITION",
            PostMotorPosition => "POST_MOTOR_POSITION",
            GetMotorStatus => "GET_MOTOR_STATUS",
            PostMotorStatus => "POST_MOTOR_STATUS",
            SetGroupAddr => "SET_GROUP_ADDR",
            SetNodeLabel => "SET_NODE_LABEL",
            SetMotorLimits => "SET_MOTOR_LIMITS",
            SetMotorRotationDirection => "SET_MOTOR_ROTATION_DIRECTION",
            SetMotorRollingSpeed => "SET_MOTOR_ROLLING_SPEED",
            SetLocalUi => "SET_LOCAL_UI",
            SetMotorIp => "SET_MOTOR_IP",
            SetNetworkLock => "SET_NETWORK_LOCK",
            GetMotorLimits => "GET_MOTOR_LIMITS",
            GetMotorRotationDirection => "GET_MOTOR_ROTATION_DIRECTION",
            GetMotorRollingSpeed => "GET_MOTOR_ROLLING_SPEED",
            GetMotorIp => "GET_MOTOR_IP",
            GetNetworkLock => "GET_NETWORK_LOCK",
            PostMotorLimits => "POST_MOTOR_LIMITS",
            PostMotorRotationDirection => "POST_MOTOR_ROTATION_DIRECTION",
            PostMotorRollingSpeed => "POST_MOTOR_ROLLING_SPEED",
            PostMotorIp => "POST_MOTOR_IP",
            PostNetworkLock => "POST_NETWORK_LOCK",
            GetNodeAddr => "GET_NODE_ADDR",
            GetNodeAppVersion => "GET_NODE_APP_VERSION",
            GetGroupAddr => "GET_GROUP_ADDR",
            GetNodeLabel => "GET_NODE_LABEL",
            GetLocalUi => "GET_LOCAL_UI",
            PostNodeAddr => "POST_NODE_ADDR",
            PostNodeAppVersion => "POST_NODE_APP_VERSION",
            PostGroupAddr => "POST_GROUP_ADDR",
            PostNodeLabel => "POST_NODE_LABEL",
            PostLocalUi => "POST_LOCAL_UI",
            Nack => "NACK",
            Ack => "ACK",
        }
    }
}

/// An 8-bit SDN message id: either a documented [`KnownMessageId`], or an
/// undocumented raw value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageId {
    Known(KnownMessageId),
    Raw(u8),
}

impl MessageId {
    /// Returns `true` if this id is [`KnownMessageId::Ack`].
    #[must_use]
    pub fn is_ack(self) -> bool {
        matches!(self, MessageId::Known(KnownMessageId::Ack))
    }

    /// Returns `true` if this id is [`KnownMessageId::Nack`].
    #[must_use]
    pub fn is_nack(self) -> bool {
        matches!(self, MessageId::Known(KnownMessageId::Nack))
    }
}

impl From<u8> for MessageId {
    fn from(value: u8) -> Self {
        match KnownMessageId::from_raw(value) {
            Some(known) => MessageId::Known(known),
            None => MessageId::Raw(value),
        }
    }
}

impl From<MessageId> for u8 {
    fn from(value: MessageId) -> Self {
        match value {
            MessageId::Known(known) => known.to_raw(),
            MessageId::Raw(raw) => raw,
        }
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let raw = u8::from(*self);
        match self {
            MessageId::Known(known) => write!(f, "{raw:02X}({})", known.label()),
            MessageId::Raw(raw) => write!(f, "{raw:02X}(UNKNOWN)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0x40, "GET_NODE_ADDR")]
    #[case(0x60, "POST_NODE_ADDR")]
    #[case(0x7F, "ACK")]
    #[case(0x6F, "NACK")]
    fn known_ids_round_trip_and_label(#[case] raw: u8, #[case] label: &str) {
        let id = MessageId::from(raw);
        assert_eq!(u8::from(id), raw);
        assert!(id.to_string().ends_with(&format!("({label})")));
    }

    #[test]
    fn unknown_id_round_trips_as_raw() {
        let id = MessageId::from(0xAB);
        assert_eq!(id, MessageId::Raw(0xAB));
        assert_eq!(u8::from(id), 0xAB);
    }

    #[test]
    fn ack_and_nack_predicates() {
        assert!(MessageId::from(0x7F).is_ack());
        assert!(MessageId::from(0x6F).is_nack());
        assert!(!MessageId::from(0x40).is_ack());
    }
}
