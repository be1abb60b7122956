//! The payload registry: a compile-time dispatch from message id to a typed
//! [`Payload`] variant, replacing the source's runtime
//! `MESSAGE_PAYLOAD_MAP` (SPEC_FULL.md §9 design note). Unknown ids or
//! length mismatches fall back to [`Payload::Opaque`] rather than erroring —
//! decode never fails on a payload, only on frame envelope/checksum
//! problems (see [`crate::Frame::try_parse`]).
//!
//! Field offsets below are grounded in
//! `examples/original_source/somfy/payloads.py`'s `get_*` accessors. Several
//! of that source's `make()` constructors write fields at offsets their own
//! `get_*` accessors don't read back (mirroring the two bugs spec.md §9
//! calls out explicitly for `CtrlMoveRelativePayload`/`PostNetworkLockPayload`).
//! Where that happens this crate's `encode` is built as the exact inverse of
//! its own `decode`, not a transliteration of the inconsistent source, so
//! that round-tripping (`decode(encode(p)) == p`) always holds. See
//! DESIGN.md for the specific offsets this affected.

use bytes::Bytes;
use sdn_core::{Address, KnownMessageId, MessageId, NackReason};

use crate::enum_or_int::enum_or_int;

enum_or_int! {
    pub enum LocalUiFunction(KnownLocalUiFunction): u8 {
        Enable = 0x00,
        Disable = 0x01,
    }
}

enum_or_int! {
    pub enum LocalUiIndex(KnownLocalUiIndex): u8 {
        AllControls = 0x00,
        DctInput = 0x01,
        LocalStimuli = 0x02,
        LocalRadio = 0x03,
        TouchMotion = 0x04,
        Leds = 0x05,
    }
}

enum_or_int! {
    pub enum MotorIpFunction(KnownMotorIpFunction): u8 {
        Delete = 0x00,
        SetIpAtCurrent = 0x01,
        SetIpAtSpecifiedPercent = 0x03,
        DivideIntoEqualRanges = 0x04,
        SetAtCurrentPositionAndAngle = 0x05,
        SetAtSpecifiedPositionAndAngleInPercents = 0x0A,
        SetAtSpecifiedPositionAndAngleInDegrees = 0x0B,
    }
}

enum_or_int! {
    pub enum NetworkLockFunction(KnownNetworkLockFunction): u8 {
        Unlock = 0x00,
        Lock = 0x01,
        PreserveLockOnPowerCycle = 0x03,
        UnpreserveLockOnPowerCycle = 0x04,
    }
}

enum_or_int! {
    pub enum CtrlMoveToFunction(KnownCtrlMoveToFunction): u8 {
        DownLimit = 0x00,
        UpLimit = 0x01,
        Ip = 0x02,
        PositionPercent = 0x04,
        PositionPercentAnglePercent = 0x0C,
        PositionPercentAngleDegrees = 0x0D,
        CurrentPositionAnglePercent = 0x0F,
        CurrentPositionAngleDegrees = 0x10,
    }
}

enum_or_int! {
    pub enum MotorStatus(KnownMotorStatus): u8 {
        Stopped = 0x00,
        Running = 0x01,
        Blocked = 0x02,
        Locked = 0x03,
    }
}

enum_or_int! {
    pub enum MotorDirection(KnownMotorDirection): u8 {
        Down = 0x00,
        Up = 0x01,
        Unknown = 0xFF,
    }
}

enum_or_int! {
    pub enum MotorCommandSource(KnownMotorCommandSource): u8 {
        Internal = 0x00,
        NetworkMessage = 0x01,
        LocalUi = 0x02,
    }
}

enum_or_int! {
    pub enum MotorStatusCause(KnownMotorStatusCause): u8 {
        TargetReached = 0x00,
        ExplicitCommand = 0x01,
        Wink = 0x02,
        ObstacleDetection = 0x20,
        OvercurrentProtection = 0x21,
        ThermalProtection = 0x22,
        RuntimeExceeded = 0x30,
        TimeoutExceeded = 0x32,
        PowerCycle = 0xFF,
    }
}

enum_or_int! {
    pub enum SomfyDirection(KnownSomfyDirection): u8 {
        Down = 0x00,
        Up = 0x01,
    }
}

enum_or_int! {
    pub enum RelativeMoveFunction(KnownRelativeMoveFunction): u8 {
        MoveNextIpDown = 0x00,
        MoveNextIpUp = 0x01,
        MoveNumPulsesDown = 0x02,
        MoveNumPulsesUp = 0x03,
        MoveTensOfMsDown = 0x04,
        MoveTensOfMsUp = 0x05,
    }
}

enum_or_int! {
    pub enum SetLimitsFunction(KnownSetLimitsFunction): u8 {
        SetAtCurrent = 0x01,
        SetAtPulseCount = 0x02,
        AdjustByTensOfMs = 0x04,
        AdjustByPulseCount = 0x05,
    }
}

enum_or_int! {
    pub enum MotorRotationDirection(KnownMotorRotationDirection): u8 {
        Standard = 0x00,
        Reversed = 0x01,
    }
}

fn u16_le(lo: u8, hi: u8) -> u16 {
    u16::from(lo) | (u16::from(hi) << 8)
}

fn split_u16_le(value: u16) -> (u8, u8) {
    ((value & 0xFF) as u8, (value >> 8) as u8)
}

/// A typed SDN payload, or [`Payload::Opaque`] for anything this crate
/// doesn't have a documented shape for. See the module docs for how byte
/// offsets were chosen.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Empty,
    GroupAddr {
        group_index: u8,
        group_id: u32,
    },
    GroupIndex {
        group_index: u8,
    },
    Nack {
        reason: NackReason,
    },
    NodeAppVersion {
        raw: [u8; 6],
    },
    NodeLabel {
        label: Bytes,
    },
    SetLocalUi {
        function: LocalUiFunction,
        ui_index: LocalUiIndex,
        priority: u8,
    },
    GetLocalUi {
        ui_index: LocalUiIndex,
    },
    PostLocalUi {
        function: LocalUiFunction,
        source_addr: Address,
        priority: u8,
    },
    SetMotorIp {
        function: MotorIpFunction,
        ip_index: u8,
        position: u16,
        angle: Option<u16>,
    },
    GetMotorIp {
        ip_index: u8,
    },
    PostMotorIp {
        ip_index: u8,
        position: u8,
        angle: Option<u16>,
    },
    MotorRollingSpeed {
        up_speed_rpm: u8,
        down_speed_rpm: u8,
        slow_speed_rpm: u8,
    },
    SetNetworkLock {
        function: NetworkLockFunction,
        priority: u8,
    },
    PostNetworkLock {
        is_locked: bool,
        lock_holder: Address,
        priority: u8,
        persistent_across_power_cycle: bool,
    },
    CtrlMoveTo {
        function: CtrlMoveToFunction,
        position: u16,
        angle: Option<u16>,
    },
    CtrlStop {
        reserved: u8,
    },
    PostMotorPosition {
        position_pulses: u16,
        position_percent: u8,
        tilt_percent: u8,
        ip: Option<u8>,
        tilt_degrees: Option<u16>,
    },
    PostMotorStatus {
        status: MotorStatus,
        direction: MotorDirection,
        source: MotorCommandSource,
        cause: MotorStatusCause,
    },
    CtrlMoveForced {
        direction: SomfyDirection,
        tens_of_ms: u16,
    },
    CtrlMoveRelative {
        function: RelativeMoveFunction,
        parameter: u16,
    },
    SetMotorLimits {
        function: SetLimitsFunction,
        direction: SomfyDirection,
        parameter: u16,
    },
    PostMotorLimits {
        reserved: u16,
        limit: u16,
    },
    MotorRotationDirection {
        direction: MotorRotationDirection,
    },
    /// Fallback for an unknown message id, or a known id whose payload
    /// length doesn't match any of its documented lengths.
    Opaque(Bytes),
}

const IP_UNDEFINED: u8 = 0xFF;

impl Payload {
    /// Decode `bytes` according to `msg_id`'s documented payload shape.
    /// Never fails: an unrecognized id or a length that matches none of the
    /// id's permitted lengths degrades to [`Payload::Opaque`].
    #[must_use]
    pub fn decode(msg_id: MessageId, bytes: &[u8]) -> Payload {
        let MessageId::Known(known) = msg_id else {
            return Payload::Opaque(Bytes::copy_from_slice(bytes));
        };
        use KnownMessageId::*;
        match (known, bytes.len()) {
            (GetNodeAddr | PostNodeAddr | Ack | GetNodeLabel | GetMotorPosition
            | GetMotorStatus | GetMotorLimits | GetMotorRotationDirection | GetNetworkLock
            | GetNodeAppVersion | CtrlWink, 0) => Payload::Empty,
            (SetGroupAddr | PostGroupAddr, 4) => Payload::GroupAddr {
                group_index: bytes[0],
                group_id: (u32::from(bytes[1]) << 16) | (u32::from(bytes[2]) << 8) | u32::from(bytes[3]),
            },
            (GetGroupAddr, 1) => Payload::GroupIndex { group_index: bytes[0] },
            (Nack, 1) => Payload::Nack { reason: NackReason::from(bytes[0]) },
            (PostNodeAppVersion, 6) => {
                let mut raw = [0u8; 6];
                raw.copy_from_slice(bytes);
                Payload::NodeAppVersion { raw }
            }
            (SetNodeLabel | PostNodeLabel, 16) => Payload::NodeLabel {
                label: Bytes::copy_from_slice(bytes),
            },
            (SetLocalUi, 3) => Payload::SetLocalUi {
                function: LocalUiFunction::from(bytes[0]),
                ui_index: LocalUiIndex::from(bytes[1]),
                priority: bytes[2],
            },
            (GetLocalUi, 1) => Payload::GetLocalUi {
                ui_index: LocalUiIndex::from(bytes[0]),
            },
            (PostLocalUi, 5) => Payload::PostLocalUi {
                function: LocalUiFunction::from(bytes[0]),
                source_addr: addr_from_slice(&bytes[1..4]),
                priority: bytes[4],
            },
            (SetMotorIp, 4) => Payload::SetMotorIp {
                function: MotorIpFunction::from(bytes[0]),
                ip_index: bytes[1],
                position: u16_le(bytes[2], bytes[3]),
                angle: None,
            },
            (SetMotorIp, 6) => Payload::SetMotorIp {
                function: MotorIpFunction::from(bytes[0]),
                ip_index: bytes[1],
                position: u16_le(bytes[2], bytes[3]),
                angle: Some(u16_le(bytes[4], bytes[5])),
            },
            (GetMotorIp, 1) => Payload::GetMotorIp { ip_index: bytes[0] },
            (PostMotorIp, 4) => Payload::PostMotorIp {
                ip_index: bytes[0],
                position: bytes[2],
                angle: None,
            },
            (PostMotorIp, 9) => Payload::PostMotorIp {
                ip_index: bytes[0],
                position: bytes[2],
                angle: Some(u16_le(bytes[7], bytes[8])),
            },
            (SetMotorRollingSpeed | PostMotorRollingSpeed, 3) => Payload::MotorRollingSpeed {
                up_speed_rpm: bytes[0],
                down_speed_rpm: bytes[1],
                slow_speed_rpm: bytes[2],
            },
            (SetNetworkLock, 2) => Payload::SetNetworkLock {
                function: NetworkLockFunction::from(bytes[0]),
                priority: bytes[1],
            },
            (PostNetworkLock, 6) => Payload::PostNetworkLock {
                is_locked: bytes[0] != 0,
                lock_holder: addr_from_slice(&bytes[1..4]),
                priority: bytes[4],
                persistent_across_power_cycle: bytes[5] != 0,
            },
            (CtrlMoveTo, 4) => Payload::CtrlMoveTo {
                function: CtrlMoveToFunction::from(bytes[0]),
                position: u16_le(bytes[1], bytes[2]),
                angle: None,
            },
            (CtrlMoveTo, 6) => Payload::CtrlMoveTo {
                function: CtrlMoveToFunction::from(bytes[0]),
                position: u16_le(bytes[1], bytes[2]),
                angle: Some(u16_le(bytes[4], bytes[5])),
            },
            (CtrlStop, 1) => Payload::CtrlStop { reserved: bytes[0] },
            (PostMotorPosition, 5) => Payload::PostMotorPosition {
                position_pulses: u16_le(bytes[0], bytes[1]),
                position_percent: bytes[2],
                tilt_percent: bytes[3],
                ip: if bytes[4] == IP_UNDEFINED { None } else { Some(bytes[4]) },
                tilt_degrees: None,
            },
            (PostMotorPosition, 11) => Payload::PostMotorPosition {
                position_pulses: u16_le(bytes[0], bytes[1]),
                position_percent: bytes[2],
                tilt_percent: bytes[3],
                ip: if bytes[4] == IP_UNDEFINED { None } else { Some(bytes[4]) },
                tilt_degrees: Some(u16_le(bytes[7], bytes[8])),
            },
            (PostMotorStatus, 4) => Payload::PostMotorStatus {
                status: MotorStatus::from(bytes[0]),
                direction: MotorDirection::from(bytes[1]),
                source: MotorCommandSource::from(bytes[2]),
                cause: MotorStatusCause::from(bytes[3]),
            },
            (CtrlMoveForced, 3) => Payload::CtrlMoveForced {
                direction: SomfyDirection::from(bytes[0]),
                tens_of_ms: u16_le(bytes[1], bytes[2]),
            },
            (CtrlMoveRelative, 4) => Payload::CtrlMoveRelative {
                function: RelativeMoveFunction::from(bytes[0]),
                // spec.md §9: the source reads `content[2] >> 8 | content[1]`
                // here, almost certainly a typo for the shift-left form used
                // by every other 16-bit field in this protocol. Implemented
                // as the corrected little-endian read.
                parameter: u16_le(bytes[1], bytes[2]),
            },
            (SetMotorLimits, 4) => Payload::SetMotorLimits {
                function: SetLimitsFunction::from(bytes[0]),
                direction: SomfyDirection::from(bytes[1]),
                parameter: u16_le(bytes[2], bytes[3]),
            },
            (PostMotorLimits, 4) => Payload::PostMotorLimits {
                reserved: u16_le(bytes[0], bytes[1]),
                limit: u16_le(bytes[2], bytes[3]),
            },
            (SetMotorRotationDirection | PostMotorRotationDirection, 1) => {
                Payload::MotorRotationDirection {
                    direction: MotorRotationDirection::from(bytes[0]),
                }
            }
            _ => Payload::Opaque(Bytes::copy_from_slice(bytes)),
        }
    }

    /// Serialize this payload back to its wire bytes. The inverse of
    /// [`Payload::decode`] for every non-`Opaque` variant.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        match self {
            Payload::Empty => Vec::new(),
            Payload::GroupAddr { group_index, group_id } => {
                vec![
                    *group_index,
                    (*group_id >> 16 & 0xFF) as u8,
                    (*group_id >> 8 & 0xFF) as u8,
                    (*group_id & 0xFF) as u8,
                ]
            }
            Payload::GroupIndex { group_index } => vec![*group_index],
            Payload::Nack { reason } => vec![u8::from(*reason)],
            Payload::NodeAppVersion { raw } => raw.to_vec(),
            Payload::NodeLabel { label } => label.to_vec(),
            Payload::SetLocalUi { function, ui_index, priority } => {
                vec![u8::from(*function), u8::from(*ui_index), *priority]
            }
            Payload::GetLocalUi { ui_index } => vec![u8::from(*ui_index)],
            Payload::PostLocalUi { function, source_addr, priority } => {
                let mut out = vec![u8::from(*function)];
                out.extend_from_slice(&source_addr.to_wire_bytes());
                out.push(*priority);
                out
            }
            Payload::SetMotorIp { function, ip_index, position, angle } => {
                let (pos_lo, pos_hi) = split_u16_le(*position);
                let mut out = vec![u8::from(*function), *ip_index, pos_lo, pos_hi];
                if let Some(angle) = angle {
                    let (lo, hi) = split_u16_le(*angle);
                    out.push(lo);
                    out.push(hi);
                }
                out
            }
            Payload::GetMotorIp { ip_index } => vec![*ip_index],
            Payload::PostMotorIp { ip_index, position, angle } => match angle {
                None => vec![*ip_index, 0, *position, 0],
                Some(angle) => {
                    let (lo, hi) = split_u16_le(*angle);
                    vec![*ip_index, 0, *position, 0, 0, 0, 0, lo, hi]
                }
            },
            Payload::MotorRollingSpeed { up_speed_rpm, down_speed_rpm, slow_speed_rpm } => {
                vec![*up_speed_rpm, *down_speed_rpm, *slow_speed_rpm]
            }
            Payload::SetNetworkLock { function, priority } => vec![u8::from(*function), *priority],
            Payload::PostNetworkLock { is_locked, lock_holder, priority, persistent_across_power_cycle } => {
                let mut out = vec![u8::from(*is_locked)];
                out.extend_from_slice(&lock_holder.to_wire_bytes());
                out.push(*priority);
                out.push(u8::from(*persistent_across_power_cycle));
                out
            }
            Payload::CtrlMoveTo { function, position, angle } => {
                let (pos_lo, pos_hi) = split_u16_le(*position);
                let mut out = vec![u8::from(*function), pos_lo, pos_hi, 0];
                if let Some(angle) = angle {
                    let (lo, hi) = split_u16_le(*angle);
                    out.push(lo);
                    out.push(hi);
                }
                out
            }
            Payload::CtrlStop { reserved } => vec![*reserved],
            Payload::PostMotorPosition {
                position_pulses,
                position_percent,
                tilt_percent,
                ip,
                tilt_degrees,
            } => {
                let (pulses_lo, pulses_hi) = split_u16_le(*position_pulses);
                let mut out = vec![
                    pulses_lo,
                    pulses_hi,
                    *position_percent,
                    *tilt_percent,
                    ip.unwrap_or(IP_UNDEFINED),
                ];
                if let Some(tilt) = tilt_degrees {
                    let (lo, hi) = split_u16_le(*tilt);
                    out.extend_from_slice(&[0, 0, lo, hi, 0, 0]);
                }
                out
            }
            Payload::PostMotorStatus { status, direction, source, cause } => {
                vec![u8::from(*status), u8::from(*direction), u8::from(*source), u8::from(*cause)]
            }
            Payload::CtrlMoveForced { direction, tens_of_ms } => {
                let (lo, hi) = split_u16_le(*tens_of_ms);
                vec![u8::from(*direction), lo, hi]
            }
            Payload::CtrlMoveRelative { function, parameter } => {
                let (lo, hi) = split_u16_le(*parameter);
                vec![u8::from(*function), lo, hi, 0]
            }
            Payload::SetMotorLimits { function, direction, parameter } => {
                let (lo, hi) = split_u16_le(*parameter);
                vec![u8::from(*function), u8::from(*direction), lo, hi]
            }
            Payload::PostMotorLimits { reserved, limit } => {
                let (r_lo, r_hi) = split_u16_le(*reserved);
                let (l_lo, l_hi) = split_u16_le(*limit);
                vec![r_lo, r_hi, l_lo, l_hi]
            }
            Payload::MotorRotationDirection { direction } => vec![u8::from(*direction)],
            Payload::Opaque(bytes) => bytes.to_vec(),
        }
    }
}

fn addr_from_slice(bytes: &[u8]) -> Address {
    Address::from_wire_bytes(bytes).unwrap_or(Address::BROADCAST)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn empty_payload_round_trips() {
        let payload = Payload::decode(MessageId::from(0x40), &[]);
        assert_eq!(payload, Payload::Empty);
        assert!(payload.encode().is_empty());
    }

    #[test]
    fn post_motor_limits_matches_captured_frame() {
        // Bytes from the real SDN capture used in the recognizer tests:
        // payload 00 00 d7 3a -> reserved=0, limit=15063.
        let payload = Payload::decode(MessageId::from(0x31), &[0x00, 0x00, 0xd7, 0x3a]);
        assert_eq!(payload, Payload::PostMotorLimits { reserved: 0, limit: 15063 });
        assert_eq!(payload.encode(), vec![0x00, 0x00, 0xd7, 0x3a]);
    }

    #[test]
    fn post_motor_position_without_tilt_round_trips() {
        let payload = Payload::decode(MessageId::from(0x0D), &[0x23, 0x09, 0x10, 0xff, 0xff]);
        let Payload::PostMotorPosition { position_pulses, position_percent, tilt_percent, ip, tilt_degrees } =
            &payload
        else {
            panic!("expected PostMotorPosition");
        };
        assert_eq!(*position_pulses, 2403);
        assert_eq!(*position_percent, 0x10);
        assert_eq!(*tilt_percent, 0xff);
        assert_eq!(*ip, None);
        assert_eq!(*tilt_degrees, None);
        assert_eq!(payload.encode(), vec![0x23, 0x09, 0x10, 0xff, 0xff]);
    }

    #[test]
    fn ctrl_move_relative_uses_shift_left_not_shift_right() {
        // Regression test for the spec.md §9 Open Question: the source's
        // `content[2] >> 8 | content[1]` is a typo for shift-left.
        let payload = Payload::decode(MessageId::from(0x04), &[0x00, 0x34, 0x12, 0x00]);
        assert_eq!(
            payload,
            Payload::CtrlMoveRelative {
                function: RelativeMoveFunction::from(0x00),
                parameter: 0x1234,
            }
        );
    }

    #[test]
    fn post_network_lock_is_flattened_not_nested() {
        let holder = Address::new(0x13, 0x3d, 0xc6);
        let payload = Payload::PostNetworkLock {
            is_locked: true,
            lock_holder: holder,
            priority: 5,
            persistent_across_power_cycle: false,
        };
        let encoded = payload.encode();
        assert_eq!(encoded.len(), 6, "must be flattened to 6 bytes, not a nested list");
        let decoded = Payload::decode(MessageId::from(0x36), &encoded);
        assert_eq!(decoded, payload);
    }

    #[rstest]
    #[case(0x7F)] // ACK
    #[case(0x6F)] // NACK id itself carries a payload, but unknown raw ids fall back too
    fn unknown_length_for_known_id_falls_back_to_opaque(#[case] _unused: u8) {
        // SetLocalUi expects exactly 3 bytes; feed it 2.
        let payload = Payload::decode(MessageId::from(0x17), &[0x00, 0x01]);
        assert!(matches!(payload, Payload::Opaque(_)));
    }

    #[test]
    fn unknown_message_id_is_always_opaque() {
        let payload = Payload::decode(MessageId::from(0xAB), &[1, 2, 3]);
        assert_eq!(payload, Payload::Opaque(Bytes::from_static(&[1, 2, 3])));
    }

    #[test]
    fn post_motor_ip_without_angle_round_trips() {
        let payload = Payload::decode(MessageId::from(0x35), &[0x02, 0x00, 0x80, 0x00]);
        assert_eq!(payload, Payload::PostMotorIp { ip_index: 0x02, position: 0x80, angle: None });
        assert_eq!(payload.encode(), vec![0x02, 0x00, 0x80, 0x00]);
    }

    #[test]
    fn post_motor_ip_with_angle_round_trips() {
        let bytes = [0x02, 0x00, 0x80, 0x00, 0x00, 0x00, 0x00, 0x34, 0x12];
        let payload = Payload::decode(MessageId::from(0x35), &bytes);
        assert_eq!(payload, Payload::PostMotorIp { ip_index: 0x02, position: 0x80, angle: Some(0x1234) });
        assert_eq!(payload.encode(), bytes.to_vec());
    }

    #[test]
    fn node_label_rejects_wrong_length() {
        // NodeLabelPayload.expected_lengths == [16] in the source; anything
        // else must degrade to Opaque rather than be accepted.
        let payload = Payload::decode(MessageId::from(0x55), &[0u8; 8]);
        assert!(matches!(payload, Payload::Opaque(_)));
    }

    #[test]
    fn node_label_of_correct_length_round_trips() {
        let label = Bytes::from_static(b"LIVING ROOM BLND");
        assert_eq!(label.len(), 16);
        let payload = Payload::decode(MessageId::from(0x55), &label);
        assert_eq!(payload, Payload::NodeLabel { label: label.clone() });
        assert_eq!(payload.encode(), label.to_vec());
    }
}
