//! Derived operations built on top of [`Exchanger::exchange`]: the three
//! named in spec.md §4.4 (`detect_devices`, `try_exchange_one`, plus
//! `fire_and_forget` which lives directly on `Exchanger`) and the two
//! supplemented ones grounded in `examples/original_source/somfy/utils.py`
//! and `connector.py` (`move_with_ack`, `wait_for_completion`).

use std::time::Duration;

use sdn_core::{Address, Error, KnownMessageId, MessageId, NodeType, Result};
use sdn_protocol::{Frame, FrameBuilder, Payload};
use sdn_transport::Channel;
use tokio::time::Instant;
use tracing::debug;

use crate::exchanger::Exchanger;

/// `detect_devices(node_type_filter)`: broadcasts `GET_NODE_ADDR` and
/// collects `(from_addr, from_node_type)` for every `POST_NODE_ADDR` whose
/// `from_node_type` matches `filter` (or any, if `filter` is `ALL`), for up
/// to `COMM_TIMEOUT`.
pub async fn detect_devices<C: Channel + 'static>(
    exchanger: &Exchanger<C>,
    node_type_filter: NodeType,
) -> Vec<(Address, NodeType)> {
    let query = FrameBuilder::new(MessageId::Known(KnownMessageId::GetNodeAddr))
        .to_node_type(node_type_filter)
        .to_addr(Address::BROADCAST)
        .build()
        .expect("an empty-payload GET_NODE_ADDR always fits the frame budget");

    let mut found = Vec::new();
    exchanger
        .exchange(
            Some(query),
            Some(|frame: Frame| {
                if frame.msg_id == MessageId::Known(KnownMessageId::PostNodeAddr)
                    && frame.from_node_type.matches(node_type_filter)
                {
                    debug!(addr = %frame.from_addr, node_type = %frame.from_node_type, "detect_devices: device found");
                    found.push((frame.from_addr, frame.from_node_type));
                }
                true
            }),
        )
        .await;
    found
}

/// `try_exchange_one(addr, query, expected_id)`: sends a unicast `query`
/// addressed to `addr` and returns the first frame from `addr` whose
/// `msg_id == expected_id`, or `None` on timeout/no-match.
pub async fn try_exchange_one<C: Channel + 'static>(
    exchanger: &Exchanger<C>,
    addr: Address,
    query: Frame,
    expected_id: MessageId,
) -> Option<Frame> {
    let mut reply = None;
    exchanger
        .exchange(
            Some(query),
            Some(|frame: Frame| {
                if frame.from_addr == addr && frame.msg_id == expected_id {
                    reply = Some(frame);
                    false
                } else {
                    true
                }
            }),
        )
        .await;
    reply
}

/// `move_with_ack(exchanger, addr, frame)`: sends `frame` (expected to carry
/// `need_ack = true`) and waits for either an ACK or a NACK from `addr`. A
/// NACK becomes [`Error::Nack`]; exhausting the deadline without either
/// becomes [`Error::ExchangeTimeout`].
pub async fn move_with_ack<C: Channel + 'static>(exchanger: &Exchanger<C>, addr: Address, frame: Frame) -> Result<()> {
    let mut outcome: Option<Result<()>> = None;
    exchanger
        .exchange(
            Some(frame),
            Some(|reply: Frame| {
                if reply.from_addr != addr {
                    return true;
                }
                match reply.msg_id {
                    MessageId::Known(KnownMessageId::Ack) => {
                        outcome = Some(Ok(()));
                        false
                    }
                    MessageId::Known(KnownMessageId::Nack) => {
                        let reason = match &reply.payload {
                            Payload::Nack { reason } => *reason,
                            _ => sdn_core::NackReason::from(0),
                        };
                        outcome = Some(Err(Error::Nack { reason, msg_id: u8::from(reply.msg_id) }));
                        false
                    }
                    _ => true,
                }
            }),
        )
        .await;
    outcome.unwrap_or(Err(Error::ExchangeTimeout))
}

/// `wait_for_completion(exchanger, addr, poll_interval, stable_window)`:
/// polls `GET_MOTOR_POSITION` at `poll_interval`, tracking
/// `position_pulses` and when it last changed, and returns once the value
/// has been unchanged for at least `stable_window`. There is no dedicated
/// "move complete" message on the wire; this polling loop is the production
/// completion-detection strategy for any `CTRL_MOVETO` caller.
pub async fn wait_for_completion<C: Channel + 'static>(
    exchanger: &Exchanger<C>,
    addr: Address,
    poll_interval: Duration,
    stable_window: Duration,
) -> Result<u16> {
    let query_id = MessageId::Known(KnownMessageId::GetMotorPosition);
    let reply_id = MessageId::Known(KnownMessageId::PostMotorPosition);

    let mut last_pulses: Option<u16> = None;
    let mut last_changed_at = Instant::now();

    loop {
        let query = FrameBuilder::new(query_id)
            .to_addr(addr)
            .build()
            .expect("an empty-payload GET_MOTOR_POSITION always fits the frame budget");
        let reply = try_exchange_one(exchanger, addr, query, reply_id).await;

        if let Some(frame) = reply
            && let Payload::PostMotorPosition { position_pulses, .. } = frame.payload
        {
            let now = Instant::now();
            match last_pulses {
                Some(previous) if previous == position_pulses => {
                    if now.saturating_duration_since(last_changed_at) >= stable_window {
                        return Ok(position_pulses);
                    }
                }
                _ => {
                    last_pulses = Some(position_pulses);
                    last_changed_at = now;
                }
            }
        }

        tokio::time::sleep(poll_interval).await;
    }
}
