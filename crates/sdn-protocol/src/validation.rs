//! Pre-flight validation shared by [`crate::builder::FrameBuilder`] and
//! anything else that assembles a [`crate::Frame`] by hand before encoding.

use sdn_core::constants::MAX_PAYLOAD_LEN;
use sdn_core::{Error, Result};

/// Checks that an encoded payload will fit inside a single frame.
///
/// Grounded in `examples/original_source/somfy/messages.py`'s
/// `SomfyMessage.serialize`, which raises if
/// `len(payload) > MAX_MESSAGE_LEN - MIN_MESSAGE_LENGTH` rather than
/// silently truncating.
pub fn validate_payload_len(payload_len: usize) -> Result<()> {
    if payload_len > MAX_PAYLOAD_LEN {
        return Err(Error::InvalidFrame(format!(
            "payload is {payload_len} bytes, max is {MAX_PAYLOAD_LEN}"
        )));
    }
    Ok(())
}
