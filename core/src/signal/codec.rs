use crate::gesture::GestureLabel;
use crate::{SignalError, SignalResult};

/// Suffix appended to every gesture name on the wire.
pub const SIGNAL_SUFFIX: &str = "_detected";

/// Result of decoding one inbound datagram.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedSignal {
    /// Gesture name as it appeared on the wire, suffix stripped.
    pub raw_label: String,
    /// Human-readable form for console output.
    pub decorated: String,
    /// Known gesture, when the raw name is one of ours.
    pub label: Option<GestureLabel>,
}

/// Encodes a confirmed label as its wire payload.
///
/// The `None` sentinel has no wire form and yields `Option::None`.
pub fn encode_signal(label: GestureLabel) -> Option<String> {
    label
        .wire_name()
        .map(|name| format!("{}{}", name, SIGNAL_SUFFIX))
}

/// Decodes an inbound payload.
///
/// Non-UTF-8 bytes are a reported error. Valid UTF-8 always decodes: the
/// listener performs no upstream validation of senders, so unrecognized
/// gesture names are rendered with a fallback marker rather than rejected.
pub fn decode_signal(payload: &[u8]) -> SignalResult<DecodedSignal> {
    let text =
        std::str::from_utf8(payload).map_err(|_| SignalError::NonUtf8Payload(payload.len()))?;

    let raw_label = text.strip_suffix(SIGNAL_SUFFIX).unwrap_or(text).to_string();
    let label = GestureLabel::from_wire_name(&raw_label);
    let decorated = match label {
        Some(label) => label.display_name().to_string(),
        None => format!("unrecognized '{}'", raw_label),
    };

    Ok(DecodedSignal {
        raw_label,
        decorated,
        label,
    })
}
