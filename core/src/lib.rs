//! Stability gating and UDP signaling core for the gesture-signal platform.
//!
//! The modules turn a noisy per-frame gesture classification stream into
//! de-duplicated action signals and carry them over a minimal UDP protocol:
//! debounce gate, wire codec, outbound sender, and an unbounded receive loop.

pub mod gate;
pub mod gesture;
pub mod prelude;
pub mod signal;
pub mod telemetry;

pub use gesture::{ClassificationResult, GestureLabel};
use serde::{Deserialize, Serialize};

/// Default target host for outbound signals.
pub const DEFAULT_HOST: &str = "127.0.0.1";
/// Default signaling port, shared by sender and listener.
pub const DEFAULT_PORT: u32 = 8080;
/// Receive window for a single datagram.
pub const MAX_DATAGRAM_LEN: usize = 65536;

/// Shared configuration for the signaling pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalConfig {
    pub host: String,
    pub port: u32,
    pub required_frames: u32,
    pub cooldown_ms: u64,
    pub frame_rate_hz: u32,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            required_frames: 5,
            cooldown_ms: 750,
            frame_rate_hz: 30,
        }
    }
}

/// Common error type for signaling operations.
#[derive(thiserror::Error, Debug)]
pub enum SignalError {
    #[error("no live association, connect first")]
    NotConnected,
    #[error("payload is not valid UTF-8")]
    Encoding,
    #[error("transport failed: {0}")]
    Connection(#[source] std::io::Error),
    #[error("port {0} is outside the valid range")]
    InvalidPort(u32),
    #[error("received non-UTF-8 payload ({0} bytes)")]
    NonUtf8Payload(usize),
    #[error("receive failed on inbound flow: {0}")]
    FlowReceive(#[source] std::io::Error),
    #[error("report channel closed")]
    ChannelClosed,
}

pub type SignalResult<T> = Result<T, SignalError>;

/// Validates a configured port value into a usable socket port.
pub fn validate_port(port: u32) -> SignalResult<u16> {
    if port == 0 || port > u16::MAX as u32 {
        return Err(SignalError::InvalidPort(port));
    }
    Ok(port as u16)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_wire_defaults() {
        let config = SignalConfig::default();
        assert_eq!(config.host, DEFAULT_HOST);
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.required_frames, 5);
        assert_eq!(config.cooldown_ms, 750);
    }

    #[test]
    fn validate_port_rejects_zero_and_overflow() {
        assert!(matches!(validate_port(0), Err(SignalError::InvalidPort(0))));
        assert!(matches!(
            validate_port(70000),
            Err(SignalError::InvalidPort(70000))
        ));
        assert_eq!(validate_port(8080).unwrap(), 8080);
    }
}
