//! Convenience re-exports for pipeline consumers.

pub use crate::gate::{stability::DEFAULT_REQUIRED_FRAMES, StabilityGate};
pub use crate::gesture::{ClassificationResult, GestureLabel};
pub use crate::signal::{
    decode_signal, encode_signal, DecodedSignal, ListenerState, SignalListener, SignalReport,
    SignalSender,
};
pub use crate::telemetry::{MetricsRecorder, MetricsSnapshot};
pub use crate::{SignalConfig, SignalError, SignalResult};
