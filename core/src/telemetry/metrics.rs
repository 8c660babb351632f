use std::sync::Mutex;

/// Counter snapshot for pipeline telemetry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub confirmed: usize,
    pub delivered: usize,
    pub decode_failures: usize,
    pub receive_failures: usize,
    pub flows_opened: usize,
}

/// Mutex-guarded counters shared between the signaling components.
pub struct MetricsRecorder {
    inner: Mutex<MetricsSnapshot>,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MetricsSnapshot::default()),
        }
    }

    /// A gate confirmation reached the sender.
    pub fn record_confirmed(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.confirmed += 1;
        }
    }

    /// A signal was handed to the transport or reported by the listener.
    pub fn record_delivered(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.delivered += 1;
        }
    }

    pub fn record_decode_failure(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.decode_failures += 1;
        }
    }

    /// A transport-level receive failed; distinct from payload decode errors.
    pub fn record_receive_failure(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.receive_failures += 1;
        }
    }

    /// A previously unseen peer opened an inbound flow.
    pub fn record_flow_opened(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.flows_opened += 1;
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        self.inner
            .lock()
            .map(|metrics| *metrics)
            .unwrap_or_default()
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate_independently() {
        let recorder = MetricsRecorder::new();
        recorder.record_confirmed();
        recorder.record_delivered();
        recorder.record_delivered();
        recorder.record_decode_failure();
        recorder.record_receive_failure();
        recorder.record_flow_opened();

        let snapshot = recorder.snapshot();
        assert_eq!(snapshot.confirmed, 1);
        assert_eq!(snapshot.delivered, 2);
        assert_eq!(snapshot.decode_failures, 1);
        assert_eq!(snapshot.receive_failures, 1);
        assert_eq!(snapshot.flows_opened, 1);
    }
}
