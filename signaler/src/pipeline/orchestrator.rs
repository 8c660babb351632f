use anyhow::Context;
use gesturecore::prelude::{
    encode_signal, ClassificationResult, GestureLabel, MetricsRecorder, MetricsSnapshot,
    SignalConfig, SignalSender, StabilityGate,
};
use log::info;
use std::time::Duration;
use tokio::time::{interval, Instant};

/// Outcome of one scripted pipeline run.
pub struct RunSummary {
    pub frames: usize,
    pub confirmations: Vec<GestureLabel>,
    pub metrics: MetricsSnapshot,
}

/// Wires the classification stream through the stability gate into the
/// UDP sender and owns the cooldown and reconnect policy.
///
/// Frames are consumed strictly sequentially; the cooldown is a deadline,
/// not a blocking sleep, so frame delivery stays responsive while the gate
/// is held fired.
pub struct Orchestrator {
    config: SignalConfig,
    gate: StabilityGate<GestureLabel>,
    sender: SignalSender,
    metrics: MetricsRecorder,
    cooldown_until: Option<Instant>,
}

impl Orchestrator {
    pub fn new(config: SignalConfig) -> anyhow::Result<Self> {
        let sender = SignalSender::new(config.host.clone(), config.port)
            .context("constructing signal sender")?;
        let gate = StabilityGate::new(config.required_frames);
        Ok(Self {
            config,
            gate,
            sender,
            metrics: MetricsRecorder::new(),
            cooldown_until: None,
        })
    }

    pub async fn connect(&mut self) -> anyhow::Result<()> {
        self.sender
            .connect()
            .await
            .with_context(|| format!("connecting to {}:{}", self.config.host, self.config.port))
    }

    /// Feeds one frame through the gate, sending a signal on confirmation.
    ///
    /// While the cooldown deadline is pending the gate is held fired and
    /// incoming frames are observed but not accumulated; at expiry the gate
    /// resets and the next run starts from zero.
    pub async fn process_frame(
        &mut self,
        frame: ClassificationResult,
    ) -> anyhow::Result<Option<GestureLabel>> {
        if let Some(deadline) = self.cooldown_until {
            if Instant::now() < deadline {
                return Ok(None);
            }
            self.gate.reset();
            self.cooldown_until = None;
        }

        let confirmed = self.gate.process(frame.label, frame.label.is_positive());
        let Some(label) = confirmed else {
            return Ok(None);
        };

        self.metrics.record_confirmed();
        let payload = encode_signal(label)
            .context("confirmed label has no wire form")?;
        self.sender
            .send(payload.as_bytes())
            .await
            .with_context(|| format!("sending {}", payload))?;
        self.metrics.record_delivered();
        info!("confirmed {:?}, sent {}", label, payload);

        self.cooldown_until =
            Some(Instant::now() + Duration::from_millis(self.config.cooldown_ms));
        Ok(Some(label))
    }

    /// Drives a scripted frame sequence at the configured cadence.
    pub async fn run_script(
        &mut self,
        frames: &[ClassificationResult],
    ) -> anyhow::Result<RunSummary> {
        let rate = self.config.frame_rate_hz.max(1);
        let mut cadence = interval(Duration::from_secs_f64(1.0 / rate as f64));

        let mut confirmations = Vec::new();
        for frame in frames {
            cadence.tick().await;
            if let Some(label) = self.process_frame(*frame).await? {
                confirmations.push(label);
            }
        }

        Ok(RunSummary {
            frames: frames.len(),
            confirmations,
            metrics: self.metrics.snapshot(),
        })
    }

    /// Target change: tear the old association down fully, then build and
    /// connect a fresh sender. A live association's target is never mutated.
    pub async fn reconfigure_target(&mut self, host: impl Into<String>) -> anyhow::Result<()> {
        self.sender.disconnect();
        self.config.host = host.into();
        self.sender = SignalSender::new(self.config.host.clone(), self.config.port)
            .context("constructing sender for new target")?;
        self.connect().await
    }

    pub fn disconnect(&mut self) {
        self.sender.disconnect();
    }

    pub fn is_ready(&self) -> bool {
        self.sender.is_ready()
    }

    /// Accumulation progress of the current run, for telemetry.
    pub fn gate_progress(&self) -> f32 {
        self.gate.progress()
    }

    pub fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}
