use anyhow::Context;
use gesturecore::SignalConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub host: String,
    pub port: u32,
    pub required_frames: u32,
    pub cooldown_ms: u64,
    pub frame_rate_hz: u32,
}

impl PipelineConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading pipeline config {}", path_ref.display()))?;
        let config: PipelineConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing pipeline config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(
        host: String,
        port: u32,
        required_frames: u32,
        cooldown_ms: u64,
        frame_rate_hz: u32,
    ) -> Self {
        Self {
            host,
            port,
            required_frames,
            cooldown_ms,
            frame_rate_hz,
        }
    }

    pub fn to_signal_config(&self) -> SignalConfig {
        SignalConfig {
            host: self.host.clone(),
            port: self.port,
            required_frames: self.required_frames,
            cooldown_ms: self.cooldown_ms,
            frame_rate_hz: self.frame_rate_hz,
        }
    }
}
