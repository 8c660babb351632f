use anyhow::Context;
use clap::Parser;
use generator::script::{build_script, ScriptConfig};
use gesturecore::prelude::GestureLabel;
use pipeline::config::PipelineConfig;
use pipeline::orchestrator::Orchestrator;
use std::path::PathBuf;

mod generator;
mod pipeline;

#[derive(Parser)]
#[command(author, version, about = "Offline driver for the gesture-signal pipeline")]
struct Args {
    /// Load a pipeline config from YAML
    #[arg(long)]
    pipeline: Option<PathBuf>,
    /// Target host for outbound signals
    #[arg(long, default_value = "127.0.0.1")]
    host: String,
    #[arg(long, default_value_t = 8080)]
    port: u32,
    /// Identical frames required before a gesture is confirmed
    #[arg(long, default_value_t = 5)]
    required_frames: u32,
    #[arg(long, default_value_t = 750)]
    cooldown_ms: u64,
    #[arg(long, default_value_t = 30)]
    frame_rate_hz: u32,
    /// Frames each scripted gesture is held
    #[arg(long, default_value_t = 8)]
    hold: usize,
    /// Replace every Nth held frame with an empty observation (0 = off)
    #[arg(long, default_value_t = 0)]
    flicker: usize,
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let pipeline_config = if let Some(path) = args.pipeline {
        PipelineConfig::load(path)?
    } else {
        PipelineConfig::from_args(
            args.host,
            args.port,
            args.required_frames,
            args.cooldown_ms,
            args.frame_rate_hz,
        )
    };

    let script = build_script(&ScriptConfig {
        gestures: GestureLabel::SIGNALABLE.to_vec(),
        frames_per_gesture: args.hold,
        flicker_every: args.flicker,
        gap_frames: 3,
        seed: args.seed,
    });

    let mut orchestrator = Orchestrator::new(pipeline_config.to_signal_config())
        .context("building orchestrator")?;
    orchestrator.connect().await.context("connecting sender")?;

    let summary = orchestrator.run_script(&script).await?;
    orchestrator.disconnect();

    println!(
        "Offline run -> frames {}, confirmations {:?}, delivered {}",
        summary.frames,
        summary
            .confirmations
            .iter()
            .map(|label| label.display_name())
            .collect::<Vec<_>>(),
        summary.metrics.delivered
    );

    Ok(())
}
