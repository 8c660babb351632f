use anyhow::Context;
use clap::Parser;
use gesturecore::prelude::{SignalListener, SignalReport};
use log::info;
use std::sync::Arc;
use tokio::signal;
use tokio::sync::mpsc;

#[derive(Parser)]
#[command(author, version, about = "Console receive daemon for gesture action signals")]
struct Args {
    /// UDP port to bind on 0.0.0.0
    #[arg(long, default_value_t = 8080)]
    port: u32,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let (report_tx, mut report_rx) = mpsc::channel::<SignalReport>(64);
    let listener =
        Arc::new(SignalListener::new(args.port, report_tx).context("constructing listener")?);

    let runner = listener.clone();
    let mut server = tokio::spawn(async move { runner.run().await });

    let printer = tokio::spawn(async move {
        while let Some(report) = report_rx.recv().await {
            println!(
                "[{:.3}] {} -> {}",
                report.timestamp, report.raw_label, report.decorated_label
            );
        }
    });

    println!("Receiver listening on 0.0.0.0:{} (Ctrl+C to stop)...", args.port);
    let outcome = tokio::select! {
        interrupt = signal::ctrl_c() => {
            interrupt.context("awaiting Ctrl+C")?;
            info!("shutdown requested");
            listener.stop();
            (&mut server).await?
        }
        finished = &mut server => finished?,
    };
    outcome.context("listener terminated")?;
    printer.abort();

    let snapshot = listener.metrics().snapshot();
    println!(
        "Receiver stats -> reports {}, decode failures {}",
        snapshot.delivered, snapshot.decode_failures
    );

    Ok(())
}
