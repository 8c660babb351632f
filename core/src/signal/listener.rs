use crate::signal::codec::decode_signal;
use crate::telemetry::log::LogManager;
use crate::telemetry::metrics::MetricsRecorder;
use crate::{validate_port, SignalError, SignalResult, MAX_DATAGRAM_LEN};
use serde::Serialize;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::net::UdpSocket;
use tokio::sync::{mpsc, watch};

/// Lifecycle of the listener's run loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerState {
    Created,
    Starting,
    Listening,
    Stopping,
    Stopped,
    Failed,
}

/// Structured record emitted for each decoded inbound signal.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SignalReport {
    pub timestamp: f64,
    pub raw_label: String,
    pub decorated_label: String,
}

/// Flows idle longer than this are considered complete and closed.
const FLOW_IDLE_SECS: f64 = 60.0;
/// Upper bound on simultaneously open inbound flows.
const DEFAULT_FLOW_CAPACITY: usize = 512;

/// Per-peer inbound flow, open for the duration of its receive sequence.
struct InboundFlow {
    opened_at: f64,
    last_seen: f64,
    datagrams: u64,
    decode_failures: u64,
}

/// Binds a UDP port and receives datagrams indefinitely.
///
/// The bound socket is owned here for the process lifetime; each datagram
/// source is tracked as an ephemeral inbound flow. Malformed payloads and
/// receive errors are reported per flow and never terminate the loop.
pub struct SignalListener {
    port: u16,
    flow_capacity: usize,
    state_tx: watch::Sender<ListenerState>,
    shutdown_tx: watch::Sender<bool>,
    reports: mpsc::Sender<SignalReport>,
    metrics: MetricsRecorder,
    logger: LogManager,
}

impl SignalListener {
    /// Fails with `InvalidPort` at construction, not at start.
    pub fn new(port: u32, reports: mpsc::Sender<SignalReport>) -> SignalResult<Self> {
        let port = validate_port(port)?;
        let (state_tx, _) = watch::channel(ListenerState::Created);
        let (shutdown_tx, _) = watch::channel(false);
        Ok(Self {
            port,
            flow_capacity: DEFAULT_FLOW_CAPACITY,
            state_tx,
            shutdown_tx,
            reports,
            metrics: MetricsRecorder::new(),
            logger: LogManager::new(),
        })
    }

    /// Overrides the open-flow bound; the oldest flow closes when full.
    pub fn with_flow_capacity(mut self, capacity: usize) -> Self {
        self.flow_capacity = capacity.max(1);
        self
    }

    /// Runs the receive loop until `stop()`.
    ///
    /// This is the server's main run loop: the call suspends its task
    /// indefinitely by design. A bind failure is logged, moves the state to
    /// `Failed`, and is returned without panicking.
    pub async fn run(&self) -> SignalResult<()> {
        self.state_tx.send_replace(ListenerState::Starting);

        let socket = match UdpSocket::bind(("0.0.0.0", self.port)).await {
            Ok(socket) => socket,
            Err(err) => {
                self.logger
                    .warn(&format!("listener bind failed on port {}: {}", self.port, err));
                self.state_tx.send_replace(ListenerState::Failed);
                return Err(SignalError::Connection(err));
            }
        };

        self.logger
            .record(&format!("listener ready on 0.0.0.0:{}", self.port));
        self.state_tx.send_replace(ListenerState::Listening);

        let mut shutdown_rx = self.shutdown_tx.subscribe();
        let mut flows: HashMap<SocketAddr, InboundFlow> = HashMap::new();
        let mut buf = vec![0u8; MAX_DATAGRAM_LEN];

        // A stop issued before the bind completed is already latched.
        let mut reports_closed = false;
        while !*shutdown_rx.borrow() {
            tokio::select! {
                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        break;
                    }
                }
                received = socket.recv_from(&mut buf) => {
                    match received {
                        Ok((len, peer)) => {
                            self.evict_idle_flows(&mut flows);
                            if !self.handle_datagram(&mut flows, peer, &buf[..len]).await {
                                // Report consumer went away; nothing left to serve.
                                self.logger.warn("report channel closed, stopping listener");
                                reports_closed = true;
                                break;
                            }
                        }
                        Err(err) => {
                            // Ends only the affected receive, never the loop.
                            let failure = SignalError::FlowReceive(err);
                            self.logger.warn(&format!("{}", failure));
                            self.metrics.record_receive_failure();
                        }
                    }
                }
            }
        }

        self.state_tx.send_replace(ListenerState::Stopping);
        for (peer, flow) in flows.drain() {
            self.log_flow_closed(peer, &flow);
        }
        self.state_tx.send_replace(ListenerState::Stopped);
        if reports_closed {
            return Err(SignalError::ChannelClosed);
        }
        Ok(())
    }

    fn log_flow_closed(&self, peer: SocketAddr, flow: &InboundFlow) {
        self.logger.record(&format!(
            "flow {} closed after {} datagrams, {} decode failures, {:.1}s open",
            peer,
            flow.datagrams,
            flow.decode_failures,
            now_secs() - flow.opened_at
        ));
    }

    /// Flows are ephemeral: a peer silent past the idle window is complete
    /// and its record is released.
    fn evict_idle_flows(&self, flows: &mut HashMap<SocketAddr, InboundFlow>) {
        let cutoff = now_secs() - FLOW_IDLE_SECS;
        let stale: Vec<SocketAddr> = flows
            .iter()
            .filter(|(_, flow)| flow.last_seen < cutoff)
            .map(|(&peer, _)| peer)
            .collect();
        for peer in stale {
            if let Some(flow) = flows.remove(&peer) {
                self.log_flow_closed(peer, &flow);
            }
        }
    }

    /// Returns `false` only when the report channel is closed.
    async fn handle_datagram(
        &self,
        flows: &mut HashMap<SocketAddr, InboundFlow>,
        peer: SocketAddr,
        payload: &[u8],
    ) -> bool {
        let timestamp = now_secs();
        if !flows.contains_key(&peer) && flows.len() >= self.flow_capacity {
            // Table is full; the longest-quiet flow makes room.
            let stalest = flows
                .iter()
                .min_by(|a, b| a.1.last_seen.total_cmp(&b.1.last_seen))
                .map(|(&stale_peer, _)| stale_peer);
            if let Some(stale_peer) = stalest {
                if let Some(flow) = flows.remove(&stale_peer) {
                    self.log_flow_closed(stale_peer, &flow);
                }
            }
        }
        let flow = flows.entry(peer).or_insert_with(|| {
            self.logger.record(&format!("accepted inbound flow from {}", peer));
            self.metrics.record_flow_opened();
            InboundFlow {
                opened_at: timestamp,
                last_seen: timestamp,
                datagrams: 0,
                decode_failures: 0,
            }
        });
        flow.last_seen = timestamp;
        flow.datagrams += 1;

        if payload.is_empty() {
            return true;
        }

        match decode_signal(payload) {
            Ok(decoded) => {
                let report = SignalReport {
                    timestamp,
                    raw_label: decoded.raw_label,
                    decorated_label: decoded.decorated,
                };
                self.metrics.record_delivered();
                self.reports.send(report).await.is_ok()
            }
            Err(err) => {
                flow.decode_failures += 1;
                self.metrics.record_decode_failure();
                self.logger.warn(&format!("flow {}: {}", peer, err));
                true
            }
        }
    }

    /// Signals the run loop to exit. Idempotent; safe before, during, and
    /// after `run()`.
    pub fn stop(&self) {
        self.shutdown_tx.send_replace(true);
        if *self.state_tx.borrow() == ListenerState::Created {
            self.state_tx.send_replace(ListenerState::Stopped);
        }
    }

    pub fn state(&self) -> watch::Receiver<ListenerState> {
        self.state_tx.subscribe()
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn metrics(&self) -> &MetricsRecorder {
        &self.metrics
    }
}

fn now_secs() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}
