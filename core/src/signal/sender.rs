use crate::signal::settle::SettleOnce;
use crate::telemetry::log::LogManager;
use crate::{validate_port, SignalError, SignalResult};
use tokio::net::UdpSocket;

/// Outbound UDP association to a configured `(host, port)`.
///
/// Owns at most one live transport resource at a time. The association is
/// exclusively owned: all mutation goes through this instance's methods and
/// callers serialize access themselves. Changing targets means disconnecting
/// and constructing a fresh sender, never mutating a live association.
pub struct SignalSender {
    host: String,
    port: u16,
    socket: Option<UdpSocket>,
    ready: bool,
    logger: LogManager,
}

impl SignalSender {
    /// Fails with `InvalidPort` when the configured port is unusable.
    pub fn new(host: impl Into<String>, port: u32) -> SignalResult<Self> {
        Ok(Self {
            host: host.into(),
            port: validate_port(port)?,
            socket: None,
            ready: false,
            logger: LogManager::new(),
        })
    }

    /// Initiates the UDP association and suspends until the transport
    /// reports readiness or failure.
    ///
    /// Readiness is delivered through a one-shot settle guard so that the
    /// caller resumes exactly once even if the transport path ever reports
    /// a second terminal state. No retry is attempted on failure.
    pub async fn connect(&mut self) -> SignalResult<()> {
        self.disconnect();

        let target = (self.host.clone(), self.port);
        let (mut guard, settled) = SettleOnce::channel();
        tokio::spawn(async move {
            let association = async {
                let socket = UdpSocket::bind("0.0.0.0:0").await?;
                socket.connect(target).await?;
                Ok::<UdpSocket, std::io::Error>(socket)
            }
            .await;
            guard.settle(association);
        });

        match settled.await {
            Ok(Ok(socket)) => {
                self.logger
                    .record(&format!("sender ready for {}:{}", self.host, self.port));
                self.socket = Some(socket);
                self.ready = true;
                Ok(())
            }
            Ok(Err(err)) => {
                self.ready = false;
                Err(SignalError::Connection(err))
            }
            // Connect task dropped before settling, treat as cancellation.
            Err(_) => {
                self.ready = false;
                Err(SignalError::Connection(std::io::Error::new(
                    std::io::ErrorKind::Interrupted,
                    "connect cancelled before readiness",
                )))
            }
        }
    }

    /// Transmits one datagram, suspending until the transport accepts the
    /// write. UDP gives no peer acknowledgment and this call never retries.
    pub async fn send(&mut self, payload: &[u8]) -> SignalResult<()> {
        let socket = self.socket.as_ref().ok_or(SignalError::NotConnected)?;
        std::str::from_utf8(payload).map_err(|_| SignalError::Encoding)?;
        socket.send(payload).await.map_err(SignalError::Connection)?;
        Ok(())
    }

    /// Cancels the association and releases the transport resource.
    /// Safe to call at any point, including when already disconnected.
    pub fn disconnect(&mut self) {
        if self.socket.take().is_some() {
            self.logger
                .record(&format!("sender disconnected from {}:{}", self.host, self.port));
        }
        self.ready = false;
    }

    /// True only between a successful `connect` and the next
    /// disconnect or failure.
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn target(&self) -> (&str, u16) {
        (&self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_rejects_invalid_ports() {
        assert!(matches!(
            SignalSender::new("127.0.0.1", 0),
            Err(SignalError::InvalidPort(0))
        ));
        assert!(matches!(
            SignalSender::new("127.0.0.1", 90000),
            Err(SignalError::InvalidPort(90000))
        ));
    }

    #[tokio::test]
    async fn send_without_connect_is_not_connected() {
        let mut sender = SignalSender::new("127.0.0.1", 8080).unwrap();
        assert!(matches!(
            sender.send(b"victory_detected").await,
            Err(SignalError::NotConnected)
        ));
        assert!(!sender.is_ready());
    }

    #[tokio::test]
    async fn disconnect_is_safe_before_and_after_connect() {
        let mut sender = SignalSender::new("127.0.0.1", 8080).unwrap();
        sender.disconnect();
        sender.disconnect();
        assert!(!sender.is_ready());

        sender.connect().await.unwrap();
        assert!(sender.is_ready());
        sender.disconnect();
        sender.disconnect();
        assert!(!sender.is_ready());
    }

    #[tokio::test]
    async fn connected_send_delivers_the_exact_payload() {
        let peer = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let port = peer.local_addr().unwrap().port() as u32;

        let mut sender = SignalSender::new("127.0.0.1", port).unwrap();
        sender.connect().await.unwrap();
        sender.send(b"thumbs_up_detected").await.unwrap();

        let mut buf = [0u8; 64];
        let (len, _) = peer.recv_from(&mut buf).await.unwrap();
        assert_eq!(&buf[..len], b"thumbs_up_detected");
    }

    #[tokio::test]
    async fn non_utf8_payload_is_an_encoding_error() {
        let peer = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let port = peer.local_addr().unwrap().port() as u32;

        let mut sender = SignalSender::new("127.0.0.1", port).unwrap();
        sender.connect().await.unwrap();
        assert!(matches!(
            sender.send(&[0xff, 0xfe]).await,
            Err(SignalError::Encoding)
        ));
    }

    #[tokio::test]
    async fn reconnect_replaces_the_association() {
        let peer = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let port = peer.local_addr().unwrap().port() as u32;

        let mut sender = SignalSender::new("127.0.0.1", port).unwrap();
        sender.connect().await.unwrap();
        sender.connect().await.unwrap();
        assert!(sender.is_ready());
        sender.send(b"fist_detected").await.unwrap();

        let mut buf = [0u8; 64];
        let (len, _) = peer.recv_from(&mut buf).await.unwrap();
        assert_eq!(&buf[..len], b"fist_detected");
    }
}
