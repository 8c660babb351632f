use tokio::sync::oneshot;

/// One-shot settlement guard for transport callbacks.
///
/// A transport may report `ready` and `failed` in any order, possibly more
/// than once; the caller waiting on the paired receiver must be resumed
/// exactly once. The first `settle` wins, every later call is a no-op.
pub struct SettleOnce<T> {
    tx: Option<oneshot::Sender<T>>,
}

impl<T> SettleOnce<T> {
    pub fn channel() -> (Self, oneshot::Receiver<T>) {
        let (tx, rx) = oneshot::channel();
        (Self { tx: Some(tx) }, rx)
    }

    /// Delivers `value` to the waiting receiver if nothing has settled yet.
    ///
    /// Returns `true` only for the call that actually settled.
    pub fn settle(&mut self, value: T) -> bool {
        match self.tx.take() {
            Some(tx) => tx.send(value).is_ok(),
            None => false,
        }
    }

    pub fn is_settled(&self) -> bool {
        self.tx.is_none()
    }
}
