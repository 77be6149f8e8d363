use tokio::sync::watch;

/// Gate the runtime awaits before authorizing.
///
/// Stands in for the host surface's document-ready event: the embedding
/// layer holds the [`ReadyNotifier`] and fires it once the surface can accept
/// a widget. A signal built with [`ReadySignal::ready`] never suspends.
#[derive(Debug, Clone)]
pub struct ReadySignal {
    rx: Option<watch::Receiver<bool>>,
}

impl ReadySignal {
    /// A signal that is already ready.
    pub fn ready() -> Self {
        Self { rx: None }
    }

    /// A pending signal paired with its notifier.
    pub fn pending() -> (Self, ReadyNotifier) {
        let (tx, rx) = watch::channel(false);
        (Self { rx: Some(rx) }, ReadyNotifier { tx })
    }

    /// Suspend until readiness is signalled; returns immediately if ready.
    ///
    /// A dropped notifier unblocks the wait rather than wedging `start()`.
    pub async fn wait(&self) {
        let Some(rx) = &self.rx else { return };
        let mut rx = rx.clone();
        let _ = rx.wait_for(|ready| *ready).await;
    }
}

impl Default for ReadySignal {
    fn default() -> Self {
        Self::ready()
    }
}

pub struct ReadyNotifier {
    tx: watch::Sender<bool>,
}

impl ReadyNotifier {
    pub fn notify(&self) {
        let _ = self.tx.send(true);
    }
}
