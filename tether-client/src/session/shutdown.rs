use crate::ShutdownReason;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::Notify;
use tracing::debug;

/// One-shot, shareable shutdown trigger.
///
/// The first reason wins; later triggers are ignored. Spawned tasks also use
/// it as a liveness flag and stop touching the engine or relay once it fires.
#[derive(Clone, Default)]
pub struct ShutdownSignal {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    triggered: AtomicBool,
    reason: Mutex<Option<ShutdownReason>>,
    notify: Notify,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if this call started the shutdown.
    pub fn trigger(&self, reason: ShutdownReason) -> bool {
        let mut slot = self.slot();
        if self.inner.triggered.load(Ordering::Acquire) {
            debug!("Shutdown already in progress, ignoring: {}", reason);
            return false;
        }
        *slot = Some(reason);
        self.inner.triggered.store(true, Ordering::Release);
        drop(slot);

        self.inner.notify.notify_waiters();
        true
    }

    pub fn is_triggered(&self) -> bool {
        self.inner.triggered.load(Ordering::Acquire)
    }

    /// Resolves once a shutdown has been triggered, including before this call.
    pub async fn triggered(&self) {
        let notified = self.inner.notify.notified();
        tokio::pin!(notified);
        notified.as_mut().enable();

        if self.is_triggered() {
            return;
        }
        notified.await;
    }

    /// Takes the winning reason. Only the first call after triggering gets it.
    pub fn take_reason(&self) -> Option<ShutdownReason> {
        self.slot().take()
    }

    fn slot(&self) -> MutexGuard<'_, Option<ShutdownReason>> {
        self.inner
            .reason
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
