use crate::error::GateClosed;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Process-wide admission gate for language model calls.
///
/// Built once at startup and cloned into every component that talks to the
/// model; all clones share the same slots. Waiters are admitted in FIFO
/// order, so concurrent requests interleave in arrival order.
#[derive(Clone, Debug)]
pub struct AdmissionGate {
    slots: Arc<Semaphore>,
}

impl AdmissionGate {
    /// A gate admitting a single call at a time.
    pub fn single() -> Self {
        Self::with_slots(1)
    }

    pub fn with_slots(slots: usize) -> Self {
        Self {
            slots: Arc::new(Semaphore::new(slots.max(1))),
        }
    }

    /// Run `op` once a slot is free; the slot is held until `op` completes.
    /// `op` never runs without a slot.
    pub async fn run<F, Fut, T>(&self, op: F) -> Result<T, GateClosed>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let _permit = self.slots.acquire().await.map_err(|_| GateClosed)?;
        Ok(op().await)
    }

    pub fn available(&self) -> usize {
        self.slots.available_permits()
    }
}
