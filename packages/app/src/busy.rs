//! Reference-counted busy indicator.
//!
//! Overlapping operations (an occurrence fetch racing an insights
//! request) each hold a [`BusyGuard`]; the sink is switched on when the
//! first guard is taken and off when the last one drops, so no
//! operation can hide the indicator while another is still in flight.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Receives busy-state transitions (spinner on/off).
pub trait BusySink: Send + Sync {
    /// Called on every off→on and on→off transition.
    fn set_busy(&self, busy: bool);
}

struct Inner {
    active: AtomicUsize,
    sink: Arc<dyn BusySink>,
}

/// Shared busy counter.
#[derive(Clone)]
pub struct BusyIndicator {
    inner: Arc<Inner>,
}

impl BusyIndicator {
    /// Creates an indicator reporting transitions to `sink`.
    #[must_use]
    pub fn new(sink: Arc<dyn BusySink>) -> Self {
        Self {
            inner: Arc::new(Inner {
                active: AtomicUsize::new(0),
                sink,
            }),
        }
    }

    /// Marks one operation in flight until the returned guard drops.
    #[must_use]
    pub fn begin(&self) -> BusyGuard {
        if self.inner.active.fetch_add(1, Ordering::SeqCst) == 0 {
            self.inner.sink.set_busy(true);
        }
        BusyGuard {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Whether any operation is currently in flight.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.inner.active.load(Ordering::SeqCst) > 0
    }
}

/// Keeps the indicator on while alive.
pub struct BusyGuard {
    inner: Arc<Inner>,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        if self.inner.active.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.inner.sink.set_busy(false);
        }
    }
}
