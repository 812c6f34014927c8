use crate::foundation::error::{VersusError, VersusResult};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Cooperative cancellation flag shared between a run and its controller.
///
/// Checked once per frame boundary and once before the final mux.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Create a token in the not-cancelled state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Return `true` once [`CancelToken::cancel`] has been called on any clone.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Return [`VersusError::Cancelled`] when cancellation was requested.
    pub fn check(&self) -> VersusResult<()> {
        if self.is_cancelled() {
            Err(VersusError::Cancelled)
        } else {
            Ok(())
        }
    }
}
