//! Cancellation state.
//!
//! A [`CancelToken`] is a cheap, cloneable flag shared between the Ctrl+C
//! handler and long-running work (the external UI build). Work polls the
//! token and stops as soon as it is set.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared cancellation flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Check if cancellation has been requested
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Setup the global Ctrl+C handler. Call once at program start
///
/// The first Ctrl+C cancels `token` so a running external build is killed
/// and reaped; a second one exits immediately.
pub fn setup_shutdown_handler(token: &CancelToken) -> anyhow::Result<()> {
    let token = token.clone();
    ctrlc::set_handler(move || {
        if token.is_cancelled() {
            std::process::exit(130);
        }
        crate::log!("embedui"; "interrupted, stopping...");
        token.cancel();
    })
    .map_err(|e| anyhow::anyhow!("failed to set Ctrl+C handler: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_token() {
        let token = CancelToken::new();
        assert!(!token.is_cancelled());

        let clone = token.clone();
        clone.cancel();
        assert!(token.is_cancelled());

        // Idempotent
        token.cancel();
        assert!(clone.is_cancelled());
    }
}
