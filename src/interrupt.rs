//! Interrupt flag shared between the signal handler and the pipeline.

use crate::error::{Error, Result};
use crate::locking;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::warn;

/// Cloneable flag raised when the run must stop.
#[derive(Debug, Clone, Default)]
pub struct Interrupt {
    raised: Arc<AtomicBool>,
}

impl Interrupt {
    /// Create a flag that is not raised.
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the flag.
    pub fn raise(&self) {
        self.raised.store(true, Ordering::SeqCst);
    }

    /// Whether the flag was raised.
    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::SeqCst)
    }

    /// Fail with [`Error::Interrupted`] once the flag is raised.
    pub fn check(&self) -> Result<()> {
        if self.is_raised() {
            Err(Error::Interrupted)
        } else {
            Ok(())
        }
    }
}

/// Install the Ctrl+C and termination handler.
///
/// The first signal raises `interrupt`, letting the pipeline stop between two
/// rows. A second signal removes lock files and exits immediately.
pub fn install_handler(interrupt: &Interrupt) {
    let flag = interrupt.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        if flag.is_raised() {
            locking::cleanup_all_locks();
            std::process::exit(1);
        }
        flag.raise();
    }) {
        warn!("Failed to install Ctrl+C handler: {e}");
    }
}
