//! SIGINT / SIGTERM handling during a run
//!
//! The handler only raises a flag. The build driver checks it between
//! variants, so an interrupted run stops building and the staged tree is
//! restored on the normal unwind path. A handled signal reverts to its default
//! disposition across `exec`, so the build tool still receives the signal.

use std::sync::atomic::{AtomicBool, Ordering};

use nix::libc::c_int;
use nix::sys::signal::{SaFlags, SigAction, SigHandler, SigSet, Signal, sigaction};
use tracing::{debug, warn};

use crate::error::{Result, SetupError};

static INTERRUPTED: AtomicBool = AtomicBool::new(false);

const HANDLED: [Signal; 2] = [Signal::SIGINT, Signal::SIGTERM];

extern "C" fn on_signal(_: c_int) {
    INTERRUPTED.store(true, Ordering::SeqCst);
}

/// Installed handlers; previous dispositions come back on drop
pub struct InterruptGuard {
    previous: Vec<(Signal, SigAction)>,
}

impl InterruptGuard {
    pub fn install() -> Result<Self> {
        INTERRUPTED.store(false, Ordering::SeqCst);

        let action = SigAction::new(
            SigHandler::Handler(on_signal),
            SaFlags::SA_RESTART,
            SigSet::empty(),
        );

        let mut guard = Self {
            previous: Vec::with_capacity(HANDLED.len()),
        };
        for signal in HANDLED {
            // SAFETY: the handler only stores to an atomic.
            let old = unsafe { sigaction(signal, &action) }.map_err(|e| SetupError::IoError {
                message: format!("cannot install {signal} handler: {e}"),
            })?;
            guard.previous.push((signal, old));
        }

        debug!("interrupt handlers installed");
        Ok(guard)
    }

    /// Flag raised by the handler
    pub fn flag(&self) -> &'static AtomicBool {
        &INTERRUPTED
    }
}

impl Drop for InterruptGuard {
    fn drop(&mut self) {
        for (signal, old) in self.previous.drain(..).rev() {
            // SAFETY: restores a disposition previously returned by sigaction.
            if let Err(e) = unsafe { sigaction(signal, &old) } {
                warn!("cannot restore {signal} handler: {e}");
            }
        }
    }
}
