//! Process-wide Ctrl-C handling.
//!
//! One listener lives for the whole process. While a query runs, Ctrl-C cancels it
//! before its next iteration; at the prompt (or on a second Ctrl-C) the process exits.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio_util::sync::CancellationToken;

/// 128 + SIGINT.
pub(crate) const INTERRUPTED_EXIT_CODE: i32 = 130;

/// What one Ctrl-C did.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Interrupt {
    /// The running query was asked to stop.
    CancelledQuery,
    /// Nothing to cancel; the process should exit.
    Exit,
}

/// Shared slot for the running query's cancellation token.
#[derive(Clone, Default)]
pub(crate) struct Interrupts {
    current: Arc<Mutex<Option<CancellationToken>>>,
}

impl Interrupts {
    /// Spawns the single Ctrl-C listener and returns its handle.
    pub fn install() -> Self {
        let interrupts = Self::default();
        let listener = interrupts.clone();
        tokio::spawn(async move {
            while tokio::signal::ctrl_c().await.is_ok() {
                match listener.interrupt() {
                    Interrupt::CancelledQuery => {
                        eprintln!("\nCancelling after the current step...");
                    }
                    Interrupt::Exit => {
                        eprintln!();
                        tracing::info!("interrupted");
                        std::process::exit(INTERRUPTED_EXIT_CODE);
                    }
                }
            }
        });
        interrupts
    }

    /// Token for a new query; Ctrl-C cancels it until [`Interrupts::finish`].
    pub fn begin(&self) -> CancellationToken {
        let token = CancellationToken::new();
        *self.slot() = Some(token.clone());
        token
    }

    pub fn finish(&self) {
        *self.slot() = None;
    }

    pub(crate) fn interrupt(&self) -> Interrupt {
        match self.slot().as_ref() {
            Some(token) if !token.is_cancelled() => {
                token.cancel();
                Interrupt::CancelledQuery
            }
            _ => Interrupt::Exit,
        }
    }

    fn slot(&self) -> MutexGuard<'_, Option<CancellationToken>> {
        self.current.lock().unwrap_or_else(|p| p.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_interrupt_exits() {
        let interrupts = Interrupts::default();
        assert_eq!(interrupts.interrupt(), Interrupt::Exit);
    }

    #[test]
    fn interrupt_cancels_running_query_then_exits_on_repeat() {
        let interrupts = Interrupts::default();
        let token = interrupts.begin();
        assert_eq!(interrupts.interrupt(), Interrupt::CancelledQuery);
        assert!(token.is_cancelled());
        assert_eq!(interrupts.interrupt(), Interrupt::Exit);
    }

    #[test]
    fn finished_query_is_not_cancelled_later() {
        let interrupts = Interrupts::default();
        let first = interrupts.begin();
        interrupts.finish();
        assert_eq!(interrupts.interrupt(), Interrupt::Exit);
        assert!(!first.is_cancelled());

        let second = interrupts.begin();
        assert_eq!(interrupts.interrupt(), Interrupt::CancelledQuery);
        assert!(second.is_cancelled());
    }
}
