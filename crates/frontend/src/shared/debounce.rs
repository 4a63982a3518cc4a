//! Debounce по месту вызова
//!
//! Each call site owns its own [`Debouncer`], so unrelated features never
//! cancel each other's pending work. A call arms the debouncer and gets a
//! ticket; after the delay the ticket is still current only if nobody armed
//! the same debouncer in the meantime.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceTicket(u64);

#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    generation: AtomicU64,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: AtomicU64::new(0),
        }
    }

    /// Supersedes every ticket handed out before
    pub fn arm(&self) -> DebounceTicket {
        DebounceTicket(self.generation.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: DebounceTicket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.0
    }

    /// Waits out the delay, `true` if the ticket survived it
    pub async fn settle(&self, ticket: DebounceTicket) -> bool {
        if !self.delay.is_zero() {
            gloo_timers::future::sleep(self.delay).await;
        }
        self.is_current(ticket)
    }

    /// `arm` + `settle` in one call
    pub async fn wait(&self) -> bool {
        let ticket = self.arm();
        self.settle(ticket).await
    }
}
