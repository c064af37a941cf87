//! Ordering of overlapping search responses.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Identifies one issued search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SearchTicket(u64);

/// Drops responses to searches that have since been superseded.
///
/// Each search takes a ticket before it is sent; when its response arrives
/// it is applied only if no later ticket has been issued meanwhile. Clones
/// share the counter.
#[derive(Debug, Clone, Default)]
pub struct SearchGuard {
    latest: Arc<AtomicU64>,
}

impl SearchGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a search.
    pub fn issue(&self) -> SearchTicket {
        SearchTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether `ticket` is still the most recent search.
    pub fn is_current(&self, ticket: SearchTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }

    /// Pass `result` through only for the most recent search.
    pub fn accept<T>(&self, ticket: SearchTicket, result: T) -> Option<T> {
        if self.is_current(ticket) {
            Some(result)
        } else {
            tracing::debug!(ticket = ticket.0, "discarding stale search response");
            None
        }
    }
}
