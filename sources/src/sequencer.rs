//! Last-query-wins sequencing for interactive lookups.
//!
//! A caller that lets the user change the queried wallet while an earlier
//! statement is still loading takes a ticket per query and drops any result
//! whose ticket is no longer current.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QueryTicket(u64);

impl QueryTicket {
    pub fn id(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
pub struct QuerySequencer {
    latest: AtomicU64,
}

impl QuerySequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new query, superseding every earlier ticket.
    pub fn begin(&self) -> QueryTicket {
        let previous = self.latest.fetch_add(1, Ordering::AcqRel);
        QueryTicket(previous.wrapping_add(1))
    }

    pub fn is_current(&self, ticket: QueryTicket) -> bool {
        self.latest.load(Ordering::Acquire) == ticket.0
    }

    /// `Some(result)` if `ticket` is still the latest query.
    pub fn accept<T>(&self, ticket: QueryTicket, result: T) -> Option<T> {
        if self.is_current(ticket) {
            Some(result)
        } else {
            log::debug!("discarding result of superseded query {}", ticket.0);
            None
        }
    }
}
