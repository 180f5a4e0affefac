//! Skyplan Latest-Wins
//! Copyright (c) 2026 Skyplan contributors
//! Licensed and distributed under either of
//!   * MIT license (license terms at the root of the package or at http://opensource.org/licenses/MIT).
//!   * Apache v2 license (license terms at the root of the package or at http://www.apache.org/licenses/LICENSE-2.0).
//! at your option. This file may not be copied, modified, or distributed except according to those terms.

//! skyplan-internals/latest-wins
//! A latest-wins sequence gate: issue a ticket per outbound request, admit a
//! response only when its ticket is still the most recently issued one.
//! Responses arriving for superseded tickets are meant to be discarded
//! silently by the caller.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use thiserror::Error;

/// Custom error for the gate
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LatestWinsError {
    #[error("a request is already in flight")]
    Busy,
}

/// A ticket issued for one outbound request.
///
/// Tickets are totally ordered by issue time; only the highest-numbered
/// ticket is admitted when its response arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SeqTicket(u64);

impl SeqTicket {
    pub fn sequence(&self) -> u64 {
        self.0
    }
}

/// A latest-wins gate over overlapping requests to the same target.
///
/// # Examples
///
/// ```
/// use skyplan_latest_wins::LatestWins;
///
/// let gate = LatestWins::new();
/// let first = gate.issue();
/// let second = gate.issue();
/// assert!(!gate.admit(first));
/// assert!(gate.admit(second));
/// ```
#[derive(Clone, Debug, Default)]
pub struct LatestWins {
    latest: Arc<AtomicU64>,
}

impl LatestWins {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a ticket for a request about to go out.
    /// Issuing supersedes every previously issued ticket.
    pub fn issue(&self) -> SeqTicket {
        SeqTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// True iff `ticket` is still the latest issued one.
    /// Admission does not consume the ticket: re-checking is allowed.
    pub fn admit(&self, ticket: SeqTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }

    /// Apply `value` only when `ticket` is still current.
    /// Returns `None` for superseded tickets.
    pub fn apply<T>(&self, ticket: SeqTicket, value: T) -> Option<T> {
        if self.admit(ticket) { Some(value) } else { None }
    }
}

/// A single-request busy flag: the UI-side guard against resubmission while
/// a request is in flight. Dropping the guard releases the flag.
#[derive(Clone, Debug, Default)]
pub struct BusyFlag {
    busy: Arc<AtomicBool>,
}

#[derive(Debug)]
pub struct BusyGuard {
    busy: Arc<AtomicBool>,
}

impl BusyFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Acquire the flag, failing when a request is already in flight.
    pub fn acquire(&self) -> Result<BusyGuard, LatestWinsError> {
        if self.busy.swap(true, Ordering::SeqCst) {
            return Err(LatestWinsError::Busy);
        }
        Ok(BusyGuard {
            busy: Arc::clone(&self.busy),
        })
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::SeqCst);
    }
}
