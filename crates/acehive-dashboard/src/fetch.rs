//! Fetch tickets and per-component fetch tracking
//!
//! Every fetch is issued under a [`Ticket`] drawn from one process-wide
//! counter. A component only accepts the response carrying its current
//! ticket, so overlapping or out-of-order responses can never overwrite
//! newer state.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_TICKET: AtomicU64 = AtomicU64::new(1);

/// Identifies one issued fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ticket(u64);

impl Ticket {
    /// Draw the next ticket; tickets are unique and strictly increasing
    #[must_use]
    pub fn issue() -> Self {
        Self(NEXT_TICKET.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw ticket number
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Where a component's data currently stands
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FetchPhase {
    /// Nothing requested yet
    #[default]
    Idle,
    /// A fetch is outstanding
    Loading,
    /// The last accepted fetch succeeded
    Loaded,
    /// The last accepted fetch failed with this message
    Failed(String),
}

/// Tracks the outstanding fetch of one component
#[derive(Debug, Default)]
pub struct FetchTracker {
    phase: FetchPhase,
    current: Option<Ticket>,
}

impl FetchTracker {
    /// Create an idle tracker
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fetch, superseding any outstanding one
    pub fn begin(&mut self) -> Ticket {
        let ticket = Ticket::issue();
        self.current = Some(ticket);
        self.phase = FetchPhase::Loading;
        ticket
    }

    /// Whether `ticket` is the outstanding fetch
    #[must_use]
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.current == Some(ticket)
    }

    /// Record the outcome of a fetch
    ///
    /// Returns `false` and leaves the tracker untouched when `ticket` is not
    /// the outstanding fetch. A ticket is accepted at most once.
    pub fn settle(&mut self, ticket: Ticket, outcome: Result<(), String>) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.current = None;
        self.phase = match outcome {
            Ok(()) => FetchPhase::Loaded,
            Err(message) => FetchPhase::Failed(message),
        };
        true
    }

    /// Current phase
    #[must_use]
    pub const fn phase(&self) -> &FetchPhase {
        &self.phase
    }

    /// Whether a fetch is outstanding
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self.phase, FetchPhase::Loading)
    }

    /// Whether nothing was ever requested
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        matches!(self.phase, FetchPhase::Idle)
    }

    /// Failure message of the last accepted fetch
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            FetchPhase::Failed(message) => Some(message),
            _ => None,
        }
    }
}
