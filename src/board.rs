//! State shared between the status checks and whatever displays them.
//!
//! One check may be in flight at a time. Every check carries the generation
//! it was started under; a result that arrives after a newer check started,
//! or after the check was cancelled, is dropped.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{error, warn};

use crate::gemini::GenerationClient;
use crate::service::StatusService;
use crate::status::StatusResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckTicket {
    generation: u64,
}

#[cfg(test)]
impl CheckTicket {
    fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Default)]
pub struct StatusBoard {
    loading: bool,
    error: bool,
    last: Option<StatusResult>,
    generation: u64,
}

impl StatusBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Whether the last check should be shown as a connection error.
    pub fn has_error(&self) -> bool {
        self.error
    }

    pub fn last(&self) -> Option<&StatusResult> {
        self.last.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Start a check. Refused while another one is in flight.
    pub fn begin(&mut self) -> Option<CheckTicket> {
        if self.loading {
            return None;
        }
        self.generation += 1;
        self.loading = true;
        self.error = false;
        Some(CheckTicket {
            generation: self.generation,
        })
    }

    /// Apply a finished check. Returns false if the ticket is stale.
    pub fn complete(&mut self, ticket: CheckTicket, result: StatusResult) -> bool {
        if ticket.generation != self.generation {
            return false;
        }
        self.error = result.is_soft_failure();
        self.last = Some(result);
        self.loading = false;
        true
    }

    /// Record a check that ended without a result.
    pub fn fail(&mut self, ticket: CheckTicket) -> bool {
        if ticket.generation != self.generation {
            return false;
        }
        self.error = true;
        self.loading = false;
        true
    }

    /// Abandon the in-flight check; its result will be discarded.
    pub fn cancel(&mut self) -> bool {
        if !self.loading {
            return false;
        }
        self.generation += 1;
        self.loading = false;
        true
    }
}

pub type SharedBoard = Arc<Mutex<StatusBoard>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// The result was applied to the board.
    Applied(StatusResult),
    /// The check panicked; the board shows an error.
    Failed,
    /// Superseded or cancelled while running.
    Stale,
    /// Another check was already running.
    Refused,
}

/// Run one check on the blocking pool and apply its result to `board`.
pub async fn run_check<C>(board: &SharedBoard, service: Arc<StatusService<C>>) -> CheckOutcome
where
    C: GenerationClient + Send + Sync + 'static,
{
    let Some(ticket) = board.lock().await.begin() else {
        warn!("status check already in progress");
        return CheckOutcome::Refused;
    };

    let joined = tokio::task::spawn_blocking(move || service.check_status()).await;

    let mut board = board.lock().await;
    match joined {
        Ok(result) => {
            if board.complete(ticket, result.clone()) {
                CheckOutcome::Applied(result)
            } else {
                warn!("discarding result of superseded status check");
                CheckOutcome::Stale
            }
        }
        Err(e) => {
            error!(error = %e, "status check task failed");
            if board.fail(ticket) {
                CheckOutcome::Failed
            } else {
                CheckOutcome::Stale
            }
        }
    }
}
