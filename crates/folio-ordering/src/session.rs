//! Async driver pairing the ordering state machine with a reorder endpoint.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, warn};

use folio_core::SectionId;

use crate::controller::{MoveIntent, ReorderRejection, ReorderRequest, SectionOrdering};

/// Collaborator that persists a full section order.
pub trait ReorderClient: Send + Sync {
    fn reorder(
        &self,
        request: &ReorderRequest,
    ) -> impl Future<Output = Result<(), ReorderRejection>> + Send;
}

/// Result of one user move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The move was a no-op, invalid, or arrived while a request was in flight.
    Ignored,
    /// The server accepted the order.
    Confirmed(Vec<SectionId>),
    /// The server rejected the order and the confirmed order was restored.
    RolledBack { message: String },
}

/// Shares one [`SectionOrdering`] between concurrent callers.
///
/// The state lock is released while the request is in flight, so other
/// moves observe the Reordering phase and are ignored. Dropping a
/// `move_section` future mid-request rolls the order back.
pub struct OrderingSession<C> {
    state: Arc<Mutex<SectionOrdering>>,
    client: Arc<C>,
}

impl<C> Clone for OrderingSession<C> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            client: self.client.clone(),
        }
    }
}

impl<C: ReorderClient> OrderingSession<C> {
    pub fn new(ordering: SectionOrdering, client: Arc<C>) -> Self {
        Self {
            state: Arc::new(Mutex::new(ordering)),
            client,
        }
    }

    /// Apply a move, submit it, and reconcile the response.
    pub async fn move_section(&self, intent: MoveIntent) -> MoveOutcome {
        let request = {
            let mut state = self.state.lock().await;
            match state.request_move(intent) {
                Some(request) => request,
                None => return MoveOutcome::Ignored,
            }
        };

        let mut in_flight = InFlight {
            state: self.state.clone(),
            armed: true,
        };
        debug!(page_id = request.page_id, "awaiting reorder response");
        let result = self.client.reorder(&request).await;

        let mut state = self.state.lock().await;
        in_flight.armed = false;
        let outcome = match &result {
            Ok(()) => MoveOutcome::Confirmed(request.sections.clone()),
            Err(rejection) => MoveOutcome::RolledBack {
                message: rejection.message(),
            },
        };
        state.settle(result);
        outcome
    }

    /// Adopt fresh server data (ignored while a request is in flight).
    pub async fn sync_confirmed(&self, confirmed: Vec<SectionId>) {
        self.state.lock().await.sync_confirmed(confirmed);
    }

    /// Copy of the current state.
    pub async fn snapshot(&self) -> SectionOrdering {
        self.state.lock().await.clone()
    }
}

/// Settles an abandoned request as a generic rejection, so the machine
/// never stays in Reordering once its caller is gone.
struct InFlight {
    state: Arc<Mutex<SectionOrdering>>,
    armed: bool,
}

impl Drop for InFlight {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        warn!("reorder request abandoned, restoring confirmed order");
        match self.state.try_lock() {
            Ok(mut state) => state.settle(Err(ReorderRejection::new())),
            Err(_) => {
                // Lock is held elsewhere; settle once it is released.
                let state = self.state.clone();
                if let Ok(handle) = tokio::runtime::Handle::try_current() {
                    handle.spawn(async move {
                        state.lock().await.settle(Err(ReorderRejection::new()));
                    });
                }
            }
        }
    }
}
