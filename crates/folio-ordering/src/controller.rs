//! Section ordering controller: drives the reorder state machine.
//!
//! Transitions:
//!
//! ```text
//! Idle ──request_move──▶ Reordering ──settle(Ok)──▶ Idle (optimistic order confirmed)
//!                                   └─settle(Err)─▶ Idle (confirmed order restored)
//! ```
//!
//! Moves while Reordering are no-ops until the in-flight request settles.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use folio_core::{PageId, SectionId};

/// Generic message used when a rejection carries no field messages.
pub const DEFAULT_REORDER_ERROR: &str = "Unable to update the section order.";

/// Current phase of the ordering controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderingPhase {
    /// No request in flight.
    Idle,
    /// A full-order submission is in flight.
    Reordering,
}

/// A user-initiated move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveIntent {
    /// Drag the section at index `from` to index `to`.
    Drag { from: usize, to: usize },
    /// Move a section one step towards the top.
    StepUp(SectionId),
    /// Move a section one step towards the bottom.
    StepDown(SectionId),
    /// Replace the order wholesale; must be a permutation of the current one.
    Arrange(Vec<SectionId>),
}

/// Full-order submission for the reorder endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReorderRequest {
    pub page_id: PageId,
    pub sections: Vec<SectionId>,
}

/// Server rejection: field → error messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReorderRejection {
    pub errors: BTreeMap<String, Vec<String>>,
}

impl ReorderRejection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, field: &str, message: &str) -> Self {
        self.errors
            .entry(field.to_string())
            .or_default()
            .push(message.to_string());
        self
    }

    /// User-facing message: the first `sections` message, else the first
    /// message of any field, else a generic one.
    pub fn message(&self) -> String {
        self.errors
            .get("sections")
            .and_then(|messages| messages.first())
            .or_else(|| self.errors.values().flatten().next())
            .cloned()
            .unwrap_or_else(|| DEFAULT_REORDER_ERROR.to_string())
    }
}

impl fmt::Display for ReorderRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for ReorderRejection {}

/// Working copy of a page's section order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionOrdering {
    page_id: PageId,
    /// Last order the server accepted.
    confirmed: Vec<SectionId>,
    /// Order currently shown (optimistic while Reordering).
    displayed: Vec<SectionId>,
    phase: OrderingPhase,
    error: Option<String>,
}

impl SectionOrdering {
    /// Start Idle with `confirmed` as both the confirmed and displayed order.
    pub fn new(page_id: PageId, confirmed: Vec<SectionId>) -> Self {
        Self {
            page_id,
            displayed: confirmed.clone(),
            confirmed,
            phase: OrderingPhase::Idle,
            error: None,
        }
    }

    pub fn page_id(&self) -> PageId {
        self.page_id
    }

    pub fn phase(&self) -> OrderingPhase {
        self.phase
    }

    pub fn is_locked(&self) -> bool {
        self.phase == OrderingPhase::Reordering
    }

    pub fn displayed(&self) -> &[SectionId] {
        &self.displayed
    }

    pub fn confirmed(&self) -> &[SectionId] {
        &self.confirmed
    }

    /// Message from the last rejected submission.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Apply a move optimistically and return the request to submit.
    ///
    /// Returns `None` (state untouched) while Reordering, or when the move is
    /// invalid or leaves the order unchanged.
    pub fn request_move(&mut self, intent: MoveIntent) -> Option<ReorderRequest> {
        if self.is_locked() {
            debug!(page_id = self.page_id, ?intent, "reorder in flight, ignoring move");
            return None;
        }

        let Some(next) = apply_move(&self.displayed, &intent) else {
            debug!(page_id = self.page_id, ?intent, "move rejected or no-op");
            return None;
        };
        if next == self.displayed {
            return None;
        }

        self.displayed = next;
        self.phase = OrderingPhase::Reordering;
        self.error = None;
        debug!(page_id = self.page_id, order = ?self.displayed, "submitting optimistic order");

        Some(ReorderRequest {
            page_id: self.page_id,
            sections: self.displayed.clone(),
        })
    }

    /// Reconcile the in-flight request's outcome and return to Idle.
    pub fn settle(&mut self, outcome: Result<(), ReorderRejection>) {
        if !self.is_locked() {
            warn!(page_id = self.page_id, "settle called with no reorder in flight");
            return;
        }

        match outcome {
            Ok(()) => {
                self.confirmed = self.displayed.clone();
                info!(page_id = self.page_id, order = ?self.confirmed, "section order confirmed");
            }
            Err(rejection) => {
                let message = rejection.message();
                warn!(page_id = self.page_id, error = %message, "reorder rejected, rolling back");
                self.displayed = self.confirmed.clone();
                self.error = Some(message);
            }
        }
        self.phase = OrderingPhase::Idle;
    }

    /// Adopt a fresh server order. Ignored while a request is in flight.
    pub fn sync_confirmed(&mut self, confirmed: Vec<SectionId>) {
        if self.is_locked() {
            debug!(page_id = self.page_id, "reorder in flight, ignoring server sync");
            return;
        }
        self.displayed = confirmed.clone();
        self.confirmed = confirmed;
    }
}

/// Order after `intent`, or `None` if the move does not apply.
fn apply_move(order: &[SectionId], intent: &MoveIntent) -> Option<Vec<SectionId>> {
    let mut next = order.to_vec();
    match intent {
        MoveIntent::Drag { from, to } => {
            if *from >= next.len() || *to >= next.len() {
                return None;
            }
            let id = next.remove(*from);
            next.insert(*to, id);
        }
        MoveIntent::StepUp(id) => {
            let index = next.iter().position(|s| s == id)?;
            if index == 0 {
                return None;
            }
            next.swap(index, index - 1);
        }
        MoveIntent::StepDown(id) => {
            let index = next.iter().position(|s| s == id)?;
            if index + 1 >= next.len() {
                return None;
            }
            next.swap(index, index + 1);
        }
        MoveIntent::Arrange(ids) => {
            if !is_permutation(order, ids) {
                return None;
            }
            next = ids.clone();
        }
    }
    Some(next)
}

fn is_permutation(current: &[SectionId], candidate: &[SectionId]) -> bool {
    if current.len() != candidate.len() {
        return false;
    }
    let expected: HashSet<_> = current.iter().collect();
    let mut seen = HashSet::with_capacity(candidate.len());
    candidate.iter().all(|id| expected.contains(id) && seen.insert(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ordering() -> SectionOrdering {
        SectionOrdering::new(42, vec![1, 2, 3])
    }

    #[test]
    fn rejected_move_restores_confirmed_order() {
        let mut ordering = ordering();

        let request = ordering.request_move(MoveIntent::Arrange(vec![3, 1, 2])).unwrap();
        assert_eq!(request, ReorderRequest { page_id: 42, sections: vec![3, 1, 2] });
        assert_eq!(ordering.displayed(), &[3, 1, 2]);
        assert!(ordering.is_locked());

        ordering.settle(Err(ReorderRejection::new().field("sections", "Stale page.")));

        assert_eq!(ordering.displayed(), &[1, 2, 3]);
        assert_eq!(ordering.confirmed(), &[1, 2, 3]);
        assert_eq!(ordering.phase(), OrderingPhase::Idle);
        assert_eq!(ordering.error(), Some("Stale page."));
    }

    #[test]
    fn accepted_move_becomes_confirmed() {
        let mut ordering = ordering();
        ordering.request_move(MoveIntent::Drag { from: 0, to: 2 }).unwrap();
        ordering.settle(Ok(()));

        assert_eq!(ordering.confirmed(), &[2, 3, 1]);
        assert_eq!(ordering.displayed(), &[2, 3, 1]);
        assert!(!ordering.is_locked());
        assert!(ordering.error().is_none());
    }

    #[test]
    fn moves_while_reordering_are_ignored() {
        let mut ordering = ordering();
        ordering.request_move(MoveIntent::StepDown(1)).unwrap();
        let before = ordering.clone();

        assert!(ordering.request_move(MoveIntent::StepUp(3)).is_none());
        assert_eq!(ordering, before);
    }

    #[test]
    fn step_moves() {
        let mut ordering = ordering();
        let request = ordering.request_move(MoveIntent::StepUp(3)).unwrap();
        assert_eq!(request.sections, vec![1, 3, 2]);
        ordering.settle(Ok(()));

        let request = ordering.request_move(MoveIntent::StepDown(1)).unwrap();
        assert_eq!(request.sections, vec![3, 1, 2]);
    }

    #[test]
    fn edge_and_invalid_moves_do_nothing() {
        let mut ordering = ordering();
        assert!(ordering.request_move(MoveIntent::StepUp(1)).is_none());
        assert!(ordering.request_move(MoveIntent::StepDown(3)).is_none());
        assert!(ordering.request_move(MoveIntent::StepUp(99)).is_none());
        assert!(ordering.request_move(MoveIntent::Drag { from: 1, to: 1 }).is_none());
        assert!(ordering.request_move(MoveIntent::Drag { from: 0, to: 5 }).is_none());
        assert!(ordering.request_move(MoveIntent::Arrange(vec![1, 2])).is_none());
        assert!(ordering.request_move(MoveIntent::Arrange(vec![1, 1, 2])).is_none());
        assert!(ordering.request_move(MoveIntent::Arrange(vec![1, 2, 4])).is_none());
        assert!(ordering.request_move(MoveIntent::Arrange(vec![1, 2, 3])).is_none());
        assert_eq!(ordering.phase(), OrderingPhase::Idle);
    }

    #[test]
    fn new_move_clears_previous_error() {
        let mut ordering = ordering();
        ordering.request_move(MoveIntent::StepUp(2)).unwrap();
        ordering.settle(Err(ReorderRejection::new()));
        assert_eq!(ordering.error(), Some(DEFAULT_REORDER_ERROR));

        ordering.request_move(MoveIntent::StepUp(2)).unwrap();
        assert!(ordering.error().is_none());
    }

    #[test]
    fn settle_without_request_is_ignored() {
        let mut ordering = ordering();
        ordering.settle(Err(ReorderRejection::new()));
        assert!(ordering.error().is_none());
        assert_eq!(ordering.displayed(), &[1, 2, 3]);
    }

    #[test]
    fn sync_only_while_idle() {
        let mut ordering = ordering();
        ordering.sync_confirmed(vec![3, 2, 1]);
        assert_eq!(ordering.displayed(), &[3, 2, 1]);

        ordering.request_move(MoveIntent::StepUp(1)).unwrap();
        ordering.sync_confirmed(vec![9]);
        assert_eq!(ordering.confirmed(), &[3, 2, 1]);
    }

    #[test]
    fn rejection_message_precedence() {
        let rejection = ReorderRejection::new()
            .field("page", "Page is locked.")
            .field("sections", "Unknown section 9.");
        assert_eq!(rejection.message(), "Unknown section 9.");

        let rejection = ReorderRejection::new().field("page", "Page is locked.");
        assert_eq!(rejection.to_string(), "Page is locked.");
    }

    #[test]
    fn rejection_wire_shape() {
        let rejection: ReorderRejection =
            serde_json::from_str(r#"{"errors": {"sections": ["Bad order."]}}"#).unwrap();
        assert_eq!(rejection.message(), "Bad order.");
    }
}
