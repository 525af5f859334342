//! folio-ordering: optimistic section reordering.
//!
//! The editor shows sections in a locally reordered list before the server
//! confirms it. This crate models that as a framework-independent state
//! machine with two phases:
//!
//! - **Idle**: no request in flight; moves are accepted
//! - **Reordering**: one full-order submission in flight; moves are ignored
//!
//! On success the optimistic order becomes the confirmed order; on failure
//! the last confirmed order is restored and an error message is surfaced.
//!
//! # Components
//!
//! - **`controller`**: the pure state machine (`SectionOrdering`)
//! - **`session`**: async driver over a `ReorderClient` collaborator
//!
//! There is no version token on submissions: two editors reordering the
//! same page can overwrite each other's final order.

pub mod controller;
pub mod session;

pub use controller::{MoveIntent, OrderingPhase, ReorderRejection, ReorderRequest, SectionOrdering};
pub use session::{MoveOutcome, OrderingSession, ReorderClient};
