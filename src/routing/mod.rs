//! View event routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming ViewEvent (category, view.callback_id, payload)
//!     → router.rs (per-category registration list)
//!     → matcher.rs (evaluate constraint against callback_id)
//!     → handler.rs (invoke handler with ViewContext)
//!     → Return: Handled(response action) or NoMatch
//!
//! Router construction (at startup):
//!     ViewRouter::new(function callback_id)
//!     → .view_submission(constraint, handler) ...
//!     → .view_closed(constraint, handler) ...
//!     → Freeze in Arc as immutable table
//! ```
//!
//! # Design Decisions
//! - Routers built at startup, immutable at runtime
//! - Deterministic: same callback_id always reaches the same handler
//! - First match wins (ordered by registration)
//! - No "most specific wins" heuristic

pub mod handler;
pub mod matcher;
pub mod router;

pub use handler::{handler_fn, HandlerError, HandlerResult, ViewContext, ViewHandler};
pub use matcher::{Constraint, ConstraintError};
pub use router::{DispatchOutcome, Registration, ViewRouter};
