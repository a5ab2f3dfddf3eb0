//! Inbound interaction payloads.
//!
//! # Data Flow
//! ```text
//! platform JSON (view_submission / view_closed)
//!     → payload.rs (lenient serde model)
//!     → ViewEvent (callback_id required, everything else optional)
//!     → routing::router (callback_id matched against constraints)
//! ```
//!
//! # Design Decisions
//! - Only `view.callback_id` is required; the rest of the payload belongs
//!   to the platform and is carried through unchanged
//! - Unknown fields are kept in `extra` maps rather than dropped

pub mod payload;

pub use payload::{
    EventCategory, EventError, EventResult, FunctionData, Interactivity, View, ViewEvent,
};
