//! Inbound delivery subsystem.
//!
//! # Data Flow
//! ```text
//! POST /functions/{function_id}/{view_submission|view_closed}
//!     → server.rs (body limit, trace layer, delivery span)
//!     → events (ViewEvent::from_value)
//!     → routing (ViewRouter::dispatch)
//!     → 200 + response action JSON | 200 empty | 4xx | 500
//! ```

pub mod server;

pub use server::{AppState, DeliveryServer, X_DELIVERY_ID};
