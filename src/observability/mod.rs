//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! routing, client, http, config
//!     → tracing events with structured fields
//!     → logging.rs subscriber (pretty or JSON to stdout)
//! ```
//!
//! # Design Decisions
//! - Delivery ID flows through every span of one delivery
//! - The router only emits debug/trace events; errors are logged at the
//!   delivery boundary, once

pub mod logging;

pub use logging::init_logging;
