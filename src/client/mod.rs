//! Outbound platform calls.
//!
//! # Data Flow
//! ```text
//! handler (ViewContext.client)
//!     → api.rs (PlatformApi trait object)
//!     → web.rs (reqwest POST {base_url}/{method}, bearer token)
//!     → types.rs (envelope → ApiResult)
//! ```
//!
//! # Design Decisions
//! - Handlers depend on the trait, never on the concrete client
//! - `ok: false` and non-2xx statuses are distinct error variants

pub mod api;
pub mod types;
pub mod web;

pub use api::PlatformApi;
pub use types::{ApiError, ApiResult};
pub use web::ApiClient;
