//! View interaction routing for platform functions.
//!
//! A function that opens modal views registers `view_submission` and
//! `view_closed` handlers on a [`ViewRouter`], keyed by the callback ID
//! given to each view. Inbound events are dispatched to the first matching
//! handler, which may call back into the platform through [`PlatformApi`]
//! and return a [`ResponseAction`].

pub mod actions;
pub mod client;
pub mod config;
pub mod events;
pub mod functions;
pub mod http;
pub mod observability;
pub mod routing;

pub use actions::ResponseAction;
pub use client::{ApiClient, PlatformApi};
pub use config::AppConfig;
pub use events::{EventCategory, ViewEvent};
pub use functions::FunctionDefinition;
pub use http::DeliveryServer;
pub use routing::{Constraint, DispatchOutcome, ViewContext, ViewHandler, ViewRouter};
