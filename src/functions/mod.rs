//! Declarative function metadata.
//!
//! # Data Flow
//! ```text
//! FunctionDefinition (builder, static data)
//!     → validate() (semantic checks, all errors)
//!     → manifest() (JSON for the platform at deploy time)
//!     → ViewRouter::for_function (owning callback_id)
//! ```

pub mod builtin;
pub mod definition;

pub use definition::{
    manifest, DefinitionError, FunctionDefinition, ParameterSchema, ParameterSet, ParameterType,
};
