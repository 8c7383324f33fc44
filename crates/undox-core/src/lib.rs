//! undox core - reversible filesystem commands over shared run state
//!
//! This crate provides:
//! - A process-local shared-state store keyed by field name
//! - A run context whose close action is guaranteed by a scope guard
//! - The `Command` trait and the `MakeDirs` directory-create command
//! - `apply()`, which drives a command inside its scope with boundary logging
//! - The structured error and logging facilities

pub mod apply;
pub mod commands;
pub mod context;
pub mod errors;
pub mod logging_facility;
pub mod ops;

// Re-export commonly used types
pub use apply::apply;
pub use commands::{Action, Command, MakeDirs};
pub use context::{RunContext, Scope, Scoped};
pub use errors::{ExError, ExErrorKind, FsFailure, Result, UndoxError};
pub use ops::{field_name, SharedState, StateHandle};
