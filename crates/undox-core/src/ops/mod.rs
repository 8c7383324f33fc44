//! Shared-state store and filesystem primitives used by commands

pub mod dir_ops;
pub mod store;

pub use store::{field_name, SharedState, StateHandle};
