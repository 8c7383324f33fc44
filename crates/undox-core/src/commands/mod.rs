//! Reversible commands
//!
//! A command owns its `RunContext` (for scoping) and a `StateHandle` (for its
//! working data) as plain fields, and knows how to perform and reverse its
//! effect. Commands are driven through `apply()`.

use std::fmt;

use crate::context::Scoped;
use crate::errors::Result;

pub mod make_dirs;

pub use make_dirs::MakeDirs;

/// A reversible operation bound to a run context
pub trait Command: Scoped + fmt::Debug {
    /// Stable kind name, used as the default shared-state field name
    fn kind(&self) -> &'static str;

    /// Shared-state field this instance keeps its working data under
    fn field(&self) -> &str;

    /// Perform the operation
    fn handle(&mut self) -> Result<()>;

    /// Reverse whatever `handle` recorded as done
    fn rollback(&mut self) -> Result<()>;
}

/// Which direction to drive a command in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Handle,
    Rollback,
}

impl Action {
    /// Operation name used in boundary log events
    pub fn op(&self) -> &'static str {
        match self {
            Action::Handle => "handle",
            Action::Rollback => "rollback",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_op_names() {
        assert_eq!(Action::Handle.op(), "handle");
        assert_eq!(Action::Rollback.op(), "rollback");
        assert_ne!(Action::Handle, Action::Rollback);
    }
}
