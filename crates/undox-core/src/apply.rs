//! Scoped command execution
//!
//! `apply()` is the entry point for driving a command: it enters the
//! command's scope, runs one action, and emits the boundary events.
//!
//! ## Contract
//!
//! - The run context is closed exactly once per call, before the end event,
//!   whether the action succeeds or fails
//! - Errors are returned as-is; nothing is retried or rolled back
//!   automatically
//!
//! ## Example
//!
//! ```
//! use undox_core::{apply, Action, MakeDirs, RunContext};
//!
//! let dir = std::env::temp_dir().join(format!("undox-doc-{}", std::process::id()));
//! let ctx = RunContext::new();
//! let mut cmd = MakeDirs::new(&ctx, [&dir], None).unwrap();
//!
//! apply(&mut cmd, Action::Handle).unwrap();
//! assert!(dir.is_dir());
//! apply(&mut cmd, Action::Rollback).unwrap();
//! assert!(!dir.exists());
//! assert_eq!(ctx.close_count(), 2);
//! ```

use std::time::Instant;

use crate::commands::{Action, Command};
use crate::errors::Result;
use crate::{log_op_end, log_op_error, log_op_start};

/// Run one action of `cmd` inside its scope
///
/// # Errors
///
/// Returns whatever the action returned; see `Command::handle` and
/// `Command::rollback`.
pub fn apply<C: Command + ?Sized>(cmd: &mut C, action: Action) -> Result<()> {
    let op = action.op();
    let kind = cmd.kind();
    let field = cmd.field().to_string();
    let started = Instant::now();

    log_op_start!(op, command_kind = kind, state_field = %field);

    let result = {
        let ctx = cmd.context().clone();
        let mut scope = ctx.enter(cmd);
        match action {
            Action::Handle => scope.handle(),
            Action::Rollback => scope.rollback(),
        }
    };

    let duration_ms = started.elapsed().as_millis() as u64;
    match &result {
        Ok(()) => {
            log_op_end!(op, duration_ms = duration_ms, state_field = %field);
        }
        Err(err) => {
            log_op_error!(op, err.clone(), duration_ms = duration_ms, state_field = %field);
        }
    }
    result
}
