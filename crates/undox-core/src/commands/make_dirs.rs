//! Directory-create command
//!
//! Creates each target directory that does not exist yet, records the ones it
//! created in shared state, and on rollback removes exactly those, newest
//! first.
//!
//! The working list lives in shared state (key `created_dirs`) and every
//! append/pop is written through immediately, so it always reflects the
//! filesystem operations completed so far, including after a failure.

use std::fmt;
use std::path::{Path, PathBuf};

use serde_json::Value;
use undox_core_types::schema::{EVENT_COMMAND_CONSTRUCTED, EVENT_DIR_CREATED, EVENT_DIR_REMOVED};

use crate::commands::Command;
use crate::context::{RunContext, Scoped};
use crate::errors::Result;
use crate::ops::{dir_ops, field_name, StateHandle};

/// Shared-state key holding the working list
pub const CREATED_DIRS_KEY: &str = "created_dirs";

/// Creates directories and can remove exactly the ones it created
pub struct MakeDirs {
    ctx: RunContext,
    state: StateHandle,
    paths: Vec<PathBuf>,
    uuid: Option<String>,
}

impl MakeDirs {
    pub const KIND: &'static str = "MakeDirs";

    /// Build a command and register its shared-state field
    ///
    /// The field is `MakeDirs`, or `MakeDirs_{uuid}` when an identifier is
    /// given, so batches with different identifiers can share one run.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateField` if a command with the same field was already
    /// registered in this run.
    pub fn new<I, P>(ctx: &RunContext, paths: I, uuid: Option<&str>) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let state = ctx.state().register(field_name(Self::KIND, uuid))?;
        Self::bind(ctx, state, paths, uuid)
    }

    /// Build a command over an already registered field, recovering its
    /// working list
    ///
    /// # Errors
    ///
    /// Returns `FieldNotRegistered` if no command with this field ran in this
    /// run, or `UnexpectedValueType` if the stored list is malformed.
    pub fn resume<I, P>(ctx: &RunContext, paths: I, uuid: Option<&str>) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let state = ctx.state().attach(field_name(Self::KIND, uuid))?;
        Self::bind(ctx, state, paths, uuid)
    }

    fn bind<I, P>(
        ctx: &RunContext,
        state: StateHandle,
        paths: I,
        uuid: Option<&str>,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        state.get_or_set(CREATED_DIRS_KEY, Value::Array(Vec::new()))?;
        let cmd = Self {
            ctx: ctx.clone(),
            state,
            paths: paths.into_iter().map(Into::into).collect(),
            uuid: uuid.map(str::to_string),
        };
        // Reject a malformed recovered list up front.
        cmd.created_dirs()?;

        tracing::info!(
            component = module_path!(),
            event = EVENT_COMMAND_CONSTRUCTED,
            state_field = cmd.state.field(),
            command = ?cmd,
        );
        Ok(cmd)
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn uuid(&self) -> Option<&str> {
        self.uuid.as_deref()
    }

    /// Directories this command created and has not rolled back, oldest first
    ///
    /// # Errors
    ///
    /// Returns `UnexpectedValueType` if the stored list is malformed.
    pub fn created_dirs(&self) -> Result<Vec<PathBuf>> {
        Ok(self.state.get_as(CREATED_DIRS_KEY)?.unwrap_or_default())
    }

    fn record_created(&self, encoded: Value, path: &Path) -> Result<()> {
        self.state.push(CREATED_DIRS_KEY, encoded)?;
        tracing::info!(
            component = module_path!(),
            event = EVENT_DIR_CREATED,
            state_field = self.state.field(),
            path = %path.display(),
            "Created directory {}",
            path.display()
        );
        Ok(())
    }
}

impl Scoped for MakeDirs {
    fn context(&self) -> &RunContext {
        &self.ctx
    }
}

impl Command for MakeDirs {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn field(&self) -> &str {
        self.state.field()
    }

    fn handle(&mut self) -> Result<()> {
        for path in &self.paths {
            if dir_ops::exists(path) {
                tracing::debug!(path = %path.display(), "path exists, skipping");
                continue;
            }
            // Encode before touching the filesystem so a created directory is
            // always recorded.
            let encoded = serde_json::to_value(path)?;
            dir_ops::create_dir(path)?;
            self.record_created(encoded, path)?;
        }
        Ok(())
    }

    fn rollback(&mut self) -> Result<()> {
        while let Some(value) = self.state.pop(CREATED_DIRS_KEY)? {
            let path: PathBuf = serde_json::from_value(value)?;
            if !dir_ops::exists(&path) {
                tracing::debug!(path = %path.display(), "already gone, dropping from list");
                continue;
            }
            dir_ops::remove_dir(&path)?;
            tracing::info!(
                component = module_path!(),
                event = EVENT_DIR_REMOVED,
                state_field = self.state.field(),
                path = %path.display(),
                "Removed directory {}",
                path.display()
            );
        }
        Ok(())
    }
}

impl fmt::Debug for MakeDirs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MakeDirs")
            .field("paths", &self.paths)
            .field("uuid", &self.uuid)
            .field("field", &self.state.field())
            .field("created_dirs", &self.created_dirs().unwrap_or_default())
            .finish()
    }
}
