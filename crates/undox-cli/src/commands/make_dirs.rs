//! make-dirs command
//!
//! Usage: undox make-dirs <PATH>... [--uuid <ID>] [--rollback]

use clap::Args;
use std::path::PathBuf;
use undox_core::{apply, Action, ExError, MakeDirs, RunContext};

#[derive(Debug, Args)]
pub struct MakeDirsArgs {
    /// Directories to create, processed in order
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Identifier that namespaces this batch's bookkeeping
    #[arg(long)]
    pub uuid: Option<String>,

    /// Roll back (remove the directories created) after handling
    #[arg(long)]
    pub rollback: bool,
}

/// Execute make-dirs
pub fn execute(args: MakeDirsArgs) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = RunContext::new();
    let mut cmd = MakeDirs::new(&ctx, &args.paths, args.uuid.as_deref()).map_err(ExError::from)?;

    apply(&mut cmd, Action::Handle).map_err(ExError::from)?;
    let created = cmd.created_dirs().map_err(ExError::from)?;
    for path in &created {
        println!("✓ Created {}", path.display());
    }
    let skipped = args.paths.len() - created.len();
    if skipped > 0 {
        println!("{} path(s) already existed", skipped);
    }

    if args.rollback {
        apply(&mut cmd, Action::Rollback).map_err(ExError::from)?;
        for path in created.iter().rev() {
            println!("✓ Rolled back {}", path.display());
        }
    }

    tracing::debug!(run_id = %ctx.run_id(), "make-dirs finished");
    Ok(())
}
