//! `quill clean` — purge build outputs and local build state.

use crate::pipeline::{configure_task, resolve_project_root};
use crate::GlobalArgs;

/// Runs the `quill clean` command.
///
/// Removes the project's declared outputs and all transient local state,
/// guaranteeing the next build starts from a clean slate. Returns exit
/// code 0 on success.
pub fn run(global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project_dir = resolve_project_root(global)?;
    let config = quill_config::load_config(&project_dir)?;

    let task = configure_task(&config, &project_dir, Vec::new(), false);
    task.clean_outputs_and_local_state()?;

    if !global.quiet {
        eprintln!("   Cleaned {}", config.project.name);
    }
    Ok(0)
}
