//! Path command - check whether one vertex depends on another.

use anyhow::{bail, Result};
use colored::Colorize;
use std::path::Path;

use super::run_walk;
use crate::config::DepwalkConfig;

/// Returns whether `from` reaches `to`.
pub fn run(config: &DepwalkConfig, base: &Path, from: &str, to: &str) -> Result<bool> {
    let report = run_walk(config, base)?;
    let graph = report.walker.graph();

    for vertex in [from, to] {
        if !graph.has_vertex(vertex) {
            bail!("Unknown vertex '{}'", vertex);
        }
    }

    let reachable = graph.has_path(from, to);
    if reachable {
        println!("{} {} {}", from.cyan(), "depends on".green(), to.cyan());
    } else {
        println!("{} {} {}", from.cyan(), "does not depend on".yellow(), to.cyan());
    }
    Ok(reachable)
}
