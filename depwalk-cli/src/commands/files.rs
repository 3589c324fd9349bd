//! Files command - list the indexed files behind a vertex.

use anyhow::{bail, Result};
use std::path::Path;

use super::run_walk;
use crate::config::DepwalkConfig;

/// Print the files indexed into `vertex`, one per line, in path order.
pub fn run(config: &DepwalkConfig, base: &Path, vertex: &str) -> Result<()> {
    let report = run_walk(config, base)?;
    let paths = report.walker.resolver().paths_for(vertex);
    if paths.is_empty() {
        bail!("No indexed files belong to vertex '{}'", vertex);
    }

    for path in paths {
        println!("{}", path);
    }
    Ok(())
}
