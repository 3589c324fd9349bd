//! Build command - walk the corpus and export the dependency graph.

use anyhow::{Context, Result};
use colored::Colorize;
use depwalk_core::{exporter, DependencyGraph};
use std::path::{Path, PathBuf};
use tracing::warn;

use super::{print_summary, run_walk};
use crate::config::{resolve_against, DepwalkConfig, ExportFormat};

/// Options given on the command line, overriding `[export]`.
#[derive(Debug, Default)]
pub struct BuildArgs {
    pub format: Option<ExportFormat>,
    pub output: Option<PathBuf>,
    pub no_reduce: bool,
    pub quiet: bool,
}

pub fn run(config: &DepwalkConfig, base: &Path, args: BuildArgs) -> Result<()> {
    let report = run_walk(config, base)?;
    if !args.quiet {
        print_summary(&report);
    }

    let graph = report.walker.into_graph();
    let reduce = config.export.reduce && !args.no_reduce;
    let graph = if reduce { reduce_or_keep(graph) } else { graph };

    let format = args.format.unwrap_or(config.export.format);
    let rendered = render(&graph, format, config)?;

    // A path given on the command line is relative to the working directory;
    // one from the config file is relative to the config file.
    let output = args
        .output
        .or_else(|| config.export.output.as_ref().map(|p| resolve_against(base, p)));

    match output {
        Some(path) => {
            std::fs::write(&path, rendered)
                .with_context(|| format!("Failed to write graph to {}", path.display()))?;
            if !args.quiet {
                eprintln!(
                    "  {} {} vertices, {} edges to {}",
                    "Wrote".green().bold(),
                    graph.vertex_count(),
                    graph.edge_count(),
                    path.display()
                );
            }
        }
        None => print!("{}", rendered),
    }

    Ok(())
}

/// Reduce `graph`, or keep it whole if it has cycles.
fn reduce_or_keep(graph: DependencyGraph) -> DependencyGraph {
    match graph.transitive_reduction() {
        Ok(reduced) => reduced,
        Err(e) => {
            warn!("{}; exporting the graph unreduced", e);
            for cycle in graph.cycles() {
                warn!("Cycle: {}", cycle.join(" <-> "));
            }
            graph
        }
    }
}

fn render(graph: &DependencyGraph, format: ExportFormat, config: &DepwalkConfig) -> Result<String> {
    match format {
        ExportFormat::Dot => Ok(exporter::dot::export(graph, &config.export.dot)),
        ExportFormat::Json => {
            let mut json = exporter::json::export(graph, config.export.pretty)
                .context("Failed to serialize graph")?;
            json.push('\n');
            Ok(json)
        }
    }
}
