//! Command implementations for the depwalk CLI.
//!
//! Each command module provides a `run` function that executes the command logic.

pub mod build;
pub mod files;
pub mod path;

use anyhow::{Context, Result};
use colored::Colorize;
use depwalk_core::walker::policy;
use depwalk_core::{IndexSummary, LineExtractor, ParseSummary, Walker};
use std::path::Path;
use tracing::info;

use crate::config::{resolve_against, DepwalkConfig};
use crate::naming::Namer;

/// A finished walk and what each rule contributed.
pub struct WalkReport {
    pub walker: Walker,
    pub index: Vec<IndexSummary>,
    pub parse: Vec<ParseSummary>,
}

/// Run every index rule, then every parse rule, of `config`.
///
/// Relative roots are resolved against `base`, the directory of the config
/// file.
pub fn run_walk(config: &DepwalkConfig, base: &Path) -> Result<WalkReport> {
    let mut walker = Walker::new().with_options(config.walk.clone());
    if config.policy.allow_cycles {
        walker.on_cycle(policy::allow_cycle);
    }
    if config.policy.register_unknown {
        walker.on_unknown_vertex(policy::register_unknown);
    }

    let mut index = Vec::with_capacity(config.index.len());
    for (i, rule) in config.index.iter().enumerate() {
        let root = resolve_against(base, &rule.root);
        let namer = Namer::new(&rule.naming, &root)?;
        let summary = walker
            .index(&root, &rule.patterns, |path| namer.name(path))
            .with_context(|| format!("[[index]] rule {} failed", i + 1))?;
        info!(
            "Index rule {}: {} files into {} new vertices",
            i + 1,
            summary.indexed,
            summary.new_vertices
        );
        index.push(summary);
    }

    let mut parse = Vec::with_capacity(config.parse.len());
    for (i, rule) in config.parse.iter().enumerate() {
        let root = resolve_against(base, &rule.root);
        let search_roots: Vec<String> = rule
            .search_roots
            .iter()
            .map(|r| resolve_against(base, r).to_string_lossy().into_owned())
            .collect();
        let extractor = LineExtractor::new(&rule.pattern)
            .with_context(|| format!("[[parse]] rule {} has an invalid line regex", i + 1))?
            .with_search_roots(search_roots)
            .strip_extension(rule.strip_extension);

        let summary = walker
            .parse(&root, &rule.patterns, |file, reader| extractor.extract(file, reader))
            .with_context(|| format!("[[parse]] rule {} failed", i + 1))?;
        info!(
            "Parse rule {}: {} files, {} edges added",
            i + 1,
            summary.files_parsed,
            summary.edges.added
        );
        parse.push(summary);
    }

    Ok(WalkReport {
        walker,
        index,
        parse,
    })
}

/// Print a human-readable account of the walk to stderr.
pub fn print_summary(report: &WalkReport) {
    let indexed: usize = report.index.iter().map(|s| s.indexed).sum();
    let excluded: usize = report.index.iter().map(|s| s.excluded).sum();
    let index_ms: f64 = report.index.iter().map(|s| s.duration_ms).sum();
    let graph = report.walker.graph();

    eprintln!(
        "  {} {} files into {} vertices ({} excluded) in {:.1}ms",
        "Indexed".green().bold(),
        indexed,
        graph.vertex_count(),
        excluded,
        index_ms
    );

    if report.parse.is_empty() {
        return;
    }

    let files: usize = report.parse.iter().map(|s| s.files_parsed).sum();
    let failed: usize = report.parse.iter().map(|s| s.failed_files).sum();
    let added: usize = report.parse.iter().map(|s| s.edges.added).sum();
    let cycles: usize = report.parse.iter().map(|s| s.edges.cycles).sum();
    let unknown: usize = report.parse.iter().map(|s| s.edges.unknown_targets).sum();
    let parse_ms: f64 = report.parse.iter().map(|s| s.duration_ms).sum();

    eprintln!(
        "  {} {} files, {} edges added in {:.1}ms",
        "Parsed".green().bold(),
        files,
        added,
        parse_ms
    );
    if cycles > 0 || unknown > 0 {
        eprintln!(
            "  {} {} cyclic, {} unknown targets",
            "Conflicts".yellow().bold(),
            cycles,
            unknown
        );
    }
    if failed > 0 {
        eprintln!("  {} {} files could not be read", "Failed".red().bold(), failed);
    }
}
