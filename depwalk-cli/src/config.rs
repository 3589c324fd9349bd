//! depwalk configuration loading from `depwalk.toml`.
//!
//! A configuration describes one complete walk: which files become which
//! vertices, how dependencies are read out of them, how conflicts are
//! handled and where the resulting graph goes. Relative paths are
//! interpreted against the directory containing the configuration file.
//!
//! # Example Configuration
//!
//! ```toml
//! [walk]
//! include_hidden = false
//! threads = 4
//!
//! # Every file below a component directory belongs to that component.
//! [[index]]
//! root = "include"
//! patterns = ["boost/*/**/*.hpp"]
//! naming = { strategy = "segment", index = 1 }
//!
//! # Top-level headers belong to the component of the same name, if any.
//! [[index]]
//! root = "include"
//! patterns = ["boost/*.hpp"]
//! naming = { strategy = "stem-if-dir", fallback = "utility" }
//!
//! [[parse]]
//! root = "include"
//! patterns = ["boost/**/*.hpp"]
//! pattern = '#\s*include\s*[<"]([^>"]+)'
//! search_roots = ["include"]
//!
//! [policy]
//! allow_cycles = false
//! register_unknown = false
//!
//! [export]
//! format = "dot"
//! reduce = true
//! output = "boost.dot"
//!
//! [export.dot]
//! graph_name = "boost"
//! graph_attributes = ["rankdir=LR"]
//! ```

use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use depwalk_core::exporter::DotTemplate;
use depwalk_core::WalkOptions;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default configuration file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "depwalk.toml";

/// Root configuration structure loaded from `depwalk.toml`.
#[derive(Debug, Deserialize, Default)]
pub struct DepwalkConfig {
    /// Directory traversal options shared by all rules.
    #[serde(default)]
    pub walk: WalkOptions,

    /// Indexing rules, applied in order. Earlier rules win for files
    /// matched by more than one rule.
    #[serde(default)]
    pub index: Vec<IndexRule>,

    /// Parsing rules, applied in order after all indexing rules.
    #[serde(default)]
    pub parse: Vec<ParseRule>,

    /// Conflict handling.
    #[serde(default)]
    pub policy: PolicyConfig,

    /// Output settings for `depwalk build`.
    #[serde(default)]
    pub export: ExportConfig,
}

/// Maps files under `root` matching `patterns` to vertices.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct IndexRule {
    #[serde(default = "default_root")]
    pub root: PathBuf,

    pub patterns: Vec<String>,

    #[serde(default)]
    pub naming: Naming,
}

/// How an indexed file's root-relative path becomes a vertex name.
///
/// Every strategy may decline a file, which leaves it out of the graph.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(tag = "strategy", rename_all = "kebab-case")]
pub enum Naming {
    /// File name without extension: `boost/any.hpp` is `any`.
    #[default]
    Stem,

    /// The path segment at `index`: with `index = 1`,
    /// `boost/mpl/vector.hpp` is `mpl`.
    Segment { index: usize },

    /// Every matched file belongs to one vertex.
    Fixed { name: String },

    /// First capture group of `pattern` (or the whole match) against the
    /// relative path. Files that do not match are declined.
    Regex { pattern: String },

    /// The file stem when a directory of that name sits next to the file,
    /// otherwise `fallback`.
    StemIfDir { fallback: String },
}

/// Reads dependencies out of indexed files under `root` matching `patterns`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ParseRule {
    #[serde(default = "default_root")]
    pub root: PathBuf,

    pub patterns: Vec<String>,

    /// Line regex; capture group 1 (or the whole match) is the reference.
    pub pattern: String,

    /// Directories references are resolved against, in order. When empty,
    /// references are taken as vertex names.
    #[serde(default)]
    pub search_roots: Vec<PathBuf>,

    /// Drop the extension of references used directly as vertex names.
    #[serde(default)]
    pub strip_extension: bool,
}

/// Conflict handling for edges that cannot be inserted as-is.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct PolicyConfig {
    /// Record edges that close a cycle instead of rejecting them.
    ///
    /// A cyclic graph cannot be reduced; `depwalk build` then exports it
    /// unreduced and lists the cycles.
    #[serde(default)]
    pub allow_cycles: bool,

    /// Create vertices for dependencies on files that were never indexed.
    #[serde(default)]
    pub register_unknown: bool,
}

/// Graph output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Graphviz DOT
    #[default]
    Dot,
    /// JSON snapshot of vertices and edges
    Json,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ExportConfig {
    #[serde(default)]
    pub format: ExportFormat,

    /// Apply transitive reduction before export.
    ///
    /// Default: `true`
    #[serde(default = "default_reduce")]
    pub reduce: bool,

    /// Output file. Default: stdout.
    #[serde(default)]
    pub output: Option<PathBuf>,

    /// Pretty-print JSON output.
    #[serde(default)]
    pub pretty: bool,

    /// DOT layout settings.
    #[serde(default)]
    pub dot: DotTemplate,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            format: ExportFormat::default(),
            reduce: true,
            output: None,
            pretty: false,
            dot: DotTemplate::default(),
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_reduce() -> bool {
    true
}

impl DepwalkConfig {
    /// Load and validate a configuration file.
    ///
    /// Unlike optional project settings, a walk cannot run without its
    /// rules, so a missing or malformed file is an error.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check rules for mistakes serde cannot catch.
    pub fn validate(&self) -> Result<()> {
        if self.index.is_empty() {
            bail!("Configuration defines no [[index]] rules");
        }
        for (i, rule) in self.index.iter().enumerate() {
            if rule.patterns.is_empty() {
                bail!("[[index]] rule {} has no patterns", i + 1);
            }
            if let Naming::Regex { pattern } = &rule.naming {
                regex::Regex::new(pattern)
                    .with_context(|| format!("[[index]] rule {} has an invalid naming regex", i + 1))?;
            }
        }
        for (i, rule) in self.parse.iter().enumerate() {
            if rule.patterns.is_empty() {
                bail!("[[parse]] rule {} has no patterns", i + 1);
            }
            regex::Regex::new(&rule.pattern)
                .with_context(|| format!("[[parse]] rule {} has an invalid line regex", i + 1))?;
        }
        Ok(())
    }
}

/// Directory that relative paths in the config file at `path` refer to.
pub fn base_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Interpret `path` relative to `base`, leaving absolute paths alone.
pub fn resolve_against(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() || base == Path::new(".") {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> DepwalkConfig {
        toml::from_str(content).unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = DepwalkConfig::default();
        assert!(config.index.is_empty());
        assert!(!config.policy.allow_cycles);
        assert!(config.export.reduce);
        assert_eq!(config.export.format, ExportFormat::Dot);
        assert_eq!(config.walk, WalkOptions::default());
    }

    #[test]
    fn test_parse_full_config() {
        let config = parse(
            r#"
[walk]
include_hidden = true
threads = 2

[[index]]
root = "include"
patterns = ["boost/*/**/*.hpp"]
naming = { strategy = "segment", index = 1 }

[[index]]
root = "include"
patterns = ["boost/*.hpp"]
naming = { strategy = "stem-if-dir", fallback = "utility" }

[[parse]]
root = "include"
patterns = ["boost/**/*.hpp"]
pattern = '#\s*include\s*[<"]([^>"]+)'
search_roots = ["include"]

[policy]
allow_cycles = true

[export]
format = "json"
reduce = false
output = "out.json"

[export.dot]
graph_name = "boost"
"#,
        );

        assert!(config.walk.include_hidden);
        assert_eq!(config.walk.threads, Some(2));
        assert_eq!(config.index.len(), 2);
        assert_eq!(config.index[0].naming, Naming::Segment { index: 1 });
        assert_eq!(
            config.index[1].naming,
            Naming::StemIfDir {
                fallback: "utility".to_string()
            }
        );
        assert_eq!(config.parse[0].search_roots, vec![PathBuf::from("include")]);
        assert!(!config.parse[0].strip_extension);
        assert!(config.policy.allow_cycles);
        assert!(!config.policy.register_unknown);
        assert_eq!(config.export.format, ExportFormat::Json);
        assert!(!config.export.reduce);
        assert_eq!(config.export.output, Some(PathBuf::from("out.json")));
        assert_eq!(config.export.dot.graph_name, "boost");
        assert_eq!(config.export.dot.edge_format, "{from} -> {to};");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_naming_defaults_to_stem() {
        let config = parse(
            r#"
[[index]]
patterns = ["*.txt"]
"#,
        );
        assert_eq!(config.index[0].naming, Naming::Stem);
        assert_eq!(config.index[0].root, PathBuf::from("."));
    }

    #[test]
    fn test_unknown_strategy_rejected() {
        let result: std::result::Result<DepwalkConfig, _> = toml::from_str(
            r#"
[[index]]
patterns = ["*.txt"]
naming = { strategy = "guess" }
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_requires_index_rules() {
        let config = parse("[policy]\nallow_cycles = true\n");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_regex() {
        let config = parse(
            r#"
[[index]]
patterns = ["*.txt"]

[[parse]]
patterns = ["*.txt"]
pattern = "(unclosed"
"#,
        );
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("[[parse]] rule 1"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = DepwalkConfig::load(Path::new("/nonexistent/depwalk.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_base_dir_and_resolution() {
        assert_eq!(base_dir(Path::new("depwalk.toml")), PathBuf::from("."));
        assert_eq!(base_dir(Path::new("proj/depwalk.toml")), PathBuf::from("proj"));
        assert_eq!(
            resolve_against(Path::new("proj"), Path::new("include")),
            PathBuf::from("proj/include")
        );
        assert_eq!(
            resolve_against(Path::new("."), Path::new("include")),
            PathBuf::from("include")
        );
        assert_eq!(
            resolve_against(Path::new("proj"), Path::new("/abs")),
            PathBuf::from("/abs")
        );
    }
}
