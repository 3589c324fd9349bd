//! Compiled naming strategies.

use anyhow::{Context, Result};
use regex::Regex;
use std::path::{Path, PathBuf};

use crate::config::Naming;

/// A [`Naming`] strategy ready to run on the walker's worker threads.
#[derive(Debug)]
pub enum Namer {
    Stem,
    Segment(usize),
    Fixed(String),
    Regex(Regex),
    StemIfDir { root: PathBuf, fallback: String },
}

impl Namer {
    /// Compile `naming` for files indexed under `root`.
    pub fn new(naming: &Naming, root: &Path) -> Result<Self> {
        Ok(match naming {
            Naming::Stem => Namer::Stem,
            Naming::Segment { index } => Namer::Segment(*index),
            Naming::Fixed { name } => Namer::Fixed(name.clone()),
            Naming::Regex { pattern } => Namer::Regex(
                Regex::new(pattern).with_context(|| format!("Invalid naming regex '{}'", pattern))?,
            ),
            Naming::StemIfDir { fallback } => Namer::StemIfDir {
                root: root.to_path_buf(),
                fallback: fallback.clone(),
            },
        })
    }

    /// Vertex for a root-relative, `/`-separated path.
    pub fn name(&self, path: &str) -> Option<String> {
        match self {
            Namer::Stem => stem(path),
            Namer::Segment(index) => path.split('/').nth(*index).map(str::to_string),
            Namer::Fixed(name) => Some(name.clone()),
            Namer::Regex(re) => {
                let caps = re.captures(path)?;
                caps.get(1).or_else(|| caps.get(0)).map(|m| m.as_str().to_string())
            }
            Namer::StemIfDir { root, fallback } => {
                let stem = stem(path)?;
                let dir = match path.rsplit_once('/') {
                    Some((parent, _)) => root.join(parent).join(&stem),
                    None => root.join(&stem),
                };
                if dir.is_dir() {
                    Some(stem)
                } else {
                    Some(fallback.clone())
                }
            }
        }
    }
}

fn stem(path: &str) -> Option<String> {
    Path::new(path)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
}
