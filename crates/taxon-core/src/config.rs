//! Project configuration loaded from `taxon.toml`.
//!
//! Every field has a default, so a missing file or a partial file is fine.
//! Command-line flags override whatever is loaded here.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::graph::depth::{DEFAULT_PROGRESS_INTERVAL, DepthStrategy};
use crate::graph::edges::DEFAULT_HIDDEN_MARKER;
use crate::hierarchy::{BuildOptions, DEFAULT_ROOT};

/// File name looked up in the project root.
pub const CONFIG_FILE: &str = "taxon.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonConfig {
    #[serde(default)]
    pub hierarchy: HierarchyConfig,
    #[serde(default)]
    pub depth: DepthConfig,
    #[serde(default)]
    pub paths: PathsConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyConfig {
    #[serde(default = "default_root")]
    pub root: String,
    #[serde(default = "default_hidden_marker")]
    pub hidden_marker: String,
    #[serde(default = "default_true")]
    pub filter_hidden: bool,
    #[serde(default)]
    pub top_levels: Vec<String>,
}

impl Default for HierarchyConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            hidden_marker: default_hidden_marker(),
            filter_hidden: default_true(),
            top_levels: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepthConfig {
    #[serde(default)]
    pub strategy: DepthStrategy,
    #[serde(default = "default_progress_interval")]
    pub progress_interval: usize,
}

impl Default for DepthConfig {
    fn default() -> Self {
        Self {
            strategy: DepthStrategy::default(),
            progress_interval: default_progress_interval(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "default_edges_path")]
    pub edges: PathBuf,
    /// Optional extra hidden-category list; empty means none.
    #[serde(default)]
    pub hidden: Option<PathBuf>,
    #[serde(default = "default_dag_path")]
    pub dag: PathBuf,
    #[serde(default = "default_depths_path")]
    pub depths: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            edges: default_edges_path(),
            hidden: None,
            dag: default_dag_path(),
            depths: default_depths_path(),
        }
    }
}

impl TaxonConfig {
    /// Build options for this configuration, with no extra hidden list.
    #[must_use]
    pub fn build_options(&self) -> BuildOptions {
        BuildOptions {
            root: self.hierarchy.root.clone(),
            hidden_marker: self
                .hierarchy
                .filter_hidden
                .then(|| self.hierarchy.hidden_marker.clone()),
            extra_hidden: Vec::new(),
            top_levels: self.hierarchy.top_levels.clone(),
            strategy: self.depth.strategy,
            progress_interval: self.depth.progress_interval,
        }
    }

    /// Resolve relative paths against `base`.
    #[must_use]
    pub fn resolve_paths(mut self, base: &Path) -> Self {
        let join = |p: &Path| if p.is_absolute() { p.to_path_buf() } else { base.join(p) };
        self.paths.edges = join(&self.paths.edges);
        self.paths.hidden = self
            .paths
            .hidden
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
            .map(join);
        self.paths.dag = join(&self.paths.dag);
        self.paths.depths = join(&self.paths.depths);
        self
    }
}

/// Load `taxon.toml` from `project_root`, or defaults if it does not exist.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_config(project_root: &Path) -> Result<TaxonConfig> {
    let path = project_root.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(TaxonConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<TaxonConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

const fn default_true() -> bool {
    true
}

fn default_root() -> String {
    DEFAULT_ROOT.to_string()
}

fn default_hidden_marker() -> String {
    DEFAULT_HIDDEN_MARKER.to_string()
}

const fn default_progress_interval() -> usize {
    DEFAULT_PROGRESS_INTERVAL
}

fn default_edges_path() -> PathBuf {
    PathBuf::from("datasets/raw/enwiki-categories.tsv")
}

fn default_dag_path() -> PathBuf {
    PathBuf::from("datasets/generated/valid_category_links.tsv")
}

fn default_depths_path() -> PathBuf {
    PathBuf::from("datasets/generated/category_depths.tsv")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = load_config(dir.path()).expect("load");
        assert_eq!(config, TaxonConfig::default());
        assert_eq!(config.hierarchy.root, "Main_topic_classifications");
        assert_eq!(config.depth.strategy, DepthStrategy::Frontier);
        assert_eq!(config.depth.progress_interval, 100_000);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "[hierarchy]\nroot = \"Contents\"\n\n[depth]\nstrategy = \"relaxation\"\n",
        )
        .expect("write");
        let config = load_config(dir.path()).expect("load");
        assert_eq!(config.hierarchy.root, "Contents");
        assert!(config.hierarchy.filter_hidden);
        assert_eq!(config.depth.strategy, DepthStrategy::Relaxation);
        assert_eq!(config.paths, PathsConfig::default());
    }

    #[test]
    fn invalid_file_names_the_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join(CONFIG_FILE), "[depth]\nstrategy = \"dfs\"\n")
            .expect("write");
        let err = load_config(dir.path()).expect_err("invalid strategy");
        assert!(format!("{err:#}").contains("taxon.toml"));
    }

    #[test]
    fn build_options_follow_hidden_toggle() {
        let mut config = TaxonConfig::default();
        assert_eq!(
            config.build_options().hidden_marker.as_deref(),
            Some("Hidden_categories")
        );
        config.hierarchy.filter_hidden = false;
        assert_eq!(config.build_options().hidden_marker, None);
    }

    #[test]
    fn relative_paths_resolve_against_base() {
        let mut config = TaxonConfig::default();
        config.paths.hidden = Some(PathBuf::new());
        let config = config.resolve_paths(Path::new("/data"));
        assert_eq!(
            config.paths.dag,
            PathBuf::from("/data/datasets/generated/valid_category_links.tsv")
        );
        assert_eq!(config.paths.hidden, None);
    }
}
