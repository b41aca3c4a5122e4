//! Project layout and optional chart settings.
//!
//! Settings come from an optional `charts.json` at the project root. Every
//! field has a default, so the file may be partial or absent.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Settings file looked up at the project root.
pub const CONFIG_FILE: &str = "charts.json";

/// Environment variable that pins the project root.
pub const ROOT_ENV: &str = "CHARTS_ROOT";

/// Directory whose presence marks the project root during discovery.
const ROOT_MARKER: &str = "exports";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Invalid settings in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Image size must be non-zero, got {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub exports_dir: PathBuf,
    pub charts_dir: PathBuf,
    pub nodes_file: String,
    pub runs_file: String,
    pub width: u32,
    pub height: u32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            exports_dir: PathBuf::from("exports"),
            charts_dir: PathBuf::from("charts"),
            nodes_file: "nodes_sample_export.csv".to_string(),
            runs_file: "runs_sample_export.csv".to_string(),
            width: 800,
            height: 600,
        }
    }
}

/// Absolute input and output locations for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectPaths {
    pub root: PathBuf,
    pub nodes_csv: PathBuf,
    pub runs_csv: PathBuf,
    pub charts_dir: PathBuf,
}

impl ChartConfig {
    /// Load `charts.json` from `root`, or defaults if it does not exist.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let path = root.join(CONFIG_FILE);
        if !path.is_file() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        let config: ChartConfig =
            serde_json::from_str(&raw).map_err(|source| ConfigError::Json { path, source })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidSize {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    pub fn image_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Resolve configured locations against the project root.
    pub fn paths(&self, root: &Path) -> ProjectPaths {
        let exports = root.join(&self.exports_dir);
        ProjectPaths {
            root: root.to_path_buf(),
            nodes_csv: exports.join(&self.nodes_file),
            runs_csv: exports.join(&self.runs_file),
            charts_dir: root.join(&self.charts_dir),
        }
    }
}

/// Nearest ancestor of `start` (inclusive) holding an `exports/` directory,
/// falling back to `start` itself.
pub fn discover_root(start: &Path) -> PathBuf {
    start
        .ancestors()
        .find(|dir| dir.join(ROOT_MARKER).is_dir())
        .unwrap_or(start)
        .to_path_buf()
}

/// Project root from `CHARTS_ROOT`, else discovered from the working directory.
pub fn resolve_root() -> Result<PathBuf, ConfigError> {
    if let Some(root) = std::env::var_os(ROOT_ENV) {
        return Ok(PathBuf::from(root));
    }

    let cwd = std::env::current_dir().map_err(|source| ConfigError::Io {
        path: PathBuf::from("."),
        source,
    })?;
    Ok(discover_root(&cwd))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_sample_exports() {
        let config = ChartConfig::default();
        let paths = config.paths(Path::new("/proj"));
        assert_eq!(
            paths.nodes_csv,
            PathBuf::from("/proj/exports/nodes_sample_export.csv")
        );
        assert_eq!(
            paths.runs_csv,
            PathBuf::from("/proj/exports/runs_sample_export.csv")
        );
        assert_eq!(paths.charts_dir, PathBuf::from("/proj/charts"));
    }

    #[test]
    fn absent_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(ChartConfig::load(dir.path()).unwrap(), ChartConfig::default());
    }

    #[test]
    fn partial_file_overrides_only_given_fields() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            r#"{ "charts_dir": "out", "width": 1024 }"#,
        )
        .unwrap();

        let config = ChartConfig::load(dir.path()).unwrap();
        assert_eq!(config.charts_dir, PathBuf::from("out"));
        assert_eq!(config.width, 1024);
        assert_eq!(config.height, 600);
        assert_eq!(config.runs_file, "runs_sample_export.csv");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "{ not json").unwrap();
        assert!(matches!(
            ChartConfig::load(dir.path()),
            Err(ConfigError::Json { .. })
        ));
    }

    #[test]
    fn zero_size_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), r#"{ "height": 0 }"#).unwrap();
        assert!(matches!(
            ChartConfig::load(dir.path()),
            Err(ConfigError::InvalidSize { width: 800, height: 0 })
        ));
    }

    #[test]
    fn root_is_nearest_ancestor_with_exports() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("exports")).unwrap();
        let nested = dir.path().join("scripts").join("deep");
        fs::create_dir_all(&nested).unwrap();

        assert_eq!(discover_root(&nested), dir.path());
        assert_eq!(discover_root(dir.path()), dir.path());
    }

    #[test]
    fn root_falls_back_to_start() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a");
        fs::create_dir(&nested).unwrap();
        // Only passes when no ancestor of the temp dir has an exports/ folder.
        if !dir.path().ancestors().any(|d| d.join("exports").is_dir()) {
            assert_eq!(discover_root(&nested), nested);
        }
    }
}
