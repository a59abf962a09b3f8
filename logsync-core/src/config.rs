//! Configuration parsing and management.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    ParseError(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Unsupported config format: {0:?}")]
    UnsupportedFormat(PathBuf),

    #[error("Invalid config: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

/// Main configuration struct matching the logsync.yml schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    pub paths: PathsConfig,

    #[serde(default)]
    pub mappings: Vec<Mapping>,

    // Internal: path to config file (for relative path resolution)
    #[serde(skip)]
    config_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Root of the Logseq repository working tree
    pub source: PathBuf,
    /// Root of the Hugo repository working tree
    pub destination: PathBuf,
}

/// One source page and where its converted form goes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mapping {
    /// Page path relative to the source root
    pub source: PathBuf,
    /// Output path relative to the destination root
    pub target: PathBuf,

    #[serde(default)]
    pub options: DocumentOptions,

    /// Caller-supplied front matter, emitted in insertion order
    #[serde(default)]
    pub frontmatter: IndexMap<String, serde_yaml::Value>,
}

/// Per-page switches for the transform chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentOptions {
    pub recursive: bool,
    pub recursion_target: Option<String>,
    pub recursion_depth: u32,
    pub recursion_skip_source: bool,
    pub remove_internal_links: bool,
    pub include_attachments: bool,
    pub remove_empty_trails: bool,
    pub unindent_first_level: bool,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self {
            recursive: false,
            recursion_target: None,
            recursion_depth: 1,
            recursion_skip_source: false,
            remove_internal_links: false,
            include_attachments: false,
            remove_empty_trails: false,
            unindent_first_level: false,
        }
    }
}

impl DocumentOptions {
    /// The recursion target, treating an empty string as unset
    pub fn recursion_target(&self) -> Option<&str> {
        self.recursion_target
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

/// Repository roots resolved once per run and shared by every page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRoots {
    pub source: PathBuf,
    pub destination: PathBuf,
}

impl ResolvedRoots {
    pub fn new(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
        }
    }

    /// Folder that holds page attachments in the source repository
    pub fn assets_dir(&self) -> PathBuf {
        self.source.join("assets")
    }

    /// Folder that receives copied attachments in the destination repository
    pub fn static_dir(&self) -> PathBuf {
        self.destination.join("static")
    }
}

impl SyncConfig {
    /// Load configuration from a YAML or JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        let mut config: SyncConfig = match extension.as_deref() {
            Some("yml") | Some("yaml") | None => serde_yaml::from_str(&contents)?,
            Some("json") => serde_json::from_str(&contents)?,
            Some(_) => return Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        };

        // Store config file path for relative path resolution
        config.config_path = Some(path.to_path_buf());

        tracing::debug!(
            path = %path.display(),
            mappings = config.mappings.len(),
            "loaded config"
        );

        Ok(config)
    }

    /// Source and destination roots, resolved relative to the config file
    pub fn resolved_roots(&self) -> ResolvedRoots {
        ResolvedRoots::new(
            self.resolve_path(&self.paths.source),
            self.resolve_path(&self.paths.destination),
        )
    }

    /// Find the mapping whose source matches `source`
    pub fn mapping_for(&self, source: &Path) -> Option<&Mapping> {
        self.mappings.iter().find(|m| m.source == source)
    }

    /// Check the config for problems, collecting every hint
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut hints = Vec::new();

        if self.paths.source.as_os_str().is_empty() {
            hints.push("paths.source is not set".to_string());
        }
        if self.paths.destination.as_os_str().is_empty() {
            hints.push("paths.destination is not set".to_string());
        }
        if self.mappings.is_empty() {
            hints.push("no mappings configured".to_string());
        }

        let mut seen = HashSet::new();
        for (i, mapping) in self.mappings.iter().enumerate() {
            if mapping.source.as_os_str().is_empty() {
                hints.push(format!("mappings[{i}]: source is empty"));
            } else if mapping.source.is_absolute() {
                hints.push(format!(
                    "mappings[{i}]: source {:?} must be relative to paths.source",
                    mapping.source
                ));
            } else if !seen.insert(&mapping.source) {
                hints.push(format!(
                    "mappings[{i}]: source {:?} is mapped more than once",
                    mapping.source
                ));
            }

            if mapping.target.as_os_str().is_empty() {
                hints.push(format!("mappings[{i}]: target is empty"));
            } else if mapping.target.is_absolute() {
                hints.push(format!(
                    "mappings[{i}]: target {:?} must be relative to paths.destination",
                    mapping.target
                ));
            }

            if mapping.options.recursive && mapping.options.recursion_target().is_none() {
                hints.push(format!(
                    "mappings[{i}]: recursive is set but recursion_target is missing"
                ));
            }
        }

        if hints.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(hints))
        }
    }

    /// Resolve a path relative to the config file location
    fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else if let Some(parent) = self.config_path.as_deref().and_then(Path::parent) {
            parent.join(path)
        } else {
            path.to_path_buf()
        }
    }
}
