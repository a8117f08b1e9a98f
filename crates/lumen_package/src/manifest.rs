//! `lumen.json` manifest parsing.

use crate::version::VersionRange;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

fn default_source_dirs() -> Vec<String> {
    vec!["src".to_string()]
}

fn default_language_version() -> String {
    "0.1.0".to_string()
}

/// The package's own `lumen.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub name: String,
    #[serde(default = "default_source_dirs")]
    pub source_directories: Vec<String>,
    /// Whether modules may declare themselves `NativeModule`s (backed by
    /// host code rather than lumen source).
    #[serde(default)]
    pub allow_native_modules: bool,
    #[serde(default)]
    pub dependencies: HashMap<String, VersionRange>,
    #[serde(default = "default_language_version")]
    pub language_version: String,
}

impl Manifest {
    pub fn new(name: impl Into<String>) -> Self {
        Manifest {
            name: name.into(),
            source_directories: default_source_dirs(),
            allow_native_modules: false,
            dependencies: HashMap::new(),
            language_version: default_language_version(),
        }
    }
}

/// Errors raised while loading or decoding a manifest.
#[derive(Debug)]
pub enum ManifestError {
    Io(std::path::PathBuf, String),
    Decode(std::path::PathBuf, String),
    /// No `lumen.json` was found anywhere on the walk up to the
    /// filesystem root.
    NotAPackage(std::path::PathBuf),
}

impl std::fmt::Display for ManifestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ManifestError::Io(path, e) => write!(f, "cannot read {}: {}", path.display(), e),
            ManifestError::Decode(path, e) => write!(f, "cannot decode {} as JSON: {}", path.display(), e),
            ManifestError::NotAPackage(path) => {
                write!(f, "no lumen.json found above {}", path.display())
            }
        }
    }
}

impl std::error::Error for ManifestError {}

pub const MANIFEST_FILE_NAME: &str = "lumen.json";

impl Manifest {
    /// Loads and decodes the manifest at exactly `dir/lumen.json`. Does
    /// not walk up the directory tree — see `loader::find_project_root`
    /// for that.
    pub fn load(dir: &Path) -> Result<Self, ManifestError> {
        let path = dir.join(MANIFEST_FILE_NAME);
        let text = fs::read_to_string(&path).map_err(|e| ManifestError::Io(path.clone(), e.to_string()))?;
        serde_json::from_str(&text).map_err(|e| ManifestError::Decode(path, e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
