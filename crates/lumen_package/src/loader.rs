//! Project discovery and module-name-to-file-path resolution.
//!
//! [`Loader::discover`] walks upward from a starting path looking for
//! `lumen.json`, the way `cargo` and `largo` find their project root.
//! [`Loader::find_module`] turns a dotted module name like `Data.List`
//! into the `.lum` file that defines it, searching the package's own
//! source directories first and then, for names not found there, every
//! pinned dependency recorded in the exact-dependency cache.

use crate::manifest::{Manifest, ManifestError, MANIFEST_FILE_NAME};
use crate::version::Version;
use crate::{DEPS_CACHE_DIR, EXACT_DEPS_FILE_NAME, SOURCE_EXTENSION};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// `exact-dependencies.json`: every dependency pinned to one concrete
/// [`Version`]. Absent until a dependency has actually been installed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExactDependencies {
    #[serde(flatten)]
    pub versions: HashMap<String, Version>,
}

impl ExactDependencies {
    pub fn load(cache_dir: &Path) -> Option<Self> {
        let path = cache_dir.join(EXACT_DEPS_FILE_NAME);
        let text = fs::read_to_string(path).ok()?;
        serde_json::from_str(&text).ok()
    }
}

/// Errors raised while discovering a project or resolving a module name.
#[derive(Debug)]
pub enum LoaderError {
    /// No `lumen.json` was found walking up from the starting path.
    NotAPackage(PathBuf),
    /// The dotted module name does not correspond to any file in the
    /// package's own source directories or any pinned dependency.
    ModuleNotFound(String),
    /// The module was not found locally and the exact-dependency cache
    /// (`.lumen-deps/exact-dependencies.json`) does not exist, so no
    /// dependency lookup could even be attempted.
    DepsNotInstalled(String),
    Manifest(ManifestError),
}

impl std::fmt::Display for LoaderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoaderError::NotAPackage(path) => {
                write!(f, "no {} found above {}", MANIFEST_FILE_NAME, path.display())
            }
            LoaderError::ModuleNotFound(name) => write!(f, "module not found: {}", name),
            LoaderError::DepsNotInstalled(name) => {
                write!(f, "dependencies are not installed, cannot resolve {}", name)
            }
            LoaderError::Manifest(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for LoaderError {}

impl From<ManifestError> for LoaderError {
    fn from(e: ManifestError) -> Self {
        LoaderError::Manifest(e)
    }
}

/// Walks upward from `start` until a directory containing `lumen.json` is
/// found, or the filesystem root is reached.
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    let mut current = if start.is_file() {
        start.parent()?.to_path_buf()
    } else {
        start.to_path_buf()
    };
    loop {
        if current.join(MANIFEST_FILE_NAME).exists() {
            return Some(current);
        }
        if !current.pop() {
            log::debug!("walked up to filesystem root without finding {}", MANIFEST_FILE_NAME);
            return None;
        }
    }
}

/// Owns a package's manifest and root directory, and memoises module name
/// resolution across the package's own source directories and its pinned
/// dependencies.
pub struct Loader {
    root: PathBuf,
    manifest: Manifest,
    exact_deps: Option<ExactDependencies>,
    /// `dotted name -> resolved path`, populated lazily by `find_module`.
    module_cache: HashMap<String, PathBuf>,
    /// `(dep name, version) -> that dependency's own manifest`, to avoid
    /// re-reading `lumen.json` for every module a dependency defines.
    dependency_manifests: HashMap<(String, Version), Manifest>,
}

impl Loader {
    /// Discovers the project root above `start` and loads its manifest.
    pub fn load(start: &Path) -> Result<Self, LoaderError> {
        let root = find_project_root(start).ok_or_else(|| LoaderError::NotAPackage(start.to_path_buf()))?;
        let manifest = Manifest::load(&root)?;
        let cache_dir = root.join(DEPS_CACHE_DIR);
        let exact_deps = ExactDependencies::load(&cache_dir);
        if exact_deps.is_none() {
            log::debug!("no exact-dependency cache at {}", cache_dir.display());
        }
        Ok(Loader {
            root,
            manifest,
            exact_deps,
            module_cache: HashMap::new(),
            dependency_manifests: HashMap::new(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Resolves a dotted module name (`Foo.Bar.Baz`) to its source file,
    /// memoising the result. Searches the package's own source
    /// directories first, then each pinned dependency's source
    /// directories, in manifest/cache iteration order.
    pub fn find_module(&mut self, dotted_name: &str) -> Result<PathBuf, LoaderError> {
        if let Some(path) = self.module_cache.get(dotted_name) {
            return Ok(path.clone());
        }
        if let Some(path) = find_source_module(&self.root, &self.manifest.source_directories, dotted_name) {
            self.module_cache.insert(dotted_name.to_string(), path.clone());
            return Ok(path);
        }
        let exact_deps = match &self.exact_deps {
            Some(deps) => deps.versions.clone(),
            None => return Err(LoaderError::DepsNotInstalled(dotted_name.to_string())),
        };
        for (dep_name, version) in &exact_deps {
            let dep_manifest = self.dependency_manifest(dep_name, version)?;
            let dep_root = self.root.join(DEPS_CACHE_DIR).join(dep_name).join(version.to_string());
            if let Some(path) = find_source_module(&dep_root, &dep_manifest.source_directories, dotted_name) {
                log::trace!("resolved {} from dependency {} {}", dotted_name, dep_name, version);
                self.module_cache.insert(dotted_name.to_string(), path.clone());
                return Ok(path);
            }
        }
        Err(LoaderError::ModuleNotFound(dotted_name.to_string()))
    }

    /// Loads (and memoises) a pinned dependency's own `lumen.json`. This
    /// is non-recursive: a dependency's own `dependencies` field and
    /// exact-dependency cache are never consulted — only its
    /// `source_directories`, to find the module file itself.
    fn dependency_manifest(&mut self, dep_name: &str, version: &Version) -> Result<Manifest, LoaderError> {
        let key = (dep_name.to_string(), *version);
        if let Some(manifest) = self.dependency_manifests.get(&key) {
            return Ok(manifest.clone());
        }
        let dep_root = self.root.join(DEPS_CACHE_DIR).join(dep_name).join(version.to_string());
        log::trace!("loading dependency manifest at {}", dep_root.display());
        let manifest = Manifest::load(&dep_root)?;
        self.dependency_manifests.insert(key, manifest.clone());
        Ok(manifest)
    }
}

/// Searches `source_directories` under `root` for the `.lum` file backing
/// `dotted_name`, returning the first match. Does not consult
/// dependencies — that is [`Loader::find_module`]'s job.
fn find_source_module(root: &Path, source_directories: &[String], dotted_name: &str) -> Option<PathBuf> {
    let segments: Vec<&str> = dotted_name.split('.').collect();
    for dir in source_directories {
        let mut path = root.join(dir);
        for segment in &segments {
            path.push(segment);
        }
        path.set_extension(SOURCE_EXTENSION);
        if path.exists() {
            return Some(path);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::Manifest;

    fn write_manifest(dir: &Path, manifest: &Manifest) {
        fs::write(dir.join(MANIFEST_FILE_NAME), manifest.to_json().unwrap()).unwrap();
    }

    #[test]
    fn find_project_root_finds_manifest_above_start() {
        let temp = tempfile::tempdir().unwrap();
        let sub = temp.path().join("a/b/c");
        fs::create_dir_all(&sub).unwrap();
        write_manifest(temp.path(), &Manifest::new("root"));

        let found = find_project_root(&sub).unwrap();
        assert_eq!(found, temp.path());
    }

    #[test]
    fn find_project_root_returns_none_without_a_manifest() {
        let temp = tempfile::tempdir().unwrap();
        assert!(find_project_root(temp.path()).is_none());
    }

    #[test]
    fn find_module_locates_a_nested_dotted_name() {
        let temp = tempfile::tempdir().unwrap();
        write_manifest(temp.path(), &Manifest::new("app"));
        let module_dir = temp.path().join("src/Data");
        fs::create_dir_all(&module_dir).unwrap();
        fs::write(module_dir.join("List.lum"), "module Data.List exposing (..)\n").unwrap();

        let mut loader = Loader::load(temp.path()).unwrap();
        let found = loader.find_module("Data.List").unwrap();
        assert_eq!(found, module_dir.join("List.lum"));
    }

    #[test]
    fn find_module_result_is_memoised() {
        let temp = tempfile::tempdir().unwrap();
        write_manifest(temp.path(), &Manifest::new("app"));
        fs::create_dir_all(temp.path().join("src")).unwrap();
        fs::write(temp.path().join("src/Main.lum"), "module Main exposing (..)\n").unwrap();

        let mut loader = Loader::load(temp.path()).unwrap();
        let first = loader.find_module("Main").unwrap();
        assert!(loader.module_cache.contains_key("Main"));
        let second = loader.find_module("Main").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn missing_module_without_deps_cache_is_deps_not_installed() {
        let temp = tempfile::tempdir().unwrap();
        write_manifest(temp.path(), &Manifest::new("app"));
        fs::create_dir_all(temp.path().join("src")).unwrap();

        let mut loader = Loader::load(temp.path()).unwrap();
        let err = loader.find_module("Missing.Module").unwrap_err();
        assert!(matches!(err, LoaderError::DepsNotInstalled(_)));
    }

    #[test]
    fn missing_module_with_empty_deps_cache_is_module_not_found() {
        let temp = tempfile::tempdir().unwrap();
        write_manifest(temp.path(), &Manifest::new("app"));
        fs::create_dir_all(temp.path().join("src")).unwrap();
        let cache_dir = temp.path().join(DEPS_CACHE_DIR);
        fs::create_dir_all(&cache_dir).unwrap();
        fs::write(cache_dir.join(EXACT_DEPS_FILE_NAME), "{}").unwrap();

        let mut loader = Loader::load(temp.path()).unwrap();
        let err = loader.find_module("Missing.Module").unwrap_err();
        assert!(matches!(err, LoaderError::ModuleNotFound(_)));
    }

    #[test]
    fn find_module_falls_back_to_a_pinned_dependency() {
        let temp = tempfile::tempdir().unwrap();
        write_manifest(temp.path(), &Manifest::new("app"));
        fs::create_dir_all(temp.path().join("src")).unwrap();

        let dep_root = temp.path().join(DEPS_CACHE_DIR).join("http").join("1.0.0");
        fs::create_dir_all(dep_root.join("src")).unwrap();
        write_manifest(&dep_root, &Manifest::new("http"));
        fs::write(dep_root.join("src/Http.lum"), "module Http exposing (..)\n").unwrap();

        let cache_dir = temp.path().join(DEPS_CACHE_DIR);
        fs::write(
            cache_dir.join(EXACT_DEPS_FILE_NAME),
            r#"{ "http": "1.0.0" }"#,
        )
        .unwrap();

        let mut loader = Loader::load(temp.path()).unwrap();
        let found = loader.find_module("Http").unwrap();
        assert_eq!(found, dep_root.join("src/Http.lum"));
    }
}
