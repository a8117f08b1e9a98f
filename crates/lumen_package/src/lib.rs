//! # lumen-package
//!
//! The package layer: loads a `lumen.json` manifest, locates the file
//! backing a dotted module name across source directories and the
//! dependency cache, and orders a set of modules topologically by their
//! imports.

pub mod graph;
pub mod loader;
pub mod manifest;
pub mod version;

pub use graph::{CircularDependency, DependencyGraph};
pub use loader::{ExactDependencies, Loader, LoaderError};
pub use manifest::{Manifest, ManifestError, MANIFEST_FILE_NAME};
pub use version::{Version, VersionParseError, VersionRange};

/// The cache sub-directory, relative to a package root, holding
/// `exact-dependencies.json` and one `<dep>/<version>/` tree per pinned
/// dependency.
pub const DEPS_CACHE_DIR: &str = ".lumen-deps";

/// `exact-dependencies.json`, inside [`DEPS_CACHE_DIR`].
pub const EXACT_DEPS_FILE_NAME: &str = "exact-dependencies.json";

/// The source file extension for lumen modules.
pub const SOURCE_EXTENSION: &str = "lum";
