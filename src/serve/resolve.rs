//! Docroot path resolution.
//!
//! Maps request paths to files under the configured root directory and
//! refuses anything that resolves outside it.

use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;

use anyhow::Context;

use crate::config::Pages;

/// Index page served for "/" when no override is configured.
const DEFAULT_INDEX: &str = "index.html";

/// Where a request path landed after containment and existence checks.
#[derive(Debug)]
pub enum Resolution {
    /// A regular file under the docroot.
    File(ServedFile),
    /// The path resolves outside the docroot.
    Escape,
    /// Nothing (or not a regular file) at the resolved path.
    Missing,
}

/// A file cleared for serving, with the metadata the response head needs.
#[derive(Debug, Clone)]
pub struct ServedFile {
    pub path: PathBuf,
    pub len: u64,
    pub modified: SystemTime,
}

/// The root directory below which all served files must resolve.
#[derive(Debug, Clone)]
pub struct DocRoot {
    root: PathBuf,
    pages: Pages,
}

impl DocRoot {
    /// Canonicalizes the docroot up front; a missing docroot is a startup
    /// error.
    pub fn new(root: &Path, pages: Pages) -> anyhow::Result<Self> {
        let root = root
            .canonicalize()
            .with_context(|| format!("invalid docroot: {}", root.display()))?;
        Ok(Self { root, pages })
    }

    fn index_path(&self) -> String {
        format!("/{}", self.pages.index.as_deref().unwrap_or(DEFAULT_INDEX))
    }

    /// Absolute path of the configured 400 page, if any.
    pub fn bad_request_page(&self) -> Option<PathBuf> {
        self.pages.bad_request.as_deref().map(|p| self.root.join(p))
    }

    /// Absolute path of the configured 404 page, if any.
    pub fn not_found_page(&self) -> Option<PathBuf> {
        self.pages.not_found.as_deref().map(|p| self.root.join(p))
    }

    /// Maps a request path to a file under the docroot.
    ///
    /// Containment is checked before existence: a traversal that leaves the
    /// docroot is `Escape` even when the target does not exist.
    pub fn resolve(&self, request_path: &str) -> Resolution {
        let logical = if request_path == "/" {
            self.index_path()
        } else {
            request_path.to_string()
        };
        let relative = logical.strip_prefix('/').unwrap_or(&logical);

        // Lexical containment first: escape attempts may point at nothing,
        // and must still be refused rather than reported missing.
        let joined = normalize(&self.root.join(relative));
        if !joined.starts_with(&self.root) {
            return Resolution::Escape;
        }

        // Symlinks may still lead out of the docroot.
        let canonical = match joined.canonicalize() {
            Ok(path) => path,
            Err(_) => return Resolution::Missing,
        };
        if !canonical.starts_with(&self.root) {
            return Resolution::Escape;
        }

        let meta = match std::fs::metadata(&canonical) {
            Ok(meta) if meta.is_file() => meta,
            _ => return Resolution::Missing,
        };
        let modified = meta.modified().unwrap_or(SystemTime::UNIX_EPOCH);

        Resolution::File(ServedFile {
            path: canonical,
            len: meta.len(),
            modified,
        })
    }
}

/// Folds `.` and `..` components without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::ParentDir => {
                out.pop();
            }
            Component::CurDir => {}
            other => out.push(other),
        }
    }
    out
}
