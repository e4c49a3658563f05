//! Build artifact discovery.
//!
//! Any directory named `bin` (configurable) below the repository root is
//! build output. The newest recognized artifact inside such a directory
//! stands for "when the project was last built".

use chrono::{DateTime, Local};
use std::ffi::OsStr;
use std::io;
use std::path::Path;
use tracing::{debug, trace};
use walkdir::WalkDir;

/// Source of the most recent build time.
pub trait ArtifactScanner {
    /// Newest artifact modification time under `root`, or `None` when there
    /// are no artifacts at all.
    fn last_build_time(&self, root: &Path) -> io::Result<Option<DateTime<Local>>>;
}

/// Scans `bin`-style directories for files with known binary extensions.
#[derive(Debug, Clone)]
pub struct BinDirScanner {
    dir_name: String,
    extensions: Vec<String>,
}

impl BinDirScanner {
    pub fn new(dir_name: impl Into<String>, extensions: &[String]) -> Self {
        Self {
            dir_name: dir_name.into(),
            extensions: extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_string())
                .collect(),
        }
    }

    fn is_artifact(&self, path: &Path) -> bool {
        path.extension()
            .and_then(OsStr::to_str)
            .is_some_and(|ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
    }

    /// Whether some directory between `root` and the file is a build directory.
    fn in_build_dir(&self, root: &Path, path: &Path) -> bool {
        let Ok(relative) = path.strip_prefix(root) else {
            return false;
        };
        relative
            .parent()
            .is_some_and(|dir| self.names_build_dir(dir))
    }

    /// A walk error aborts the scan when it hits the root itself or a path
    /// at or below a build directory. Unreadable paths elsewhere are skipped.
    fn walk_error_matters(&self, root: &Path, err: &walkdir::Error) -> bool {
        if err.depth() == 0 {
            return true;
        }
        match err.path().map(|p| p.strip_prefix(root)) {
            Some(Ok(relative)) => self.names_build_dir(relative),
            _ => true,
        }
    }

    fn names_build_dir(&self, relative: &Path) -> bool {
        relative
            .components()
            .any(|c| c.as_os_str() == OsStr::new(&self.dir_name))
    }
}

impl ArtifactScanner for BinDirScanner {
    fn last_build_time(&self, root: &Path) -> io::Result<Option<DateTime<Local>>> {
        let mut newest: Option<DateTime<Local>> = None;
        let mut count = 0usize;

        let walker = WalkDir::new(root)
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || entry.file_name() != OsStr::new(".git"));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) if !self.walk_error_matters(root, &err) => {
                    debug!(error = %err, "skipping unreadable path outside build directories");
                    continue;
                }
                Err(err) => return Err(err.into()),
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            if !self.in_build_dir(root, path) || !self.is_artifact(path) {
                continue;
            }

            let modified = DateTime::<Local>::from(entry.metadata()?.modified()?);
            trace!(path = %path.display(), %modified, "build artifact");
            count += 1;
            if newest.is_none_or(|current| modified > current) {
                newest = Some(modified);
            }
        }

        debug!(root = %root.display(), artifacts = count, newest = ?newest, "artifact scan complete");
        Ok(newest)
    }
}
