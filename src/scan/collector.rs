// src/scan/collector.rs

//! Candidate file discovery for a single scan cycle.

use std::path::{Path, PathBuf};

use anyhow::anyhow;
use tracing::{debug, trace};

use crate::config::WatchConfig;
use crate::errors::{Result, WatcherError};
use crate::fs::FileSystem;
use crate::scan::exclusion::ExclusionMatcher;
use crate::types::{slash_path, FileRecord};

/// Prefix (relative to the base path) of entries that are never watched.
const GIT_PREFIX: &str = ".git";

/// Walk `config.base_path` depth-first and return every file that passes the
/// extension filter and the exclusion rules, in traversal order.
///
/// Entries of a directory are visited in lexical order, so the result is
/// stable for an unchanged tree. A failing exclusion rule aborts the whole
/// collection.
pub fn collect_files(
    fs: &dyn FileSystem,
    config: &WatchConfig,
    matcher: &ExclusionMatcher,
) -> Result<Vec<FileRecord>> {
    // Spelled like the children, which lose their leading `./`.
    let base_buf = strip_cur_dir(config.base_path.clone());
    let base = base_buf.as_path();

    if !fs.exists(base) {
        return Err(collection_error(base, anyhow!("base path does not exist")));
    }

    let mut files = Vec::new();
    let mut stack = vec![base.to_path_buf()];

    while let Some(path) = stack.pop() {
        if is_git_path(base, &path) {
            trace!(path = %slash_path(&path), "skipping git path");
            continue;
        }

        if fs.is_dir(&path) {
            let mut children: Vec<PathBuf> = fs
                .read_dir(&path)
                .map_err(|e| collection_error(base, e))?
                .into_iter()
                .map(strip_cur_dir)
                .collect();
            children.sort();
            // Reverse so the lexically first child is popped first.
            stack.extend(children.into_iter().rev());
            continue;
        }

        let name = match path.file_name() {
            Some(n) => n.to_string_lossy().into_owned(),
            None => continue,
        };

        if file_extension(&name) != config.extension {
            continue;
        }

        let path_str = slash_path(&path);
        if !matcher.is_empty() && matcher.is_excluded(&path_str, &name)? {
            trace!(path = %path_str, "file excluded");
            continue;
        }

        let modified = fs.modified(&path).map_err(|e| collection_error(base, e))?;
        files.push(FileRecord {
            path,
            name,
            modified,
        });
    }

    debug!(
        base_dir = %slash_path(base),
        count = files.len(),
        "collected candidate files"
    );
    Ok(files)
}

/// Extension of a file name including the leading dot, or `""` if the name
/// has no dot (`"main.go"` -> `".go"`, `".gitignore"` -> `".gitignore"`).
pub fn file_extension(name: &str) -> &str {
    name.rfind('.').map(|i| &name[i..]).unwrap_or("")
}

fn is_git_path(base: &Path, path: &Path) -> bool {
    let rel = path.strip_prefix(base).unwrap_or(path);
    slash_path(rel).starts_with(GIT_PREFIX)
}

/// `./src/main.go` -> `src/main.go`, so a base of `.` yields bare relative
/// paths.
fn strip_cur_dir(path: PathBuf) -> PathBuf {
    match path.strip_prefix(".") {
        Ok(rest) if !rest.as_os_str().is_empty() => rest.to_path_buf(),
        _ => path,
    }
}

fn collection_error(base: &Path, source: anyhow::Error) -> WatcherError {
    WatcherError::CollectionError {
        path: slash_path(base),
        source,
    }
}
