//! Scratch directory trees with controlled modification times.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tempfile::TempDir;

/// Create a temp dir containing `files` (relative paths), all with a
/// modification time one hour in the past so nothing counts as changed.
pub fn stale_tree(files: &[&str]) -> TempDir {
    let dir = tempfile::tempdir().expect("create temp dir");
    for rel in files {
        let path = write_file(dir.path(), rel);
        set_age(&path, Duration::from_secs(3600));
    }
    dir
}

/// Write (or rewrite) a file below `root`, creating parent directories.
/// The file's modification time becomes "now".
pub fn write_file(root: &Path, rel: &str) -> PathBuf {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dirs");
    }
    fs::write(&path, format!("// {rel}\n")).expect("write file");
    path
}

/// Set a file's modification time to `age` before now.
pub fn set_age(path: &Path, age: Duration) {
    let file = File::options()
        .write(true)
        .open(path)
        .expect("open file for mtime update");
    file.set_modified(SystemTime::now() - age)
        .expect("set modification time");
}

/// Bump a file's modification time to now.
pub fn touch(path: &Path) {
    set_age(path, Duration::ZERO);
}
