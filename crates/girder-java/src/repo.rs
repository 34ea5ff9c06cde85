//! Repository scanning.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::Result;

/// Directories never descended into.
const SKIP_DIRS: &[&str] = &["target", "build", "out", "node_modules"];

/// Collect every `.java` file under `root`, skipping hidden directories and
/// common build output. Paths come back sorted so downstream phases see a
/// stable file order.
pub fn scan_repo(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let walker = WalkDir::new(root).into_iter().filter_entry(|entry| {
        let name = entry.file_name().to_string_lossy();
        if entry.depth() == 0 {
            return true;
        }
        if name.starts_with('.') {
            return false;
        }
        !(entry.file_type().is_dir() && SKIP_DIRS.contains(&name.as_ref()))
    });
    for entry in walker {
        let entry = entry?;
        if entry.file_type().is_file()
            && entry.path().extension().is_some_and(|ext| ext == "java")
        {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}
