use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use glob::Pattern;
use tracing::warn;
use walkdir::WalkDir;

#[derive(Debug)]
pub struct ScanResult {
    pub files: BTreeMap<PathBuf, PathBuf>, // rel -> abs
}

fn is_ignored(rel: &Path, patterns: &[Pattern]) -> bool {
    let name = rel.file_name().and_then(|s| s.to_str()).unwrap_or("");
    if [".git", "__pycache__", ".DS_Store", "Thumbs.db"].contains(&name) {
        return true;
    }
    let s_rel = rel.to_string_lossy().replace('\\', "/");
    patterns
        .iter()
        .any(|pat| pat.matches(&s_rel) || pat.matches(name))
}

/// Collects every regular file under `root`, keyed by its path relative to
/// `root`. Ignored directories are not descended into.
pub fn scan_dir(root: &Path, patterns: &[Pattern]) -> ScanResult {
    let mut files = BTreeMap::new();

    let walker = WalkDir::new(root).follow_links(false).into_iter();

    for entry in walker.filter_entry(|e| match e.path().strip_prefix(root) {
        Ok(rel) if rel != Path::new("") => !is_ignored(rel, patterns),
        _ => true,
    }) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!("Skipping unreadable entry: {err}");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        if let Ok(rel) = entry.path().strip_prefix(root) {
            files.insert(rel.to_path_buf(), entry.path().to_path_buf());
        }
    }

    ScanResult { files }
}
