use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::{debug, info};

use crate::cli::Options;
use crate::diff::diff;
use crate::scanner::scan_dir;
use crate::utils::{file_bytes_equal, is_probably_binary, read_text_best_effort};

const MISSING_TITLE: &str = "/dev/null";

#[derive(Default, Debug, PartialEq, Eq)]
pub struct Counters {
    pub same: usize,
    pub added: usize,
    pub removed: usize,
    pub modified_text: usize,
    pub modified_binary: usize,
}

#[derive(Debug)]
pub struct Report {
    pub output: String,
    pub counters: Counters,
}

fn title(path: Option<&Path>) -> String {
    path.map(|p| p.display().to_string())
        .unwrap_or_else(|| MISSING_TITLE.to_string())
}

fn is_diffable_text(path: &Path, max_text_size: u64) -> Result<bool> {
    let size = fs::metadata(path)
        .with_context(|| format!("Can't open document {path:?}"))?
        .len();
    Ok(size <= max_text_size && !is_probably_binary(path))
}

/// Unified diff of two files, either of which may be absent (compared as
/// empty). Returns `None` when the pair is binary or too large for a text
/// diff, in which case only a one-line notice is rendered.
fn diff_entry(old: Option<&Path>, new: Option<&Path>, opts: &Options) -> Result<Option<String>> {
    for path in old.iter().chain(new.iter()) {
        if !is_diffable_text(path, opts.max_text_size)? {
            debug!("Treating {path:?} as binary");
            return Ok(None);
        }
    }

    let read = |path: Option<&Path>| -> Result<String> {
        match path {
            Some(p) => read_text_best_effort(p, opts.normalize_eol),
            None => Ok(String::new()),
        }
    };
    let old_text = read(old)?;
    let new_text = read(new)?;

    let result = diff(&old_text, &new_text, opts.granularity);
    Ok(Some(result.unified(
        &title(old),
        &title(new),
        opts.context,
        &opts.theme,
    )))
}

fn binary_notice(old: Option<&Path>, new: Option<&Path>) -> String {
    format!("Binary files {} and {} differ\n", title(old), title(new))
}

fn compare_files(old: &Path, new: &Path, opts: &Options) -> Result<Report> {
    let mut counters = Counters::default();
    let output = match diff_entry(Some(old), Some(new), opts)? {
        Some(text) => {
            if file_bytes_equal(old, new) {
                counters.same += 1;
            } else {
                counters.modified_text += 1;
            }
            text
        }
        None if file_bytes_equal(old, new) => {
            counters.same += 1;
            String::new()
        }
        None => {
            counters.modified_binary += 1;
            binary_notice(Some(old), Some(new))
        }
    };
    Ok(Report { output, counters })
}

fn compare_dirs(old_root: &Path, new_root: &Path, opts: &Options) -> Result<Report> {
    let scan_old = scan_dir(old_root, &opts.ignore_patterns);
    let scan_new = scan_dir(new_root, &opts.ignore_patterns);
    info!(
        "Comparing {} old files with {} new files",
        scan_old.files.len(),
        scan_new.files.len()
    );

    let rels: BTreeSet<&PathBuf> = scan_old.files.keys().chain(scan_new.files.keys()).collect();

    let mut counters = Counters::default();
    let mut output = String::new();

    for rel in rels {
        let old = scan_old.files.get(rel).map(PathBuf::as_path);
        let new = scan_new.files.get(rel).map(PathBuf::as_path);

        if let (Some(a), Some(b)) = (old, new) {
            if file_bytes_equal(a, b) {
                debug!("Unchanged: {rel:?}");
                counters.same += 1;
                continue;
            }
        }

        match diff_entry(old, new, opts)? {
            Some(text) => {
                output.push_str(&text);
                match (old, new) {
                    (Some(_), None) => counters.removed += 1,
                    (None, Some(_)) => counters.added += 1,
                    _ => counters.modified_text += 1,
                }
            }
            None => {
                output.push_str(&binary_notice(old, new));
                match (old, new) {
                    (Some(_), None) => counters.removed += 1,
                    (None, Some(_)) => counters.added += 1,
                    _ => counters.modified_binary += 1,
                }
            }
        }
    }

    Ok(Report { output, counters })
}

/// Diffs two files, or every file of two directory trees.
pub fn run_compare(old: &Path, new: &Path, opts: &Options) -> Result<Report> {
    let report = match (old.is_dir(), new.is_dir()) {
        (false, false) => compare_files(old, new, opts)?,
        (true, true) => compare_dirs(old, new, opts)?,
        _ => bail!("Cannot compare a file with a directory: {old:?} and {new:?}"),
    };

    let c = &report.counters;
    info!(
        same = c.same,
        added = c.added,
        removed = c.removed,
        modified_text = c.modified_text,
        modified_binary = c.modified_binary,
        "Comparison finished"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::diff::Granularity;
    use crate::theme::Theme;

    fn options() -> Options {
        Options {
            context: 1,
            granularity: Granularity::Line,
            theme: Theme::plain(),
            normalize_eol: false,
            max_text_size: 1_000_000,
            ignore_patterns: Vec::new(),
        }
    }

    #[test]
    fn two_files() {
        let dir = TempDir::new().unwrap();
        let old = dir.path().join("old.txt");
        let new = dir.path().join("new.txt");
        fs::write(&old, "a\nb\nc\n").unwrap();
        fs::write(&new, "a\nB\nc\n").unwrap();

        let report = run_compare(&old, &new, &options()).unwrap();
        let expected = format!(
            "--- {}\n+++ {}\n@@ -1,3 +1,3 @@\n a\n-b\n+B\n c\n",
            old.display(),
            new.display()
        );
        assert_eq!(report.output, expected);
        assert_eq!(report.counters.modified_text, 1);
    }

    #[test]
    fn directory_trees() {
        let dir = TempDir::new().unwrap();
        let old = dir.path().join("old");
        let new = dir.path().join("new");
        fs::create_dir_all(&old).unwrap();
        fs::create_dir_all(&new).unwrap();
        fs::write(old.join("same.txt"), "same\n").unwrap();
        fs::write(new.join("same.txt"), "same\n").unwrap();
        fs::write(old.join("gone.txt"), "bye\n").unwrap();
        fs::write(new.join("fresh.txt"), "hi\n").unwrap();
        fs::write(old.join("edit.txt"), "x\ny\n").unwrap();
        fs::write(new.join("edit.txt"), "x\nz\n").unwrap();
        fs::write(old.join("blob.bin"), [0u8, 1]).unwrap();
        fs::write(new.join("blob.bin"), [0u8, 2]).unwrap();

        let report = run_compare(&old, &new, &options()).unwrap();
        assert_eq!(
            report.counters,
            Counters {
                same: 1,
                added: 1,
                removed: 1,
                modified_text: 1,
                modified_binary: 1,
            }
        );
        assert!(report.output.contains(&format!(
            "Binary files {} and {} differ\n",
            old.join("blob.bin").display(),
            new.join("blob.bin").display()
        )));
        assert!(report.output.contains("+++ /dev/null\n@@ -1 +0 @@\n-bye\n"));
        assert!(report.output.contains("--- /dev/null\n"));
        assert!(report.output.contains("+hi\n"));
        assert!(report.output.contains("-y\n+z\n"));
        assert!(!report.output.contains("same.txt"));
    }

    #[test]
    fn legacy_encoded_files_are_diffed_as_text() {
        let dir = TempDir::new().unwrap();
        let old = dir.path().join("a.txt");
        let new = dir.path().join("b.txt");
        fs::write(&old, b"caf\xe9\nx\n").unwrap();
        fs::write(&new, b"caf\xe9\ny\n").unwrap();

        let report = run_compare(&old, &new, &options()).unwrap();
        assert_eq!(report.counters.modified_text, 1);
        assert_eq!(report.counters.modified_binary, 0);
        assert!(!report.output.contains("Binary files"));
        assert!(report.output.contains("@@ -1,2 +1,2 @@\n caf\u{e9}\n-x\n+y\n"));
    }

    #[test]
    fn file_against_directory_fails() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("f.txt");
        fs::write(&file, "f\n").unwrap();
        let err = run_compare(&file, dir.path(), &options()).unwrap_err();
        assert!(err.to_string().contains("Cannot compare a file with a directory"));
    }
}
