//! Source-tree scanning helpers for layering checks.

use std::fs;
use std::path::{Path, PathBuf};

fn root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

fn relative(path: &Path) -> String {
    path.strip_prefix(root())
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

fn walk(dir: &Path, files: &mut Vec<PathBuf>) {
    let entries =
        fs::read_dir(dir).unwrap_or_else(|e| panic!("failed to read dir {}: {e}", dir.display()));
    for entry in entries {
        let path = entry
            .unwrap_or_else(|e| panic!("failed to read dir entry: {e}"))
            .path();
        if path.is_dir() {
            walk(&path, files);
        } else if path.extension().is_some_and(|ext| ext == "rs") {
            files.push(path);
        }
    }
}

/// Every `.rs` file under `relative_dir`, sorted.
pub fn rust_files(relative_dir: &str) -> Vec<PathBuf> {
    let mut files = Vec::new();
    walk(&root().join(relative_dir), &mut files);
    files.sort();
    files
}

/// `(file, line number, line)` for each line containing any pattern.
pub fn lines_containing(relative_dir: &str, patterns: &[&str]) -> Vec<(String, usize, String)> {
    let mut hits = Vec::new();
    for file in rust_files(relative_dir) {
        let content = fs::read_to_string(&file)
            .unwrap_or_else(|e| panic!("failed to read {}: {e}", file.display()));
        for (idx, line) in content.lines().enumerate() {
            if patterns.iter().any(|p| line.contains(p)) {
                hits.push((relative(&file), idx + 1, line.to_string()));
            }
        }
    }
    hits
}

/// Lines in `mod.rs` files that are not module declarations or comments.
pub fn non_export_lines_in_mod_files(relative_dir: &str) -> Vec<(String, usize, String)> {
    let mut violations = Vec::new();
    for file in rust_files(relative_dir) {
        if file.file_name().and_then(|s| s.to_str()) != Some("mod.rs") {
            continue;
        }
        let content = fs::read_to_string(&file)
            .unwrap_or_else(|e| panic!("failed to read {}: {e}", file.display()));
        for (idx, raw) in content.lines().enumerate() {
            let line = raw.trim();
            let allowed = line.is_empty()
                || line.starts_with("//")
                || line.starts_with("pub mod ")
                || line.starts_with("mod ")
                || line.starts_with("#[cfg")
                || line.starts_with("#![");
            if !allowed {
                violations.push((relative(&file), idx + 1, raw.to_string()));
            }
        }
    }
    violations
}

/// `(file, line number, call)` for each tracing macro call outside
/// `#[cfg(test)]` code that lacks a `component` field.
pub fn log_events_without_component(relative_path: &str) -> Vec<(String, usize, String)> {
    let target = root().join(relative_path);
    let files = if target.is_dir() {
        rust_files(relative_path)
    } else {
        vec![target]
    };
    let mut missing = Vec::new();
    for file in files {
        let content = fs::read_to_string(&file)
            .unwrap_or_else(|e| panic!("failed to read {}: {e}", file.display()));
        let body = content.split("#[cfg(test)]").next().unwrap_or_default();
        for level in ["trace!(", "debug!(", "info!(", "warn!(", "error!("] {
            for (start, _) in body.match_indices(level) {
                let preceded_by_ident = body[..start]
                    .chars()
                    .next_back()
                    .is_some_and(|c| c.is_alphanumeric() || c == '_');
                if preceded_by_ident {
                    continue;
                }
                let mut depth = 0usize;
                let mut end = body.len();
                for (offset, c) in body[start..].char_indices() {
                    match c {
                        '(' => depth += 1,
                        ')' => {
                            depth -= 1;
                            if depth == 0 {
                                end = start + offset + 1;
                                break;
                            }
                        }
                        _ => {}
                    }
                }
                let call = &body[start..end];
                if !call.contains("component") {
                    let line = body[..start].matches('\n').count() + 1;
                    missing.push((relative(&file), line, call.to_string()));
                }
            }
        }
    }
    missing
}

pub fn path_exists(relative_path: &str) -> bool {
    root().join(relative_path).exists()
}
