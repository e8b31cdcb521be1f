//! Boundary I/O: source discovery, reading units, writing fixed files and
//! the batch report. Nothing else in the crate touches the file system.

use std::path::{Path, PathBuf};

use crossbeam_channel as channel;

use stratguard_core::errors::{PipelineResultExt, StratguardResult};

use super::types::BatchReport;

/// Directories never worth descending into for strategy sources.
pub const DEFAULT_IGNORES: &[&str] = &[
    ".git",
    "__pycache__",
    ".pytest_cache",
    ".mypy_cache",
    ".tox",
    ".venv",
    "venv",
    "node_modules",
    "build",
    "dist",
    "target",
];

/// Hierarchical ignore file, gitignore syntax.
pub const IGNORE_FILENAME: &str = ".stratguardignore";

const SOURCE_EXTENSION: &str = "py";
const FIXED_MARKER: &str = "fixed";

/// One unit of source text handed to the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceInput {
    pub name: String,
    pub text: String,
}

impl SourceInput {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

/// A batch entry as read from disk. Unreadable files stay in the batch so
/// they are reported rather than silently dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadedInput {
    Source(SourceInput),
    Unreadable { name: String, message: String },
}

impl LoadedInput {
    pub fn name(&self) -> &str {
        match self {
            Self::Source(input) => &input.name,
            Self::Unreadable { name, .. } => name,
        }
    }
}

/// Expand `paths` into the Python sources to process.
///
/// Files are taken as given. Directories are walked honoring `.gitignore`,
/// `.stratguardignore` and [`DEFAULT_IGNORES`]; only `*.py` files that are
/// not themselves `.fixed` outputs are kept. Output is sorted and deduped.
pub fn discover_sources(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut found = Vec::new();
    for path in paths {
        if path.is_dir() {
            found.extend(walk_directory(path));
        } else {
            found.push(path.clone());
        }
    }
    found.sort();
    found.dedup();
    found
}

fn walk_directory(root: &Path) -> Vec<PathBuf> {
    let (tx, rx) = channel::unbounded();

    let mut builder = ignore::WalkBuilder::new(root);
    builder
        .hidden(false)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true)
        .add_custom_ignore_filename(IGNORE_FILENAME);

    let mut overrides = ignore::overrides::OverrideBuilder::new(root);
    for pattern in DEFAULT_IGNORES {
        let _ = overrides.add(&format!("!{pattern}/**"));
        let _ = overrides.add(&format!("!{pattern}"));
    }
    if let Ok(built) = overrides.build() {
        builder.overrides(built);
    }

    builder.build_parallel().run(|| {
        let tx = tx.clone();
        Box::new(move |entry| {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    tracing::debug!(error = %e, "walk entry skipped");
                    return ignore::WalkState::Continue;
                }
            };
            if entry.file_type().is_some_and(|ft| ft.is_file()) && is_candidate(entry.path()) {
                let _ = tx.send(entry.into_path());
            }
            ignore::WalkState::Continue
        })
    });

    drop(tx);
    rx.into_iter().collect()
}

fn is_candidate(path: &Path) -> bool {
    let is_python = path.extension().and_then(|e| e.to_str()) == Some(SOURCE_EXTENSION);
    let is_output = path
        .file_stem()
        .and_then(|s| s.to_str())
        .is_some_and(|stem| stem.ends_with(&format!(".{FIXED_MARKER}")));
    is_python && !is_output
}

pub fn read_source(path: &Path) -> StratguardResult<SourceInput> {
    let text = std::fs::read_to_string(path).reading(path)?;
    Ok(SourceInput::new(path.display().to_string(), text))
}

/// Read every path. Failures become [`LoadedInput::Unreadable`].
pub fn load_sources(paths: &[PathBuf]) -> Vec<LoadedInput> {
    paths
        .iter()
        .map(|path| match read_source(path) {
            Ok(input) => LoadedInput::Source(input),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "source unreadable");
                LoadedInput::Unreadable {
                    name: path.display().to_string(),
                    message: e.to_string(),
                }
            }
        })
        .collect()
}

/// `dir/strategy.py` -> `dir/strategy.fixed.py`.
pub fn fixed_path(path: &Path) -> PathBuf {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("source");
    let name = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{stem}.{FIXED_MARKER}.{ext}"),
        None => format!("{stem}.{FIXED_MARKER}"),
    };
    path.with_file_name(name)
}

/// Write `text` next to `source` and return the path written.
pub fn write_fixed(source: &Path, text: &str) -> StratguardResult<PathBuf> {
    let target = fixed_path(source);
    std::fs::write(&target, text).writing(&target)?;
    tracing::info!(path = %target.display(), "fixed source written");
    Ok(target)
}

/// Serialize the batch report as pretty JSON.
pub fn write_report(report: &BatchReport, path: &Path) -> StratguardResult<()> {
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json).writing(path)?;
    tracing::info!(path = %path.display(), units = report.total_units, "batch report written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_path_naming() {
        assert_eq!(fixed_path(Path::new("a/s.py")), PathBuf::from("a/s.fixed.py"));
        assert_eq!(fixed_path(Path::new("noext")), PathBuf::from("noext.fixed"));
    }

    #[test]
    fn test_candidate_filter() {
        assert!(is_candidate(Path::new("x/strategy.py")));
        assert!(!is_candidate(Path::new("x/strategy.fixed.py")));
        assert!(!is_candidate(Path::new("x/notes.txt")));
    }
}
