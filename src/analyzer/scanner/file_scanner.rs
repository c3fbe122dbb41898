use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use tracing::debug;

use crate::constants::analysis::{BINARY_SNIFF_BYTES, MAX_FILE_SIZE};
use crate::types::{Result, ScopeError, log_filter_error, relative_path};

/// Directories never worth analyzing
const DEFAULT_SKIP_DIRS: &[&str] = &[
    "node_modules",
    "target",
    ".git",
    "build",
    "dist",
    "__pycache__",
    "vendor",
    ".venv",
];

pub struct FileScanner {
    root: PathBuf,
    include: Vec<glob::Pattern>,
    exclude: Vec<glob::Pattern>,
    max_file_size: u64,
    skip_binary: bool,
}

impl FileScanner {
    /// Scanner with the default skip directories and size cap
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        let exclude = DEFAULT_SKIP_DIRS
            .iter()
            .flat_map(|d| [format!("{}/**", d), format!("**/{}/**", d)])
            .filter_map(|p| glob::Pattern::new(&p).ok())
            .collect();
        Self {
            root: root.as_ref().to_path_buf(),
            include: Vec::new(),
            exclude,
            max_file_size: MAX_FILE_SIZE,
            skip_binary: true,
        }
    }

    /// Only files whose relative path matches one of the patterns. An empty
    /// list includes everything.
    pub fn with_include(mut self, patterns: &[String]) -> Result<Self> {
        self.include = compile(patterns)?;
        Ok(self)
    }

    /// Additional exclude patterns, matched against the relative path
    pub fn with_exclude(mut self, patterns: &[String]) -> Result<Self> {
        self.exclude.extend(compile(patterns)?);
        Ok(self)
    }

    pub fn with_max_file_size(mut self, size: u64) -> Self {
        self.max_file_size = size;
        self
    }

    /// Keep files whose leading bytes contain NUL or invalid UTF-8
    pub fn include_binary(mut self) -> Self {
        self.skip_binary = false;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Files under the root, sorted by relative path
    pub fn scan(&self) -> Result<Vec<ScannedFile>> {
        if !self.root.is_dir() {
            return Err(ScopeError::Scan(format!(
                "not a directory: {}",
                self.root.display()
            )));
        }

        let walker = WalkBuilder::new(&self.root)
            .hidden(false)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .require_git(false)
            .follow_links(false)
            .build();

        let mut files = Vec::new();
        for entry in walker.filter_map(|r| log_filter_error(r, "walking directory")) {
            let path = entry.path();
            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }

            let relative = relative_path(path, &self.root);
            if !self.is_selected(&relative) {
                continue;
            }

            let size = match entry.metadata() {
                Ok(metadata) => metadata.len(),
                Err(e) => {
                    debug!("Skipping {}: {}", relative, e);
                    continue;
                }
            };
            if size > self.max_file_size {
                debug!("Skipping {}: {} bytes exceeds size cap", relative, size);
                continue;
            }
            if self.skip_binary && looks_binary(path) {
                debug!("Skipping {}: binary content", relative);
                continue;
            }

            files.push(ScannedFile {
                path: path.to_path_buf(),
                relative,
                size,
            });
        }

        files.sort_by(|a, b| a.relative.cmp(&b.relative));
        Ok(files)
    }

    /// Relative paths only
    pub fn paths(&self) -> Result<Vec<String>> {
        Ok(self.scan()?.into_iter().map(|f| f.relative).collect())
    }

    fn is_selected(&self, relative: &str) -> bool {
        if self.exclude.iter().any(|p| p.matches(relative)) {
            return false;
        }
        self.include.is_empty() || self.include.iter().any(|p| p.matches(relative))
    }
}

fn compile(patterns: &[String]) -> Result<Vec<glob::Pattern>> {
    patterns
        .iter()
        .map(|p| {
            glob::Pattern::new(p)
                .map_err(|e| ScopeError::Config(format!("Invalid glob pattern '{}': {}", p, e)))
        })
        .collect()
}

/// NUL byte or invalid UTF-8 in the leading bytes. A multi-byte character
/// cut off by the sniff window is not counted as invalid.
fn looks_binary(path: &Path) -> bool {
    let mut sample = Vec::with_capacity(BINARY_SNIFF_BYTES);
    let read = File::open(path).and_then(|file| {
        file.take(BINARY_SNIFF_BYTES as u64)
            .read_to_end(&mut sample)
    });
    if read.is_err() {
        return true;
    }
    if sample.contains(&0) {
        return true;
    }
    match std::str::from_utf8(&sample) {
        Ok(_) => false,
        Err(e) => e.error_len().is_some(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedFile {
    pub path: PathBuf,
    /// Path relative to the scan root, forward slashes
    pub relative: String,
    pub size: u64,
}
