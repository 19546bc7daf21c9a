//! Assembly of the per-request context bundle.
//!
//! File access and workspace introspection go through the [`FileReader`] and
//! [`WorkspaceInspector`] traits so the assembler never touches the
//! filesystem directly.

use serde_json::{Map, Value};
use std::error::Error as StdError;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Opaque workspace metadata (project type, file inventory, ...).
pub type WorkspaceInfo = Map<String, Value>;

/// One file attached to a request.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextFile {
    /// The path as the caller supplied it, relative to the workspace.
    pub path: String,
    pub content: String,
    /// Length of `content` in bytes.
    pub size: usize,
    pub language: String,
}

impl ContextFile {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        let path = path.into();
        let content = content.into();
        Self {
            size: content.len(),
            language: language_for_path(&path).to_string(),
            path,
            content,
        }
    }

    /// Line count with a trailing partial line counted, so `""` has one line.
    pub fn line_count(&self) -> usize {
        self.content.split('\n').count()
    }
}

/// Why a requested file was left out of the bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    NotFound,
    TooLarge { size: u64, limit: u64 },
    Unreadable(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NotFound => write!(f, "file not found"),
            SkipReason::TooLarge { size, limit } => {
                write!(f, "file is {size} bytes, larger than the {limit} byte limit")
            }
            SkipReason::Unreadable(reason) => write!(f, "could not read file: {reason}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    pub path: String,
    pub reason: SkipReason,
}

/// Everything a single request knows about the workspace.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContextBundle {
    pub workspace_path: PathBuf,
    /// Files in the order the caller requested them.
    pub files: Vec<ContextFile>,
    pub workspace_info: WorkspaceInfo,
    pub skipped: Vec<SkippedFile>,
}

impl ContextBundle {
    pub fn new(workspace_path: impl Into<PathBuf>) -> Self {
        Self {
            workspace_path: workspace_path.into(),
            ..Default::default()
        }
    }

    pub fn with_file(mut self, file: ContextFile) -> Self {
        self.files.push(file);
        self
    }

    pub fn with_workspace_info(mut self, info: WorkspaceInfo) -> Self {
        self.workspace_info = info;
        self
    }

    /// Detected project type, if introspection found one.
    pub fn project_type(&self) -> Option<&str> {
        self.workspace_info
            .get("project_info")
            .and_then(|info| info.get("type"))
            .and_then(Value::as_str)
            .filter(|kind| !kind.is_empty() && *kind != "unknown")
    }

    /// Paths of every attached file, in order.
    pub fn references(&self) -> Vec<String> {
        self.files.iter().map(|file| file.path.clone()).collect()
    }
}

/// How file bytes are turned into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Decoding {
    /// Invalid UTF-8 is an error and the file is skipped.
    #[default]
    Strict,
    /// Invalid byte sequences are dropped.
    Lossy,
}

/// Reads context files on behalf of the assembler.
pub trait FileReader {
    /// Size in bytes when `path` names an existing regular file.
    fn regular_file_size(&self, path: &Path) -> Option<u64>;

    fn read_text(&self, path: &Path) -> io::Result<String>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FsFileReader {
    decoding: Decoding,
}

impl FsFileReader {
    pub fn new(decoding: Decoding) -> Self {
        Self { decoding }
    }
}

impl FileReader for FsFileReader {
    fn regular_file_size(&self, path: &Path) -> Option<u64> {
        let metadata = fs::metadata(path).ok()?;
        metadata.is_file().then(|| metadata.len())
    }

    fn read_text(&self, path: &Path) -> io::Result<String> {
        match self.decoding {
            Decoding::Strict => fs::read_to_string(path),
            Decoding::Lossy => Ok(decode_ignoring_invalid(&fs::read(path)?)),
        }
    }
}

fn decode_ignoring_invalid(bytes: &[u8]) -> String {
    let mut text = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        text.push_str(chunk.valid());
    }
    text
}

/// Failure reported by a [`WorkspaceInspector`].
#[derive(Debug)]
pub enum WorkspaceError {
    NotADirectory(PathBuf),
    Walk {
        path: PathBuf,
        source: io::Error,
    },
}

impl fmt::Display for WorkspaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkspaceError::NotADirectory(path) => {
                write!(f, "workspace {} is not a directory", path.display())
            }
            WorkspaceError::Walk { path, source } => {
                write!(f, "could not scan {}: {}", path.display(), source)
            }
        }
    }
}

impl StdError for WorkspaceError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            WorkspaceError::Walk { source, .. } => Some(source),
            WorkspaceError::NotADirectory(_) => None,
        }
    }
}

/// Produces workspace metadata for a request.
pub trait WorkspaceInspector {
    fn inspect(&self, root: &Path) -> Result<WorkspaceInfo, WorkspaceError>;
}

/// Builds [`ContextBundle`]s from requested paths.
pub struct ContextAssembler<R, I> {
    reader: R,
    inspector: I,
    max_file_size: Option<u64>,
}

impl<R: FileReader, I: WorkspaceInspector> ContextAssembler<R, I> {
    pub fn new(reader: R, inspector: I) -> Self {
        Self {
            reader,
            inspector,
            max_file_size: None,
        }
    }

    /// Skips files larger than `limit` bytes.
    pub fn with_max_file_size(mut self, limit: Option<u64>) -> Self {
        self.max_file_size = limit;
        self
    }

    /// Never fails: unusable files land in `skipped`, and an introspection
    /// failure leaves `workspace_info` empty.
    pub fn build(
        &self,
        workspace_root: &Path,
        file_paths: &[String],
        include_workspace_context: bool,
    ) -> ContextBundle {
        let mut bundle = ContextBundle::new(workspace_root);

        for requested in file_paths {
            match self.load_file(&workspace_root.join(requested)) {
                Ok(content) => {
                    debug!(path = %requested, "added file to context");
                    bundle.files.push(ContextFile::new(requested.as_str(), content));
                }
                Err(reason) => {
                    debug!(path = %requested, %reason, "skipping context file");
                    bundle.skipped.push(SkippedFile {
                        path: requested.clone(),
                        reason,
                    });
                }
            }
        }

        if include_workspace_context {
            match self.inspector.inspect(workspace_root) {
                Ok(info) => bundle.workspace_info = info,
                Err(err) => warn!(error = %err, "could not gather workspace context"),
            }
        }

        bundle
    }

    fn load_file(&self, full_path: &Path) -> Result<String, SkipReason> {
        let size = self
            .reader
            .regular_file_size(full_path)
            .ok_or(SkipReason::NotFound)?;
        if let Some(limit) = self.max_file_size {
            if size > limit {
                return Err(SkipReason::TooLarge { size, limit });
            }
        }
        self.reader
            .read_text(full_path)
            .map_err(|err| SkipReason::Unreadable(err.to_string()))
    }
}

/// Maps a file extension to the language label used in replies.
pub fn language_for_path(path: &str) -> &'static str {
    let extension = Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("py" | "pyw") => "python",
        Some("js" | "mjs" | "cjs" | "jsx") => "javascript",
        Some("ts" | "tsx") => "typescript",
        Some("rs") => "rust",
        Some("go") => "go",
        Some("java") => "java",
        Some("c" | "h") => "c",
        Some("cpp" | "cc" | "cxx" | "hpp") => "cpp",
        Some("cs") => "csharp",
        Some("rb") => "ruby",
        Some("php") => "php",
        Some("sh" | "bash" | "zsh") => "shell",
        Some("md") => "markdown",
        Some("json") => "json",
        Some("toml") => "toml",
        Some("yaml" | "yml") => "yaml",
        Some("html" | "htm") => "html",
        Some("css") => "css",
        Some("sql") => "sql",
        _ => "unknown",
    }
}
