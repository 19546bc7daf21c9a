use crate::core::session::SessionLogEntry;
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Plain-text transcript of an interactive session.
pub struct TranscriptLog {
    file_path: Option<PathBuf>,
    is_active: bool,
}

impl TranscriptLog {
    pub fn disabled() -> Self {
        TranscriptLog {
            file_path: None,
            is_active: false,
        }
    }

    /// Starts logging to `path`, replacing its contents with `history`.
    pub fn set_log_file(
        &mut self,
        path: impl Into<PathBuf>,
        history: &[SessionLogEntry],
    ) -> Result<String, Box<dyn std::error::Error>> {
        let path = path.into();
        rewrite_transcript(&path, history)?;

        let message = format!("Logging enabled to: {}", path.display());
        self.file_path = Some(path);
        self.is_active = true;
        Ok(message)
    }

    pub fn toggle_logging(&mut self) -> Result<String, Box<dyn std::error::Error>> {
        match &self.file_path {
            Some(path) => {
                if self.is_active {
                    self.append_lines(&["## Logging paused".to_string()])?;
                    self.is_active = false;
                    Ok(format!("Logging paused (file: {})", path.display()))
                } else {
                    self.is_active = true;
                    Ok(format!("Logging resumed to: {}", path.display()))
                }
            }
            None => Err("No log file specified. Use /log <filename> to enable logging first.".into()),
        }
    }

    /// Appends the given entries when logging is active.
    pub fn log_entries(&self, entries: &[SessionLogEntry]) -> Result<(), Box<dyn std::error::Error>> {
        if !self.is_active {
            return Ok(());
        }
        let lines: Vec<String> = entries.iter().map(format_entry).collect();
        self.append_lines(&lines)
    }

    fn append_lines(&self, blocks: &[String]) -> Result<(), Box<dyn std::error::Error>> {
        let Some(file_path) = &self.file_path else {
            return Ok(());
        };

        let file = OpenOptions::new().create(true).append(true).open(file_path)?;
        let mut writer = BufWriter::new(file);
        for block in blocks {
            write_block(&mut writer, block)?;
        }
        writer.flush()?;
        Ok(())
    }
}

fn format_entry(entry: &SessionLogEntry) -> String {
    match entry {
        SessionLogEntry::Request {
            message,
            context,
            model_id,
            ..
        } => {
            let mut block = format!("You ({model_id}): {message}");
            if !context.files.is_empty() {
                block.push_str(&format!("\n## Files: {}", context.references().join(", ")));
            }
            block
        }
        SessionLogEntry::Response { content, .. } => content.clone(),
    }
}

fn write_block<W: Write>(writer: &mut W, block: &str) -> std::io::Result<()> {
    for line in block.lines() {
        writeln!(writer, "{line}")?;
    }
    writeln!(writer)
}

fn rewrite_transcript(
    path: &Path,
    history: &[SessionLogEntry],
) -> Result<(), Box<dyn std::error::Error>> {
    let parent = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut temp_file = NamedTempFile::new_in(parent)?;
    for entry in history {
        write_block(&mut temp_file, &format_entry(entry))?;
    }
    temp_file.flush()?;
    temp_file.as_file().sync_all()?;
    temp_file.persist(path)?;
    Ok(())
}
