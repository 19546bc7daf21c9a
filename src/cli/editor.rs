//! External editor integration
//!
//! Builds a prompt from the message and context, prints it for pasting into
//! the editor's chat panel, and opens the workspace in the editor.

use crate::cli::chat::assemble_context;
use crate::core::config::ConfigStore;
use crate::core::context::{ContextBundle, Decoding};
use std::error::Error;
use std::io;
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::debug;

/// Starts external programs on behalf of the editor command.
pub trait ProcessLauncher {
    /// Whether `program` can be run at all.
    fn is_available(&self, program: &str) -> bool;

    /// Runs `program` to completion and reports whether it succeeded.
    fn launch(&self, program: &str, args: &[String]) -> io::Result<bool>;
}

pub struct SystemLauncher;

impl ProcessLauncher for SystemLauncher {
    fn is_available(&self, program: &str) -> bool {
        Command::new(program)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }

    fn launch(&self, program: &str, args: &[String]) -> io::Result<bool> {
        Ok(Command::new(program).args(args).status()?.success())
    }
}

pub fn run_editor<L: ProcessLauncher>(
    store: &ConfigStore,
    launcher: &L,
    editor: &str,
    workspace: &Path,
    message: &str,
    files: &[String],
    include_workspace: bool,
) -> Result<(), Box<dyn Error>> {
    if !launcher.is_available(editor) {
        return Err(format!(
            "Editor command '{editor}' was not found in PATH. Install it or pass --editor <command>."
        )
        .into());
    }

    let bundle = assemble_context(
        store.configuration(),
        workspace,
        files,
        include_workspace,
        Decoding::Lossy,
    );
    let prompt = build_prompt(message, &bundle, include_workspace);

    println!("Opening {editor} in {}", workspace.display());
    println!("Paste this into the chat panel:");
    println!("{}", "-".repeat(60));
    println!("{prompt}");
    println!("{}", "-".repeat(60));

    debug!(editor, files = bundle.files.len(), "launching editor");
    if !launcher.launch(editor, &[workspace.display().to_string()])? {
        return Err(format!("{editor} exited with an error").into());
    }
    println!("✅ {editor} opened");
    Ok(())
}

/// Workspace summary first, then fenced file blocks, then the message.
pub fn build_prompt(message: &str, bundle: &ContextBundle, include_workspace: bool) -> String {
    let mut sections = Vec::new();

    if include_workspace {
        sections.push(workspace_summary(bundle));
    }

    for file in &bundle.files {
        let fence = Path::new(&file.path)
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();
        sections.push(format!(
            "File: {}\n```{fence}\n{}\n```",
            file.path,
            file.content.trim_end_matches('\n')
        ));
    }

    sections.push(message.to_string());
    sections.join("\n\n")
}

fn workspace_summary(bundle: &ContextBundle) -> String {
    let mut lines = vec![format!("Workspace: {}", bundle.workspace_path.display())];
    if let Some(kind) = bundle.project_type() {
        lines.push(format!("Project type: {kind}"));
    }
    if let Some(count) = bundle.workspace_info.get("file_count").and_then(|v| v.as_u64()) {
        lines.push(format!("Files: {count}"));
    }
    if let Some(languages) = bundle
        .workspace_info
        .get("languages")
        .and_then(|v| v.as_object())
        .filter(|languages| !languages.is_empty())
    {
        let summary: Vec<String> = languages
            .iter()
            .map(|(language, count)| format!("{language} ({count})"))
            .collect();
        lines.push(format!("Languages: {}", summary.join(", ")));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::context::ContextFile;
    use serde_json::json;
    use std::cell::RefCell;
    use std::fs;
    use tempfile::TempDir;

    struct FakeLauncher {
        available: bool,
        succeeds: bool,
        launched: RefCell<Vec<(String, Vec<String>)>>,
    }

    impl FakeLauncher {
        fn new(available: bool, succeeds: bool) -> Self {
            Self {
                available,
                succeeds,
                launched: RefCell::new(Vec::new()),
            }
        }
    }

    impl ProcessLauncher for FakeLauncher {
        fn is_available(&self, _program: &str) -> bool {
            self.available
        }

        fn launch(&self, program: &str, args: &[String]) -> io::Result<bool> {
            self.launched
                .borrow_mut()
                .push((program.to_string(), args.to_vec()));
            Ok(self.succeeds)
        }
    }

    #[test]
    fn prompt_fences_files_before_message() {
        let bundle = ContextBundle::new("/ws")
            .with_file(ContextFile::new("src/app.py", "print('hi')\n"))
            .with_file(ContextFile::new("Makefile", "all:"));

        let prompt = build_prompt("Explain this", &bundle, false);

        assert_eq!(
            prompt,
            "File: src/app.py\n```py\nprint('hi')\n```\n\n\
             File: Makefile\n```\nall:\n```\n\n\
             Explain this"
        );
    }

    #[test]
    fn prompt_includes_workspace_summary_when_requested() {
        let info = json!({
            "project_info": {"type": "rust", "markers": ["Cargo.toml"]},
            "file_count": 12,
            "languages": {"rust": 10, "toml": 2},
        });
        let bundle = ContextBundle::new("/ws")
            .with_workspace_info(info.as_object().cloned().unwrap());

        let prompt = build_prompt("hi", &bundle, true);

        assert!(prompt.starts_with(
            "Workspace: /ws\nProject type: rust\nFiles: 12\nLanguages: rust (10), toml (2)"
        ));
        assert!(prompt.ends_with("\n\nhi"));
    }

    #[test]
    fn missing_editor_is_reported_without_launching() {
        let temp_dir = TempDir::new().unwrap();
        let store = ConfigStore::load(temp_dir.path().join("config.json")).unwrap();
        let launcher = FakeLauncher::new(false, true);

        let result = run_editor(&store, &launcher, "code", temp_dir.path(), "hi", &[], false);

        assert!(result.unwrap_err().to_string().contains("'code' was not found"));
        assert!(launcher.launched.borrow().is_empty());
    }

    #[test]
    fn editor_opens_the_workspace() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("notes.md"), [b'o', b'k', 0xff]).unwrap();
        let store = ConfigStore::load(temp_dir.path().join("config.json")).unwrap();
        let launcher = FakeLauncher::new(true, true);

        run_editor(
            &store,
            &launcher,
            "code",
            temp_dir.path(),
            "review",
            &["notes.md".to_string()],
            true,
        )
        .unwrap();

        let launched = launcher.launched.borrow();
        assert_eq!(launched.len(), 1);
        assert_eq!(launched[0].0, "code");
        assert_eq!(launched[0].1, vec![temp_dir.path().display().to_string()]);
    }

    #[test]
    fn failing_editor_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let store = ConfigStore::load(temp_dir.path().join("config.json")).unwrap();
        let launcher = FakeLauncher::new(true, false);

        let result = run_editor(&store, &launcher, "vim", temp_dir.path(), "hi", &[], false);

        assert!(result.is_err());
    }
}
