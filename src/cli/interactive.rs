//! Read-eval loop for `codemate interactive`.

use crate::cli::chat::{assemble_context, format_reply};
use crate::core::chat::ChatInterface;
use crate::core::config::ConfigStore;
use crate::core::context::Decoding;
use crate::core::session::SessionLogEntry;
use crate::utils::input::read_prompt_line;
use crate::utils::logging::TranscriptLog;
use std::error::Error;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

const HELP_TEXT: &str = "\
Commands:
  /help             Show this help
  /exit, /quit      Leave the session
  /history          Show the conversation so far
  /clear            Forget the conversation
  /file <path>      Attach a file to the following messages
  /files            Detach all files
  /context on|off   Include workspace details in requests
  /model [id]       Show or switch the model
  /log <filename>   Enable logging to specified file
  /log              Toggle logging pause/resume";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

pub struct InteractiveSession<'a> {
    store: &'a ConfigStore,
    chat: ChatInterface<'a>,
    workspace: PathBuf,
    agent: Option<String>,
    model: Option<String>,
    files: Vec<String>,
    include_workspace: bool,
    transcript: TranscriptLog,
}

impl<'a> InteractiveSession<'a> {
    pub fn new(
        store: &'a ConfigStore,
        workspace: PathBuf,
        agent: Option<String>,
        model: Option<String>,
    ) -> Self {
        Self {
            store,
            chat: ChatInterface::new(store),
            workspace,
            agent,
            model,
            files: Vec::new(),
            include_workspace: false,
            transcript: TranscriptLog::disabled(),
        }
    }

    fn active_model(&self) -> String {
        self.store.resolve_model(self.model.as_deref()).id
    }

    /// Handles one line of input, writing any output to `out`.
    pub fn handle_line<W: Write>(&mut self, line: &str, out: &mut W) -> io::Result<Flow> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Flow::Continue);
        }
        match line.strip_prefix('/') {
            Some(command) => self.handle_command(command, out),
            None => {
                self.send(line, out)?;
                Ok(Flow::Continue)
            }
        }
    }

    fn handle_command<W: Write>(&mut self, command: &str, out: &mut W) -> io::Result<Flow> {
        let (name, argument) = match command.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (command, ""),
        };

        match name {
            "exit" | "quit" => return Ok(Flow::Exit),
            "help" => writeln!(out, "{HELP_TEXT}")?,
            "history" => self.print_history(out)?,
            "clear" => {
                self.chat.session_mut().clear();
                writeln!(out, "🧹 Conversation history cleared.")?;
            }
            "file" if argument.is_empty() => writeln!(out, "Usage: /file <path>")?,
            "file" => {
                if self.workspace.join(argument).is_file() {
                    self.files.push(argument.to_string());
                    writeln!(
                        out,
                        "📎 Attached {argument} ({} file(s) attached)",
                        self.files.len()
                    )?;
                } else {
                    writeln!(out, "⚠️  File not found: {argument}")?;
                }
            }
            "files" => {
                self.files.clear();
                writeln!(out, "📎 Detached all files.")?;
            }
            "context" => match argument {
                "on" => {
                    self.include_workspace = true;
                    writeln!(out, "🗂️  Workspace context on.")?;
                }
                "off" => {
                    self.include_workspace = false;
                    writeln!(out, "🗂️  Workspace context off.")?;
                }
                _ => writeln!(out, "Usage: /context on|off")?,
            },
            "model" if argument.is_empty() => {
                writeln!(out, "🤖 Current model: {}", self.active_model())?
            }
            "model" => match self.store.configuration().require_model(argument) {
                Ok(profile) => {
                    writeln!(out, "🤖 Switched to {} ({})", profile.id, profile.name)?;
                    self.model = Some(profile.id);
                }
                Err(err) => writeln!(out, "❌ {err}")?,
            },
            "log" => {
                let result = if argument.is_empty() {
                    self.transcript.toggle_logging()
                } else {
                    self.transcript
                        .set_log_file(argument, &self.chat.session().history())
                };
                match result {
                    Ok(message) => writeln!(out, "📝 {message}")?,
                    Err(err) => writeln!(out, "❌ Logging error: {err}")?,
                }
            }
            other => writeln!(out, "❓ Unknown command /{other}. Type /help for a list.")?,
        }
        Ok(Flow::Continue)
    }

    fn send<W: Write>(&mut self, message: &str, out: &mut W) -> io::Result<()> {
        let bundle = assemble_context(
            self.store.configuration(),
            &self.workspace,
            &self.files,
            self.include_workspace,
            Decoding::Strict,
        );
        match self.chat.send_message(
            message,
            bundle,
            self.agent.as_deref(),
            self.model.as_deref(),
        ) {
            Ok(reply) => {
                writeln!(out, "{}\n", format_reply(&reply))?;
                let history = self.chat.session().history();
                let latest = &history[history.len().saturating_sub(2)..];
                if let Err(err) = self.transcript.log_entries(latest) {
                    writeln!(out, "❌ Logging error: {err}")?;
                }
            }
            Err(err) => writeln!(out, "❌ {err}")?,
        }
        Ok(())
    }

    fn print_history<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let history = self.chat.session().history();
        if history.is_empty() {
            return writeln!(out, "No messages yet.");
        }
        for entry in &history {
            let time = entry.timestamp().format("%H:%M:%S");
            match entry {
                SessionLogEntry::Request {
                    message, model_id, ..
                } => writeln!(out, "[{time}] You ({model_id}): {message}")?,
                SessionLogEntry::Response { content, .. } => {
                    let first_line = content.lines().next().unwrap_or_default();
                    writeln!(out, "[{time}] Assistant: {first_line}")?
                }
            }
        }
        Ok(())
    }
}

/// Runs the loop until `/exit` or end of input.
pub fn run_loop<R: BufRead, W: Write>(
    session: &mut InteractiveSession<'_>,
    input: &mut R,
    out: &mut W,
) -> io::Result<()> {
    loop {
        write!(out, "You> ")?;
        out.flush()?;
        let Some(line) = read_prompt_line(input)? else {
            writeln!(out)?;
            return Ok(());
        };
        if session.handle_line(&line, out)? == Flow::Exit {
            return Ok(());
        }
    }
}

pub fn run_interactive(
    store: &ConfigStore,
    workspace: PathBuf,
    agent: Option<String>,
    model: Option<String>,
    log: Option<PathBuf>,
) -> Result<(), Box<dyn Error>> {
    if let Some(model) = model.as_deref() {
        store.configuration().require_model(model)?;
    }

    let mut session = InteractiveSession::new(store, workspace, agent, model);
    if !store.is_configured() {
        eprintln!(
            "⚠️  No token configured. Run 'codemate setup' or set {} before chatting.",
            store.token_var()
        );
    }
    if let Some(log) = log {
        println!("📝 {}", session.transcript.set_log_file(log, &[])?);
    }

    println!("🤖 Codemate interactive session (model: {})", session.active_model());
    println!("Type /help for commands, /exit to quit.");

    let stdin = io::stdin();
    let stdout = io::stdout();
    run_loop(&mut session, &mut stdin.lock(), &mut stdout.lock())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Cursor;
    use tempfile::TempDir;

    struct Fixture {
        temp_dir: TempDir,
        store: ConfigStore,
    }

    fn fixture(token_var: &str) -> Fixture {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a.py"), "def f(): pass").unwrap();
        let mut store = ConfigStore::load(temp_dir.path().join("config.json"))
            .unwrap()
            .with_token_var(token_var);
        store.set_token(Some("abc")).unwrap();
        Fixture { temp_dir, store }
    }

    fn run_script(session: &mut InteractiveSession<'_>, script: &str) -> String {
        let mut input = Cursor::new(script.to_string());
        let mut out = Vec::new();
        run_loop(session, &mut input, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn attached_files_flow_into_replies() {
        let fx = fixture("CODEMATE_TEST_REPL_FILES");
        let mut session =
            InteractiveSession::new(&fx.store, fx.temp_dir.path().to_path_buf(), None, None);

        let output = run_script(&mut session, "/file a.py\nexplain this\n/exit\n");

        assert!(output.contains("Attached a.py"));
        assert!(output.contains("📎 References: a.py"));
        assert_eq!(session.chat.session().len(), 2);
    }

    #[test]
    fn missing_file_is_not_attached() {
        let fx = fixture("CODEMATE_TEST_REPL_MISSING");
        let mut session =
            InteractiveSession::new(&fx.store, fx.temp_dir.path().to_path_buf(), None, None);

        let output = run_script(&mut session, "/file nope.py\n");

        assert!(output.contains("File not found: nope.py"));
        assert!(session.files.is_empty());
    }

    #[test]
    fn history_clear_and_eof() {
        let fx = fixture("CODEMATE_TEST_REPL_HISTORY");
        let mut session =
            InteractiveSession::new(&fx.store, fx.temp_dir.path().to_path_buf(), None, None);

        let output = run_script(&mut session, "hello\n/history\n/clear\n/history\n");

        assert!(output.contains("You (gpt-4o-mini): hello"));
        assert!(output.contains("Conversation history cleared."));
        assert!(output.contains("No messages yet."));
        assert!(session.chat.session().is_empty());
    }

    #[test]
    fn model_switch_validates_ids() {
        let fx = fixture("CODEMATE_TEST_REPL_MODEL");
        let mut session =
            InteractiveSession::new(&fx.store, fx.temp_dir.path().to_path_buf(), None, None);

        let output = run_script(
            &mut session,
            "/model nonexistent\n/model claude-3.5-sonnet\n/model\nfix it\n",
        );

        assert!(output.contains("Unknown model 'nonexistent'"));
        assert!(output.contains("Current model: claude-3.5-sonnet"));
        assert!(output.contains("Claude"));
        assert!(!output.contains("📎 References"));
    }

    #[test]
    fn context_toggle_and_unknown_commands() {
        let fx = fixture("CODEMATE_TEST_REPL_CONTEXT");
        let mut session =
            InteractiveSession::new(&fx.store, fx.temp_dir.path().to_path_buf(), None, None);

        let output = run_script(&mut session, "/context on\n/bogus\n/context maybe\n");

        assert!(session.include_workspace);
        assert!(output.contains("Unknown command /bogus"));
        assert!(output.contains("Usage: /context on|off"));
    }

    #[test]
    fn log_command_writes_transcript() {
        let fx = fixture("CODEMATE_TEST_REPL_LOG");
        let log_path = fx.temp_dir.path().join("chat.log");
        let mut session =
            InteractiveSession::new(&fx.store, fx.temp_dir.path().to_path_buf(), None, None);

        run_script(
            &mut session,
            &format!("hello\n/log {}\nsummarize\n", log_path.display()),
        );

        let transcript = fs::read_to_string(&log_path).unwrap();
        assert!(transcript.contains("You (gpt-4o-mini): hello"));
        assert!(transcript.contains("You (gpt-4o-mini): summarize"));
    }
}
