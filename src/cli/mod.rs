//! Command-line interface parsing and handling
//!
//! This module handles parsing command-line arguments and executing the appropriate commands.

pub mod agent_list;
pub mod auth;
pub mod chat;
pub mod config_cmd;
pub mod editor;
pub mod interactive;
pub mod mcp_list;
pub mod model_list;

use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::warn;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::agent_list::{list_agents, set_agent};
use crate::cli::auth::{auth_login, auth_logout, auth_status, run_setup};
use crate::cli::chat::run_chat;
use crate::cli::config_cmd::run_config_command;
use crate::cli::editor::{run_editor, SystemLauncher};
use crate::cli::interactive::run_interactive;
use crate::cli::mcp_list::{list_mcp_servers, set_mcp_server};
use crate::cli::model_list::{list_models, set_model};
use crate::core::config::io::default_config_path;
use crate::core::config::ConfigStore;

pub const EXIT_FAILURE: i32 = 1;
pub const EXIT_INTERRUPT: i32 = 130;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("VERGEN_GIT_DESCRIBE"),
    ", built ",
    env!("VERGEN_BUILD_DATE"),
    ")"
);

#[derive(Parser)]
#[command(name = "codemate", version, long_version = LONG_VERSION)]
#[command(about = "A command-line coding companion that answers questions about your workspace")]
#[command(
    long_about = "Codemate answers questions about your code from the terminal. Attach files \
with --file and add --context to include a summary of the workspace.\n\n\
Authentication:\n\
  Run 'codemate setup' or 'codemate auth login' to store a token.\n\n\
Environment Variables:\n\
  CODEMATE_TOKEN    Token used instead of the stored one\n\
  RUST_LOG          Diagnostic log filter (defaults to warn)\n\n\
Interactive commands:\n\
  /help             Show available commands\n\
  /file <path>      Attach a file to the following messages\n\
  /log <filename>   Enable logging to specified file\n\
  /log              Toggle logging pause/resume"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file to use instead of the per-user default
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Workspace root for resolving files (defaults to the current directory)
    #[arg(short = 'w', long, global = true, value_name = "DIR")]
    pub workspace: Option<PathBuf>,

    /// Show debug diagnostics on stderr
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ask a single question
    Chat {
        /// The message to send
        message: String,
        /// File to include as context (repeatable)
        #[arg(short = 'f', long = "file", value_name = "FILE")]
        files: Vec<String>,
        /// Include workspace context
        #[arg(short = 'c', long)]
        context: bool,
        /// Agent to address
        #[arg(short = 'a', long)]
        agent: Option<String>,
        /// Model to use
        #[arg(short = 'm', long)]
        model: Option<String>,
    },
    /// Start an interactive session
    Interactive {
        #[arg(short = 'a', long)]
        agent: Option<String>,
        #[arg(short = 'm', long)]
        model: Option<String>,
        /// Enable logging to specified file
        #[arg(short = 'l', long, value_name = "FILE")]
        log: Option<PathBuf>,
    },
    /// List registered models
    ListModels,
    /// Set the default model
    SetModel { model_id: String },
    /// List registered agents
    ListAgents,
    /// Set the default agent
    SetAgent { agent_id: String },
    /// Manage MCP (Model Context Protocol) servers
    Mcp {
        #[command(subcommand)]
        command: McpCommands,
    },
    /// Store a token and run a self-test
    Setup {
        #[arg(long)]
        token: Option<String>,
    },
    /// Manage authentication
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },
    /// Inspect or change configuration values
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Open the workspace in an editor with a prepared prompt
    Editor {
        message: String,
        #[arg(short = 'f', long = "file", value_name = "FILE")]
        files: Vec<String>,
        #[arg(short = 'c', long)]
        context: bool,
        /// Editor command to launch
        #[arg(long, default_value = "code")]
        editor: String,
    },
}

#[derive(Subcommand)]
pub enum McpCommands {
    /// List registered MCP servers
    List,
    /// Enable an MCP server
    Enable { server_id: String },
    /// Disable an MCP server
    Disable { server_id: String },
}

#[derive(Subcommand)]
pub enum AuthCommands {
    /// Store a token
    Login {
        #[arg(long)]
        token: Option<String>,
    },
    /// Show authentication status
    Status,
    /// Remove the stored token
    Logout,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print a summary of the configuration
    Show,
    /// Print the value at a dotted key
    Get { key: String },
    /// Set a dotted key; the value is parsed as JSON when possible
    Set {
        key: String,
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
    /// Restore the built-in defaults
    Reset,
    /// Write the configuration to a file
    Export { path: PathBuf },
    /// Merge a configuration file into the current one
    Import { path: PathBuf },
}

pub fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_tracing(args.verbose);
    if let Err(err) = install_interrupt_handler() {
        warn!(error = %err, "could not install the Ctrl+C handler");
    }

    if let Err(err) = run(args) {
        eprintln!("❌ {err}");
        std::process::exit(EXIT_FAILURE);
    }
    Ok(())
}

/// Exits with [`EXIT_INTERRUPT`] on Ctrl+C, from a dedicated signal thread.
///
/// Config writes go through a temp file and a rename, so exiting mid-command
/// never leaves a partial file behind.
fn install_interrupt_handler() -> std::io::Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_io()
        .build()?;

    #[cfg(unix)]
    let mut interrupts = {
        use tokio::signal::unix::{signal, SignalKind};
        let _guard = runtime.enter();
        signal(SignalKind::interrupt())?
    };

    std::thread::Builder::new()
        .name("interrupt".to_string())
        .spawn(move || {
            runtime.block_on(async move {
                #[cfg(unix)]
                let received = interrupts.recv().await.is_some();
                #[cfg(not(unix))]
                let received = tokio::signal::ctrl_c().await.is_ok();

                if received {
                    eprintln!("\nOperation cancelled by user.");
                    std::process::exit(EXIT_INTERRUPT);
                }
            })
        })?;
    Ok(())
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

pub fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let mut store = open_store(args.config)?;
    let workspace = match args.workspace {
        Some(workspace) => workspace,
        None => std::env::current_dir()?,
    };

    match args.command {
        Commands::Chat {
            message,
            files,
            context,
            agent,
            model,
        } => run_chat(
            &store,
            &workspace,
            &message,
            &files,
            context,
            agent.as_deref(),
            model.as_deref(),
        ),
        Commands::Interactive { agent, model, log } => {
            run_interactive(&store, workspace, agent, model, log)
        }
        Commands::ListModels => {
            list_models(&store);
            Ok(())
        }
        Commands::SetModel { model_id } => set_model(&mut store, &model_id),
        Commands::ListAgents => {
            list_agents(&store);
            Ok(())
        }
        Commands::SetAgent { agent_id } => set_agent(&mut store, &agent_id),
        Commands::Mcp { command } => match command {
            McpCommands::List => {
                list_mcp_servers(&store);
                Ok(())
            }
            McpCommands::Enable { server_id } => set_mcp_server(&mut store, &server_id, true),
            McpCommands::Disable { server_id } => set_mcp_server(&mut store, &server_id, false),
        },
        Commands::Setup { token } => run_setup(&mut store, &workspace, token),
        Commands::Auth { command } => match command {
            AuthCommands::Login { token } => auth_login(&mut store, token),
            AuthCommands::Status => {
                auth_status(&store);
                Ok(())
            }
            AuthCommands::Logout => auth_logout(&mut store),
        },
        Commands::Config { command } => run_config_command(&mut store, command),
        Commands::Editor {
            message,
            files,
            context,
            editor,
        } => run_editor(
            &store,
            &SystemLauncher,
            &editor,
            &workspace,
            &message,
            &files,
            context,
        ),
    }
}

fn open_store(config: Option<PathBuf>) -> Result<ConfigStore, Box<dyn Error>> {
    let path = match config {
        Some(path) => path,
        None => default_config_path().ok_or("could not determine the configuration directory")?,
    };
    Ok(ConfigStore::load(path)?)
}
