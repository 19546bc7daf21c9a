//! Codemate is a command-line coding companion that answers questions about
//! the files in a workspace.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the configuration store and model registry, context
//!   assembly, intent classification, reply synthesis and the session log.
//! - [`cli`] parses arguments and drives the one-shot, interactive and
//!   editor commands.
//! - [`utils`] holds prompt input and transcript logging helpers.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`], which loads the configuration and calls
//! [`core::chat::ChatInterface`] for every message.

pub mod cli;
pub mod core;
pub mod utils;
