//! One-shot `chat` command and the helpers shared with interactive mode.

use crate::core::chat::ChatInterface;
use crate::core::config::{ConfigStore, Configuration};
use crate::core::context::{ContextAssembler, ContextBundle, Decoding, FsFileReader};
use crate::core::response::Reply;
use crate::core::workspace::FsWorkspaceInspector;
use std::error::Error;
use std::path::Path;

pub fn run_chat(
    store: &ConfigStore,
    workspace: &Path,
    message: &str,
    files: &[String],
    include_workspace: bool,
    agent: Option<&str>,
    model: Option<&str>,
) -> Result<(), Box<dyn Error>> {
    if let Some(model) = model {
        store.configuration().require_model(model)?;
    }

    let bundle = assemble_context(
        store.configuration(),
        workspace,
        files,
        include_workspace,
        Decoding::Strict,
    );

    let mut chat = ChatInterface::new(store);
    show_typing_indicator(store.configuration());
    let reply = chat.send_message(message, bundle, agent, model)?;
    print_reply(&reply);
    Ok(())
}

/// Builds the context bundle and reports skipped files on stderr.
pub fn assemble_context(
    config: &Configuration,
    workspace: &Path,
    files: &[String],
    include_workspace: bool,
    decoding: Decoding,
) -> ContextBundle {
    let max_file_size = config
        .get_u64("workspace.max_file_size")
        .filter(|limit| *limit > 0);
    let assembler = ContextAssembler::new(
        FsFileReader::new(decoding),
        FsWorkspaceInspector::from_config(config),
    )
    .with_max_file_size(max_file_size);

    let bundle = assembler.build(workspace, files, include_workspace);
    for skipped in &bundle.skipped {
        eprintln!("⚠️  Skipping {}: {}", skipped.path, skipped.reason);
    }
    bundle
}

pub fn show_typing_indicator(config: &Configuration) {
    if config.get_bool("ui.show_typing_indicator").unwrap_or(true) {
        eprintln!("💭 Thinking...");
    }
}

pub fn format_reply(reply: &Reply) -> String {
    let mut text = reply.content.trim_end().to_string();
    if !reply.references.is_empty() {
        text.push_str(&format!("\n\n📎 References: {}", reply.references.join(", ")));
    }
    text
}

pub fn print_reply(reply: &Reply) {
    println!("{}", format_reply(reply));
}
