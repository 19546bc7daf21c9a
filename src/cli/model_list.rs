//! Model listing functionality
//!
//! This module handles listing and selecting the registered model profiles.

use crate::core::config::{ConfigStore, ModelView};
use std::error::Error;

pub fn list_models(store: &ConfigStore) {
    let models = store.list_models();

    println!("🤖 Available Models");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!();

    if models.is_empty() {
        println!("No models registered. Add entries under chat.available_models.");
        return;
    }

    for view in &models {
        print!("{}", format_model(view));
    }
    println!("Change the default with: codemate set-model <id>");
}

fn format_model(view: &ModelView) -> String {
    let profile = &view.profile;
    let marker = if view.is_default { " (default)" } else { "" };
    let mut text = format!("  • {}{marker}\n", profile.id);
    if profile.name != profile.id {
        text.push_str(&format!("    Name: {}\n", profile.name));
    }
    if !profile.family.is_empty() {
        text.push_str(&format!("    Family: {}\n", profile.family));
    }
    if !profile.description.is_empty() {
        text.push_str(&format!("    {}\n", profile.description));
    }

    let mut capabilities = Vec::new();
    if profile.supports_tools {
        capabilities.push("tools");
    }
    if profile.supports_vision {
        capabilities.push("vision");
    }
    text.push_str(&format!("    Max tokens: {}", profile.max_tokens));
    if !capabilities.is_empty() {
        text.push_str(&format!(" · {}", capabilities.join(", ")));
    }
    text.push_str("\n\n");
    text
}

pub fn set_model(store: &mut ConfigStore, model_id: &str) -> Result<(), Box<dyn Error>> {
    store.set_default_model(model_id)?;
    println!("✅ Set default-model to: {model_id}");
    Ok(())
}
