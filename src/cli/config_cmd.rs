use crate::cli::ConfigCommands;
use crate::core::config::data::path_display;
use crate::core::config::defaults::{DEFAULT_AGENT_KEY, DEFAULT_MODEL_KEY};
use crate::core::config::ConfigStore;
use serde_json::Value;
use std::error::Error;

pub fn run_config_command(
    store: &mut ConfigStore,
    command: ConfigCommands,
) -> Result<(), Box<dyn Error>> {
    match command {
        ConfigCommands::Show => {
            println!("File: {}", path_display(store.path()));
            store.configuration().print_all();
        }
        ConfigCommands::Get { key } => {
            let value = store
                .get(&key)
                .ok_or_else(|| format!("No configuration value at '{key}'"))?;
            println!("{}", render_value(value)?);
        }
        // The default model and agent must stay registered, so they go
        // through the same checks as set-model and set-agent.
        ConfigCommands::Set { key, value } if key == DEFAULT_MODEL_KEY => {
            store.set_default_model(&value)?;
            println!("✅ Set {key} to: {value}");
        }
        ConfigCommands::Set { key, value } if key == DEFAULT_AGENT_KEY => {
            store.set_default_agent(&value)?;
            println!("✅ Set {key} to: {value}");
        }
        ConfigCommands::Set { key, value } => {
            let parsed = parse_value(&value);
            store.set(&key, parsed.clone())?;
            println!("✅ Set {key} to: {}", render_value(&parsed)?);
        }
        ConfigCommands::Reset => {
            store.reset()?;
            println!("✅ Configuration reset to defaults");
        }
        ConfigCommands::Export { path } => {
            store.export(&path)?;
            println!("✅ Configuration exported to {}", path.display());
        }
        ConfigCommands::Import { path } => {
            store.import(&path)?;
            println!("✅ Configuration imported from {}", path.display());
        }
    }
    Ok(())
}

/// JSON literals are taken as typed values; anything else is a string.
fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn render_value(value: &Value) -> Result<String, serde_json::Error> {
    match value {
        Value::String(text) => Ok(text.clone()),
        other => serde_json::to_string_pretty(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn values_parse_as_json_when_possible() {
        assert_eq!(parse_value("0.5"), json!(0.5));
        assert_eq!(parse_value("false"), json!(false));
        assert_eq!(parse_value("[\"*.py\"]"), json!(["*.py"]));
        assert_eq!(parse_value("gpt-4o"), json!("gpt-4o"));
        assert_eq!(parse_value("\"quoted\""), json!("quoted"));
    }

    #[test]
    fn set_then_get_through_commands() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = ConfigStore::load(temp_dir.path().join("config.json")).unwrap();

        run_config_command(
            &mut store,
            ConfigCommands::Set {
                key: "chat.temperature".to_string(),
                value: "0.4".to_string(),
            },
        )
        .unwrap();

        assert_eq!(store.get("chat.temperature"), Some(&json!(0.4)));
        let missing = run_config_command(
            &mut store,
            ConfigCommands::Get {
                key: "chat.nope".to_string(),
            },
        );
        assert!(missing.is_err());
    }

    #[test]
    fn export_and_import_round_trip_a_setting() {
        let temp_dir = TempDir::new().unwrap();
        let exported = temp_dir.path().join("exported.json");
        let mut first = ConfigStore::load(temp_dir.path().join("first.json")).unwrap();
        first.set("ui.show_typing_indicator", false).unwrap();
        run_config_command(&mut first, ConfigCommands::Export { path: exported.clone() }).unwrap();

        let mut second = ConfigStore::load(temp_dir.path().join("second.json")).unwrap();
        run_config_command(&mut second, ConfigCommands::Import { path: exported }).unwrap();

        assert_eq!(second.get("ui.show_typing_indicator"), Some(&json!(false)));
    }

    #[test]
    fn set_validates_default_model_and_agent() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = ConfigStore::load(temp_dir.path().join("config.json")).unwrap();
        let set = |key: &str, value: &str| ConfigCommands::Set {
            key: key.to_string(),
            value: value.to_string(),
        };

        let err = run_config_command(&mut store, set("chat.default_model", "bogus")).unwrap_err();
        assert!(err.to_string().contains("Unknown model 'bogus'"));
        assert_eq!(store.configuration().default_model_id(), Some("gpt-4o-mini"));

        let err = run_config_command(&mut store, set("chat.default_agent", "nobody")).unwrap_err();
        assert!(err.to_string().contains("Unknown agent 'nobody'"));
        assert_eq!(store.configuration().default_agent_id(), "workspace");

        run_config_command(&mut store, set("chat.default_model", "o1-mini")).unwrap();
        run_config_command(&mut store, set("chat.default_agent", "terminal")).unwrap();
        assert_eq!(store.configuration().default_model_id(), Some("o1-mini"));
        assert_eq!(store.configuration().default_agent_id(), "terminal");
    }
}
