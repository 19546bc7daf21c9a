use serde_json::{Map, Value};

/// Model used when neither the caller nor the configuration names a usable one.
pub const FALLBACK_MODEL_ID: &str = "gpt-4o-mini";

/// Agent used when `chat.default_agent` is missing.
pub const FALLBACK_AGENT_ID: &str = "workspace";

/// Token budget applied to profiles that omit `max_tokens` or set it to zero.
pub const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Environment variable that overrides the stored authentication token.
pub const TOKEN_ENV_VAR: &str = "CODEMATE_TOKEN";

/// Value stamped into `auth.token_type` whenever a token is stored.
pub const AUTH_TOKEN_TYPE: &str = "github";

pub const DEFAULT_TEMPERATURE: f64 = 0.1;

/// Keys whose values must name a registered model or agent.
pub const DEFAULT_MODEL_KEY: &str = "chat.default_model";
pub const DEFAULT_AGENT_KEY: &str = "chat.default_agent";

/// Returns the compiled-in configuration tree.
///
/// Every loaded configuration is merged over this tree, so it doubles as the
/// schema: any key present here is guaranteed to exist after a load.
pub fn default_tree() -> Map<String, Value> {
    const CONFIG_CONTENT: &str = include_str!("../../builtins/default_config.json");
    serde_json::from_str(CONFIG_CONTENT).expect("Failed to parse builtins/default_config.json")
}
