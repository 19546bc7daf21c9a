use crate::core::config::defaults::{default_tree, DEFAULT_MAX_TOKENS};
use crate::core::config::io::ConfigError;
use crate::core::config::merge::{assign, deep_merge, lookup};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::warn;

/// The full configuration tree.
///
/// Logically namespaced into `auth`, `chat`, `workspace`, `mcp` and `ui`; unknown
/// keys are preserved so hand-edited files round-trip.
#[derive(Debug, Clone, PartialEq)]
pub struct Configuration {
    tree: Map<String, Value>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self { tree: default_tree() }
    }
}

impl Configuration {
    /// Builds a configuration by merging `loaded` over the compiled-in defaults.
    pub fn merged_over_defaults(loaded: Map<String, Value>) -> Self {
        let mut tree = default_tree();
        deep_merge(&mut tree, loaded);
        Self { tree }
    }

    pub fn tree(&self) -> &Map<String, Value> {
        &self.tree
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        lookup(&self.tree, key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.get(key).and_then(Value::as_u64)
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(Value::as_f64)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    /// Reads a list of strings, skipping non-string entries.
    pub fn get_str_list(&self, key: &str) -> Vec<String> {
        self.get(key)
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| item.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn set(&mut self, key: &str, value: Value) -> Result<(), ConfigError> {
        assign(&mut self.tree, key, value)
    }

    pub fn merge(&mut self, overlay: Map<String, Value>) {
        deep_merge(&mut self.tree, overlay);
    }

    /// Registered model profiles in file order.
    pub fn model_registry(&self) -> Vec<ModelProfile> {
        registry_entries(self.get("chat.available_models"), "model")
            .filter_map(|(id, value)| ModelProfile::from_entry(id, value))
            .collect()
    }

    pub fn find_model(&self, id: &str) -> Option<ModelProfile> {
        let value = self.get("chat.available_models")?.as_object()?.get(id)?;
        ModelProfile::from_entry(id, value)
    }

    /// Registered agents in file order.
    pub fn agent_registry(&self) -> Vec<AgentProfile> {
        registry_entries(self.get("chat.available_agents"), "agent")
            .filter_map(|(id, value)| AgentProfile::from_entry(id, value))
            .collect()
    }

    pub fn find_agent(&self, id: &str) -> Option<AgentProfile> {
        let value = self.get("chat.available_agents")?.as_object()?.get(id)?;
        AgentProfile::from_entry(id, value)
    }

    /// Registered MCP servers in file order.
    pub fn mcp_server_registry(&self) -> Vec<McpServer> {
        registry_entries(self.get("mcp.servers"), "MCP server")
            .filter_map(|(id, value)| McpServer::from_entry(id, value))
            .collect()
    }

    pub fn find_mcp_server(&self, id: &str) -> Option<McpServer> {
        let value = self.get("mcp.servers")?.as_object()?.get(id)?;
        McpServer::from_entry(id, value)
    }
}

fn registry_entries<'a>(
    registry: Option<&'a Value>,
    kind: &'static str,
) -> impl Iterator<Item = (&'a str, &'a Value)> {
    let entries = match registry {
        Some(Value::Object(map)) => Some(map),
        Some(_) => {
            warn!("ignoring {kind} registry that is not an object");
            None
        }
        None => None,
    };
    entries
        .into_iter()
        .flat_map(|map| map.iter().map(|(id, value)| (id.as_str(), value)))
}

/// A registered model persona and its limits.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ModelProfile {
    /// Registry key; not stored inside the entry itself.
    #[serde(skip)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub family: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default)]
    pub supports_tools: bool,
    #[serde(default)]
    pub supports_vision: bool,
}

fn default_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}

impl ModelProfile {
    fn from_entry(id: &str, value: &Value) -> Option<Self> {
        match serde_json::from_value::<ModelProfile>(value.clone()) {
            Ok(mut profile) => {
                profile.id = id.to_string();
                if profile.name.is_empty() {
                    profile.name = id.to_string();
                }
                if profile.max_tokens == 0 {
                    profile.max_tokens = DEFAULT_MAX_TOKENS;
                }
                Some(profile)
            }
            Err(err) => {
                warn!(model = id, error = %err, "skipping malformed model profile");
                None
            }
        }
    }

    /// Profile used when nothing in the registry can be resolved.
    pub fn placeholder(id: &str) -> Self {
        Self {
            id: id.to_string(),
            name: id.to_string(),
            family: "unknown".to_string(),
            description: String::new(),
            max_tokens: DEFAULT_MAX_TOKENS,
            supports_tools: false,
            supports_vision: false,
        }
    }
}

/// A model profile annotated for listing.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelView {
    pub profile: ModelProfile,
    pub is_default: bool,
}

/// A chat participant the request can be routed to.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AgentProfile {
    #[serde(skip)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl AgentProfile {
    fn from_entry(id: &str, value: &Value) -> Option<Self> {
        match serde_json::from_value::<AgentProfile>(value.clone()) {
            Ok(mut agent) => {
                agent.id = id.to_string();
                if agent.name.is_empty() {
                    agent.name = format!("@{id}");
                }
                Some(agent)
            }
            Err(err) => {
                warn!(agent = id, error = %err, "skipping malformed agent entry");
                None
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AgentView {
    pub agent: AgentProfile,
    pub is_default: bool,
}

/// An MCP server entry. Only the enabled flag is managed here; codemate
/// does not connect to the servers itself.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct McpServer {
    #[serde(skip)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub enabled: bool,
}

impl McpServer {
    fn from_entry(id: &str, value: &Value) -> Option<Self> {
        match serde_json::from_value::<McpServer>(value.clone()) {
            Ok(mut server) => {
                server.id = id.to_string();
                if server.name.is_empty() {
                    server.name = id.to_string();
                }
                Some(server)
            }
            Err(err) => {
                warn!(server = id, error = %err, "skipping malformed MCP server entry");
                None
            }
        }
    }
}

/// Get a user-friendly display string for a path
/// Converts absolute paths to use ~ notation on Unix-like systems when possible
///
/// # Examples
/// - Unix: `/home/user/.config/codemate/config.json` → `~/.config/codemate/config.json`
/// - macOS: `/Users/user/Library/Application Support/...` → `~/Library/Application Support/...`
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}
