//! Model, agent and MCP server selection on top of the configuration tree.

use crate::core::config::data::{
    AgentProfile, AgentView, Configuration, McpServer, ModelProfile, ModelView,
};
use crate::core::config::defaults::{
    DEFAULT_AGENT_KEY, DEFAULT_MODEL_KEY, FALLBACK_AGENT_ID, FALLBACK_MODEL_ID,
};
use crate::core::config::io::ConfigError;
use crate::core::config::store::ConfigStore;
use serde_json::Value;
use std::error::Error as StdError;
use std::fmt;
use tracing::warn;

/// Errors raised when selecting a model, agent or MCP server by id.
#[derive(Debug)]
pub enum SelectionError {
    UnknownModel { id: String, available: Vec<String> },
    UnknownAgent { id: String, available: Vec<String> },
    UnknownServer { id: String, available: Vec<String> },
    Config(ConfigError),
}

impl fmt::Display for SelectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionError::UnknownModel { id, available } => write!(
                f,
                "Unknown model '{id}'. Available models: {}",
                available.join(", ")
            ),
            SelectionError::UnknownAgent { id, available } => write!(
                f,
                "Unknown agent '{id}'. Available agents: {}",
                available.join(", ")
            ),
            SelectionError::UnknownServer { id, available } => write!(
                f,
                "Unknown MCP server '{id}'. Available servers: {}",
                available.join(", ")
            ),
            SelectionError::Config(err) => write!(f, "{err}"),
        }
    }
}

impl StdError for SelectionError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            SelectionError::Config(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ConfigError> for SelectionError {
    fn from(err: ConfigError) -> Self {
        SelectionError::Config(err)
    }
}

impl Configuration {
    /// `chat.default_model`, when set to a non-empty string.
    pub fn default_model_id(&self) -> Option<&str> {
        self.get_str(DEFAULT_MODEL_KEY).filter(|id| !id.is_empty())
    }

    pub fn default_agent_id(&self) -> &str {
        self.get_str(DEFAULT_AGENT_KEY)
            .filter(|id| !id.is_empty())
            .unwrap_or(FALLBACK_AGENT_ID)
    }

    /// Resolves the profile a request should run with. Never fails.
    ///
    /// The requested id wins, then the configured default, then
    /// [`FALLBACK_MODEL_ID`]. If the chosen id is not registered, the
    /// configured default and then the fallback are tried in turn; when none
    /// is registered a placeholder profile is returned.
    pub fn resolve_model(&self, requested: Option<&str>) -> ModelProfile {
        let default_id = self.default_model_id();
        let chosen = requested
            .filter(|id| !id.is_empty())
            .or(default_id)
            .unwrap_or(FALLBACK_MODEL_ID);

        if let Some(profile) = self.find_model(chosen) {
            return profile;
        }

        for candidate in [default_id, Some(FALLBACK_MODEL_ID)].into_iter().flatten() {
            if let Some(profile) = self.find_model(candidate) {
                warn!(
                    requested = chosen,
                    using = candidate,
                    "model is not registered, falling back"
                );
                return profile;
            }
        }

        warn!(requested = chosen, "no registered model available, using placeholder");
        ModelProfile::placeholder(FALLBACK_MODEL_ID)
    }

    /// Looks up a registered profile, failing with the list of valid ids.
    pub fn require_model(&self, id: &str) -> Result<ModelProfile, SelectionError> {
        self.find_model(id)
            .ok_or_else(|| SelectionError::UnknownModel {
                id: id.to_string(),
                available: self.model_ids(),
            })
    }

    pub fn list_models(&self) -> Vec<ModelView> {
        let default_id = self.default_model_id().unwrap_or(FALLBACK_MODEL_ID);
        self.model_registry()
            .into_iter()
            .map(|profile| ModelView {
                is_default: profile.id == default_id,
                profile,
            })
            .collect()
    }

    /// Requested agent, else the configured default. Unregistered ids pass through.
    pub fn resolve_agent(&self, requested: Option<&str>) -> String {
        let agent = requested
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| self.default_agent_id());
        if self.find_agent(agent).is_none() {
            warn!(agent, "agent is not registered");
        }
        agent.to_string()
    }

    pub fn list_agents(&self) -> Vec<AgentView> {
        let default_id = self.default_agent_id().to_string();
        self.agent_registry()
            .into_iter()
            .map(|agent| AgentView {
                is_default: agent.id == default_id,
                agent,
            })
            .collect()
    }

    fn model_ids(&self) -> Vec<String> {
        self.model_registry().into_iter().map(|p| p.id).collect()
    }

    fn agent_ids(&self) -> Vec<String> {
        self.agent_registry().into_iter().map(|a| a.id).collect()
    }

    fn mcp_server_ids(&self) -> Vec<String> {
        self.mcp_server_registry().into_iter().map(|s| s.id).collect()
    }
}

impl ConfigStore {
    pub fn resolve_model(&self, requested: Option<&str>) -> ModelProfile {
        self.configuration().resolve_model(requested)
    }

    pub fn list_models(&self) -> Vec<ModelView> {
        self.configuration().list_models()
    }

    pub fn resolve_agent(&self, requested: Option<&str>) -> String {
        self.configuration().resolve_agent(requested)
    }

    pub fn list_agents(&self) -> Vec<AgentView> {
        self.configuration().list_agents()
    }

    pub fn find_agent(&self, id: &str) -> Option<AgentProfile> {
        self.configuration().find_agent(id)
    }

    pub fn list_mcp_servers(&self) -> Vec<McpServer> {
        self.configuration().mcp_server_registry()
    }

    /// Makes `id` the default model. Unregistered ids leave the config untouched.
    pub fn set_default_model(&mut self, id: &str) -> Result<(), SelectionError> {
        self.configuration().require_model(id)?;
        self.set(DEFAULT_MODEL_KEY, Value::from(id))?;
        Ok(())
    }

    /// Makes `id` the default agent. Unregistered ids leave the config untouched.
    pub fn set_default_agent(&mut self, id: &str) -> Result<(), SelectionError> {
        if self.configuration().find_agent(id).is_none() {
            return Err(SelectionError::UnknownAgent {
                id: id.to_string(),
                available: self.configuration().agent_ids(),
            });
        }
        self.set(DEFAULT_AGENT_KEY, Value::from(id))?;
        Ok(())
    }

    /// Flips `mcp.servers.<id>.enabled`. Unregistered ids leave the config untouched.
    pub fn set_mcp_server_enabled(&mut self, id: &str, enabled: bool) -> Result<(), SelectionError> {
        if self.configuration().find_mcp_server(id).is_none() {
            return Err(SelectionError::UnknownServer {
                id: id.to_string(),
                available: self.configuration().mcp_server_ids(),
            });
        }
        self.mutate(|config| {
            // Ids may contain dots, so the entry is edited as a whole map.
            let mut servers = config
                .get("mcp.servers")
                .and_then(Value::as_object)
                .cloned()
                .unwrap_or_default();
            if let Some(Value::Object(fields)) = servers.get_mut(id) {
                fields.insert("enabled".to_string(), Value::Bool(enabled));
            }
            config.set("mcp.servers", Value::Object(servers))
        })?;
        Ok(())
    }
}
