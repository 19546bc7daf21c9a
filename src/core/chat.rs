//! The single entry point the command-line glue calls to answer a message.

use crate::core::config::defaults::DEFAULT_TEMPERATURE;
use crate::core::config::{ConfigStore, ModelProfile};
use crate::core::context::ContextBundle;
use crate::core::intent::classify;
use crate::core::response::{generate, Reply};
use crate::core::session::{SessionLog, SessionLogEntry};
use chrono::{DateTime, Utc};
use std::error::Error as StdError;
use std::fmt;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatError {
    /// No token in the environment or the configuration file.
    NotConfigured { token_var: String },
}

impl fmt::Display for ChatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatError::NotConfigured { token_var } => write!(
                f,
                "Not authenticated. Run `codemate setup` or set {token_var}."
            ),
        }
    }
}

impl StdError for ChatError {}

/// Everything resolved for one message before a reply is synthesized.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub message: String,
    pub agent: String,
    pub model_id: String,
    pub profile: ModelProfile,
    pub context: ContextBundle,
    pub temperature: f64,
    pub max_tokens: u32,
    pub timestamp: DateTime<Utc>,
}

pub struct ChatInterface<'a> {
    config: &'a ConfigStore,
    session: SessionLog,
}

impl<'a> ChatInterface<'a> {
    pub fn new(config: &'a ConfigStore) -> Self {
        Self {
            config,
            session: SessionLog::new(),
        }
    }

    pub fn session(&self) -> &SessionLog {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut SessionLog {
        &mut self.session
    }

    /// Answers `message` and records the exchange in the session log.
    ///
    /// Fails before any synthesis when no token is available.
    pub fn send_message(
        &mut self,
        message: &str,
        context: ContextBundle,
        agent: Option<&str>,
        model: Option<&str>,
    ) -> Result<Reply, ChatError> {
        if !self.config.is_configured() {
            return Err(ChatError::NotConfigured {
                token_var: self.config.token_var().to_string(),
            });
        }

        let request = self.prepare_request(message, context, agent, model);
        let intent = classify(&request.message);
        debug!(
            %intent,
            model = %request.model_id,
            agent = %request.agent,
            files = request.context.files.len(),
            temperature = request.temperature,
            max_tokens = request.max_tokens,
            "synthesizing reply"
        );

        let reply = generate(intent, &request.context, &request.profile, &request.message);

        self.session.append(SessionLogEntry::Request {
            message: request.message,
            context: request.context,
            model_id: request.model_id,
            timestamp: request.timestamp,
        });
        self.session.append(SessionLogEntry::Response {
            content: reply.content.clone(),
            timestamp: Utc::now(),
        });

        Ok(reply)
    }

    fn prepare_request(
        &self,
        message: &str,
        context: ContextBundle,
        agent: Option<&str>,
        model: Option<&str>,
    ) -> ChatRequest {
        let config = self.config.configuration();
        let profile = config.resolve_model(model);
        let max_tokens = if config.find_model(&profile.id).is_some() {
            profile.max_tokens
        } else {
            config
                .get_u64("chat.max_context_size")
                .and_then(|size| u32::try_from(size).ok())
                .filter(|size| *size > 0)
                .unwrap_or(profile.max_tokens)
        };

        ChatRequest {
            message: message.to_string(),
            agent: config.resolve_agent(agent),
            model_id: profile.id.clone(),
            temperature: config
                .get_f64("chat.temperature")
                .unwrap_or(DEFAULT_TEMPERATURE),
            max_tokens,
            profile,
            context,
            timestamp: Utc::now(),
        }
    }
}
