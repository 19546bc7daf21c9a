use crate::core::config::data::Configuration;
use crate::core::config::defaults::FALLBACK_MODEL_ID;

impl Configuration {
    pub fn print_all(&self) {
        println!("Current configuration:");
        println!(
            "  default-model: {}",
            self.default_model_id().unwrap_or(FALLBACK_MODEL_ID)
        );
        println!("  default-agent: {}", self.default_agent_id());
        match self.get_f64("chat.temperature") {
            Some(temperature) => println!("  temperature: {temperature}"),
            None => println!("  temperature: (unset)"),
        }
        match self.get_u64("chat.max_context_size") {
            Some(size) => println!("  max-context-size: {size}"),
            None => println!("  max-context-size: (unset)"),
        }
        match self.get_str("auth.token").filter(|token| !token.is_empty()) {
            Some(token) => println!("  token: {}", mask_token(token)),
            None => println!("  token: (unset)"),
        }
        let include = self.get_str_list("workspace.include_patterns");
        if include.is_empty() {
            println!("  include-patterns: (none set)");
        } else {
            println!("  include-patterns: {}", include.join(" "));
        }
        let exclude = self.get_str_list("workspace.exclude_patterns");
        if exclude.is_empty() {
            println!("  exclude-patterns: (none set)");
        } else {
            println!("  exclude-patterns: {}", exclude.join(" "));
        }
        match self.get_u64("workspace.max_file_size") {
            Some(size) => println!("  max-file-size: {size} bytes"),
            None => println!("  max-file-size: (unlimited)"),
        }
        println!("  models: {}", self.model_registry().len());
        println!("  agents: {}", self.agent_registry().len());
        let servers = self.mcp_server_registry();
        let enabled = servers.iter().filter(|server| server.enabled).count();
        println!("  mcp-servers: {} ({enabled} enabled)", servers.len());
    }
}

/// Shows the first and last four characters of a token.
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}…{tail}")
}
