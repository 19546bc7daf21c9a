pub mod data;
pub mod defaults;
pub mod io;
pub mod merge;
pub mod printing;
pub mod registry;
pub mod store;

pub use data::{AgentProfile, AgentView, Configuration, McpServer, ModelProfile, ModelView};
pub use io::ConfigError;
pub use registry::SelectionError;
pub use store::{ConfigStore, TokenSource};
