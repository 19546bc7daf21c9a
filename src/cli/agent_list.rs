use crate::core::config::ConfigStore;
use std::error::Error;

pub fn list_agents(store: &ConfigStore) {
    println!("🧭 Available Agents");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!();

    for view in store.list_agents() {
        let marker = if view.is_default { " (default)" } else { "" };
        println!("  • {} {}{marker}", view.agent.id, view.agent.name);
        if !view.agent.description.is_empty() {
            println!("    {}", view.agent.description);
        }
    }
    println!();
    println!("Change the default with: codemate set-agent <id>");
}

pub fn set_agent(store: &mut ConfigStore, agent_id: &str) -> Result<(), Box<dyn Error>> {
    store.set_default_agent(agent_id)?;
    println!("✅ Set default-agent to: {agent_id}");
    Ok(())
}
