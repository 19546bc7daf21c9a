use crate::core::config::ConfigStore;
use std::error::Error;

pub fn list_mcp_servers(store: &ConfigStore) {
    println!("🔌 MCP Servers");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!();

    let servers = store.list_mcp_servers();
    if servers.is_empty() {
        println!("  (no servers registered under mcp.servers)");
    }
    for server in servers {
        let state = if server.enabled { "enabled" } else { "disabled" };
        println!("  • {} {} [{state}]", server.id, server.name);
        if !server.description.is_empty() {
            println!("    {}", server.description);
        }
    }
    println!();
    println!("Toggle a server with: codemate mcp enable|disable <id>");
}

pub fn set_mcp_server(
    store: &mut ConfigStore,
    server_id: &str,
    enabled: bool,
) -> Result<(), Box<dyn Error>> {
    store.set_mcp_server_enabled(server_id, enabled)?;
    let verb = if enabled { "Enabled" } else { "Disabled" };
    println!("✅ {verb} MCP server: {server_id}");
    Ok(())
}
