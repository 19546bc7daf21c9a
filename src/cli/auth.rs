//! Token storage commands: `setup` and `auth login|status|logout`.

use crate::cli::chat::format_reply;
use crate::core::chat::ChatInterface;
use crate::core::config::data::path_display;
use crate::core::config::printing::mask_token;
use crate::core::config::{ConfigStore, TokenSource};
use crate::core::context::ContextBundle;
use crate::core::response::Reply;
use crate::utils::input::read_prompt_line;
use std::error::Error;
use std::io::{self, BufRead, Write};
use std::path::Path;

pub fn auth_login(store: &mut ConfigStore, token: Option<String>) -> Result<(), Box<dyn Error>> {
    let stdin = io::stdin();
    store_token(store, token, &mut stdin.lock())?;
    println!("✅ Token saved to {}", path_display(store.path()));
    Ok(())
}

/// Stores `token`, prompting on `input` when none was given.
fn store_token<R: BufRead>(
    store: &mut ConfigStore,
    token: Option<String>,
    input: &mut R,
) -> Result<(), Box<dyn Error>> {
    let token = match token {
        Some(token) => token,
        None => {
            print!("🔑 Paste your token: ");
            io::stdout().flush()?;
            read_prompt_line(input)?.unwrap_or_default()
        }
    };
    let token = token.trim();
    if token.is_empty() {
        return Err("Token cannot be empty".into());
    }
    store.set_token(Some(token))?;
    Ok(())
}

pub fn auth_status(store: &ConfigStore) {
    print!("{}", status_report(store));
}

fn status_report(store: &ConfigStore) -> String {
    let config = store.configuration();
    let Some(token) = store.get_token() else {
        return format!(
            "🔒 Not authenticated\n   Run 'codemate auth login' or set {}.\n",
            store.token_var()
        );
    };

    let mut report = String::from("🔓 Authenticated\n");
    match store.token_source() {
        Some(TokenSource::Environment) => {
            report.push_str(&format!("   Source: environment ({})\n", store.token_var()))
        }
        _ => report.push_str(&format!(
            "   Source: config file ({})\n",
            path_display(store.path())
        )),
    }
    if let Some(token_type) = config.get_str("auth.token_type") {
        report.push_str(&format!("   Type: {token_type}\n"));
    }
    if let Some(stamped_at) = config.get_str("auth.authenticated_at") {
        report.push_str(&format!("   Since: {stamped_at}\n"));
    }
    report.push_str(&format!("   Token: {}\n", mask_token(&token)));
    report
}

pub fn auth_logout(store: &mut ConfigStore) -> Result<(), Box<dyn Error>> {
    store.set_token(None)?;
    println!("✅ Stored token removed");
    if store.token_source() == Some(TokenSource::Environment) {
        eprintln!(
            "⚠️  {} is still set and will keep being used.",
            store.token_var()
        );
    }
    Ok(())
}

/// Stores a token if needed, then sends a test message.
pub fn run_setup(
    store: &mut ConfigStore,
    workspace: &Path,
    token: Option<String>,
) -> Result<(), Box<dyn Error>> {
    println!("🛠️  Codemate Setup");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!();

    if token.is_some() || !store.is_configured() {
        auth_login(store, token)?;
    } else {
        println!("✅ Already authenticated");
    }

    println!("Running self-test...");
    let reply = self_test(store, workspace)?;
    println!("{}", format_reply(&reply));
    println!();
    println!("✅ Setup complete. Try: codemate chat \"explain this\" --file <path>");
    Ok(())
}

fn self_test(store: &ConfigStore, workspace: &Path) -> Result<Reply, Box<dyn Error>> {
    let mut chat = ChatInterface::new(store);
    Ok(chat.send_message("Hello", ContextBundle::new(workspace), None, None)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_utils::TestEnvVarGuard;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn store(temp_dir: &TempDir, token_var: &str) -> ConfigStore {
        ConfigStore::load(temp_dir.path().join("config.json"))
            .unwrap()
            .with_token_var(token_var)
    }

    #[test]
    fn prompted_token_is_trimmed_and_stored() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = store(&temp_dir, "CODEMATE_TEST_AUTH_PROMPT");

        store_token(&mut store, None, &mut Cursor::new("  secret-token \n")).unwrap();

        assert_eq!(store.get_token().as_deref(), Some("secret-token"));
    }

    #[test]
    fn empty_token_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = store(&temp_dir, "CODEMATE_TEST_AUTH_EMPTY");

        assert!(store_token(&mut store, None, &mut Cursor::new("\n")).is_err());
        assert!(store_token(&mut store, Some("   ".into()), &mut Cursor::new("")).is_err());
        assert!(!store.is_configured());
    }

    #[test]
    fn status_reports_source_and_masks_token() {
        let temp_dir = TempDir::new().unwrap();
        let var = "CODEMATE_TEST_AUTH_STATUS";
        let mut store = store(&temp_dir, var);
        assert!(status_report(&store).contains("Not authenticated"));

        store.set_token(Some("ghp_1234567890abcd")).unwrap();
        let report = status_report(&store);
        assert!(report.contains("Source: config file"));
        assert!(report.contains("Type: github"));
        assert!(report.contains("Token: ghp_…abcd"));
        assert!(!report.contains("1234567890"));

        let mut guard = TestEnvVarGuard::new();
        guard.set_var(var, "env-token-value");
        assert!(status_report(&store).contains("Source: environment (CODEMATE_TEST_AUTH_STATUS)"));
    }

    #[test]
    fn self_test_requires_a_token() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = store(&temp_dir, "CODEMATE_TEST_AUTH_SELFTEST");
        assert!(self_test(&store, temp_dir.path()).is_err());

        store.set_token(Some("abc")).unwrap();
        let reply = self_test(&store, temp_dir.path()).unwrap();
        assert!(reply.content.contains("Hello"));
    }
}
