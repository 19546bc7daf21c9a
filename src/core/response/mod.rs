//! Reply synthesis: persona first, then intent, then file language.

mod templates;

use crate::core::config::ModelProfile;
use crate::core::context::ContextBundle;
use crate::core::intent::Intent;
use crate::core::persona::Persona;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub content: String,
    /// Paths of the files the reply was built from.
    pub references: Vec<String>,
}

/// Builds the reply for one request.
///
/// Claude, Gemini and o1 profiles answer with a fixed template and reference
/// no files. Every other profile follows `intent`, and the reply references
/// all files in `bundle`. Explain, Fix and Refactor only look at the first file.
pub fn generate(
    intent: Intent,
    bundle: &ContextBundle,
    profile: &ModelProfile,
    message: &str,
) -> Reply {
    if let Some(content) = Persona::for_model(&profile.id).fixed_reply(profile) {
        return Reply {
            content,
            references: Vec::new(),
        };
    }

    let primary = bundle.files.first();
    let content = match intent {
        Intent::Greet => templates::greet(bundle),
        Intent::Explain => templates::explain(primary),
        Intent::Fix => templates::fix(primary),
        Intent::Refactor => templates::refactor(primary),
        Intent::Create => templates::create(message, bundle),
        Intent::Test => templates::test(bundle),
        Intent::General => templates::general(message, bundle),
    };

    Reply {
        content,
        references: bundle.references(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::context::ContextFile;
    use crate::utils::test_utils::{project_info, python_bundle};

    fn gpt() -> ModelProfile {
        ModelProfile::placeholder("gpt-4o-mini")
    }

    #[test]
    fn explain_references_the_file() {
        let reply = generate(Intent::Explain, &python_bundle(), &gpt(), "explain");
        assert_eq!(reply.references, vec!["a.py"]);
        assert!(reply.content.contains("a.py"));
        assert!(reply.content.contains("Python"));
    }

    #[test]
    fn fixed_personas_ignore_intent_and_files() {
        let bundle = python_bundle();
        for id in ["claude-3.5-sonnet", "gemini-1.5-pro", "o1-preview"] {
            let profile = ModelProfile::placeholder(id);
            let explain = generate(Intent::Explain, &bundle, &profile, "explain");
            let fix = generate(Intent::Fix, &bundle, &profile, "fix");
            assert!(explain.references.is_empty());
            assert_eq!(explain.content, fix.content);
        }
    }

    #[test]
    fn every_intent_references_all_files() {
        let bundle = python_bundle().with_file(ContextFile::new("b.js", "let x = 1;"));
        for intent in [
            Intent::Explain,
            Intent::Greet,
            Intent::Create,
            Intent::Fix,
            Intent::Test,
            Intent::Refactor,
            Intent::General,
        ] {
            let reply = generate(intent, &bundle, &gpt(), "anything");
            assert_eq!(reply.references, vec!["a.py", "b.js"], "{intent}");
        }
    }

    #[test]
    fn explain_without_files_asks_for_one() {
        let reply = generate(
            Intent::Explain,
            &ContextBundle::new("/ws"),
            &gpt(),
            "explain this",
        );
        assert!(reply.references.is_empty());
        assert!(reply.content.contains("--file"));
    }

    #[test]
    fn greet_mentions_workspace_and_project_type() {
        let bundle = ContextBundle::new("/work/demo").with_workspace_info(project_info("nodejs"));
        let reply = generate(Intent::Greet, &bundle, &gpt(), "hello");
        assert!(reply.content.contains("/work/demo"));
        assert!(reply.content.contains("Project type: Nodejs"));

        let unknown = ContextBundle::new("/work/demo").with_workspace_info(project_info("unknown"));
        let reply = generate(Intent::Greet, &unknown, &gpt(), "hello");
        assert!(!reply.content.contains("Project type"));
    }

    #[test]
    fn create_function_specializes_for_python_projects() {
        let python = ContextBundle::new("/ws").with_workspace_info(project_info("python"));
        let reply = generate(Intent::Create, &python, &gpt(), "create a function");
        assert!(reply.content.contains("```python"));

        let reply = generate(Intent::Create, &ContextBundle::new("/ws"), &gpt(), "create a function");
        assert!(!reply.content.contains("```python"));
    }

    #[test]
    fn test_reply_follows_project_type_and_lists_three_files() {
        let mut bundle = ContextBundle::new("/ws").with_workspace_info(project_info("nodejs"));
        for name in ["a.js", "b.js", "c.js", "d.js"] {
            bundle = bundle.with_file(ContextFile::new(name, ""));
        }

        let reply = generate(Intent::Test, &bundle, &gpt(), "write tests");
        assert!(reply.content.contains("Jest"));
        assert!(reply.content.contains("- `c.js` (Javascript)"));
        assert!(!reply.content.contains("d.js"));
        assert_eq!(reply.references.len(), 4);

        let python = ContextBundle::new("/ws").with_workspace_info(project_info("python"));
        let reply = generate(Intent::Test, &python, &gpt(), "write tests");
        assert!(reply.content.contains("unittest"));
        assert!(!reply.content.contains("Files to test"));
    }

    #[test]
    fn general_echoes_the_message() {
        let reply = generate(Intent::General, &python_bundle(), &gpt(), "summarize");
        assert!(reply.content.contains("\"summarize\""));
        assert!(reply.content.contains("/work/demo"));
    }
}
