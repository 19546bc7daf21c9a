//! Reply templates for the default persona.

use crate::core::context::{ContextBundle, ContextFile};

const CAPABILITIES: &str = "\
- Explain code: \"explain what this function does\"
- Fix bugs: \"fix the error in this file\"
- Create code: \"create a function that parses dates\"
- Write tests: \"write tests for this module\"
- Refactor: \"refactor this to be more readable\"";

/// Language of the file a reply is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SourceLanguage<'a> {
    Python,
    JavaScript,
    Other(&'a str),
}

impl<'a> SourceLanguage<'a> {
    fn of(file: &'a ContextFile) -> Self {
        match file.language.as_str() {
            "python" => SourceLanguage::Python,
            "javascript" => SourceLanguage::JavaScript,
            other => SourceLanguage::Other(other),
        }
    }
}

/// Capitalises the first letter of every alphabetic run. Empty input reads "Unknown".
pub(crate) fn title_case(text: &str) -> String {
    if text.is_empty() {
        return "Unknown".to_string();
    }
    let mut titled = String::with_capacity(text.len());
    let mut in_word = false;
    for ch in text.chars() {
        if ch.is_alphabetic() {
            if in_word {
                titled.extend(ch.to_lowercase());
            } else {
                titled.extend(ch.to_uppercase());
            }
            in_word = true;
        } else {
            titled.push(ch);
            in_word = false;
        }
    }
    titled
}

fn file_header(heading: &str, file: &ContextFile) -> String {
    format!(
        "## {heading} `{path}`\n\n**Language:** {language}\n**Size:** {size} bytes\n",
        path = file.path,
        language = title_case(&file.language),
        size = file.size,
    )
}

pub(crate) fn greet(bundle: &ContextBundle) -> String {
    let mut reply = format!(
        "Hello! I'm your coding companion.\n\nWorkspace: {}\n",
        bundle.workspace_path.display()
    );
    if let Some(kind) = bundle.project_type() {
        reply.push_str(&format!("Project type: {}\n", title_case(kind)));
    }
    reply.push_str(&format!(
        "\nHere is what I can do:\n{CAPABILITIES}\n\nAttach files with --file and add --context to include workspace details."
    ));
    reply
}

pub(crate) fn explain(file: Option<&ContextFile>) -> String {
    let Some(file) = file else {
        return "I'd be glad to explain some code. Attach the file you are curious about, \
                for example:\n\n    codemate chat \"explain this\" --file src/main.py\n\n\
                and I will walk through its structure and purpose."
            .to_string();
    };

    let guidance = match SourceLanguage::of(file) {
        SourceLanguage::Python => "Python modules usually read top-down: imports first, then \
            constants, then functions and classes. Start with the public functions and \
            follow the calls they make."
            .to_string(),
        SourceLanguage::JavaScript => "In JavaScript, look at what the module exports first. \
            Then trace the callbacks and promises, since control flow often hides in them."
            .to_string(),
        SourceLanguage::Other(language) => format!(
            "This is a {} file. I'll go through its main definitions and how they fit together.",
            title_case(language)
        ),
    };

    format!(
        "{header}**Lines:** {lines}\n\n{guidance}\n\nAsk about a specific function or block for a closer look.",
        header = file_header("Explaining", file),
        lines = file.line_count(),
    )
}

pub(crate) fn fix(file: Option<&ContextFile>) -> String {
    let Some(file) = file else {
        return "To track down a bug, attach the failing file with --file and include the \
                error message or a description of what goes wrong."
            .to_string();
    };

    let checklist = match SourceLanguage::of(file) {
        SourceLanguage::Python => "\
- Indentation that changes which block a line belongs to
- Values that can be `None` where an object is expected
- Mutable default arguments shared between calls
- Imports that shadow each other"
            .to_string(),
        SourceLanguage::JavaScript => "\
- `undefined` properties on objects that were never initialised
- Missing `await` on promises
- `==` where `===` was meant
- `this` bound to the wrong object inside callbacks"
            .to_string(),
        SourceLanguage::Other(language) => format!(
            "\
- Compiler or interpreter errors reported for this {} file
- Null or empty values reaching code that assumes data
- Off-by-one errors in loops and slices",
            title_case(language)
        ),
    };

    format!(
        "{header}\nCommon causes worth checking:\n{checklist}\n\nShare the exact error output and I can narrow it down.",
        header = file_header("Debugging", file),
    )
}

pub(crate) fn refactor(file: Option<&ContextFile>) -> String {
    let Some(file) = file else {
        return "Send the file you want to restructure with --file and tell me what bothers \
                you about it: readability, duplication or performance."
            .to_string();
    };

    let suggestions = match SourceLanguage::of(file) {
        SourceLanguage::Python => "\
- Add type hints to public functions
- Replace index loops with comprehensions or `enumerate`
- Group related data into dataclasses"
            .to_string(),
        SourceLanguage::JavaScript => "\
- Prefer `const` and `let` over `var`
- Use destructuring for option objects
- Split large files into focused modules"
            .to_string(),
        SourceLanguage::Other(language) => format!(
            "\
- Break long {} functions into smaller named steps
- Remove duplicated logic into shared helpers
- Give variables names that describe their role",
            title_case(language)
        ),
    };

    format!(
        "{header}\nSuggestions:\n{suggestions}\n\nTell me which part to start with and I will sketch the change.",
        header = file_header("Refactoring", file),
    )
}

pub(crate) fn create(message: &str, bundle: &ContextBundle) -> String {
    let lowered = message.to_lowercase();
    if lowered.contains("function") {
        if bundle.project_type() == Some("python") {
            return "Here is a starting point for a Python function:\n\n\
                ```python\n\
                def process(items: list[str]) -> list[str]:\n    \
                    \"\"\"Return the non-empty items, stripped.\"\"\"\n    \
                    return [item.strip() for item in items if item.strip()]\n\
                ```\n\n\
                Tell me the inputs and outputs you need and I will adapt it."
                .to_string();
        }
        return "To write a function I need to know:\n\
                - what it takes as input\n\
                - what it returns\n\
                - any edge cases it must handle\n\n\
                Describe those and I will draft it."
            .to_string();
    }
    if lowered.contains("class") {
        return "To design a class, tell me:\n\
                - the data it holds\n\
                - the operations it exposes\n\
                - how it relates to existing types in your project\n\n\
                I will propose a structure with constructor and methods."
            .to_string();
    }
    format!(
        "I can generate new code for the workspace at {}.\n\n\
         Say whether you need a function, a class, a script or a config file, \
         and describe what it should do.",
        bundle.workspace_path.display()
    )
}

pub(crate) fn test(bundle: &ContextBundle) -> String {
    let mut reply = match bundle.project_type() {
        Some("python") => "For a Python project, `unittest` works out of the box:\n\n\
            ```python\n\
            import unittest\n\n\
            class TestExample(unittest.TestCase):\n    \
                def test_addition(self):\n        \
                    self.assertEqual(1 + 1, 2)\n\n\
            if __name__ == \"__main__\":\n    \
                unittest.main()\n\
            ```\n"
            .to_string(),
        Some("nodejs") => "For a Node.js project, a Jest test looks like this:\n\n\
            ```javascript\n\
            describe('example', () => {\n  \
                test('adds numbers', () => {\n    \
                    expect(1 + 1).toBe(2);\n  \
                });\n\
            });\n\
            ```\n"
            .to_string(),
        _ => "Good tests cover the normal path, the edge cases and the failure modes. \
            Use the test framework your project already depends on, and keep each test \
            focused on one behaviour.\n"
            .to_string(),
    };

    if !bundle.files.is_empty() {
        reply.push_str("\n**Files to test:**\n");
        for file in bundle.files.iter().take(3) {
            reply.push_str(&format!(
                "- `{}` ({})\n",
                file.path,
                title_case(&file.language)
            ));
        }
    }
    reply
}

pub(crate) fn general(message: &str, bundle: &ContextBundle) -> String {
    format!(
        "You said: \"{message}\"\n\nWorkspace: {path}\n\n\
         I'm not sure what you would like me to do yet. Here is what I can help with:\n\
         {CAPABILITIES}",
        path = bundle.workspace_path.display()
    )
}
