//! Filesystem implementation of workspace introspection.

use crate::core::config::Configuration;
use crate::core::context::{language_for_path, WorkspaceError, WorkspaceInfo, WorkspaceInspector};
use regex::Regex;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// Files listed by name in the inventory; the count covers all of them.
pub const MAX_LISTED_FILES: usize = 200;

const PROJECT_MARKERS: &[(&str, &str)] = &[
    ("package.json", "nodejs"),
    ("pyproject.toml", "python"),
    ("requirements.txt", "python"),
    ("setup.py", "python"),
    ("Cargo.toml", "rust"),
    ("go.mod", "go"),
    ("pom.xml", "java"),
    ("build.gradle", "java"),
];

/// Walks the workspace honouring include/exclude globs.
#[derive(Debug, Clone)]
pub struct FsWorkspaceInspector {
    include: Vec<Regex>,
    exclude: Vec<Regex>,
    max_listed: usize,
}

impl Default for FsWorkspaceInspector {
    fn default() -> Self {
        Self::new(&[], &[])
    }
}

impl FsWorkspaceInspector {
    pub fn new(include_patterns: &[String], exclude_patterns: &[String]) -> Self {
        Self {
            include: compile_patterns(include_patterns),
            exclude: compile_patterns(exclude_patterns),
            max_listed: MAX_LISTED_FILES,
        }
    }

    pub fn from_config(config: &Configuration) -> Self {
        Self::new(
            &config.get_str_list("workspace.include_patterns"),
            &config.get_str_list("workspace.exclude_patterns"),
        )
    }

    pub fn with_max_listed(mut self, max_listed: usize) -> Self {
        self.max_listed = max_listed;
        self
    }

    fn is_excluded(&self, relative: &str) -> bool {
        self.exclude.iter().any(|re| matches_any_suffix(re, relative))
    }

    fn is_included(&self, relative: &str) -> bool {
        self.include.is_empty() || self.include.iter().any(|re| matches_any_suffix(re, relative))
    }

    fn keep_entry(&self, root: &Path, entry: &DirEntry) -> bool {
        if entry.depth() == 0 {
            return true;
        }
        let relative = relative_path(root, entry.path());
        if entry.file_type().is_dir() {
            !self.is_excluded(&format!("{relative}/"))
        } else {
            !self.is_excluded(&relative)
        }
    }
}

impl WorkspaceInspector for FsWorkspaceInspector {
    fn inspect(&self, root: &Path) -> Result<WorkspaceInfo, WorkspaceError> {
        if !root.is_dir() {
            return Err(WorkspaceError::NotADirectory(root.to_path_buf()));
        }

        let markers: Vec<&str> = PROJECT_MARKERS
            .iter()
            .map(|(marker, _)| *marker)
            .filter(|marker| root.join(marker).is_file())
            .collect();
        let project_type = PROJECT_MARKERS
            .iter()
            .find(|(marker, _)| markers.contains(marker))
            .map(|(_, kind)| *kind)
            .unwrap_or("unknown");

        let mut files = Vec::new();
        let mut file_count = 0usize;
        let mut languages: BTreeMap<&'static str, usize> = BTreeMap::new();

        let walker = WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| self.keep_entry(root, entry));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) if err.depth() == 0 => {
                    return Err(WorkspaceError::Walk {
                        path: root.to_path_buf(),
                        source: err.into(),
                    });
                }
                Err(err) => {
                    debug!(error = %err, "skipping unreadable workspace entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let relative = relative_path(root, entry.path());
            if !self.is_included(&relative) {
                continue;
            }

            file_count += 1;
            let language = language_for_path(&relative);
            if language != "unknown" {
                *languages.entry(language).or_default() += 1;
            }
            if files.len() < self.max_listed {
                files.push(Value::String(relative));
            }
        }

        if file_count > self.max_listed {
            warn!(file_count, listed = self.max_listed, "workspace inventory truncated");
        }

        let mut info = Map::new();
        info.insert(
            "project_info".to_string(),
            json!({ "type": project_type, "markers": markers }),
        );
        info.insert("files".to_string(), Value::Array(files));
        info.insert("file_count".to_string(), json!(file_count));
        info.insert("truncated".to_string(), json!(file_count > self.max_listed));
        info.insert("languages".to_string(), json!(languages));
        Ok(info)
    }
}

fn relative_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// A pattern matches if it matches the path or any of its trailing components.
fn matches_any_suffix(re: &Regex, relative: &str) -> bool {
    if re.is_match(relative) {
        return true;
    }
    relative
        .match_indices('/')
        .map(|(idx, _)| &relative[idx + 1..])
        .filter(|suffix| !suffix.is_empty())
        .any(|suffix| re.is_match(suffix))
}

fn compile_patterns(patterns: &[String]) -> Vec<Regex> {
    patterns
        .iter()
        .filter_map(|pattern| {
            let compiled = glob_to_regex(pattern);
            if compiled.is_none() {
                warn!(pattern = %pattern, "ignoring invalid workspace pattern");
            }
            compiled
        })
        .collect()
}

/// `*` matches any run of characters, `?` matches one.
fn glob_to_regex(pattern: &str) -> Option<Regex> {
    let mut re = String::from("^");
    for ch in pattern.chars() {
        match ch {
            '*' => re.push_str(".*"),
            '?' => re.push('.'),
            c => re.push_str(&regex::escape(&c.to_string())),
        }
    }
    re.push('$');
    Regex::new(&re).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, "x").unwrap();
    }

    fn patterns(items: &[&str]) -> Vec<String> {
        items.iter().map(|item| item.to_string()).collect()
    }

    fn listed_files(info: &WorkspaceInfo) -> Vec<String> {
        info["files"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn detects_python_project_and_languages() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "requirements.txt");
        touch(temp_dir.path(), "app/main.py");
        touch(temp_dir.path(), "app/util.py");
        touch(temp_dir.path(), "web/index.js");

        let info = FsWorkspaceInspector::default()
            .inspect(temp_dir.path())
            .unwrap();

        assert_eq!(info["project_info"]["type"], "python");
        assert_eq!(info["project_info"]["markers"], json!(["requirements.txt"]));
        assert_eq!(info["file_count"], 4);
        assert_eq!(info["languages"]["python"], 2);
        assert_eq!(info["languages"]["javascript"], 1);
    }

    #[test]
    fn unknown_project_without_markers() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "notes.txt");

        let info = FsWorkspaceInspector::default()
            .inspect(temp_dir.path())
            .unwrap();

        assert_eq!(info["project_info"]["type"], "unknown");
    }

    #[test]
    fn exclude_patterns_prune_nested_directories() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "package.json");
        touch(temp_dir.path(), "src/index.js");
        touch(temp_dir.path(), "node_modules/lib/index.js");
        touch(temp_dir.path(), "pkg/node_modules/dep.js");
        touch(temp_dir.path(), "cache/mod.pyc");

        let inspector =
            FsWorkspaceInspector::new(&[], &patterns(&["node_modules/**", "*.pyc"]));
        let info = inspector.inspect(temp_dir.path()).unwrap();

        assert_eq!(info["project_info"]["type"], "nodejs");
        assert_eq!(listed_files(&info), vec!["package.json", "src/index.js"]);
    }

    #[test]
    fn include_patterns_filter_files() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "Cargo.toml");
        touch(temp_dir.path(), "src/lib.rs");
        touch(temp_dir.path(), "README.md");

        let inspector = FsWorkspaceInspector::new(&patterns(&["*.rs"]), &[]);
        let info = inspector.inspect(temp_dir.path()).unwrap();

        assert_eq!(info["project_info"]["type"], "rust");
        assert_eq!(listed_files(&info), vec!["src/lib.rs"]);
    }

    #[test]
    fn inventory_is_capped_but_counted() {
        let temp_dir = TempDir::new().unwrap();
        for idx in 0..5 {
            touch(temp_dir.path(), &format!("f{idx}.go"));
        }

        let info = FsWorkspaceInspector::default()
            .with_max_listed(2)
            .inspect(temp_dir.path())
            .unwrap();

        assert_eq!(listed_files(&info).len(), 2);
        assert_eq!(info["file_count"], 5);
        assert_eq!(info["truncated"], true);
    }

    #[test]
    fn missing_root_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let result = FsWorkspaceInspector::default().inspect(&temp_dir.path().join("absent"));
        assert!(matches!(result, Err(WorkspaceError::NotADirectory(_))));
    }

    #[test]
    fn glob_translation() {
        let re = glob_to_regex("src/?.rs").unwrap();
        assert!(re.is_match("src/a.rs"));
        assert!(!re.is_match("src/ab.rs"));
        assert!(glob_to_regex("a+b(c)").unwrap().is_match("a+b(c)"));
    }
}
