use crate::core::context::{ContextBundle, ContextFile};
use std::ffi::OsString;

/// Restores every environment variable it touched when dropped.
///
/// Tests that use it should pick variable names no other test reads.
#[derive(Default)]
pub struct TestEnvVarGuard {
    saved: Vec<(String, Option<OsString>)>,
}

impl TestEnvVarGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_var(&mut self, key: &str, value: &str) {
        self.remember(key);
        std::env::set_var(key, value);
    }

    fn remember(&mut self, key: &str) {
        if !self.saved.iter().any(|(saved, _)| saved == key) {
            self.saved.push((key.to_string(), std::env::var_os(key)));
        }
    }
}

impl Drop for TestEnvVarGuard {
    fn drop(&mut self) {
        for (key, previous) in self.saved.drain(..).rev() {
            match previous {
                Some(value) => std::env::set_var(&key, value),
                None => std::env::remove_var(&key),
            }
        }
    }
}

pub fn python_bundle() -> ContextBundle {
    ContextBundle::new("/work/demo").with_file(ContextFile::new("a.py", "def f(): pass"))
}

pub fn project_info(kind: &str) -> serde_json::Map<String, serde_json::Value> {
    let mut project = serde_json::Map::new();
    project.insert("type".to_string(), kind.into());
    let mut info = serde_json::Map::new();
    info.insert("project_info".to_string(), project.into());
    info
}
