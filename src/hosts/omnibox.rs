//! Browser-omnibox host binding (native side of the extension integration).
//!
//! Configuration lives in a JSON file under the user config directory, the
//! cache is an in-process map matching the extension's session lifetime, and
//! description text is escaped for the omnibox's XML-styled surface.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::asana::Task;
use crate::formatter::{escape_xml, format_task_label};
use crate::platform::{Browser, Cache, Config, Formatter, Logger, Platform};
use crate::suggest::Suggestion;
use crate::token::DecodeMode;

/// The omnibox hands back whatever text sits in the address bar on commit,
/// which may be plain typing rather than a committed suggestion. Prefix-less
/// input is therefore free text, not an error.
pub const DEFAULT_DECODE_MODE: DecodeMode = DecodeMode::Lenient;

#[derive(Debug, Default, Serialize, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    workspace_gid: Option<String>,
}

pub struct FileConfig {
    path: PathBuf,
}

impl FileConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn in_default_dir() -> Self {
        let dir = dirs_next::config_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("opener-for-asana");
        Self::new(dir.join("config.json"))
    }

    fn load(&self) -> anyhow::Result<ConfigFile> {
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("cannot read config file {}", self.path.display()))?;
        Ok(serde_json::from_str(&content)?)
    }
}

impl Config for FileConfig {
    fn access_token(&self) -> anyhow::Result<String> {
        self.load()?
            .access_token
            .context("access_token missing from config file")
    }

    fn workspace_gid(&self) -> anyhow::Result<String> {
        self.load()?
            .workspace_gid
            .context("workspace_gid missing from config file")
    }
}

#[derive(Default)]
pub struct MemoryCache {
    map: Mutex<HashMap<String, String>>,
}

impl Cache for MemoryCache {
    fn get(&self, key: &str) -> Option<String> {
        self.map
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(key)
            .cloned()
    }

    fn put(&self, key: &str, value: &str) -> anyhow::Result<()> {
        self.map
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

pub struct OmniboxLogger;

impl Logger for OmniboxLogger {
    fn log(&self, message: &str) {
        tracing::info!(target: "omnibox", "{message}");
    }
}

/// Formatter for the omnibox description surface, which interprets a small
/// XML dialect; markup characters in task names must be entity-escaped.
pub struct OmniboxFormatter;

impl Formatter for OmniboxFormatter {
    fn format_task(&self, task: &Task) -> anyhow::Result<String> {
        format_task_label(task)
    }

    fn escape_description(&self, text: &str) -> String {
        escape_xml(text)
    }
}

pub struct SystemBrowser;

impl Browser for SystemBrowser {
    fn open_url(&self, url: &str) -> anyhow::Result<()> {
        open::that(url).with_context(|| format!("failed to open {url}"))
    }
}

pub fn platform() -> Platform {
    platform_with_config(FileConfig::in_default_dir())
}

pub fn platform_with_config(config: FileConfig) -> Platform {
    Platform::new(
        Box::new(config),
        Box::new(MemoryCache::default()),
        Box::new(OmniboxLogger),
        Box::new(OmniboxFormatter),
        Box::new(SystemBrowser),
    )
}

/// One omnibox suggest entry: `content` is what lands in the address bar on
/// commit, `description` is the rendered row.
#[derive(Debug, Serialize)]
pub struct SuggestResult {
    pub content: String,
    pub description: String,
}

pub fn render_results(suggestions: &[Suggestion]) -> anyhow::Result<String> {
    let results: Vec<SuggestResult> = suggestions
        .iter()
        .map(|s| SuggestResult {
            content: s.url.clone(),
            description: s.description.clone(),
        })
        .collect();
    Ok(serde_json::to_string_pretty(&results)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asana::TaskRef;

    #[test]
    fn memory_cache_roundtrips() {
        let cache = MemoryCache::default();
        assert!(cache.get("k").is_none());
        cache.put("k", "v").unwrap();
        assert_eq!(cache.get("k").as_deref(), Some("v"));
    }

    #[test]
    fn formatter_escapes_markup_in_descriptions() {
        let f = OmniboxFormatter;
        assert_eq!(f.escape_description("a <b> & c"), "a &lt;b&gt; &amp; c");
    }

    #[test]
    fn formatter_label_matches_plain_contract() {
        let task = Task {
            gid: "1".into(),
            name: Some("N".into()),
            completed: true,
            parent: Some(TaskRef {
                gid: None,
                name: Some("P".into()),
            }),
            memberships: Vec::new(),
        };
        assert_eq!(OmniboxFormatter.format_task(&task).unwrap(), "✓ N / P");
    }
}
