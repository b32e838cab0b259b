//! Desktop-workflow host binding (Alfred-style script filter).
//!
//! Configuration comes from environment variables the workflow runner exports,
//! the cache is a JSON file under the user cache directory, and suggestions
//! are rendered as script-filter items on stdout.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::Context;
use serde::Serialize;

use crate::asana::Task;
use crate::formatter::format_task_label;
use crate::platform::{Browser, Cache, Config, Formatter, Logger, Platform};
use crate::suggest::Suggestion;
use crate::token::DecodeMode;

pub const ACCESS_TOKEN_VAR: &str = "ASANA_ACCESS_TOKEN";
pub const WORKSPACE_GID_VAR: &str = "ASANA_WORKSPACE_GID";

/// The workflow runner always hands back the committed item's arg, so a
/// prefix-less input is a real error here.
pub const DEFAULT_DECODE_MODE: DecodeMode = DecodeMode::Strict;

pub struct EnvConfig;

fn required_var(name: &str) -> anyhow::Result<String> {
    std::env::var(name).with_context(|| format!("environment variable {name} is not set"))
}

impl Config for EnvConfig {
    fn access_token(&self) -> anyhow::Result<String> {
        required_var(ACCESS_TOKEN_VAR)
    }

    fn workspace_gid(&self) -> anyhow::Result<String> {
        required_var(WORKSPACE_GID_VAR)
    }
}

/// JSON-file key/value store. Every access goes through the file so separate
/// invocations of the workflow binary see each other's writes.
pub struct FileCache {
    path: PathBuf,
}

impl FileCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn in_default_dir() -> Self {
        let dir = dirs_next::cache_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("opener-for-asana");
        Self::new(dir.join("cache.json"))
    }

    fn load(&self) -> HashMap<String, String> {
        let content = std::fs::read_to_string(&self.path).unwrap_or_default();
        if content.trim().is_empty() {
            return HashMap::new();
        }
        serde_json::from_str(&content).unwrap_or_default()
    }

    fn save(&self, map: &HashMap<String, String>) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(map)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

impl Cache for FileCache {
    fn get(&self, key: &str) -> Option<String> {
        self.load().get(key).cloned()
    }

    fn put(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let mut map = self.load();
        map.insert(key.to_string(), value.to_string());
        self.save(&map)
    }
}

pub struct WorkflowLogger;

impl Logger for WorkflowLogger {
    fn log(&self, message: &str) {
        tracing::info!(target: "workflow", "{message}");
    }
}

/// Plain-text formatter. The workflow list is not a markup surface, so
/// escaping is the identity function.
pub struct PlainFormatter;

impl Formatter for PlainFormatter {
    fn format_task(&self, task: &Task) -> anyhow::Result<String> {
        format_task_label(task)
    }

    fn escape_description(&self, text: &str) -> String {
        text.to_string()
    }
}

pub struct SystemBrowser;

impl Browser for SystemBrowser {
    fn open_url(&self, url: &str) -> anyhow::Result<()> {
        open::that(url).with_context(|| format!("failed to open {url}"))
    }
}

pub fn platform() -> Platform {
    platform_with_cache(FileCache::in_default_dir())
}

pub fn platform_with_cache(cache: FileCache) -> Platform {
    Platform::new(
        Box::new(EnvConfig),
        Box::new(cache),
        Box::new(WorkflowLogger),
        Box::new(PlainFormatter),
        Box::new(SystemBrowser),
    )
}

/// One row of script-filter output. `arg` round-trips the command token back
/// to us when the user commits the row.
#[derive(Debug, Serialize)]
pub struct ScriptFilterItem {
    pub uid: String,
    pub title: String,
    pub subtitle: String,
    pub arg: String,
}

#[derive(Debug, Serialize)]
pub struct ScriptFilterOutput {
    pub items: Vec<ScriptFilterItem>,
}

pub fn render_items(suggestions: &[Suggestion]) -> anyhow::Result<String> {
    let items = suggestions
        .iter()
        .map(|s| ScriptFilterItem {
            uid: s.url.clone(),
            title: s.description.clone(),
            subtitle: s.text.clone(),
            arg: s.url.clone(),
        })
        .collect();
    Ok(serde_json::to_string_pretty(&ScriptFilterOutput { items })?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_carries_token_as_arg() {
        let out = render_items(&[Suggestion {
            url: "opener-for-asana:123".into(),
            text: "foo".into(),
            description: "N / P".into(),
        }])
        .unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["items"][0]["arg"], "opener-for-asana:123");
        assert_eq!(parsed["items"][0]["title"], "N / P");
        assert_eq!(parsed["items"][0]["subtitle"], "foo");
    }
}
