use std::sync::Arc;

use serde::Serialize;

use crate::asana::TaskService;
use crate::platform::Platform;
use crate::token::encode_token;

/// One entry handed to the host launcher. `url` is the opaque command token,
/// `text` echoes the query, `description` is the formatted label.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Suggestion {
    pub url: String,
    pub text: String,
    pub description: String,
}

pub struct SuggestionProvider {
    platform: Arc<Platform>,
    service: Arc<dyn TaskService>,
}

impl SuggestionProvider {
    pub fn new(platform: Arc<Platform>, service: Arc<dyn TaskService>) -> Self {
        Self { platform, service }
    }

    /// Search the remote service and map each hit to a suggestion. The
    /// service's relevance order is preserved verbatim; no re-ranking happens
    /// here. Empty or whitespace-only input goes through unmodified.
    pub async fn pull_suggestions(&self, text: &str) -> anyhow::Result<Vec<Suggestion>> {
        let tasks = self.service.search_tasks(text).await?;
        tracing::debug!(query = text, results = tasks.len(), "task search");

        let formatter = self.platform.formatter();
        tasks
            .iter()
            .map(|task| {
                let label = formatter.format_task(task)?;
                Ok(Suggestion {
                    url: encode_token(&task.gid),
                    text: text.to_string(),
                    description: formatter.escape_description(&label),
                })
            })
            .collect()
    }
}
