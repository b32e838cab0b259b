use std::sync::Arc;

use anyhow::Context;

use crate::asana::{task_url, TaskService, APP_BASE_URL};
use crate::platform::Platform;
use crate::token::{decode_token, Decoded, DecodeMode};

/// Executes the action behind a committed token. Which action runs is decided
/// by the entry point the host invokes, never by inspecting the token: a token
/// only ever carries a task identifier.
pub struct ActionDispatcher {
    platform: Arc<Platform>,
    service: Arc<dyn TaskService>,
    decode_mode: DecodeMode,
}

impl ActionDispatcher {
    pub fn new(
        platform: Arc<Platform>,
        service: Arc<dyn TaskService>,
        decode_mode: DecodeMode,
    ) -> Self {
        Self {
            platform,
            service,
            decode_mode,
        }
    }

    fn decode(&self, input: &str) -> anyhow::Result<String> {
        match decode_token(input, self.decode_mode)? {
            Decoded::TaskGid(gid) => Ok(gid),
            Decoded::FreeText(text) => {
                anyhow::bail!("expected a task token, got free text: {text}")
            }
        }
    }

    fn report(&self, result: String) -> anyhow::Result<String> {
        self.platform.logger().log(&format!("Acted: {result}"));
        Ok(result)
    }

    /// Open the task's deep link in the browser. Never mutates remote state.
    pub async fn open_task(&self, token: &str) -> anyhow::Result<String> {
        let gid = self.decode(token)?;
        let url = task_url(&gid);
        self.platform.browser().open_url(&url)?;
        self.report(format!("opened {url}"))
    }

    /// Flip the task's completion flag. The target value is the negation of
    /// the freshly fetched one, never a fixed value, so two concurrent toggles
    /// do not both land on the same state. Single read-modify-write; no retry.
    pub async fn toggle_task_status(&self, token: &str) -> anyhow::Result<String> {
        let gid = self.decode(token)?;
        let task = self
            .service
            .find_task(&gid)
            .await
            .context("cannot toggle a task that failed to load")?;
        let target = !task.completed;
        let updated = self.service.set_completed(&gid, target).await?;
        let label = updated
            .name
            .or(task.name)
            .unwrap_or_else(|| gid.clone());
        let state = if target { "completed" } else { "incomplete" };
        self.report(format!("marked \"{label}\" {state}"))
    }

    /// Commit entry point for hosts that hand back raw input: a token opens
    /// the task, anything else (lenient mode) falls back to searching the
    /// service for the literal text.
    pub async fn act_on_input(&self, input: &str) -> anyhow::Result<String> {
        match decode_token(input, self.decode_mode)? {
            Decoded::TaskGid(gid) => {
                let url = task_url(&gid);
                self.platform.browser().open_url(&url)?;
                self.report(format!("opened {url}"))
            }
            Decoded::FreeText(text) => {
                let url = format!(
                    "{APP_BASE_URL}/0/search?q={}",
                    urlencoding::encode(&text)
                );
                self.platform.browser().open_url(&url)?;
                self.report(format!("searched for \"{text}\""))
            }
        }
    }
}
