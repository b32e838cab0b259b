use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Default Asana REST endpoint.
pub const API_BASE_URL: &str = "https://app.asana.com/api/1.0";

/// Host serving task deep links.
pub const APP_BASE_URL: &str = "https://app.asana.com";

/// Field set requested on every task read. Kept minimal so typeahead payloads
/// stay small: display bits plus the two custom-field gids the workflow
/// surfaces.
pub const TASK_OPT_FIELDS: &str =
    "name,completed,parent.name,custom_fields.gid,memberships.project.name";

/// Read-only projection of an Asana task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub gid: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub parent: Option<TaskRef>,
    #[serde(default)]
    pub memberships: Vec<Membership>,
}

/// Reference to another task, as embedded in `parent`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskRef {
    #[serde(default)]
    pub gid: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Membership {
    #[serde(default)]
    pub project: Option<ProjectRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectRef {
    #[serde(default)]
    pub gid: Option<String>,
    #[serde(default)]
    pub name: String,
}

/// Deep link accepted by the Asana web app. The two literal `0` path segments
/// are placeholder routing, not identifiers.
pub fn task_url(gid: &str) -> String {
    format!("{APP_BASE_URL}/0/0/{gid}")
}

/// Remote-call seam. The provider and dispatcher only ever talk to this trait;
/// tests substitute their own implementation.
#[async_trait]
pub trait TaskService: Send + Sync {
    /// Relevance-ordered task search. The order of the returned tasks is the
    /// service's own ranking and must be preserved by callers.
    async fn search_tasks(&self, text: &str) -> anyhow::Result<Vec<Task>>;

    async fn find_task(&self, gid: &str) -> anyhow::Result<Task>;

    async fn set_completed(&self, gid: &str, completed: bool) -> anyhow::Result<Task>;
}

/// reqwest-backed client for the Asana REST API.
pub struct AsanaClient {
    http: reqwest::Client,
    base_url: String,
    access_token: String,
    workspace_gid: String,
}

#[derive(Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

#[derive(Serialize)]
struct UpdateBody {
    data: UpdateFields,
}

#[derive(Serialize)]
struct UpdateFields {
    completed: bool,
}

impl AsanaClient {
    pub fn new(access_token: String, workspace_gid: String) -> Self {
        Self::with_base_url(access_token, workspace_gid, API_BASE_URL.to_string())
    }

    pub fn with_base_url(access_token: String, workspace_gid: String, base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            access_token,
            workspace_gid,
        }
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.http
            .get(format!("{}{path}", self.base_url))
            .bearer_auth(&self.access_token)
    }
}

#[async_trait]
impl TaskService for AsanaClient {
    async fn search_tasks(&self, text: &str) -> anyhow::Result<Vec<Task>> {
        // The query text is forwarded verbatim; empty input is the service's
        // case to handle, not ours.
        let resp: DataEnvelope<Vec<Task>> = self
            .get(&format!(
                "/workspaces/{}/typeahead",
                self.workspace_gid
            ))
            .query(&[
                ("resource_type", "task"),
                ("query", text),
                ("opt_fields", TASK_OPT_FIELDS),
            ])
            .send()
            .await?
            .error_for_status()
            .context("task search failed")?
            .json()
            .await?;
        Ok(resp.data)
    }

    async fn find_task(&self, gid: &str) -> anyhow::Result<Task> {
        let resp: DataEnvelope<Task> = self
            .get(&format!("/tasks/{gid}"))
            .query(&[("opt_fields", TASK_OPT_FIELDS)])
            .send()
            .await?
            .error_for_status()
            .with_context(|| format!("task {gid} not found"))?
            .json()
            .await?;
        Ok(resp.data)
    }

    async fn set_completed(&self, gid: &str, completed: bool) -> anyhow::Result<Task> {
        let resp: DataEnvelope<Task> = self
            .http
            .put(format!("{}/tasks/{gid}", self.base_url))
            .bearer_auth(&self.access_token)
            .json(&UpdateBody {
                data: UpdateFields { completed },
            })
            .send()
            .await?
            .error_for_status()
            .with_context(|| format!("failed to update task {gid}"))?
            .json()
            .await?;
        Ok(resp.data)
    }
}
