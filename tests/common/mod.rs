#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use anyhow::bail;
use async_trait::async_trait;

use opener_for_asana::asana::{Membership, ProjectRef, Task, TaskRef, TaskService};
use opener_for_asana::hosts::workflow::{EnvConfig, PlainFormatter};
use opener_for_asana::platform::{Browser, Cache, Logger, Platform};

/// In-memory stand-in for the remote service. Records searches and updates so
/// tests can assert on the calls that were made.
pub struct MockTaskService {
    pub tasks: Vec<Task>,
    pub searches: Mutex<Vec<String>>,
    pub updates: Mutex<Vec<(String, bool)>>,
}

impl MockTaskService {
    pub fn with_tasks(tasks: Vec<Task>) -> Arc<Self> {
        Arc::new(Self {
            tasks,
            searches: Mutex::new(Vec::new()),
            updates: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl TaskService for MockTaskService {
    async fn search_tasks(&self, text: &str) -> anyhow::Result<Vec<Task>> {
        self.searches.lock().unwrap().push(text.to_string());
        Ok(self.tasks.clone())
    }

    async fn find_task(&self, gid: &str) -> anyhow::Result<Task> {
        match self.tasks.iter().find(|t| t.gid == gid) {
            Some(task) => Ok(task.clone()),
            None => bail!("task {gid} not found"),
        }
    }

    async fn set_completed(&self, gid: &str, completed: bool) -> anyhow::Result<Task> {
        let mut task = self.find_task(gid).await?;
        task.completed = completed;
        self.updates
            .lock()
            .unwrap()
            .push((gid.to_string(), completed));
        Ok(task)
    }
}

#[derive(Default)]
pub struct RecordingBrowser {
    pub opened: Mutex<Vec<String>>,
}

/// Shared handle handed to the platform while the test keeps the Arc for
/// inspection.
pub struct BrowserHandle(pub Arc<RecordingBrowser>);

impl Browser for BrowserHandle {
    fn open_url(&self, url: &str) -> anyhow::Result<()> {
        self.0.opened.lock().unwrap().push(url.to_string());
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingLogger {
    pub lines: Mutex<Vec<String>>,
}

pub struct LoggerHandle(pub Arc<RecordingLogger>);

impl Logger for LoggerHandle {
    fn log(&self, message: &str) {
        self.0.lines.lock().unwrap().push(message.to_string());
    }
}

#[derive(Default)]
pub struct NullCache;

impl Cache for NullCache {
    fn get(&self, _key: &str) -> Option<String> {
        None
    }

    fn put(&self, _key: &str, _value: &str) -> anyhow::Result<()> {
        Ok(())
    }
}

pub struct TestBench {
    pub platform: Arc<Platform>,
    pub browser: Arc<RecordingBrowser>,
    pub logger: Arc<RecordingLogger>,
}

/// Platform wired with the plain formatter plus recording browser/logger.
pub fn bench() -> TestBench {
    let browser = Arc::new(RecordingBrowser::default());
    let logger = Arc::new(RecordingLogger::default());
    let platform = Arc::new(Platform::new(
        Box::new(EnvConfig),
        Box::new(NullCache),
        Box::new(LoggerHandle(logger.clone())),
        Box::new(PlainFormatter),
        Box::new(BrowserHandle(browser.clone())),
    ));
    TestBench {
        platform,
        browser,
        logger,
    }
}

pub fn task(gid: &str, name: &str, completed: bool) -> Task {
    Task {
        gid: gid.into(),
        name: Some(name.into()),
        completed,
        parent: None,
        memberships: Vec::new(),
    }
}

pub fn task_with_context(gid: &str, name: &str, parent: &str, project: &str) -> Task {
    Task {
        gid: gid.into(),
        name: Some(name.into()),
        completed: false,
        parent: Some(TaskRef {
            gid: None,
            name: Some(parent.into()),
        }),
        memberships: vec![Membership {
            project: Some(ProjectRef {
                gid: None,
                name: project.into(),
            }),
        }],
    }
}
