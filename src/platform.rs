use std::sync::{Arc, RwLock};

use anyhow::{anyhow, Context};
use once_cell::sync::Lazy;

use crate::asana::Task;

/// Resolves host-side configuration. Remote calls cannot be made until the
/// credential resolves; a missing value is an error, never a default.
pub trait Config: Send + Sync {
    fn access_token(&self) -> anyhow::Result<String>;
    fn workspace_gid(&self) -> anyhow::Result<String>;
}

/// String key/value store supplied by the host. The suggestion and action
/// paths do not consult it; it exists for host-side use.
pub trait Cache: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn put(&self, key: &str, value: &str) -> anyhow::Result<()>;
}

pub trait Logger: Send + Sync {
    fn log(&self, message: &str);
}

/// Maps a task to its single-line display label and escapes free text for the
/// host's description surface.
pub trait Formatter: Send + Sync {
    fn format_task(&self, task: &Task) -> anyhow::Result<String>;
    fn escape_description(&self, text: &str) -> String;
}

pub trait Browser: Send + Sync {
    fn open_url(&self, url: &str) -> anyhow::Result<()>;
}

/// One complete host binding: every capability implemented, no partial sets.
pub struct Platform {
    config: Box<dyn Config>,
    cache: Box<dyn Cache>,
    logger: Box<dyn Logger>,
    formatter: Box<dyn Formatter>,
    browser: Box<dyn Browser>,
}

impl Platform {
    pub fn new(
        config: Box<dyn Config>,
        cache: Box<dyn Cache>,
        logger: Box<dyn Logger>,
        formatter: Box<dyn Formatter>,
        browser: Box<dyn Browser>,
    ) -> Self {
        Self {
            config,
            cache,
            logger,
            formatter,
            browser,
        }
    }

    pub fn config(&self) -> &dyn Config {
        self.config.as_ref()
    }

    pub fn cache(&self) -> &dyn Cache {
        self.cache.as_ref()
    }

    pub fn logger(&self) -> &dyn Logger {
        self.logger.as_ref()
    }

    pub fn formatter(&self) -> &dyn Formatter {
        self.formatter.as_ref()
    }

    pub fn browser(&self) -> &dyn Browser {
        self.browser.as_ref()
    }
}

static PLATFORM: Lazy<RwLock<Option<Arc<Platform>>>> = Lazy::new(|| RwLock::new(None));

/// Install the process-wide platform. Last writer wins; there is no
/// reinitialization guard.
pub fn set_platform(platform: Arc<Platform>) {
    *PLATFORM
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(platform);
}

/// The installed platform, or an error when [`set_platform`] has not run yet.
pub fn platform() -> anyhow::Result<Arc<Platform>> {
    PLATFORM
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .clone()
        .ok_or_else(|| anyhow!("call set_platform() before use"))
}

/// Convenience: resolve the credential pair needed to build a remote client.
pub fn credentials(config: &dyn Config) -> anyhow::Result<(String, String)> {
    let token = config
        .access_token()
        .context("Asana access token is not configured")?;
    let workspace = config
        .workspace_gid()
        .context("Asana workspace gid is not configured")?;
    Ok((token, workspace))
}
