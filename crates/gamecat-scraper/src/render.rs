//! Headless rendering for pages that only fill in after JavaScript runs.
//!
//! [`RenderBackend`] opens sessions; [`ChromeBackend`] drives a local
//! Chrome/Chromium over CDP. Tests substitute their own backend.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::Page;
use futures::StreamExt;
use gamecat_core::AppConfig;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::error::ScraperError;
use crate::ranking::has_rankable_links;

#[async_trait]
pub trait RenderBackend: Send + Sync {
    async fn open(&self) -> Result<Box<dyn RenderSession>, ScraperError>;
}

/// One browser session. Callers must [`close`](RenderSession::close) it on
/// every exit path; implementations should also release resources on drop.
#[async_trait]
pub trait RenderSession: Send {
    async fn navigate(&mut self, url: &str) -> Result<(), ScraperError>;

    /// Current DOM serialised as HTML.
    async fn rendered_markup(&mut self) -> Result<String, ScraperError>;

    /// Releases the session. Calling it twice is a no-op.
    async fn close(&mut self) -> Result<(), ScraperError>;
}

/// How long to wait for a chart to populate, and how often to look.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub interval: Duration,
    pub timeout: Duration,
}

impl PollSettings {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            interval: Duration::from_millis(config.render_poll_interval_ms),
            timeout: Duration::from_secs(config.render_timeout_secs),
        }
    }
}

/// Navigates to `url` and polls the rendered markup until it contains a
/// rankable item link or `settings.timeout` elapses.
///
/// # Errors
///
/// - [`ScraperError::RenderTimeout`] if no link appeared in time.
/// - Any navigation or markup error from the session.
pub async fn wait_for_links(
    session: &mut dyn RenderSession,
    url: &str,
    settings: PollSettings,
) -> Result<String, ScraperError> {
    session.navigate(url).await?;
    let deadline = Instant::now() + settings.timeout;
    let mut polls = 0_u32;

    loop {
        polls += 1;
        let markup = session.rendered_markup().await?;
        if has_rankable_links(&markup) {
            tracing::debug!(url, polls, "chart populated");
            return Ok(markup);
        }
        if Instant::now() >= deadline {
            return Err(ScraperError::RenderTimeout {
                url: url.to_string(),
                timeout_secs: settings.timeout.as_secs(),
            });
        }
        tokio::time::sleep(settings.interval).await;
    }
}

fn render_error(err: impl std::fmt::Display) -> ScraperError {
    ScraperError::Render(err.to_string())
}

/// Launches a fresh headless Chrome per session.
#[derive(Debug, Clone)]
pub struct ChromeBackend {
    executable: Option<PathBuf>,
    request_timeout: Duration,
}

impl ChromeBackend {
    #[must_use]
    pub fn new(executable: Option<PathBuf>, request_timeout: Duration) -> Self {
        Self {
            executable,
            request_timeout,
        }
    }

    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.chrome_executable.clone(),
            Duration::from_secs(config.render_timeout_secs),
        )
    }
}

#[async_trait]
impl RenderBackend for ChromeBackend {
    async fn open(&self) -> Result<Box<dyn RenderSession>, ScraperError> {
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .request_timeout(self.request_timeout);
        if let Some(path) = &self.executable {
            builder = builder.chrome_executable(path);
        }
        let config = builder.build().map_err(ScraperError::Render)?;

        let (browser, mut handler) = Browser::launch(config).await.map_err(render_error)?;
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!(error = %e, "CDP handler stopped");
                    break;
                }
            }
        });

        tracing::debug!("headless browser launched");
        Ok(Box::new(ChromeSession {
            browser,
            page: None,
            handler_task,
            closed: false,
        }))
    }
}

struct ChromeSession {
    browser: Browser,
    page: Option<Page>,
    handler_task: JoinHandle<()>,
    closed: bool,
}

#[async_trait]
impl RenderSession for ChromeSession {
    async fn navigate(&mut self, url: &str) -> Result<(), ScraperError> {
        match &self.page {
            Some(page) => {
                page.goto(url).await.map_err(render_error)?;
            }
            None => {
                let page = self.browser.new_page(url).await.map_err(render_error)?;
                self.page = Some(page);
            }
        }
        Ok(())
    }

    async fn rendered_markup(&mut self) -> Result<String, ScraperError> {
        let page = self
            .page
            .as_ref()
            .ok_or_else(|| ScraperError::Render("no page open".to_string()))?;
        page.content().await.map_err(render_error)
    }

    async fn close(&mut self) -> Result<(), ScraperError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        if let Some(page) = self.page.take() {
            if let Err(e) = page.close().await {
                tracing::debug!(error = %e, "page close failed");
            }
        }
        let result = self.browser.close().await.map_err(render_error);
        if let Err(e) = self.browser.wait().await {
            tracing::debug!(error = %e, "browser process wait failed");
        }
        self.handler_task.abort();
        result.map(|_| ())
    }
}

impl Drop for ChromeSession {
    fn drop(&mut self) {
        // Browser's own Drop kills the child process.
        self.handler_task.abort();
    }
}
