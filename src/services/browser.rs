use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use fake_user_agent::get_chrome_rua;
use thirtyfour::prelude::*;
use tokio::sync::Semaphore;

use crate::configuration::FetchSettings;
use crate::services::fetcher::{FetchError, Fetcher, RawPage};

/// Hides the `navigator.webdriver` flag that headless Chrome would otherwise
/// expose to the page.
const WEBDRIVER_MASK: &str =
    "Object.defineProperty(navigator, 'webdriver', {get: () => undefined})";

const MARKER_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Fetches pages through a real browser so JS-rendered profiles work.
/// Every fetch gets a fresh WebDriver session; the semaphore only bounds
/// how many are open at once.
pub struct BrowserFetcher {
    settings: FetchSettings,
    sessions: Arc<Semaphore>,
    user_agent: String,
}

impl BrowserFetcher {
    pub fn new(settings: FetchSettings) -> Self {
        let sessions = Arc::new(Semaphore::new(settings.max_sessions.max(1)));

        BrowserFetcher {
            settings,
            sessions,
            user_agent: get_chrome_rua().to_string(),
        }
    }

    async fn connect(&self) -> Result<WebDriver, FetchError> {
        let mut caps = DesiredCapabilities::chrome();
        caps.add_arg("--headless=new")?;
        caps.add_arg("--no-sandbox")?;
        caps.add_arg("--disable-dev-shm-usage")?;
        caps.add_arg("--window-size=1920,1080")?;
        caps.add_arg(&format!("user-agent={}", self.user_agent))?;

        let driver = WebDriver::new(&self.settings.webdriver_url, caps).await?;

        // The session exists from here on; no early return without quitting
        // it first. Dropping a WebDriver does not end the remote session.
        if let Err(e) = driver.execute(WEBDRIVER_MASK, Vec::new()).await {
            teardown(driver).await;
            return Err(e.into());
        }

        Ok(driver)
    }

    async fn render(&self, driver: &WebDriver, url: &str) -> Result<RawPage, FetchError> {
        driver.goto(url).await?;

        let marker = driver
            .query(By::Css(self.settings.marker_selector.as_str()))
            .wait(
                Duration::from_secs(self.settings.marker_wait_secs),
                MARKER_POLL_INTERVAL,
            )
            .first()
            .await;

        if marker.is_err() {
            return Err(FetchError::MarkerMissing {
                url: url.to_string(),
            });
        }

        let body = driver.source().await?;

        Ok(RawPage {
            url: url.to_string(),
            body,
        })
    }

    /// Best effort: a failed screenshot must never mask the fetch error.
    async fn capture_failure(&self, driver: &WebDriver) {
        let path = screenshot_path(&self.settings.screenshot_dir);
        match driver.screenshot(&path).await {
            Ok(()) => log::info!("Screenshot saved: {}", path.display()),
            Err(e) => log::warn!("Failed to save failure screenshot: {e}"),
        }
    }
}

impl Fetcher for BrowserFetcher {
    async fn fetch(&self, url: &str) -> Result<RawPage, FetchError> {
        let _slot = self
            .sessions
            .acquire()
            .await
            .expect("browser session pool closed");

        let driver = self.connect().await?;
        let result = self.render(&driver, url).await;

        if result.is_err() {
            self.capture_failure(&driver).await;
        }

        teardown(driver).await;

        result
    }
}

async fn teardown(driver: WebDriver) {
    if let Err(e) = driver.quit().await {
        log::warn!("Failed to tear down browser session: {e}");
    }
}

fn screenshot_path(dir: &str) -> PathBuf {
    Path::new(dir).join(format!("error_{}.png", Utc::now().timestamp()))
}
