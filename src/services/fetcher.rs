use std::future::Future;
use std::time::Duration;

use fake_user_agent::get_chrome_rua;
use thiserror::Error;

use crate::configuration::FetchSettings;

#[derive(Debug, Clone)]
pub struct RawPage {
    pub url: String,
    pub body: String,
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("unexpected status {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("webdriver error: {0}")]
    WebDriver(#[from] thirtyfour::error::WebDriverError),

    #[error("marker element never appeared on {url}")]
    MarkerMissing { url: String },
}

/// Strategy seam between the pipeline and the network.
pub trait Fetcher: Send + Sync {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<RawPage, FetchError>> + Send;
}

/// Plain HTTP GET with a spoofed Chrome user agent.
pub struct StaticFetcher {
    client: reqwest::Client,
}

impl StaticFetcher {
    pub fn new(settings: &FetchSettings) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(get_chrome_rua())
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()?;

        Ok(StaticFetcher { client })
    }
}

impl Fetcher for StaticFetcher {
    async fn fetch(&self, url: &str) -> Result<RawPage, FetchError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;

        Ok(RawPage {
            url: url.to_string(),
            body,
        })
    }
}
