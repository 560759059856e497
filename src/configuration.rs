use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub source: SourceSettings,
    pub fetch: FetchSettings,
    pub run: RunSettings,
    pub output: OutputSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourceSettings {
    /// Headerless two-column CSV: region, profile URL.
    pub input_path: String,
    pub directory: Option<DirectorySettings>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DirectorySettings {
    pub url: String,
    /// Only navigation links whose URL contains this fragment become tasks.
    pub path_filter: String,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FetchStrategy {
    /// Plain HTTP GET with a spoofed browser user agent.
    Static,
    /// Full page render through a WebDriver session.
    Browser,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FetchSettings {
    pub strategy: FetchStrategy,
    pub request_timeout_secs: u64,
    pub webdriver_url: String,
    /// Element whose presence means the dynamic content finished loading.
    pub marker_selector: String,
    pub marker_wait_secs: u64,
    /// Upper bound on concurrently open browser sessions.
    pub max_sessions: usize,
    pub screenshot_dir: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RunSettings {
    pub max_workers: usize,
    /// Total attempts per task, not additional tries.
    pub max_retries: u8,
    pub backoff_secs: u64,
    pub delay_min_ms: u64,
    pub delay_max_ms: u64,
    pub progress_every: usize,
    pub progress_pause_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputSettings {
    pub records_path: String,
    pub errors_path: String,
}

/// Reads `configuration.yaml` from the working directory, then applies
/// environment overrides of the form `SCRAPE_RUN__MAX_WORKERS=10`.
pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("configuration"))
        .add_source(config::Environment::with_prefix("SCRAPE").separator("__"))
        .build()?;

    settings.try_deserialize::<Settings>()
}
