//! Error types for the E2E harness

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("chromedriver failed to start: {0}")]
    DriverStartup(String),

    #[error("chromedriver health check failed after {0} attempts")]
    DriverHealthCheck(usize),

    #[error("page failed to reach a usable state: {0}")]
    Navigation(String),

    #[error("timed out waiting for {0}")]
    Timeout(String),

    #[error("element for {locator} kept going stale across retries")]
    StaleElement { locator: String },

    #[error("assertion failed: {0}")]
    AssertionFailed(String),

    #[error("no such case: {0}")]
    UnknownCase(String),

    #[error("WebDriver error: {0}")]
    WebDriver(#[from] thirtyfour::error::WebDriverError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(#[from] voltqa_common::Error),
}

pub type HarnessResult<T> = Result<T, HarnessError>;
