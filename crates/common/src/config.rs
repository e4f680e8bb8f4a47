//! Suite configuration
//!
//! TOML on disk, defaults targeting the production eligibility page,
//! CLI overrides applied by the harness binary.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};

/// Suite configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SuiteConfig {
    /// Page under test
    pub page: PageConfig,

    /// WebDriver endpoint and process settings
    pub driver: DriverConfig,

    /// Wait budgets for the interaction layer
    pub wait: WaitConfig,

    /// Directory for JSON reports
    pub output_dir: PathBuf,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            page: PageConfig::default(),
            driver: DriverConfig::default(),
            wait: WaitConfig::default(),
            output_dir: PathBuf::from("test-results"),
        }
    }
}

/// The page under test
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    /// URL of the eligibility form
    pub url: String,

    /// Keyword expected in the page title
    pub title_keyword: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            url: "https://voltmoney.in/check-loan-eligibility-against-mutual-funds".to_string(),
            title_keyword: "Volt".to_string(),
        }
    }
}

/// WebDriver endpoint and process settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Existing WebDriver endpoint (unset = spawn chromedriver)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webdriver_url: Option<String>,

    /// Path to the chromedriver binary
    pub chromedriver_path: PathBuf,

    /// Fixed port for the spawned driver (unset = pick a free port)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    /// Run the browser headless
    pub headless: bool,

    /// Driver startup timeout in seconds
    pub startup_timeout_secs: u64,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            webdriver_url: None,
            chromedriver_path: PathBuf::from("chromedriver"),
            port: None,
            headless: true,
            startup_timeout_secs: 30,
        }
    }
}

/// Wait budgets shared by every interaction-layer helper
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct WaitConfig {
    /// Hard deadline per wait, in seconds
    pub deadline_secs: u64,

    /// Pause between condition checks, in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            deadline_secs: 20,
            poll_interval_ms: 250,
        }
    }
}

impl WaitConfig {
    /// Hard deadline per wait
    pub fn deadline(&self) -> Duration {
        Duration::from_secs(self.deadline_secs)
    }

    /// Pause between condition checks
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl SuiteConfig {
    /// Load configuration from file, falling back to defaults when absent
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject configurations the harness cannot run with
    pub fn validate(&self) -> Result<()> {
        if !self.page.url.starts_with("http") {
            return Err(Error::InvalidConfig(format!(
                "page.url must be an http(s) URL, got {:?}",
                self.page.url
            )));
        }
        if self.wait.deadline_secs == 0 {
            return Err(Error::InvalidConfig(
                "wait.deadline_secs must be nonzero".to_string(),
            ));
        }
        if self.wait.poll_interval_ms == 0 {
            return Err(Error::InvalidConfig(
                "wait.poll_interval_ms must be nonzero".to_string(),
            ));
        }
        if self.wait.poll_interval() > self.wait.deadline() {
            return Err(Error::InvalidConfig(
                "wait.poll_interval_ms exceeds the deadline".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_target_the_production_page() {
        let config = SuiteConfig::default();

        assert!(config.page.url.contains("check-loan-eligibility"));
        assert_eq!(config.wait.deadline_secs, 20);
        assert_eq!(config.wait.poll_interval_ms, 250);
        assert!(config.driver.headless);
        assert!(config.driver.webdriver_url.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_toml_fills_unset_fields_from_defaults() {
        let config: SuiteConfig = toml::from_str(
            r#"
[wait]
deadline_secs = 5
"#,
        )
        .unwrap();

        assert_eq!(config.wait.deadline_secs, 5);
        assert_eq!(config.wait.poll_interval_ms, 250);
        assert!(config.page.url.contains("voltmoney"));
    }

    #[test]
    fn save_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("suite.toml");

        let mut config = SuiteConfig::default();
        config.driver.port = Some(4444);
        config.wait.deadline_secs = 7;
        config.save(&path).unwrap();

        let loaded = SuiteConfig::load(&path).unwrap();
        assert_eq!(loaded.driver.port, Some(4444));
        assert_eq!(loaded.wait.deadline_secs, 7);
    }

    #[test]
    fn missing_file_loads_defaults() {
        let loaded = SuiteConfig::load(Path::new("/nonexistent/suite.toml")).unwrap();
        assert_eq!(loaded.wait.deadline_secs, 20);
    }

    #[test]
    fn validate_rejects_unusable_budgets() {
        let mut config = SuiteConfig::default();
        config.wait.deadline_secs = 0;
        assert!(config.validate().is_err());

        let mut config = SuiteConfig::default();
        config.wait.poll_interval_ms = 60_000;
        assert!(config.validate().is_err());

        let mut config = SuiteConfig::default();
        config.page.url = "not-a-url".to_string();
        assert!(config.validate().is_err());
    }
}
