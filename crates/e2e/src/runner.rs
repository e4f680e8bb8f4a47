//! Suite runner: one driver process, one session, cases in series

use std::path::PathBuf;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use voltqa_common::SuiteConfig;

use crate::cases::{self, Case};
use crate::driver::ChromedriverHandle;
use crate::error::{HarnessError, HarnessResult};
use crate::session::Session;

/// Result of running a single case
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseResult {
    pub name: String,
    pub success: bool,
    pub duration_ms: u64,
    pub error: Option<String>,
}

/// Result of running the whole suite
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteResult {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub duration_ms: u64,
    pub generated_at: chrono::DateTime<chrono::Utc>,
    pub results: Vec<CaseResult>,
}

impl SuiteResult {
    /// Tally a set of case results
    pub fn tally(results: Vec<CaseResult>, duration_ms: u64) -> Self {
        let passed = results.iter().filter(|r| r.success).count();
        let failed = results.len() - passed;
        Self {
            total: results.len(),
            passed,
            failed,
            duration_ms,
            generated_at: chrono::Utc::now(),
            results,
        }
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

/// Owns the driver process and browser session for one suite run
pub struct Harness {
    config: SuiteConfig,
    driver: Option<ChromedriverHandle>,
    session: Option<Session>,
}

impl Harness {
    pub fn new(config: SuiteConfig) -> Self {
        Self {
            config,
            driver: None,
            session: None,
        }
    }

    /// Spawn (or attach to) the WebDriver endpoint and open the session
    pub async fn start(&mut self) -> HarnessResult<()> {
        if self.session.is_some() {
            return Ok(()); // already running
        }

        let endpoint = match &self.config.driver.webdriver_url {
            Some(url) => url.clone(),
            None => {
                let handle = ChromedriverHandle::spawn(&self.config.driver).await?;
                let endpoint = handle.endpoint().to_string();
                self.driver = Some(handle);
                endpoint
            }
        };

        let session =
            Session::attach(&endpoint, self.config.driver.headless, self.config.wait).await?;
        self.session = Some(session);
        Ok(())
    }

    /// Run the whole catalogue
    pub async fn run_all(&mut self) -> HarnessResult<SuiteResult> {
        self.run_cases(cases::all()).await
    }

    /// Run a single case by name
    pub async fn run_named(&mut self, name: &str) -> HarnessResult<SuiteResult> {
        let case =
            cases::find(name).ok_or_else(|| HarnessError::UnknownCase(name.to_string()))?;
        self.run_cases(vec![case]).await
    }

    async fn run_cases(&mut self, cases: Vec<Case>) -> HarnessResult<SuiteResult> {
        self.start().await?;
        let session = self.session.as_ref().expect("session opened by start");

        let start = Instant::now();
        let mut results = Vec::new();

        info!(
            "Running {} case(s) against {}",
            cases.len(),
            self.config.page.url
        );

        for case in &cases {
            let case_start = Instant::now();
            let outcome = (case.run)(session, &self.config).await;
            let duration_ms = case_start.elapsed().as_millis() as u64;

            match outcome {
                Ok(()) => {
                    info!("✓ {} ({} ms)", case.name, duration_ms);
                    results.push(CaseResult {
                        name: case.name.to_string(),
                        success: true,
                        duration_ms,
                        error: None,
                    });
                }
                Err(e) => {
                    error!("✗ {} - {}", case.name, e);
                    results.push(CaseResult {
                        name: case.name.to_string(),
                        success: false,
                        duration_ms,
                        error: Some(e.to_string()),
                    });
                }
            }
        }

        let suite = SuiteResult::tally(results, start.elapsed().as_millis() as u64);

        info!("");
        info!(
            "Results: {} passed, {} failed ({} ms)",
            suite.passed, suite.failed, suite.duration_ms
        );

        Ok(suite)
    }

    /// Close the session and stop the driver process
    pub async fn finish(&mut self) -> HarnessResult<()> {
        if let Some(session) = self.session.take() {
            session.quit().await?;
        }
        if let Some(mut driver) = self.driver.take() {
            driver.stop()?;
        }
        Ok(())
    }

    /// Write the JSON report
    pub fn write_results(&self, suite: &SuiteResult) -> HarnessResult<PathBuf> {
        std::fs::create_dir_all(&self.config.output_dir)?;

        let path = self.config.output_dir.join("eligibility-results.json");
        let json = serde_json::to_string_pretty(suite)?;
        std::fs::write(&path, json)?;

        info!("Results written to: {}", path.display());
        Ok(path)
    }
}

impl Drop for Harness {
    fn drop(&mut self) {
        // The session needs an async quit; the driver process must not
        // outlive the harness either way.
        if let Some(mut driver) = self.driver.take() {
            let _ = driver.stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn case_result(name: &str, success: bool) -> CaseResult {
        CaseResult {
            name: name.to_string(),
            success,
            duration_ms: 1,
            error: (!success).then(|| "boom".to_string()),
        }
    }

    #[test_case(&[true, true, true], 3, 0; "all passing")]
    #[test_case(&[true, false], 1, 1; "one failure")]
    #[test_case(&[], 0, 0; "empty suite")]
    fn tally_accounts_for_every_case(outcomes: &[bool], passed: usize, failed: usize) {
        let results = outcomes
            .iter()
            .enumerate()
            .map(|(i, ok)| case_result(&format!("case_{}", i), *ok))
            .collect();

        let suite = SuiteResult::tally(results, 42);
        assert_eq!(suite.total, outcomes.len());
        assert_eq!(suite.passed, passed);
        assert_eq!(suite.failed, failed);
        assert_eq!(suite.all_passed(), failed == 0);
    }

    #[test]
    fn report_serializes_with_stable_field_names() {
        let suite = SuiteResult::tally(vec![case_result("home_page_loads", true)], 42);
        let json = serde_json::to_value(&suite).unwrap();

        assert_eq!(json["total"], 1);
        assert_eq!(json["passed"], 1);
        assert_eq!(json["results"][0]["name"], "home_page_loads");
        assert!(json["generated_at"].is_string());
    }
}
