//! Resilient interaction layer over a WebDriver session
//!
//! The eligibility page re-renders asynchronously after input (client-side
//! validation, debounced network calls), so single-shot lookups race the
//! DOM. Every helper here is a bounded poll: it either succeeds within the
//! configured deadline or fails with a specific error kind, never hangs.
//! Transient faults - stale references, intercepted clicks, elements that
//! have not rendered yet - are absorbed inside the loop and never surface.

use std::sync::atomic::{AtomicBool, Ordering};

use thirtyfour::error::WebDriverError;
use thirtyfour::prelude::*;
use tracing::{debug, warn};

use voltqa_common::config::WaitConfig;
use voltqa_common::poll::poll_until;

use crate::error::{HarnessError, HarnessResult};
use crate::selectors;

/// Element readiness states a wait can target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementState {
    /// Attached to the DOM
    Present,
    /// Attached and displayed
    Visible,
    /// Displayed and enabled
    Clickable,
}

impl ElementState {
    fn describe(&self) -> &'static str {
        match self {
            ElementState::Present => "present",
            ElementState::Visible => "visible",
            ElementState::Clickable => "clickable",
        }
    }
}

/// One browser session, serially reused by every case in the suite
pub struct Session {
    driver: WebDriver,
    wait: WaitConfig,
}

impl Session {
    /// Open a WebDriver session against `endpoint`
    pub async fn attach(endpoint: &str, headless: bool, wait: WaitConfig) -> HarnessResult<Self> {
        let mut caps = DesiredCapabilities::chrome();
        if headless {
            caps.add_arg("--headless=new")?;
            caps.add_arg("--disable-gpu")?;
        }
        caps.add_arg("--window-size=1440,900")?;

        let driver = WebDriver::new(endpoint, caps).await?;
        Ok(Self { driver, wait })
    }

    /// Navigate to the form and require its three controls to appear
    pub async fn open_page(&self, url: &str) -> HarnessResult<()> {
        debug!("Opening {}", url);
        self.driver
            .goto(url)
            .await
            .map_err(|e| HarnessError::Navigation(format!("failed to load {}: {}", url, e)))?;

        for (name, locator) in [
            ("mobile input", selectors::MOBILE_INPUT),
            ("PAN input", selectors::PAN_INPUT),
            ("submit control", selectors::SUBMIT),
        ] {
            self.wait_for(locator, ElementState::Present)
                .await
                .map_err(|_| {
                    HarnessError::Navigation(format!("{} never appeared on {}", name, url))
                })?;
        }
        Ok(())
    }

    /// Wait until the element at `locator` reaches `state`
    pub async fn wait_for(&self, locator: &str, state: ElementState) -> HarnessResult<WebElement> {
        let found = poll_until(self.wait.deadline(), self.wait.poll_interval(), || {
            async move {
                match self.probe(locator, state).await {
                    Ok(ready) => ready,
                    Err(e) => {
                        if !is_transient(&e) {
                            warn!("lookup error for {}: {}", locator, e);
                        }
                        None
                    }
                }
            }
        })
        .await;

        found.map_err(|elapsed| {
            HarnessError::Timeout(format!(
                "element {} to become {} (waited {:?})",
                locator,
                state.describe(),
                elapsed.waited
            ))
        })
    }

    /// Single-shot readiness check
    async fn probe(
        &self,
        locator: &str,
        state: ElementState,
    ) -> Result<Option<WebElement>, WebDriverError> {
        let elem = self.driver.find(By::XPath(locator)).await?;
        let ready = match state {
            ElementState::Present => true,
            ElementState::Visible => elem.is_displayed().await?,
            ElementState::Clickable => elem.is_displayed().await? && elem.is_enabled().await?,
        };
        Ok(ready.then_some(elem))
    }

    /// Clear the field at `locator` and write `value`
    ///
    /// A re-render can invalidate the element between lookup, clear, and
    /// send-keys; the whole sequence is retried until the deadline.
    /// Repeating the call with the same value leaves the field unchanged.
    pub async fn set_field(&self, locator: &str, value: &str) -> HarnessResult<()> {
        debug!("Setting {} = {:?}", locator, value);
        let stale_last = AtomicBool::new(false);

        let result = poll_until(self.wait.deadline(), self.wait.poll_interval(), || {
            let stale_last = &stale_last;
            async move {
                match self.try_set_field(locator, value).await {
                    Ok(true) => Some(()),
                    Ok(false) => {
                        stale_last.store(false, Ordering::Relaxed);
                        None
                    }
                    Err(e) => {
                        stale_last.store(
                            matches!(e, WebDriverError::StaleElementReference(_)),
                            Ordering::Relaxed,
                        );
                        if !is_transient(&e) {
                            warn!("set_field error for {}: {}", locator, e);
                        }
                        None
                    }
                }
            }
        })
        .await;

        result.map_err(|elapsed| {
            if stale_last.load(Ordering::Relaxed) {
                HarnessError::StaleElement {
                    locator: locator.to_string(),
                }
            } else {
                HarnessError::Timeout(format!(
                    "field {} to accept input (waited {:?})",
                    locator, elapsed.waited
                ))
            }
        })
    }

    /// One lookup-clear-write attempt; false means the field is not
    /// actionable yet
    async fn try_set_field(&self, locator: &str, value: &str) -> Result<bool, WebDriverError> {
        let elem = self.driver.find(By::XPath(locator)).await?;
        if !(elem.is_displayed().await? && elem.is_enabled().await?) {
            return Ok(false);
        }
        elem.clear().await?;
        elem.send_keys(value).await?;
        Ok(true)
    }

    /// Scroll the submit control into view and click it
    ///
    /// Interception and staleness are retried; once the deadline expires
    /// the click is forced through script execution instead of failing the
    /// case. Each attempt either lands exactly one click or none.
    pub async fn click_submit(&self) -> HarnessResult<()> {
        let clicked = poll_until(self.wait.deadline(), self.wait.poll_interval(), || {
            async move {
                match self.try_click(selectors::SUBMIT).await {
                    Ok(()) => Some(()),
                    Err(e) => {
                        if is_transient(&e) {
                            debug!("click retry after: {}", e);
                        } else {
                            warn!("click error: {}", e);
                        }
                        None
                    }
                }
            }
        })
        .await;

        if clicked.is_ok() {
            return Ok(());
        }

        warn!("natural click never landed, forcing a script click");
        let elem = self.driver.find(By::XPath(selectors::SUBMIT)).await?;
        self.driver
            .execute("arguments[0].click();", vec![elem.to_json()?])
            .await?;
        Ok(())
    }

    /// One scroll-and-click attempt
    async fn try_click(&self, locator: &str) -> Result<(), WebDriverError> {
        let elem = self.driver.find(By::XPath(locator)).await?;
        elem.scroll_into_view().await?;
        elem.click().await?;
        Ok(())
    }

    /// Wait until the rendered page contains `needle`, case-insensitively
    pub async fn wait_for_text(&self, needle: &str) -> HarnessResult<()> {
        let result = poll_until(self.wait.deadline(), self.wait.poll_interval(), || {
            async move {
                match self.driver.source().await {
                    Ok(source) if page_contains(&source, needle) => Some(()),
                    Ok(_) => None,
                    Err(e) => {
                        warn!("page source read failed: {}", e);
                        None
                    }
                }
            }
        })
        .await;

        result.map_err(|elapsed| {
            HarnessError::Timeout(format!(
                "page text {:?} (waited {:?})",
                needle, elapsed.waited
            ))
        })
    }

    /// Wait until the submit control's enabled flag equals `expected`
    pub async fn wait_for_submit_state(&self, expected: bool) -> HarnessResult<()> {
        let result = poll_until(self.wait.deadline(), self.wait.poll_interval(), || {
            async move {
                match self.submit_enabled().await {
                    Ok(enabled) if enabled == expected => Some(()),
                    Ok(_) => None,
                    Err(e) => {
                        if !is_transient(&e) {
                            warn!("submit state read failed: {}", e);
                        }
                        None
                    }
                }
            }
        })
        .await;

        result.map_err(|elapsed| {
            HarnessError::Timeout(format!(
                "submit control to become {} (waited {:?})",
                if expected { "enabled" } else { "disabled" },
                elapsed.waited
            ))
        })
    }

    /// Wait until the browser URL contains `needle`
    pub async fn wait_for_url_contains(&self, needle: &str) -> HarnessResult<String> {
        let result = poll_until(self.wait.deadline(), self.wait.poll_interval(), || {
            async move {
                match self.driver.current_url().await {
                    Ok(url) if url.as_str().contains(needle) => Some(url.to_string()),
                    _ => None,
                }
            }
        })
        .await;

        result.map_err(|elapsed| {
            HarnessError::Timeout(format!(
                "URL containing {:?} (waited {:?})",
                needle, elapsed.waited
            ))
        })
    }

    /// Single-shot read of the submit control's enabled flag
    pub async fn submit_enabled(&self) -> Result<bool, WebDriverError> {
        let elem = self.driver.find(By::XPath(selectors::SUBMIT)).await?;
        elem.is_enabled().await
    }

    /// Read an element's live `value` property
    pub async fn field_value(&self, locator: &str) -> HarnessResult<String> {
        let elem = self.wait_for(locator, ElementState::Present).await?;
        Ok(elem.prop("value").await?.unwrap_or_default())
    }

    /// Page title
    pub async fn title(&self) -> HarnessResult<String> {
        Ok(self.driver.title().await?)
    }

    /// Current browser URL
    pub async fn current_url(&self) -> HarnessResult<String> {
        Ok(self.driver.current_url().await?.to_string())
    }

    /// Close the browser session
    pub async fn quit(self) -> HarnessResult<()> {
        self.driver.quit().await?;
        Ok(())
    }
}

/// Faults worth retrying: the page re-rendered under us or the element is
/// not actionable yet.
fn is_transient(err: &WebDriverError) -> bool {
    matches!(
        err,
        WebDriverError::NoSuchElement(_)
            | WebDriverError::StaleElementReference(_)
            | WebDriverError::ElementClickIntercepted(_)
            | WebDriverError::ElementNotInteractable(_)
    )
}

/// Case-insensitive substring check over page source
fn page_contains(source: &str, needle: &str) -> bool {
    source.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_contains_is_case_insensitive() {
        let source = "<div>MFCentral has sent an OTP</div>";
        assert!(page_contains(source, "mfcentral has sent"));
        assert!(page_contains(source, "SENT AN OTP"));
        assert!(!page_contains(source, "congratulations"));
    }

    #[test]
    fn page_contains_matches_whole_needle_only() {
        assert!(!page_contains("valid pa", "valid pan"));
        assert!(page_contains("enter a valid PAN number", "valid pan"));
    }

    #[test]
    fn custom_errors_are_not_transient() {
        assert!(!is_transient(&WebDriverError::FatalError(
            "boom".to_string()
        )));
    }

    #[test]
    fn states_describe_themselves() {
        assert_eq!(ElementState::Present.describe(), "present");
        assert_eq!(ElementState::Visible.describe(), "visible");
        assert_eq!(ElementState::Clickable.describe(), "clickable");
    }
}
