//! VoltQA E2E Harness
//!
//! Rust-controlled browser tests for the Volt Money loan-eligibility page:
//! - Spawns a local chromedriver (or attaches to a running endpoint)
//! - Wraps the WebDriver session in a retry-tolerant interaction layer
//! - Runs the scenario catalogue serially against a single session
//! - Writes a JSON results report
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                      Harness (runner)                      │
//! │    ├── ChromedriverHandle::spawn() | external endpoint     │
//! │    ├── Session::attach()  - one browser session per suite  │
//! │    ├── cases::all()       - scenario catalogue             │
//! │    └── SuiteResult -> eligibility-results.json             │
//! ├────────────────────────────────────────────────────────────┤
//! │    Session (resilient interaction layer)                   │
//! │      open_page / set_field / click_submit                  │
//! │      wait_for / wait_for_text / wait_for_submit_state      │
//! │      - every wait bounded by poll_until(deadline, interval)│
//! └────────────────────────────────────────────────────────────┘
//! ```

pub mod cases;
pub mod driver;
pub mod error;
pub mod runner;
pub mod selectors;
pub mod session;

pub use driver::ChromedriverHandle;
pub use error::{HarnessError, HarnessResult};
pub use runner::Harness;
pub use session::{ElementState, Session};
