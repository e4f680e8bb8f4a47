//! E2E harness entry point
//!
//! Runs the eligibility scenarios against the live page.
//! Run with: cargo test --package voltqa-e2e --test e2e

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use voltqa_common::SuiteConfig;
use voltqa_e2e::{Harness, HarnessResult};

#[derive(Parser, Debug)]
#[command(name = "voltqa-e2e")]
#[command(about = "E2E harness for the loan-eligibility funnel")]
struct Args {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Page under test
    #[arg(long)]
    page_url: Option<String>,

    /// Attach to an existing WebDriver endpoint instead of spawning one
    #[arg(long)]
    webdriver_url: Option<String>,

    /// Path to the chromedriver binary
    #[arg(long)]
    chromedriver: Option<PathBuf>,

    /// Port for the spawned chromedriver (0 = auto)
    #[arg(long, default_value = "0")]
    port: u16,

    /// Run with a visible browser window
    #[arg(long)]
    headed: bool,

    /// Per-wait deadline in seconds
    #[arg(long)]
    deadline_secs: Option<u64>,

    /// Poll interval in milliseconds
    #[arg(long)]
    poll_interval_ms: Option<u64>,

    /// Run only the named case
    #[arg(short, long)]
    name: Option<String>,

    /// Output directory for the JSON report
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse().unwrap()))
        .init();

    let args = Args::parse();

    // Run async main
    let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
    let result = rt.block_on(async_main(args));

    match result {
        Ok(true) => std::process::exit(0),
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    }
}

async fn async_main(args: Args) -> HarnessResult<bool> {
    let mut config = match &args.config {
        Some(path) => SuiteConfig::load(path)?,
        None => SuiteConfig::default(),
    };

    if let Some(url) = args.page_url {
        config.page.url = url;
    }
    if let Some(url) = args.webdriver_url {
        config.driver.webdriver_url = Some(url);
    }
    if let Some(path) = args.chromedriver {
        config.driver.chromedriver_path = path;
    }
    if args.port != 0 {
        config.driver.port = Some(args.port);
    }
    config.driver.headless = !args.headed;
    if let Some(secs) = args.deadline_secs {
        config.wait.deadline_secs = secs;
    }
    if let Some(ms) = args.poll_interval_ms {
        config.wait.poll_interval_ms = ms;
    }
    if let Some(dir) = args.output {
        config.output_dir = dir;
    }
    config.validate()?;

    let mut harness = Harness::new(config);

    let suite = match &args.name {
        Some(name) => harness.run_named(name).await,
        None => harness.run_all().await,
    };

    // Tear down before surfacing the run outcome
    let finish = harness.finish().await;
    let suite = suite?;
    finish?;

    harness.write_results(&suite)?;
    Ok(suite.all_passed())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_default_to_spawning_a_headless_driver() {
        let args = Args::parse_from(["voltqa-e2e"]);
        assert!(args.webdriver_url.is_none());
        assert_eq!(args.port, 0);
        assert!(!args.headed);
        assert!(args.name.is_none());
    }

    #[test]
    fn args_accept_an_external_endpoint() {
        let args = Args::parse_from([
            "voltqa-e2e",
            "--webdriver-url",
            "http://127.0.0.1:9515",
            "--name",
            "home_page_loads",
        ]);
        assert_eq!(
            args.webdriver_url.as_deref(),
            Some("http://127.0.0.1:9515")
        );
        assert_eq!(args.name.as_deref(), Some("home_page_loads"));
    }
}
