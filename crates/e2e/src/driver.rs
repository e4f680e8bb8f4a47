//! Chromedriver process management - spawning and readiness checking

use std::process::{Child, Command, Stdio};
use std::time::Duration;
use tracing::{info, warn};

use voltqa_common::config::DriverConfig;
use voltqa_common::poll::poll_until;

use crate::error::{HarnessError, HarnessResult};

/// How often the readiness poll hits /status
const STATUS_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Handle to a running chromedriver process
pub struct ChromedriverHandle {
    child: Child,
    endpoint: String,
    pub port: u16,
}

impl ChromedriverHandle {
    /// Spawn chromedriver and wait until it reports ready
    pub async fn spawn(config: &DriverConfig) -> HarnessResult<Self> {
        let port = config.port.unwrap_or_else(find_free_port);
        let endpoint = format!("http://127.0.0.1:{}", port);

        info!("Spawning chromedriver on port {}", port);

        let child = Command::new(&config.chromedriver_path)
            .arg(format!("--port={}", port))
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                HarnessError::DriverStartup(format!(
                    "failed to spawn {}: {}",
                    config.chromedriver_path.display(),
                    e
                ))
            })?;

        let handle = ChromedriverHandle {
            child,
            endpoint: endpoint.clone(),
            port,
        };

        handle
            .wait_for_ready(Duration::from_secs(config.startup_timeout_secs))
            .await?;

        info!("chromedriver ready at {}", endpoint);
        Ok(handle)
    }

    /// Poll /status until the driver reports ready
    async fn wait_for_ready(&self, timeout: Duration) -> HarnessResult<()> {
        let status_url = format!("{}/status", self.endpoint);
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(2))
            .build()?;

        info!("Waiting for chromedriver at {}", status_url);

        let ready = poll_until(timeout, STATUS_POLL_INTERVAL, || {
            let client = &client;
            let status_url = &status_url;
            async move {
                match client.get(status_url).send().await {
                    Ok(resp) if resp.status().is_success() => {
                        match resp.json::<serde_json::Value>().await {
                            Ok(body) if body["value"]["ready"].as_bool().unwrap_or(false) => {
                                Some(())
                            }
                            Ok(_) => {
                                warn!("chromedriver up but not ready yet");
                                None
                            }
                            Err(e) => {
                                warn!("unreadable status body: {}", e);
                                None
                            }
                        }
                    }
                    Ok(resp) => {
                        warn!("status check returned {}", resp.status());
                        None
                    }
                    Err(e) => {
                        // Connection refused is expected while the driver is starting
                        if !e.is_connect() {
                            warn!("status check error: {}", e);
                        }
                        None
                    }
                }
            }
        })
        .await;

        ready.map_err(|elapsed| HarnessError::DriverHealthCheck(elapsed.attempts as usize))
    }

    /// WebDriver endpoint served by this process
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Stop the driver process
    pub fn stop(&mut self) -> HarnessResult<()> {
        info!("Stopping chromedriver (pid: {})", self.child.id());

        // Try graceful shutdown first
        #[cfg(unix)]
        {
            use nix::sys::signal::{kill, Signal};
            use nix::unistd::Pid;

            let pid = Pid::from_raw(self.child.id() as i32);
            if kill(pid, Signal::SIGTERM).is_ok() {
                // Give it a moment to shut down gracefully
                std::thread::sleep(Duration::from_millis(200));
            }
        }

        // Force kill if still running
        let _ = self.child.kill();
        let _ = self.child.wait();

        Ok(())
    }
}

impl Drop for ChromedriverHandle {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}

/// Find a free port to use
fn find_free_port() -> u16 {
    use std::net::TcpListener;

    TcpListener::bind("127.0.0.1:0")
        .expect("Failed to bind to find free port")
        .local_addr()
        .expect("Failed to get local addr")
        .port()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_ports_are_unprivileged() {
        let port1 = find_free_port();
        let port2 = find_free_port();

        assert!(port1 > 1024);
        assert!(port2 > 1024);
    }
}
