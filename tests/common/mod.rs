#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use uuid::Uuid;

use warehouse_gate::auth::{token, Role};

/// Signing secret shared between the spawned server (via env) and the
/// tokens the tests mint locally
pub const TEST_SECRET: &str = "integration-test-secret";

static SERVER: OnceLock<TestServer> = OnceLock::new();

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    fn spawn_with(envs: &[(&str, &str)]) -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // Spawn the already-built binary to keep start fast during tests
        // Assumes debug profile; adjust if you run tests with --release
        let mut cmd = Command::new("target/debug/warehouse-gate");
        cmd.env("GATE_PORT", port.to_string())
            .env("JWT_SECRET", TEST_SECRET)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        for (key, value) in envs {
            cmd.env(key, value);
        }

        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self {
            port,
            base_url,
            child,
        })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!(
            "server did not become ready on {} within {:?}",
            self.base_url,
            timeout
        )
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
    }
}

/// Shared default-environment server (development, bypass disabled)
pub async fn ensure_server() -> Result<&'static TestServer> {
    let server =
        SERVER.get_or_init(|| TestServer::spawn_with(&[]).expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

/// One-off server with extra environment, for bypass/lockout suites
pub async fn spawn_server(envs: &[(&str, &str)]) -> Result<TestServer> {
    let server = TestServer::spawn_with(envs)?;
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

/// Mint a valid one-hour token signed with the server's secret
pub fn issue_token(role: Role, active_role: Option<Role>) -> String {
    token::issue(
        Uuid::new_v4(),
        "worker@warehouse.test",
        role,
        active_role,
        chrono::Duration::hours(1),
        TEST_SECRET,
    )
    .expect("failed to issue test token")
}

pub fn issue_expired_token(role: Role) -> String {
    token::issue(
        Uuid::new_v4(),
        "worker@warehouse.test",
        role,
        None,
        chrono::Duration::seconds(-30),
        TEST_SECRET,
    )
    .expect("failed to issue test token")
}
