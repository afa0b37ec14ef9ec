//! Integration tests for Roster.
//!
//! Each test spawns its own admin server on an ephemeral loopback port, with
//! the dashboard's API client pointed back at that same server, so the full
//! browser -> dashboard -> client -> JSON API -> store path is exercised.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p roster-integration-tests
//! ```

use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;

use roster_admin::client::UsersClient;
use roster_admin::config::AdminConfig;
use roster_admin::state::AppState;
use tokio::task::JoinHandle;

/// A running admin server bound to `127.0.0.1:0`.
pub struct TestServer {
    pub addr: SocketAddr,
    /// API client for the server's `/api/users`.
    pub api: UsersClient,
    /// Browser-like client that does not follow redirects.
    pub http: reqwest::Client,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Spawn a server with default configuration (seeded store).
    pub async fn spawn() -> Self {
        Self::spawn_with(&[]).await
    }

    /// Spawn a server with extra configuration variables.
    ///
    /// `ROSTER_API_URL` defaults to the server's own address.
    pub async fn spawn_with(vars: &[(&str, &str)]) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local address");

        let mut env: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        env.entry("ROSTER_PORT".to_string())
            .or_insert_with(|| addr.port().to_string());
        env.entry("ROSTER_API_URL".to_string())
            .or_insert_with(|| format!("http://{addr}"));

        let config =
            AdminConfig::from_lookup(|key| env.get(key).cloned()).expect("Invalid test config");
        let state = AppState::new(config).expect("Failed to create application state");
        let app = roster_admin::app(state);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Test server error");
        });

        let api = UsersClient::from_base(&format!("http://{addr}"), Duration::from_secs(5))
            .expect("Failed to build API client");
        let http = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("Failed to build HTTP client");

        Self {
            addr,
            api,
            http,
            handle,
        }
    }

    /// Absolute URL for a path on this server.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// An address nothing listens on, for unreachable-API tests.
pub async fn unused_addr() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind probe listener");
    listener.local_addr().expect("Failed to read local address")
}
