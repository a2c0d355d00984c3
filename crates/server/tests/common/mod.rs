//! Common test utilities for in-process API testing.
//!
//! The fixture builds the real router with a mock prober injected and tool
//! paths that do not exist, so no ffmpeg installation is needed.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use mediadesk_core::{testing::MockProber, Config, FfmpegEngine, ToolsConfig};
use mediadesk_server::{api::create_router, state::AppState};

/// Re-export fixtures for test convenience
pub use mediadesk_core::testing::fixtures;

/// In-process server with a controllable prober.
pub struct TestFixture {
    pub router: Router,
    /// Mock prober - configure media info per path
    pub prober: MockProber,
    /// Base directory relative request paths resolve against
    pub temp_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub text: String,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.text)
            .unwrap_or_else(|e| panic!("Response is not JSON ({}): {}", e, self.text))
    }
}

impl TestFixture {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let prober = MockProber::new();

        let missing = temp_dir.path().join("no-such-bin");
        let tools = ToolsConfig::with_paths(missing.join("ffmpeg"), missing.join("ffprobe"));
        let config = Config {
            tools: tools.clone(),
            ..Default::default()
        };

        let engine = FfmpegEngine::new(tools, Arc::new(prober.clone()));
        let state = Arc::new(AppState::new(
            config,
            engine,
            temp_dir.path().to_path_buf(),
        ));

        Self {
            router: create_router(state),
            prober,
            temp_dir,
        }
    }

    pub fn base_dir(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Absolute path of `name` inside the base directory.
    pub fn path(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Request::get(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn post(&self, uri: &str, body: Value) -> TestResponse {
        self.post_raw(uri, &body.to_string()).await
    }

    pub async fn post_raw(&self, uri: &str, body: &str) -> TestResponse {
        let request = Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Request failed");

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read body")
            .to_bytes();

        TestResponse {
            status,
            text: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }
}
