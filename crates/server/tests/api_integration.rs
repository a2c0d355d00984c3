//! HTTP-level tests against the in-process router.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{fixtures, TestFixture};

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_reports_missing_tools() {
    let fixture = TestFixture::new();

    for uri in ["/health", "/api/health"] {
        let response = fixture.get(uri).await;
        assert_eq!(response.status, StatusCode::OK);

        let body = response.json();
        assert_eq!(body["status"], "Warning");
        assert_eq!(body["ffmpeg_available"], false);
        assert_eq!(body["ffprobe_available"], false);
        assert!(!body["version"].as_str().unwrap().is_empty());
    }
}

// =============================================================================
// Process
// =============================================================================

#[tokio::test]
async fn test_process_dry_run_returns_command() {
    let fixture = TestFixture::new();

    let response = fixture
        .post(
            "/api/process",
            json!({
                "input": "clip.mov",
                "format": "webm",
                "resolution": "1280x720",
                "dry_run": true
            }),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let command = response.json()["output"].as_str().unwrap().to_string();
    let input = fixture.path("clip.mov");

    assert!(command.starts_with("ffmpeg -hide_banner -y -i "));
    assert!(command.contains(&input.display().to_string()));
    assert!(command.contains("-s 1280x720"));
    assert!(command.contains("-c:v libvpx-vp9"));
    assert!(command.ends_with("processed_clip.webm"));
    // Dry runs never touch the prober
    assert_eq!(fixture.prober.probe_count().await, 0);
}

#[tokio::test]
async fn test_process_dry_run_resolves_explicit_output() {
    let fixture = TestFixture::new();

    let response = fixture
        .post(
            "/api/process",
            json!({ "input": "a.mp4", "output": "out/b.mp4", "dry_run": true }),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let command = response.json()["output"].as_str().unwrap().to_string();
    assert!(command.ends_with(&fixture.path("out/b.mp4").display().to_string()));
}

#[tokio::test]
async fn test_process_missing_input_is_bad_request() {
    let fixture = TestFixture::new();

    let response = fixture
        .post("/api/process", json!({ "format": "mp4" }))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.text.contains("Input path is required"));
}

#[tokio::test]
async fn test_process_malformed_json_is_bad_request() {
    let fixture = TestFixture::new();

    let response = fixture.post_raw("/api/process", "{not json").await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.text, "Invalid request body");
}

#[tokio::test]
async fn test_process_wrong_method() {
    let fixture = TestFixture::new();

    let response = fixture.get("/api/process").await;

    assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_process_unknown_input_fails() {
    let fixture = TestFixture::new();

    let response = fixture
        .post("/api/process", json!({ "input": "missing.mp4" }))
        .await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.text.starts_with("Processing failed: "));
}

#[tokio::test]
async fn test_process_without_ffmpeg_fails() {
    let fixture = TestFixture::new();
    fixture
        .prober
        .set_probe_result(fixture.path("clip.mp4"), fixtures::hd_video("clip.mp4"))
        .await;

    let response = fixture
        .post(
            "/api/process",
            json!({ "input": "clip.mp4", "output": "out.mp4" }),
        )
        .await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.text.starts_with("Processing failed: "));
    assert!(response.text.contains("ffmpeg"));
}

// =============================================================================
// Compare
// =============================================================================

#[tokio::test]
async fn test_compare_uses_probed_info() {
    let fixture = TestFixture::new();
    fixture
        .prober
        .set_probe_result(fixture.path("orig.mp4"), fixtures::hd_video("orig.mp4"))
        .await;
    fixture
        .prober
        .set_probe_result(fixture.path("small.webm"), fixtures::sd_webm("small.webm"))
        .await;

    let response = fixture
        .post(
            "/api/compare",
            json!({ "original": "orig.mp4", "processed": "small.webm" }),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["original"]["filename"], "orig.mp4");
    assert_eq!(body["processed"]["codec"], "vp9");
    assert!((body["size_diff_percent"].as_f64().unwrap() - 75.0).abs() < 1e-9);
    assert!((body["bitrate_reduction_percent"].as_f64().unwrap() - 70.0).abs() < 1e-9);
    assert_eq!(body["resolution_changed"], true);
    assert_eq!(body["format_changed"], true);
    assert_eq!(body["codec_changed"], true);
}

#[tokio::test]
async fn test_compare_missing_file_fails() {
    let fixture = TestFixture::new();
    fixture
        .prober
        .set_probe_result(fixture.path("orig.mp4"), fixtures::hd_video("orig.mp4"))
        .await;

    let response = fixture
        .post(
            "/api/compare",
            json!({ "original": "orig.mp4", "processed": "gone.mp4" }),
        )
        .await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.text.starts_with("Comparison failed: "));
}

#[tokio::test]
async fn test_compare_requires_both_paths() {
    let fixture = TestFixture::new();

    let response = fixture
        .post("/api/compare", json!({ "original": "a.mp4", "processed": "" }))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// Compress
// =============================================================================

#[tokio::test]
async fn test_compress_rejects_bad_bitrate() {
    let fixture = TestFixture::new();

    let response = fixture
        .post(
            "/api/compress",
            json!({ "input": "clip.mp4", "bitrate": "fast" }),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.text.starts_with("Compression failed: "));
}

#[tokio::test]
async fn test_compress_requires_fields() {
    let fixture = TestFixture::new();

    let response = fixture
        .post("/api/compress", json!({ "bitrate": "1M" }))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.text, "Input path is required");

    let response = fixture
        .post("/api/compress", json!({ "input": "clip.mp4" }))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.text, "Bitrate is required");
}

#[tokio::test]
async fn test_compress_without_ffmpeg_fails() {
    let fixture = TestFixture::new();

    let response = fixture
        .post(
            "/api/compress",
            json!({ "input": "clip.mp4", "bitrate": "800k" }),
        )
        .await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.text.starts_with("Compression failed: "));
}

// =============================================================================
// Info
// =============================================================================

#[tokio::test]
async fn test_info_returns_media_info() {
    let fixture = TestFixture::new();
    let path = fixture.path("my clip.mp4");
    fixture
        .prober
        .set_probe_result(&path, fixtures::hd_video("my clip.mp4"))
        .await;

    let uri = format!("/api/info?path={}", urlencoding::encode("my clip.mp4"));
    let response = fixture.get(&uri).await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["filename"], "my clip.mp4");
    assert_eq!(body["resolution"], "1920x1080");
    assert_eq!(body["duration"], "60.000000s");
    assert_eq!(fixture.prober.probed_paths().await, vec![path]);
}

#[tokio::test]
async fn test_info_accepts_absolute_path() {
    let fixture = TestFixture::new();
    let path = fixture.base_dir().join("abs.webm");
    fixture
        .prober
        .set_probe_result(&path, fixtures::sd_webm("abs.webm"))
        .await;

    let uri = format!(
        "/api/info?path={}",
        urlencoding::encode(&path.display().to_string())
    );
    let response = fixture.get(&uri).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["codec"], "vp9");
}

#[tokio::test]
async fn test_info_missing_path_parameter() {
    let fixture = TestFixture::new();

    let response = fixture.get("/api/info").await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.text, "Missing path parameter");
}

#[tokio::test]
async fn test_info_unknown_file_fails() {
    let fixture = TestFixture::new();

    let response = fixture.get("/api/info?path=nothing.mp4").await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.text.starts_with("Failed to get media info: "));
}
