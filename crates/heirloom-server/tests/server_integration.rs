//! Server integration tests.
//!
//! These tests run a real server on a loopback port and drive it over HTTP.

mod common;

use std::time::Duration;

use anyhow::Result;
use heirloom_session::ActivityConfig;

use common::{ALICE_TOKEN, BOB_TOKEN, TestServer};

#[tokio::test]
async fn test_server_starts_and_responds_to_health() -> Result<()> {
    let server = TestServer::start().await?;

    let healthy = server.health().await?;
    assert!(healthy, "Server should be healthy");

    Ok(())
}

#[tokio::test]
async fn test_server_health_returns_version() -> Result<()> {
    let server = TestServer::start().await?;

    let resp = server.get_anonymous("/health").send().await?;
    assert!(resp.status().is_success());

    let body: serde_json::Value = resp.json().await?;
    assert_eq!(body["status"], "ok");
    assert!(body.get("version").is_some());

    Ok(())
}

#[tokio::test]
async fn test_session_requires_identity() -> Result<()> {
    let server = TestServer::start().await?;

    let resp = server.get_anonymous("/api/v1/session").send().await?;
    assert_eq!(resp.status().as_u16(), 401);

    let body: serde_json::Value = resp.json().await?;
    assert_eq!(body["code"], "unauthorized");
    assert!(body.get("sessionExpired").is_none());

    Ok(())
}

#[tokio::test]
async fn test_api_rejects_invalid_token() -> Result<()> {
    let server = TestServer::start().await?;

    let resp = server
        .get_as("wrong-token", "/api/v1/session")
        .send()
        .await?;
    assert_eq!(resp.status().as_u16(), 401);

    let body: serde_json::Value = resp.json().await?;
    assert!(body.get("sessionExpired").is_none());

    Ok(())
}

#[tokio::test]
async fn test_session_reports_caller() -> Result<()> {
    let server = TestServer::start().await?;

    let resp = server.get_as(ALICE_TOKEN, "/api/v1/session").send().await?;
    assert!(resp.status().is_success());

    let body: serde_json::Value = resp.json().await?;
    assert_eq!(body["userId"], "alice");
    assert_eq!(body["idleTimeoutMs"], 600_000);
    assert!(body["remainingMs"].as_u64().unwrap() <= 600_000);

    Ok(())
}

#[tokio::test]
async fn test_idle_user_is_rejected_then_restarts() -> Result<()> {
    // Long sweep interval so the request path, not the sweeper, detects expiry.
    let activity = ActivityConfig::new()
        .with_idle_timeout_ms(300)
        .with_sweep_interval_ms(60_000);
    let server = TestServer::start_with(activity, false).await?;

    let resp = server.get_as(ALICE_TOKEN, "/api/v1/session").send().await?;
    assert!(resp.status().is_success());

    tokio::time::sleep(Duration::from_millis(600)).await;

    let resp = server.get_as(ALICE_TOKEN, "/api/v1/session").send().await?;
    assert_eq!(resp.status().as_u16(), 401);
    let body: serde_json::Value = resp.json().await?;
    assert_eq!(body["error"], "Session expired due to inactivity");
    assert_eq!(body["sessionExpired"], true);

    // The rejected request cleared the entry; the next one starts fresh.
    let resp = server.get_as(ALICE_TOKEN, "/api/v1/session").send().await?;
    assert!(resp.status().is_success());

    Ok(())
}

#[tokio::test]
async fn test_active_user_is_not_affected_by_idle_user() -> Result<()> {
    let activity = ActivityConfig::new()
        .with_idle_timeout_ms(400)
        .with_sweep_interval_ms(60_000);
    let server = TestServer::start_with(activity, false).await?;

    server.get_as(ALICE_TOKEN, "/api/v1/session").send().await?;
    server.get_as(BOB_TOKEN, "/api/v1/session").send().await?;

    for _ in 0..4 {
        tokio::time::sleep(Duration::from_millis(150)).await;
        let resp = server.get_as(BOB_TOKEN, "/api/v1/session").send().await?;
        assert!(resp.status().is_success());
    }

    let resp = server.get_as(ALICE_TOKEN, "/api/v1/session").send().await?;
    assert_eq!(resp.status().as_u16(), 401);

    Ok(())
}

#[tokio::test]
async fn test_sweeper_evicts_idle_users() -> Result<()> {
    let activity = ActivityConfig::new()
        .with_idle_timeout_ms(200)
        .with_sweep_interval_ms(50);
    let server = TestServer::start_with(activity, false).await?;

    server.get_as(ALICE_TOKEN, "/api/v1/session").send().await?;

    let stats: serde_json::Value = server
        .get_anonymous("/api/v1/session/stats")
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(stats["tracked"], 1);

    tokio::time::sleep(Duration::from_millis(600)).await;

    let stats: serde_json::Value = server
        .get_anonymous("/api/v1/session/stats")
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(stats["tracked"], 0);
    assert_eq!(stats["sweepIntervalMs"], 50);

    Ok(())
}

#[tokio::test]
async fn test_trusted_user_header() -> Result<()> {
    let server = TestServer::start_with(ActivityConfig::default(), true).await?;

    let resp = server
        .get_anonymous("/api/v1/session")
        .header("X-User-Id", "carol")
        .send()
        .await?;
    assert!(resp.status().is_success());

    let body: serde_json::Value = resp.json().await?;
    assert_eq!(body["userId"], "carol");

    Ok(())
}

#[tokio::test]
async fn test_openapi_document() -> Result<()> {
    let server = TestServer::start().await?;

    let resp = server.get_anonymous("/api/openapi.json").send().await?;
    assert!(resp.status().is_success());

    let body: serde_json::Value = resp.json().await?;
    assert!(body["paths"].get("/api/v1/session").is_some());

    Ok(())
}
