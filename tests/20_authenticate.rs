mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

use warehouse_gate::auth::Role;

#[tokio::test]
async fn missing_authorization_header_is_rejected() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/auth/whoami", server.base_url))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["message"], "Missing or invalid Authorization header");
    assert_eq!(body["code"], "UNAUTHORIZED");
    Ok(())
}

#[tokio::test]
async fn non_bearer_scheme_is_rejected() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/auth/whoami", server.base_url))
        .header("Authorization", "Basic dXNlcjpwYXNz")
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["message"], "Missing or invalid Authorization header");
    Ok(())
}

#[tokio::test]
async fn garbage_token_is_rejected_as_invalid() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/auth/whoami", server.base_url))
        .bearer_auth("not-a-real-token")
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["message"], "Invalid token");
    Ok(())
}

#[tokio::test]
async fn expired_token_is_rejected_as_expired() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/auth/whoami", server.base_url))
        .bearer_auth(common::issue_expired_token(Role::Picker))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["message"], "Token expired");
    Ok(())
}

#[tokio::test]
async fn whoami_reflects_the_token_identity() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/auth/whoami", server.base_url))
        .bearer_auth(common::issue_token(Role::Picker, None))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<serde_json::Value>().await?;
    let data = &body["data"];
    assert_eq!(data["email"], "worker@warehouse.test");
    assert_eq!(data["baseRole"], "PICKER");
    assert_eq!(data["activeRole"], serde_json::Value::Null);
    assert_eq!(data["effectiveRole"], "PICKER");
    // `role` stays an alias of the effective role
    assert_eq!(data["role"], data["effectiveRole"]);
    Ok(())
}

#[tokio::test]
async fn switched_token_reports_active_role_as_effective() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/auth/whoami", server.base_url))
        .bearer_auth(common::issue_token(Role::Supervisor, Some(Role::Picker)))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::OK);

    let data = res.json::<serde_json::Value>().await?["data"].clone();
    assert_eq!(data["baseRole"], "SUPERVISOR");
    assert_eq!(data["activeRole"], "PICKER");
    assert_eq!(data["effectiveRole"], "PICKER");
    assert_eq!(data["role"], "PICKER");
    Ok(())
}

#[tokio::test]
async fn refresh_exchanges_a_valid_token_for_a_fresh_one() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let refresh_token = common::issue_token(Role::Supervisor, None);

    let res = client
        .post(format!("{}/auth/refresh", server.base_url))
        .json(&json!({ "token": refresh_token }))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    let new_token = body["data"]["token"].as_str().unwrap().to_string();
    assert!(body["data"]["expiresIn"].as_i64().unwrap() > 0);

    // The exchanged token authenticates normally
    let res = client
        .get(format!("{}/api/auth/whoami", server.base_url))
        .bearer_auth(&new_token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let data = res.json::<serde_json::Value>().await?["data"].clone();
    assert_eq!(data["baseRole"], "SUPERVISOR");
    Ok(())
}

#[tokio::test]
async fn expired_refresh_token_prompts_relogin() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/auth/refresh", server.base_url))
        .json(&json!({ "token": common::issue_expired_token(Role::Picker) }))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["message"], "Token expired");
    Ok(())
}

#[tokio::test]
async fn secret_gated_bypass_grants_admin_outside_production() -> Result<()> {
    let server = common::spawn_server(&[
        ("TEST_BYPASS", "secret"),
        ("TEST_BYPASS_SECRET", "shared-test-secret"),
    ])
    .await?;
    let client = reqwest::Client::new();

    // Correct secret, no Authorization header: synthesized admin
    let res = client
        .get(format!("{}/api/auth/whoami", server.base_url))
        .header("X-Test-Auth-Secret", "shared-test-secret")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let data = res.json::<serde_json::Value>().await?["data"].clone();
    assert_eq!(data["baseRole"], "ADMIN");

    // Wrong secret falls through to the normal branch
    let res = client
        .get(format!("{}/api/auth/whoami", server.base_url))
        .header("X-Test-Auth-Secret", "wrong")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn bypass_never_activates_in_production() -> Result<()> {
    let server = common::spawn_server(&[
        ("APP_ENV", "production"),
        ("TEST_BYPASS", "secret"),
        ("TEST_BYPASS_SECRET", "shared-test-secret"),
    ])
    .await?;
    let client = reqwest::Client::new();

    // Even the correct bypass secret is ignored in production
    let res = client
        .get(format!("{}/api/auth/whoami", server.base_url))
        .header("X-Test-Auth-Secret", "shared-test-secret")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    // A real bearer token still works normally
    let res = client
        .get(format!("{}/api/auth/whoami", server.base_url))
        .bearer_auth(common::issue_token(Role::Picker, None))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    Ok(())
}
