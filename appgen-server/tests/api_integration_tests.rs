// API tests for template listing and deploy orchestration against a
// recording repository host.
mod common;

use anyhow::Result;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use common::{RecordingHost, deploy_request, json_body, test_app};
use std::sync::Arc;
use tower::ServiceExt;

#[tokio::test]
async fn list_templates_returns_metadata_only() -> Result<()> {
    let app = test_app(Arc::new(RecordingHost::default()));
    let response = app
        .oneshot(Request::builder().uri("/api/templates").body(Body::empty())?)
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    let list = body.as_array().unwrap();
    let ids: Vec<&str> = list.iter().map(|t| t["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["claude-assistant", "axum-api"]);

    for entry in list {
        let keys: Vec<&String> = entry.as_object().unwrap().keys().collect();
        assert_eq!(keys.len(), 5, "unexpected keys: {:?}", keys);
        assert!(entry.get("files").is_none());
        assert!(entry["requiredEnvVars"].is_array());
    }
    assert_eq!(list[0]["requiredEnvVars"][0], "ANTHROPIC_API_KEY");
    assert_eq!(list[1]["icon"], "🚀");

    let raw = body.to_string();
    assert!(!raw.contains("{{APP_NAME}}"));
    Ok(())
}

#[tokio::test]
async fn missing_fields_are_rejected_without_remote_calls() -> Result<()> {
    let full = serde_json::json!({
        "appName": "demo",
        "template": "axum-api",
        "githubToken": "ghp_test",
    });
    for field in ["appName", "template", "githubToken"] {
        for replacement in [None, Some(serde_json::json!(""))] {
            let mut body = full.clone();
            match &replacement {
                None => {
                    body.as_object_mut().unwrap().remove(field);
                }
                Some(value) => body[field] = value.clone(),
            }

            let host = Arc::new(RecordingHost::default());
            let response = test_app(host.clone())
                .oneshot(deploy_request(body))
                .await?;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", field);
            let body = json_body(response).await;
            assert_eq!(body["error"], "Missing required fields");
            assert!(host.calls().is_empty(), "remote call made without {}", field);
        }
    }
    Ok(())
}

#[tokio::test]
async fn unknown_template_is_rejected_without_remote_calls() -> Result<()> {
    let host = Arc::new(RecordingHost::default());
    let response = test_app(host.clone())
        .oneshot(deploy_request(serde_json::json!({
            "appName": "demo",
            "template": "express-api",
            "githubToken": "ghp_test",
        })))
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "Invalid template");
    assert!(host.calls().is_empty());
    Ok(())
}

#[tokio::test]
async fn successful_deploy_commits_every_file_in_order() -> Result<()> {
    let host = Arc::new(RecordingHost::default());
    let response = test_app(host.clone())
        .oneshot(deploy_request(serde_json::json!({
            "appName": "My Cool App!",
            "template": "axum-api",
            "githubToken": "ghp_test",
            "envVars": { "PORT": "8080" },
        })))
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["repoName"], "my-cool-app-");
    assert_eq!(body["owner"], "octocat");
    assert_eq!(body["repoUrl"], "https://github.com/octocat/my-cool-app-");
    assert_eq!(
        body["message"],
        "Repository created! Now deploy to Railway manually or use Railway CLI."
    );

    assert_eq!(
        host.calls(),
        vec![
            "user:ghp_test",
            "create:my-cool-app-",
            "put:Cargo.toml",
            "put:src/main.rs",
            "put:.env.example",
            "put:.gitignore",
            "put:README.md",
        ]
    );

    let commits = host.commits();
    assert!(commits.iter().all(|c| c.owner == "octocat"));
    assert!(commits.iter().all(|c| c.repo == "my-cool-app-"));
    assert_eq!(commits[0].message, "Add Cargo.toml");
    assert!(commits[0].content.contains("name = \"My Cool App!\""));
    assert!(commits[1].content.contains("Welcome to My Cool App! API!"));
    assert!(commits.iter().all(|c| !c.content.contains("{{APP_NAME}}")));
    Ok(())
}

#[tokio::test]
async fn failure_mid_upload_reports_details_and_stops() -> Result<()> {
    let host = Arc::new(RecordingHost::failing_on_put(3));
    let response = test_app(host.clone())
        .oneshot(deploy_request(serde_json::json!({
            "appName": "chatty",
            "template": "claude-assistant",
            "githubToken": "ghp_test",
        })))
        .await?;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = json_body(response).await;
    assert_eq!(body["error"], "Deployment failed");
    assert_eq!(body["details"], "API rate limit exceeded (HTTP 403)");

    // files 1-2 stay committed remotely, nothing after the failing one is tried
    let committed: Vec<String> =
        host.commits().into_iter().map(|c| c.path).collect();
    assert_eq!(committed, vec!["Cargo.toml", "src/main.rs"]);
    let puts = host.calls().iter().filter(|c| c.starts_with("put:")).count();
    assert_eq!(puts, 3);
    Ok(())
}

#[tokio::test]
async fn auth_failure_stops_before_repository_creation() -> Result<()> {
    let host = Arc::new(RecordingHost {
        fail_auth: true,
        ..Default::default()
    });
    let response = test_app(host.clone())
        .oneshot(deploy_request(serde_json::json!({
            "appName": "demo",
            "template": "axum-api",
            "githubToken": "bad",
        })))
        .await?;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert_eq!(body["details"], "Bad credentials (HTTP 401)");
    assert_eq!(host.calls(), vec!["user:bad"]);
    Ok(())
}

#[tokio::test]
async fn health_and_static_fallback() -> Result<()> {
    let app = test_app(Arc::new(RecordingHost::default()));

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/health").body(Body::empty())?)
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "appgen-server");

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/index.html").body(Body::empty())?)
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(Request::builder().uri("/nope.js").body(Body::empty())?)
        .await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn env_var_values_of_any_json_type_are_accepted() -> Result<()> {
    let host = Arc::new(RecordingHost::default());
    let response = test_app(host.clone())
        .oneshot(deploy_request(serde_json::json!({
            "appName": "demo",
            "template": "axum-api",
            "githubToken": "ghp_test",
            "envVars": { "PORT": 3000, "DEBUG": true, "EXTRA": null },
        })))
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["success"], true);
    assert_eq!(host.commits().len(), 5);
    assert!(host.commits().iter().all(|c| !c.content.contains("DEBUG")));
    Ok(())
}

#[tokio::test]
async fn body_without_json_content_type_reports_missing_fields() -> Result<()> {
    let host = Arc::new(RecordingHost::default());
    let response = test_app(host.clone())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/deploy")
                .body(Body::from("{}"))?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "Missing required fields");
    assert!(host.calls().is_empty());
    Ok(())
}

#[tokio::test]
async fn malformed_bodies_get_json_bad_request() -> Result<()> {
    let bodies = [
        "{\"appName\": \"demo\",".to_string(),
        serde_json::json!({
            "appName": 42,
            "template": "axum-api",
            "githubToken": "ghp_test",
        })
        .to_string(),
    ];
    for raw in bodies {
        let host = Arc::new(RecordingHost::default());
        let response = test_app(host.clone())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/deploy")
                    .header("content-type", "application/json")
                    .body(Body::from(raw.clone()))?,
            )
            .await?;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", raw);
        let body = json_body(response).await;
        let error = body["error"].as_str().unwrap_or_default();
        assert!(error.starts_with("Invalid request body"), "{}", error);
        assert!(host.calls().is_empty());
    }
    Ok(())
}
