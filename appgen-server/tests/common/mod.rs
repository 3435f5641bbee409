#![allow(dead_code)]

use appgen_server::{
    AppState, DeploymentService, ServerConfig, TemplateRegistry, build_router,
    host::{FileCommit, HostError, HostRepo, HostUser, NewRepo, RepoHost},
};
use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, Response},
};
use std::sync::{Arc, Mutex};

/// Records every call and can fail the n-th file commit (1-based).
#[derive(Default)]
pub struct RecordingHost {
    pub calls: Mutex<Vec<String>>,
    pub commits: Mutex<Vec<FileCommit>>,
    pub fail_on_put: Option<usize>,
    pub fail_auth: bool,
}

impl RecordingHost {
    pub fn failing_on_put(n: usize) -> Self {
        Self {
            fail_on_put: Some(n),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn commits(&self) -> Vec<FileCommit> {
        self.commits.lock().unwrap().clone()
    }
}

#[async_trait]
impl RepoHost for RecordingHost {
    async fn authenticated_user(&self, token: &str) -> Result<HostUser, HostError> {
        self.calls.lock().unwrap().push(format!("user:{}", token));
        if self.fail_auth {
            return Err(HostError::Api {
                status: 401,
                message: "Bad credentials".to_string(),
            });
        }
        Ok(HostUser {
            login: "octocat".to_string(),
        })
    }

    async fn create_repo(
        &self,
        _token: &str,
        repo: &NewRepo,
    ) -> Result<HostRepo, HostError> {
        self.calls.lock().unwrap().push(format!("create:{}", repo.name));
        Ok(HostRepo {
            name: repo.name.clone(),
            html_url: format!("https://github.com/octocat/{}", repo.name),
        })
    }

    async fn put_file(
        &self,
        _token: &str,
        commit: &FileCommit,
    ) -> Result<(), HostError> {
        let attempt = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(format!("put:{}", commit.path));
            calls.iter().filter(|c| c.starts_with("put:")).count()
        };
        if self.fail_on_put == Some(attempt) {
            return Err(HostError::Api {
                status: 403,
                message: "API rate limit exceeded".to_string(),
            });
        }
        self.commits.lock().unwrap().push(commit.clone());
        Ok(())
    }
}

pub fn test_app(host: Arc<dyn RepoHost>) -> Router {
    let service =
        Arc::new(DeploymentService::new(TemplateRegistry::builtin(), host));
    let config = ServerConfig {
        static_dir: "tests/fixtures/public".to_string(),
        ..Default::default()
    };
    build_router(
        AppState {
            deployment_service: service,
        },
        &config,
    )
}

pub fn deploy_request(body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/deploy")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
