use anyhow::Result;
use std::sync::Arc;

use crate::{
    config::AppConfig, host::GithubClient, server::ApiServer,
    services::DeploymentService, templates::TemplateRegistry,
};

/// Build a fully-wired ApiServer from an already loaded configuration.
pub fn build_api_server(config: &AppConfig) -> Result<ApiServer> {
    let github = Arc::new(GithubClient::new(&config.github())?);
    let deployment_service = Arc::new(DeploymentService::new(
        TemplateRegistry::builtin(),
        github,
    ));
    Ok(ApiServer::new(deployment_service, config.server()))
}

/// Build a fully-wired ApiServer from environment variables.
/// Mirrors the logic in bin/main and is useful for tests and embedding.
pub fn build_api_server_from_env() -> Result<ApiServer> {
    let config = AppConfig::load_from_env()?;
    build_api_server(&config)
}
