use serde::Deserialize;
use std::collections::HashMap;

/// Body of `POST /api/deploy`. Required fields are optional here so that a
/// missing one is reported as such instead of as a malformed body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployRequest {
    #[serde(default)]
    pub app_name: Option<String>,
    #[serde(default)]
    pub template: Option<String>,
    #[serde(default)]
    pub github_token: Option<String>,
    /// Only the keys are read; values may be any JSON and are never
    /// committed.
    #[serde(default)]
    pub env_vars: Option<HashMap<String, serde_json::Value>>,
}

impl DeployRequest {
    pub fn new(app_name: &str, template: &str, github_token: &str) -> Self {
        Self {
            app_name: Some(app_name.to_string()),
            template: Some(template.to_string()),
            github_token: Some(github_token.to_string()),
            env_vars: None,
        }
    }
}
