use serde::{Deserialize, Serialize};

pub const DEPLOY_SUCCESS_MESSAGE: &str =
    "Repository created! Now deploy to Railway manually or use Railway CLI.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployOutcome {
    pub repo_url: String,
    pub repo_name: String,
    pub owner: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployResponse {
    pub success: bool,
    pub repo_url: String,
    pub repo_name: String,
    pub owner: String,
    pub message: String,
}

impl From<DeployOutcome> for DeployResponse {
    fn from(outcome: DeployOutcome) -> Self {
        Self {
            success: true,
            repo_url: outcome.repo_url,
            repo_name: outcome.repo_name,
            owner: outcome.owner,
            message: DEPLOY_SUCCESS_MESSAGE.to_string(),
        }
    }
}
