use crate::{
    errors::DeployError,
    host::{FileCommit, NewRepo, RepoHost},
    models::{DeployOutcome, DeployRequest},
    templates::{Template, TemplateRegistry, render},
};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Lowercases `app_name` and maps every character outside `[a-z0-9-]` to `-`.
pub fn derive_repo_name(app_name: &str) -> String {
    app_name
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' {
                c
            } else {
                '-'
            }
        })
        .collect()
}

fn required(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|v| !v.is_empty())
}

pub struct DeploymentService {
    registry: TemplateRegistry,
    host: Arc<dyn RepoHost>,
}

impl DeploymentService {
    pub fn new(registry: TemplateRegistry, host: Arc<dyn RepoHost>) -> Self {
        Self { registry, host }
    }

    pub fn registry(&self) -> &TemplateRegistry {
        &self.registry
    }

    /// Creates the repository and commits the rendered bundle one file at a
    /// time. A failure stops the loop; files committed before it stay in
    /// the remote repository.
    pub async fn deploy(
        &self,
        request: DeployRequest,
    ) -> Result<DeployOutcome, DeployError> {
        let (Some(app_name), Some(template_id), Some(token)) = (
            required(&request.app_name),
            required(&request.template),
            required(&request.github_token),
        ) else {
            return Err(DeployError::MissingFields);
        };

        let template = self
            .registry
            .get(template_id)
            .ok_or_else(|| DeployError::InvalidTemplate(template_id.to_string()))?;

        info!("Deploying template {} as {}", template.id, app_name);
        self.check_env_vars(template, &request);

        let user = self.host.authenticated_user(token).await.map_err(|e| {
            error!("Failed to authenticate to repository host: {}", e);
            e
        })?;

        let repo_name = derive_repo_name(app_name);
        let repo = self
            .host
            .create_repo(
                token,
                &NewRepo {
                    name: repo_name.clone(),
                    description: template.description.to_string(),
                    private: false,
                    auto_init: true,
                },
            )
            .await
            .map_err(|e| {
                error!("Failed to create repository {}: {}", repo_name, e);
                e
            })?;

        let files = render(template, app_name);
        let total = files.len();
        for (index, file) in files.into_iter().enumerate() {
            let commit = FileCommit {
                owner: user.login.clone(),
                repo: repo_name.clone(),
                message: format!("Add {}", file.path),
                path: file.path,
                content: file.content,
            };
            if let Err(e) = self.host.put_file(token, &commit).await {
                error!(
                    repo = %repo_name,
                    committed = index,
                    total,
                    "Failed to commit {}: {}",
                    commit.path,
                    e
                );
                return Err(e.into());
            }
        }

        info!(
            "Deployed {} files to {}/{}",
            total, user.login, repo_name
        );

        Ok(DeployOutcome {
            repo_url: repo.html_url,
            repo_name,
            owner: user.login,
        })
    }

    /// Configuration values are never committed to the (public)
    /// repository; only their presence is checked and logged.
    fn check_env_vars(&self, template: &Template, request: &DeployRequest) {
        let provided = request.env_vars.as_ref();
        if let Some(vars) = provided {
            let keys: Vec<&str> = vars.keys().map(String::as_str).collect();
            info!(keys = ?keys, "Received configuration keys");
        }
        let missing: Vec<&str> = template
            .required_env_vars
            .iter()
            .copied()
            .filter(|key| !provided.is_some_and(|vars| vars.contains_key(*key)))
            .collect();
        if !missing.is_empty() {
            warn!(
                template = template.id,
                missing = ?missing,
                "Required configuration keys were not supplied; set them on the deployment target"
            );
        }
    }
}
