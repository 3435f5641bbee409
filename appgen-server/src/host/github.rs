use super::{FileCommit, HostError, HostRepo, HostUser, NewRepo, RepoHost};
use crate::config::GithubConfig;
use async_trait::async_trait;
use base64::Engine;
use reqwest::{Method, RequestBuilder, Response, StatusCode, Url};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

const GITHUB_ACCEPT: &str = "application/vnd.github+json";
const GITHUB_API_VERSION: &str = "2022-11-28";

#[derive(Debug, Serialize)]
struct PutContentsBody<'a> {
    message: &'a str,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ContentsEntry {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct GithubErrorBody {
    message: String,
    #[serde(default)]
    errors: Vec<GithubErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct GithubErrorDetail {
    #[serde(default)]
    message: Option<String>,
}

pub struct GithubClient {
    client: reqwest::Client,
    base_url: Url,
}

impl GithubClient {
    pub fn new(config: &GithubConfig) -> Result<Self, HostError> {
        let base_url = Url::parse(&config.api_url)
            .map_err(|e| HostError::InvalidUrl(format!("{}: {}", config.api_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(HostError::InvalidUrl(config.api_url.clone()));
        }

        let mut builder = reqwest::Client::builder().user_agent(&config.user_agent);
        if let Some(timeout) = config.timeout_duration() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url,
        })
    }

    /// Appends percent-encoded path segments to the API base URL.
    fn endpoint<'a, I>(&self, segments: I) -> Result<Url, HostError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| HostError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn contents_url(&self, commit: &FileCommit) -> Result<Url, HostError> {
        let segments = ["repos", commit.owner.as_str(), commit.repo.as_str(), "contents"]
            .into_iter()
            .chain(commit.path.split('/').filter(|s| !s.is_empty()));
        self.endpoint(segments)
    }

    fn request(&self, method: Method, url: Url, token: &str) -> RequestBuilder {
        self.client
            .request(method, url)
            .bearer_auth(token)
            .header(reqwest::header::ACCEPT, GITHUB_ACCEPT)
            .header("X-GitHub-Api-Version", GITHUB_API_VERSION)
    }

    async fn check(response: Response) -> Result<Response, HostError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(HostError::Api {
            status: status.as_u16(),
            message: Self::parse_error_message(status, &body),
        })
    }

    fn parse_error_message(status: StatusCode, body: &str) -> String {
        match serde_json::from_str::<GithubErrorBody>(body) {
            Ok(parsed) => {
                let details: Vec<String> =
                    parsed.errors.into_iter().filter_map(|e| e.message).collect();
                if details.is_empty() {
                    parsed.message
                } else {
                    format!("{}: {}", parsed.message, details.join("; "))
                }
            }
            Err(_) => status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string(),
        }
    }

    /// Blob sha of an existing file, needed to overwrite it.
    async fn existing_sha(
        &self,
        token: &str,
        url: &Url,
    ) -> Result<Option<String>, HostError> {
        let response = self.request(Method::GET, url.clone(), token).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let entry: ContentsEntry = Self::check(response).await?.json().await?;
        Ok(Some(entry.sha))
    }
}

#[async_trait]
impl RepoHost for GithubClient {
    async fn authenticated_user(&self, token: &str) -> Result<HostUser, HostError> {
        let url = self.endpoint(["user"])?;
        let response = self.request(Method::GET, url, token).send().await?;
        let user: HostUser = Self::check(response).await?.json().await?;
        debug!(login = %user.login, "resolved authenticated user");
        Ok(user)
    }

    async fn create_repo(
        &self,
        token: &str,
        repo: &NewRepo,
    ) -> Result<HostRepo, HostError> {
        info!("Creating repository: {}", repo.name);
        let url = self.endpoint(["user", "repos"])?;
        let response = self
            .request(Method::POST, url, token)
            .json(repo)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn put_file(
        &self,
        token: &str,
        commit: &FileCommit,
    ) -> Result<(), HostError> {
        let url = self.contents_url(commit)?;
        // auto_init repositories already hold a README; updating it needs its sha
        let sha = self.existing_sha(token, &url).await?;
        debug!(path = %commit.path, update = sha.is_some(), "committing file");

        let body = PutContentsBody {
            message: &commit.message,
            content: base64::engine::general_purpose::STANDARD.encode(&commit.content),
            sha,
        };
        let response = self
            .request(Method::PUT, url, token)
            .json(&body)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}
