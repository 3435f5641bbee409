use anyhow::Result;
use envconfig::Envconfig;
use std::time::Duration;

#[derive(Debug, Clone, Envconfig)]
pub struct AppConfig {
    // Server configuration
    #[envconfig(from = "SERVER_HOST", default = "0.0.0.0")]
    pub server_host: String,

    #[envconfig(from = "PORT", default = "3000")]
    pub server_port: u16,

    #[envconfig(from = "STATIC_DIR", default = "public")]
    pub static_dir: String,

    /// Maximum request body size in bytes (default: 50MB)
    #[envconfig(from = "MAX_PAYLOAD_BYTES", default = "52428800")]
    pub max_payload_bytes: usize,

    // GitHub configuration
    #[envconfig(from = "GITHUB_API_URL", default = "https://api.github.com")]
    pub github_api_url: String,

    #[envconfig(from = "GITHUB_TIMEOUT", default = "30")]
    pub github_timeout_seconds: u64,

    #[envconfig(from = "GITHUB_USER_AGENT", default = "appgen-server")]
    pub github_user_agent: String,

    // Observability configuration
    #[envconfig(from = "LOG_LEVEL", default = "info")]
    pub log_level: String,

    #[envconfig(from = "LOG_FORMAT", default = "plain")]
    pub log_format: String,
}

impl AppConfig {
    /// Load configuration from environment variables only
    pub fn load_from_env() -> Result<Self> {
        Ok(Self::init_from_env()?)
    }

    pub fn server(&self) -> ServerConfig {
        ServerConfig {
            host: self.server_host.clone(),
            port: self.server_port,
            static_dir: self.static_dir.clone(),
            max_payload_bytes: self.max_payload_bytes,
        }
    }

    pub fn github(&self) -> GithubConfig {
        GithubConfig {
            api_url: self.github_api_url.clone(),
            timeout: Some(self.github_timeout_seconds),
            user_agent: self.github_user_agent.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub static_dir: String,
    pub max_payload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            static_dir: "public".to_string(),
            max_payload_bytes: 52_428_800,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GithubConfig {
    pub api_url: String,
    /// Request timeout in seconds; `Some(0)` or `None` disables it.
    pub timeout: Option<u64>,
    pub user_agent: String,
}

impl GithubConfig {
    #[inline]
    pub fn timeout_duration(&self) -> Option<Duration> {
        self.timeout.and_then(|s| {
            if s == 0 {
                None
            } else {
                Some(Duration::from_secs(s))
            }
        })
    }
}
