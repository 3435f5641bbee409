pub mod api;
pub mod bootstrap;
pub mod config;
pub mod errors;
pub mod host;
pub mod models;
pub mod server;
pub mod services;
pub mod templates;

pub use config::*;
pub use errors::*;
pub use models::*;
pub use server::{ApiServer, AppState, build_router};

pub use host::{GithubClient, RepoHost};
pub use services::DeploymentService;
pub use templates::{TemplateRegistry, TemplateSummary};

pub use api::create_middleware_stack;
pub use bootstrap::build_api_server_from_env;
