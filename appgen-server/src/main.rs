use anyhow::Result;
use appgen_observability::{TracingConfig, is_json_format, setup_tracing};
use appgen_server::{bootstrap::build_api_server, config::AppConfig};
use clap::Command;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let _matches = Command::new("appgen-server")
        .about("Template deployment service: renders an app template and pushes it to a new GitHub repository")
        .version(env!("CARGO_PKG_VERSION"))
        .get_matches();

    let config = AppConfig::load_from_env()?;

    let tracing_config = TracingConfig::from_env(
        "appgen-server",
        &config.log_level,
        is_json_format(&config.log_format),
    );
    setup_tracing(tracing_config)?;

    info!("Configuration loaded; GitHub API at {}", config.github_api_url);
    let server = build_api_server(&config)?;

    if let Err(e) = server.serve().await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
