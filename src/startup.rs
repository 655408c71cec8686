use calendesk::api::ApiClient;
use calendesk::config::Config;
use calendesk::error::other_error;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initialize logging with environment-based configuration
pub fn init_logging() -> miette::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,reqwest=warn,hyper=warn")),
        )
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| other_error(&format!("Failed to set up logging: {}", e)))?;

    Ok(())
}

/// Load the client configuration
pub fn load_config() -> miette::Result<Config> {
    match Config::load() {
        Ok(config) => {
            info!("Using backend at {}", config.backend_url);
            Ok(config)
        }
        Err(e) => {
            error!("Failed to load configuration: {:?}", e);
            Err(e.into())
        }
    }
}

/// Build the API client for the configured backend
pub fn build_client(config: &Config) -> miette::Result<ApiClient> {
    Ok(ApiClient::from_config(config)?)
}
