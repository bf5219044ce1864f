pub mod catalog;
pub mod chat;
pub mod cli;
pub mod compose;
pub mod config;
pub mod llm;
pub mod logging;
pub mod present;
pub mod search;
pub mod server;

use anyhow::{Result, anyhow};
use chat::ChatService;
use cli::CliArgs;
use config::AppConfig;
use llm::openai::OpenAiProvider;
use server::AssetPaths;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

pub async fn run(args: CliArgs) -> Result<()> {
    let mut config = AppConfig::load_with_path(args.config.as_deref())?;
    if let Some(catalog) = args.catalog {
        config.catalog_path = catalog;
    }
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    logging::init(&config.log_level);

    let catalog = Arc::new(catalog::load_csv(&config.catalog_path)?);
    let llm = match OpenAiProvider::new(
        reqwest::Client::new(),
        config.openai_api_key.clone(),
        config.openai_model.clone(),
        config.openai_base_url.clone(),
        config.generation.sampling,
    ) {
        Ok(provider) => {
            info!(model = %config.openai_model, "assistant replies enabled");
            Some(provider)
        }
        Err(err) => {
            warn!(error = %err, "assistant replies disabled, using templated replies");
            None
        }
    };

    let service = Arc::new(ChatService::new(catalog, llm, config.generation.timeout));
    let assets = AssetPaths {
        static_dir: config.static_dir.clone(),
        index_file: config.index_file.clone(),
    };
    let app = server::router(service, &assets);

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .map_err(|err| anyhow!("Failed to bind {}: {err}", config.bind_addr))?;
    server::serve(listener, app).await
}
