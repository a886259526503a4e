use std::io;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use script_completion_server::config::Config;
use script_completion_server::features::completion::{CompletionProvider, DocumentationProvider};
use script_completion_server::logging::init_logger;
use script_completion_server::server::Server;

fn main() -> Result<()> {
    let config = Config::parse();

    let _guard = init_logger(config.no_color, config.log_level.as_deref(), config.log_file)
        .context("failed to initialize logging")?;

    info!(
        "Starting script-completion-server v{} (pid {})",
        env!("CARGO_PKG_VERSION"),
        std::process::id()
    );

    let provider = CompletionProvider::new(Arc::new(DocumentationProvider::new()), config.index_base);
    let server = Server::new(provider);

    let stdin = io::stdin().lock();
    let stdout = io::stdout().lock();
    server.run(stdin, stdout)?;

    info!("Server stopped");
    Ok(())
}
