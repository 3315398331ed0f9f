// Entrypoint for the CLI application.
// - Keeps `main` small: wire settings, credentials, client and manager
//   together, then hand off to the UI loop.
// - Initialization failures are fatal and logged; everything after the
//   loop starts is handled inside it.

use anyhow::Context;
use drivetags_cli::api::DriveClient;
use drivetags_cli::auth::{CredentialProvider, TokenCache};
use drivetags_cli::config::Settings;
use drivetags_cli::manager::TagManager;
use drivetags_cli::ui;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    // Logs go to stderr so they do not interleave with the menu on stdout;
    // verbosity is controlled through RUST_LOG.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match run() {
        Ok(()) => Ok(()),
        Err(err) => {
            error!("fatal error: {err:#}");
            Err(err)
        }
    }
}

fn run() -> anyhow::Result<()> {
    let settings = Settings::from_env()?;

    let credentials = TokenCache::new(settings.token_cache.clone());
    // Probe once up front: an unusable credential cache should abort before
    // the menu appears, not fail every operation inside it.
    credentials
        .access_token()
        .context("credential cache is unusable")?;

    let client = DriveClient::new(settings.api_base_url.clone(), Box::new(credentials))
        .context("failed to build the remote store client")?;
    let manager = TagManager::new(client, settings.folder_id.clone());
    info!(folder_id = %settings.folder_id, "session initialized");

    ui::main_menu(&manager, settings.menu_delay)
}
