// Entrypoint for the CLI application.
// - Keeps `main` small: read the configuration, open the store, attach the
//   OMDb client when a key is configured and hand everything to the menu.
// - Logs go to stderr and default to `warn` so they stay out of the menu;
//   set `RUST_LOG=movie_catalog=debug` to see store reads and writes.

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use movie_catalog::{app::MovieApp, config::Cli, lookup::OmdbClient, storage, ui::main_menu};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let config = Cli::parse().config();

    let store = storage::open(config.backend, &config.store, config.recovery)
        .with_context(|| format!("Failed to open store {}", config.store.display()))?;
    info!(backend = %config.backend, store = %config.store.display(), "store ready");

    let mut app = MovieApp::new(store, config.site.clone());
    if let Some(client) = OmdbClient::from_config(&config).context("Failed to build HTTP client")? {
        app = app.with_lookup(Box::new(client));
    } else {
        info!("no OMDb API key configured, movies are entered by hand");
    }

    println!("Welcome to the Movie App!");
    println!("Using {} ({})", config.store.display(), config.backend);

    // Blocks until the user picks "0" at the menu.
    main_menu(app)?;
    Ok(())
}
