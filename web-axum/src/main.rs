#![deny(warnings)]

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod config;
use config::Config;

mod routes;
use routes::{app, AppState};

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = Config::parse();
    let settings = config.game_settings();
    let state = Arc::new(AppState::new(settings));

    let addr = config.addr();
    tracing::info!(
        points = settings.points,
        default_difficulty = settings.default_difficulty,
        max_difficulty = settings.max_difficulty,
        "listening on {}",
        addr
    );
    axum::Server::bind(&addr)
        .serve(app(state).into_make_service())
        .await?;

    Ok(())
}
