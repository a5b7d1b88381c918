//! vmemo entry point.

mod app;
mod commands;
mod config;
mod logging;
mod playback;
mod recording;
mod session;
mod setup;
mod ui;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    app::run().await
}
