//! tandem: dual-channel audio recorder with merged transcription.

mod app;
mod audio;
mod channel;
mod commands;
mod config;
mod logging;
mod session;
mod transcript;
mod transcription;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    app::run().await
}
