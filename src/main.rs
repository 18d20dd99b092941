use std::sync::Arc;

use anyhow::{anyhow, Context};
use tracing_subscriber::EnvFilter;
use trayotp::{
    app::App,
    config::Config,
    desktop::{
        clipboard::SystemClipboard,
        tray::{self, TrayIndicator},
    },
};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting trayotp");

    let config = Config::from_env();
    tracing::info!(
        secret_configured = config.secret.is_some(),
        icon = ?config.icon_path,
        "configuration loaded"
    );

    // The tray has to be driven from the main thread; the core runs beside it.
    let event_loop = tray::event_loop();
    let indicator = Arc::new(TrayIndicator::new(event_loop.create_proxy()));
    let clipboard = Arc::new(SystemClipboard::spawn()?);

    let core = std::thread::Builder::new()
        .name("trayotp-core".into())
        .spawn(move || App::new(config, indicator, clipboard).run_blocking())?;

    tray::run(event_loop);

    let state = core
        .join()
        .map_err(|_| anyhow!("core thread panicked"))?
        .context("tray core failed to start")?;
    tracing::info!(%state, "trayotp shut down cleanly");

    Ok(())
}
