mod config;
mod discord;
mod monitor;
mod paths;
mod presence;
mod title;
mod windows_list;

use anyhow::Result;
use tokio::sync::watch;

use crate::discord::DiscordPresence;
use crate::presence::PresenceSink;
use crate::windows_list::DesktopWindows;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run_daemon().await {
        log::error!("{e:#}");
        std::process::exit(1);
    }
}

async fn run_daemon() -> Result<()> {
    // ── Configuration ─────────────────────────────────────────────────────────
    let mut cfg = match paths::config_file_path() {
        Ok(path) => config::load_or_default(&path).unwrap_or_else(|e| {
            log::error!("[config] Error (using defaults): {e:#}");
            config::Config::default()
        }),
        Err(e) => {
            log::warn!("[config] No config location ({e}); using defaults");
            config::Config::default()
        }
    };
    cfg.apply_client_id_override(std::env::var(config::CLIENT_ID_ENV).ok());
    cfg.validate()?;

    // ── Presence service ──────────────────────────────────────────────────────
    let mut presence = DiscordPresence::new(&cfg.client_id, &cfg.large_image)?;
    presence.connect()?;

    // Graceful shutdown on Ctrl+C. `stop_tx` must outlive the loop; a dropped
    // sender stops it.
    let (stop_tx, stop_rx) = watch::channel(false);
    tokio::spawn(monitor::stop_on_signal(tokio::signal::ctrl_c(), stop_tx.clone()));

    log::info!(
        "flpresence-daemon v{} listening for {} projects and focus changes",
        env!("CARGO_PKG_VERSION"),
        cfg.app_marker
    );

    // ── Poll loop ─────────────────────────────────────────────────────────────
    let mut windows = DesktopWindows;
    monitor::run(
        &cfg.app_marker,
        cfg.poll_interval(),
        &mut windows,
        &mut presence,
        stop_rx,
    )
    .await?;
    drop(stop_tx);

    log::info!("Shutting down");
    if let Err(e) = presence.close() {
        log::warn!("{e:#}");
    }
    Ok(())
}
