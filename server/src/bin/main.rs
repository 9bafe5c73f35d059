//! The server CLI. Flags: `--config <path>` (default `./diplomacy.json`),
//! `--data-dir <path>` (overrides config), `--listen <addr>` (overrides
//! config). Exit codes: 0 clean, 1 fatal config, 2 persistence failure.

use std::process::ExitCode;

use diplomacy_server::config::ServerConfig;
use diplomacy_server::Server;

fn parse_args() -> (std::path::PathBuf, Option<String>, Option<String>) {
    let mut config_path = std::path::PathBuf::from("./diplomacy.json");
    let mut data_dir = None;
    let mut listen = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                if let Some(v) = args.next() {
                    config_path = std::path::PathBuf::from(v);
                }
            }
            "--data-dir" => data_dir = args.next(),
            "--listen" => listen = args.next(),
            _ => {}
        }
    }

    (config_path, data_dir, listen)
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "diplomacy_server=info".into()),
        )
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .init();

    let (config_path, data_dir_override, listen_override) = parse_args();

    let mut config = match ServerConfig::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "fatal configuration error");
            return ExitCode::from(1);
        }
    };
    if let Some(data_dir) = data_dir_override {
        config.data_dir = data_dir.into();
    }
    if let Some(listen) = listen_override {
        config.listen = listen;
    }

    let server = Server::with_config(&config.data_dir, config.clone());
    if let Err(e) = server.store.ensure_layout().await {
        tracing::error!(error = %e, "fatal persistence error");
        return ExitCode::from(2);
    }

    let loaded = match server.load_from_disk().await {
        Ok(count) => count,
        Err(e) => {
            tracing::error!(error = %e, "fatal persistence error loading games");
            return ExitCode::from(2);
        }
    };
    tracing::info!(loaded, "restored games from disk");

    tracing::info!(listen = %config.listen, "diplomacy-server ready");

    // Transport wiring (HTTP/WebSocket byte-pushing) lives outside this
    // crate's scope; a deployment wires an axum router that
    // decodes wire frames (server::wire) and calls into
    // server::dispatcher::Dispatcher per connection. The scheduler's wake
    // loop and its fire-channel drain into `Server::process_game` are already
    // running in the background (spawned by `Server::with_config`); this
    // just holds the process open so they and any embedding test harness can
    // keep driving the dispatcher.
    tokio::signal::ctrl_c().await.ok();

    tracing::info!("shutting down, writing final snapshots");
    let written = server.snapshot_all().await;
    tracing::info!(written, "snapshot complete");

    ExitCode::SUCCESS
}
