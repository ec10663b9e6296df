use std::path::PathBuf;

mod backend_bridge;
mod controller;
mod ui;

use clap::Parser;
use client_core::config::{load_settings, DEFAULT_SETTINGS_FILE};
use crossbeam_channel::bounded;
use eframe::egui;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::ui::DashboardApp;

#[derive(Debug, Parser)]
#[command(name = "dashboard_gui", about = "Product list dashboard")]
struct Args {
    /// Settings file. Defaults to ./dashboard.toml, then the user config dir.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    server_url: Option<String>,
    /// Access token sent as the bearer credential.
    #[arg(long)]
    token: Option<String>,
}

fn user_settings_path() -> Option<PathBuf> {
    let path = dirs::config_dir()?
        .join("product_dashboard")
        .join(DEFAULT_SETTINGS_FILE);
    path.exists().then_some(path)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();
    let config_path = args.config.or_else(|| {
        if std::path::Path::new(DEFAULT_SETTINGS_FILE).exists() {
            None
        } else {
            user_settings_path()
        }
    });
    let mut settings = load_settings(config_path.as_deref())?;
    if let Some(server_url) = args.server_url {
        settings.server_url = server_url;
        settings.validate()?;
    }
    if let Some(token) = args.token {
        settings.access_token = Some(token);
    }

    let title = settings.page_title();
    let notification_timeout = settings.notification_timeout();
    tracing::info!(server_url = %settings.server_url, "starting product dashboard");

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(64);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(256);
    backend_bridge::runtime::launch(cmd_rx, ui_tx, settings);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(title.clone())
            .with_inner_size([1100.0, 720.0])
            .with_min_inner_size([760.0, 480.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Product Dashboard",
        options,
        Box::new(move |_cc| {
            Ok(Box::new(DashboardApp::new(
                cmd_tx,
                ui_rx,
                title,
                notification_timeout,
            )))
        }),
    )
    .map_err(|err| anyhow::anyhow!("dashboard window failed: {err}"))
}
