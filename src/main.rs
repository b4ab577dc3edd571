pub mod gauge;
pub mod input;
pub mod layout;
pub mod persistence;
pub mod transport;
pub mod ui;

use std::sync::Arc;

use color_eyre::eyre::{eyre, Result};
use eframe::egui;
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use crate::persistence::ConfigPortal;
use crate::transport::{ActivePage, LinkHandle};
use crate::ui::OpendashUI;

#[tokio::main]
async fn main() -> Result<()> {
    setup()?;

    let config_portal = setup_config().await?;
    let config = config_portal.snapshot().await;
    info!("Starting with {} transport", config.transport);

    // Channels between the UI and the transport task.
    let (control_tx, control_rx) = mpsc::channel(100);
    let (command_tx, command_rx) = mpsc::channel(16);
    let (event_tx, event_rx) = mpsc::channel(100);
    let (config_tx, config_rx) = watch::channel(config.clone());
    let (page_tx, page_rx) = watch::channel(ActivePage::Dash);

    let cancel = CancellationToken::new();
    let _link_handle = LinkHandle::spawn(
        config_rx,
        page_rx,
        control_rx,
        command_rx,
        event_tx,
        cancel.clone(),
    );

    info!("Starting UI");
    let mut native_options = eframe::NativeOptions::default();
    native_options.viewport = if config.ui.fullscreen {
        egui::ViewportBuilder::default().with_fullscreen(true)
    } else {
        egui::ViewportBuilder::default().with_inner_size(egui::vec2(1024.0, 600.0))
    };

    let run_result = eframe::run_native(
        "OpenDash",
        native_options,
        Box::new(|cc| {
            Ok(Box::new(OpendashUI::new(
                cc,
                event_rx,
                control_tx,
                command_tx,
                config_tx,
                page_tx,
                config_portal,
            )))
        }),
    );

    // Window closed: stop the transport task before leaving.
    cancel.cancel();

    run_result.map_err(|e| eyre!("UI terminated with error: {}", e))
}

fn setup() -> Result<()> {
    if std::env::var("RUST_LIB_BACKTRACE").is_err() {
        std::env::set_var("RUST_LIB_BACKTRACE", "0")
    }
    color_eyre::install()?;
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info")
    }
    setup_logging_env();
    Ok(())
}

fn setup_logging_env() {
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .pretty()
        .init();
}

async fn setup_config() -> Result<Arc<ConfigPortal>> {
    ConfigPortal::ensure_default_config().await?;
    let config_portal = Arc::new(ConfigPortal::load().await?);
    Ok(config_portal)
}
