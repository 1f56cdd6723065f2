pub mod config;
pub mod mqtt;
pub mod session;
pub mod ui;

use crate::config::Config;
use crate::mqtt::mqtt_handler::{MqttHandler, MqttStatus};
use crate::mqtt::payload::PayloadGenerator;
use crate::mqtt::publisher::Publisher;
use crate::mqtt::topics::Catalog;
use crate::session::Tools;
use crate::ui::MqttDebuggerUI;
use color_eyre::{eyre::eyre, Result};
use tokio::sync::{mpsc, watch};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    setup()?;

    let config = Config::load()?;
    info!(
        "Using broker {} with gateway {} and device {}",
        config.broker, config.identifiers.gateway_sn, config.identifiers.device_sn
    );

    let (outgoing_tx, outgoing_rx) = mpsc::channel(config.broker.channel_capacity);
    let (status_tx, status_rx) = watch::channel(MqttStatus::default());

    let handler = MqttHandler::new(&config.broker, outgoing_rx, status_tx);
    let _mqtt_handle = tokio::spawn(handler.run());

    let tools = Tools {
        catalog: Catalog::new(config.identifiers.clone()),
        generator: PayloadGenerator::new(config.identifiers.clone()),
        publisher: Publisher::new(outgoing_tx),
    };

    info!("Starting UI");
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("MQTT Debugger")
            .with_inner_size([1200.0, 760.0]),
        ..Default::default()
    };

    let broker = config.broker.clone();
    eframe::run_native(
        "MQTT Debugger",
        native_options,
        Box::new(move |cc| Ok(Box::new(MqttDebuggerUI::new(cc, tools, status_rx, &broker)))),
    )
    .map_err(|e| eyre!("UI terminated with error: {}", e))?;

    info!("Window closed, shutting down");
    Ok(())
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
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .pretty()
        .init();
}
