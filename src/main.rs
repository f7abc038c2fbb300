use anyhow::Result;
use echoface::config::ClientConfig;
use echoface::ui::EchofaceApp;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "echoface=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = ClientConfig::default();
    if let Ok(url) = std::env::var("ECHOFACE_BACKEND_URL") {
        config = config.with_base_url(url);
    }
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))?;

    info!(base_url = %config.base_url, "Starting Echoface");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1024.0, 720.0])
            .with_min_inner_size([720.0, 480.0])
            .with_title("Echoface"),
        ..Default::default()
    };

    eframe::run_native(
        "Echoface",
        options,
        Box::new(move |cc| Ok(Box::new(EchofaceApp::new(cc, config)))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to start UI: {}", e))?;

    Ok(())
}
