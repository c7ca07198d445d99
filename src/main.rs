//! Survey Insight - Political Survey Data Analysis
//!
//! Desktop front end: upload a survey CSV and get an AI written analysis.

use anyhow::anyhow;
use eframe::egui;
use survey_insight::config::{LoggingSettings, Settings};
use survey_insight::gui::SurveyInsightApp;
use tracing_subscriber::EnvFilter;

fn init_logging(logging: &LoggingSettings) {
    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("survey_insight={}", logging.level)));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if logging.format == "json" {
        subscriber.json().init();
    } else {
        subscriber.pretty().init();
    }
}

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let (settings, config_error) = match Settings::load() {
        Ok(settings) => (settings, None),
        Err(e) => (Settings::default(), Some(e)),
    };

    init_logging(&settings.logging);
    if let Some(e) = config_error {
        tracing::warn!("Invalid configuration, using defaults: {}", e);
    }
    tracing::info!(
        "Starting Survey Insight (ollama at {}, gemini model {})",
        settings.ollama.base_url,
        settings.gemini.model
    );

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 850.0])
            .with_min_inner_size([1000.0, 650.0])
            .with_title("Political Survey Analysis"),
        ..Default::default()
    };

    eframe::run_native(
        "Survey Insight",
        options,
        Box::new(|cc| Ok(Box::new(SurveyInsightApp::new(cc, settings)))),
    )
    .map_err(|e| anyhow!("{e}"))
}
