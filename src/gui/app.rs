//! Survey Insight Main Application
//! Main window with control panel and results view.

use crate::analysis::{
    run_analysis, save_report, AnalysisError, AnalysisOutcome, AnalysisRequest, REPORT_FILE_NAME,
};
use crate::charts::{StaticChartRenderer, DEFAULT_EXPORT_NAME};
use crate::config::Settings;
use crate::data::{DataLoader, SurveySchema, PREVIEW_ROWS};
use crate::gui::{ControlPanel, ControlPanelAction, ResultsView};
use crate::llm::{LlmError, ProviderChoice};
use egui::SidePanel;
use polars::prelude::*;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread;

/// Exported chart size in pixels.
const EXPORT_SIZE: (u32, u32) = (1200, 800);

/// Analysis result from background thread
enum AnalysisMessage {
    Progress(f32, String),
    Complete(Box<AnalysisOutcome>),
    Error(String),
}

/// CSV loading result from background thread
enum LoadResult {
    Complete { df: DataFrame, path: PathBuf },
    Error(String),
}

/// Main application window.
pub struct SurveyInsightApp {
    settings: Settings,
    loader: DataLoader,
    control_panel: ControlPanel,
    results: ResultsView,

    // Async analysis
    analysis_rx: Option<Receiver<AnalysisMessage>>,
    is_analyzing: bool,

    // Async CSV loading
    load_rx: Option<Receiver<LoadResult>>,
    is_loading: bool,
}

impl SurveyInsightApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, settings: Settings) -> Self {
        let control_panel = ControlPanel::new(
            settings.ollama.models.clone(),
            settings.ollama.default_model.clone(),
            settings.initial_gemini_key(),
        );

        Self {
            settings,
            loader: DataLoader::new(),
            control_panel,
            results: ResultsView::new(),
            analysis_rx: None,
            is_analyzing: false,
            load_rx: None,
            is_loading: false,
        }
    }

    /// Handle CSV file selection; the file is read off the UI thread.
    fn handle_browse_csv(&mut self) {
        if self.is_loading || self.is_analyzing {
            return;
        }

        let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        else {
            return;
        };

        self.results.clear();
        self.control_panel.download_enabled = false;
        self.control_panel.export_chart_enabled = false;
        self.control_panel.analyze_enabled = false;
        self.control_panel.settings.csv_path = Some(path.clone());
        self.control_panel.set_progress(0.0, "Loading CSV file...");
        self.is_loading = true;

        let (tx, rx) = channel();
        self.load_rx = Some(rx);

        thread::spawn(move || {
            let result = match DataLoader::read_csv(&path) {
                Ok(df) => LoadResult::Complete { df, path },
                Err(e) => LoadResult::Error(e.to_string()),
            };
            let _ = tx.send(result);
        });
    }

    /// Check for CSV loading results
    fn check_load_results(&mut self) {
        let Some(rx) = self.load_rx.take() else {
            return;
        };

        match rx.try_recv() {
            Ok(LoadResult::Complete { df, path }) => {
                self.loader.set_dataframe(df, path);
                let row_count = self.loader.get_row_count();
                let preview = self.loader.preview_rows(PREVIEW_ROWS);
                let columns = self.loader.get_columns();
                let validation = SurveySchema::detect(&columns);

                match &validation {
                    Ok(found) => tracing::info!(
                        "Loaded {} rows; survey columns {}/{}/{}",
                        row_count,
                        found.gender,
                        found.party,
                        found.support
                    ),
                    Err(e) => tracing::warn!("Loaded {} rows; {}", row_count, e),
                }

                let file_name = self.loader.file_name().unwrap_or_default();
                self.control_panel.set_progress(
                    0.0,
                    &format!(
                        "Loaded {} rows, {} columns from {}",
                        row_count,
                        columns.len(),
                        file_name
                    ),
                );
                self.results.set_dataset(columns, preview, row_count, validation);
                self.control_panel.analyze_enabled = true;
                self.is_loading = false;
            }
            Ok(LoadResult::Error(error)) => {
                tracing::error!("CSV load failed: {}", error);
                self.control_panel
                    .set_progress(0.0, &format!("Error processing the file: {}", error));
                self.is_loading = false;
            }
            Err(std::sync::mpsc::TryRecvError::Empty) => self.load_rx = Some(rx),
            Err(std::sync::mpsc::TryRecvError::Disconnected) => {
                self.control_panel.set_progress(0.0, "Error: loader stopped unexpectedly");
                self.is_loading = false;
            }
        }
    }

    /// Start analysis in background thread
    fn start_analysis(&mut self) {
        let Some(df) = self.loader.get_dataframe().cloned() else {
            self.control_panel.set_progress(0.0, "No data loaded");
            return;
        };

        let request = self.control_panel.settings.to_request();
        let settings = self.settings.clone();

        let (tx, rx) = channel();
        self.analysis_rx = Some(rx);
        self.is_analyzing = true;
        self.control_panel.analyze_enabled = false;
        self.control_panel.set_progress(5.0, "Analyzing data...");

        thread::spawn(move || {
            Self::run_analysis_task(tx, df, request, settings);
        });
    }

    /// Run analysis (called from background thread)
    fn run_analysis_task(
        tx: Sender<AnalysisMessage>,
        df: DataFrame,
        request: AnalysisRequest,
        settings: Settings,
    ) {
        let target = match &request.provider {
            ProviderChoice::Ollama { model } => format!("Ollama ({})", model),
            ProviderChoice::Gemini { .. } => format!("Gemini ({})", settings.gemini.model),
        };
        let _ = tx.send(AnalysisMessage::Progress(
            30.0,
            format!("Waiting for {}...", target),
        ));

        let message = match run_analysis(&df, &request, &settings) {
            Ok(outcome) => AnalysisMessage::Complete(Box::new(outcome)),
            Err(e) => {
                tracing::error!("Analysis failed: {}", e);
                AnalysisMessage::Error(Self::describe_error(&e))
            }
        };
        let _ = tx.send(message);
    }

    fn describe_error(e: &AnalysisError) -> String {
        let hint = match e {
            AnalysisError::Llm(llm) => llm.hint(),
            _ => None,
        };
        match (e, hint) {
            (AnalysisError::Llm(LlmError::MissingApiKey), _) => {
                "Error: Please enter your Gemini API key in the sidebar".to_string()
            }
            (_, Some(hint)) => format!("Error: {}\n{}", e, hint),
            (_, None) => format!("Error: {}", e),
        }
    }

    /// Check for analysis results
    fn check_analysis_results(&mut self) {
        let Some(rx) = self.analysis_rx.take() else {
            return;
        };
        let mut keep_receiver = true;

        while let Ok(message) = rx.try_recv() {
            match message {
                AnalysisMessage::Progress(progress, status) => {
                    self.control_panel.set_progress(progress, &status);
                }
                AnalysisMessage::Complete(outcome) => {
                    let has_chart = matches!(outcome.chart, Some(Ok(_)));
                    self.results.set_analysis(*outcome);
                    self.control_panel.download_enabled = true;
                    self.control_panel.export_chart_enabled = has_chart;
                    self.control_panel.set_progress(100.0, "Complete! Analysis ready");
                    keep_receiver = false;
                }
                AnalysisMessage::Error(error) => {
                    self.control_panel.set_progress(0.0, &error);
                    keep_receiver = false;
                }
            }
        }

        if keep_receiver {
            self.analysis_rx = Some(rx);
        } else {
            self.is_analyzing = false;
            self.control_panel.analyze_enabled = self.loader.get_dataframe().is_some();
        }
    }

    /// Save the narrative as a text file
    fn handle_download(&mut self) {
        let Some(narrative) = self.results.narrative() else {
            self.control_panel.set_progress(0.0, "No analysis to save");
            return;
        };

        let Some(path) = rfd::FileDialog::new()
            .add_filter("Text", &["txt"])
            .set_file_name(REPORT_FILE_NAME)
            .save_file()
        else {
            return; // User cancelled
        };

        match save_report(&path, narrative) {
            Ok(()) => self
                .control_panel
                .set_progress(100.0, &format!("Complete! Saved {}", path.display())),
            Err(e) => self.control_panel.set_progress(0.0, &format!("Error: {}", e)),
        }
    }

    /// Export the support chart as PNG
    fn handle_export_chart(&mut self) {
        let Some(chart) = self.results.chart() else {
            self.control_panel.set_progress(0.0, "No chart to export");
            return;
        };

        let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG Image", &["png"])
            .set_file_name(DEFAULT_EXPORT_NAME)
            .save_file()
        else {
            return;
        };

        let (width, height) = EXPORT_SIZE;
        match StaticChartRenderer::render_png(chart, &path, width, height) {
            Ok(()) => self
                .control_panel
                .set_progress(100.0, &format!("Complete! Chart exported to {}", path.display())),
            Err(e) => self.control_panel.set_progress(0.0, &format!("Error: {}", e)),
        }
    }
}

impl eframe::App for SurveyInsightApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for background results
        self.check_load_results();
        self.check_analysis_results();

        // Request repaint while loading or analyzing
        if self.is_loading || self.is_analyzing {
            ctx.request_repaint();
        }

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(300.0)
            .max_width(360.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui);

                    match action {
                        ControlPanelAction::BrowseCsv => self.handle_browse_csv(),
                        ControlPanelAction::Analyze => {
                            if !self.is_analyzing {
                                self.start_analysis();
                            }
                        }
                        ControlPanelAction::DownloadAnalysis => self.handle_download(),
                        ControlPanelAction::ExportChart => self.handle_export_chart(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Results
        egui::CentralPanel::default().show(ctx, |ui| {
            self.results.show(ui);
        });
    }
}
