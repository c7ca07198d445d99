//! Control Panel Widget
//! Left side panel with provider configuration, data source and analysis inputs.

use crate::analysis::{AnalysisRequest, AnalysisType};
use crate::llm::ProviderChoice;
use egui::{Color32, ComboBox, RichText, TextEdit};
use std::path::PathBuf;

const TIPS: &str = "Tips for Better Analysis:
• Ensure your CSV is properly formatted
• Add relevant context for more precise analysis
• Try different analysis types for comprehensive insights
• Use custom queries for specific investigations

Note: For Ollama, ensure the service is running locally. For Gemini Pro, you'll need an API key.";

/// Backend selected with the provider radio buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProviderKind {
    #[default]
    Ollama,
    Gemini,
}

impl ProviderKind {
    pub fn label(self) -> &'static str {
        match self {
            ProviderKind::Ollama => "Ollama",
            ProviderKind::Gemini => "Gemini Pro",
        }
    }
}

/// User settings for one session. Nothing here is persisted.
#[derive(Default, Clone)]
pub struct UserSettings {
    pub csv_path: Option<PathBuf>,
    pub provider: ProviderKind,
    pub ollama_model: String,
    pub gemini_api_key: String,
    pub analysis_type: AnalysisType,
    pub context: String,
    pub custom_question: String,
}

impl UserSettings {
    pub fn provider_choice(&self) -> ProviderChoice {
        match self.provider {
            ProviderKind::Ollama => ProviderChoice::Ollama {
                model: self.ollama_model.clone(),
            },
            ProviderKind::Gemini => ProviderChoice::Gemini {
                api_key: self.gemini_api_key.clone(),
            },
        }
    }

    pub fn to_request(&self) -> AnalysisRequest {
        AnalysisRequest {
            provider: self.provider_choice(),
            analysis_type: self.analysis_type,
            custom_question: self.custom_question.clone(),
            context: self.context.clone(),
        }
    }
}

/// Left side control panel with configuration and processing controls.
pub struct ControlPanel {
    pub settings: UserSettings,
    pub ollama_models: Vec<String>,
    pub progress: f32,
    pub status: String,
    pub analyze_enabled: bool,
    pub download_enabled: bool,
    pub export_chart_enabled: bool,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            settings: UserSettings::default(),
            ollama_models: Vec::new(),
            progress: 0.0,
            status: "Ready".to_string(),
            analyze_enabled: false,
            download_enabled: false,
            export_chart_enabled: false,
        }
    }
}

impl ControlPanel {
    pub fn new(ollama_models: Vec<String>, default_model: String, gemini_api_key: String) -> Self {
        let mut panel = Self::default();
        panel.settings.ollama_model = default_model;
        panel.settings.gemini_api_key = gemini_api_key;
        panel.ollama_models = ollama_models;
        panel
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("🗳 Survey Insight")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(
                RichText::new("Political Survey Data Analysis")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Provider Section =====
        ui.label(RichText::new("⚙️ Configuration").size(14.0).strong());
        ui.add_space(5.0);

        ui.label("Select AI Provider");
        ui.horizontal(|ui| {
            for kind in [ProviderKind::Ollama, ProviderKind::Gemini] {
                ui.radio_value(&mut self.settings.provider, kind, kind.label());
            }
        });
        ui.add_space(5.0);

        match self.settings.provider {
            ProviderKind::Ollama => {
                ui.horizontal(|ui| {
                    ui.add_sized([110.0, 20.0], egui::Label::new("Ollama Model:"));
                    ComboBox::from_id_salt("ollama_model")
                        .width(150.0)
                        .selected_text(&self.settings.ollama_model)
                        .show_ui(ui, |ui| {
                            for model in &self.ollama_models {
                                ui.selectable_value(
                                    &mut self.settings.ollama_model,
                                    model.clone(),
                                    model,
                                );
                            }
                        });
                });
            }
            ProviderKind::Gemini => {
                ui.label("Enter Gemini API Key");
                ui.add(
                    TextEdit::singleline(&mut self.settings.gemini_api_key)
                        .password(true)
                        .desired_width(f32::INFINITY),
                );
                if self.settings.gemini_api_key.trim().is_empty() {
                    ui.label(
                        RichText::new("An API key is required for Gemini Pro")
                            .size(11.0)
                            .color(Color32::from_rgb(255, 193, 7)),
                    );
                }
            }
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== CSV File Section =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let path_text = self
                        .settings
                        .csv_path
                        .as_ref()
                        .and_then(|p| p.file_name())
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| "No file selected".to_string());

                    ui.label(RichText::new(&path_text).size(12.0).color(
                        if self.settings.csv_path.is_some() {
                            ui.visuals().strong_text_color()
                        } else {
                            Color32::GRAY
                        },
                    ));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("📂 Browse").clicked() {
                            action = ControlPanelAction::BrowseCsv;
                        }
                    });
                });
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Analysis Section =====
        ui.label(RichText::new("🔍 Analysis").size(14.0).strong());
        ui.add_space(5.0);

        ui.horizontal(|ui| {
            ui.add_sized([110.0, 20.0], egui::Label::new("Analysis Type:"));
            ComboBox::from_id_salt("analysis_type")
                .width(170.0)
                .selected_text(self.settings.analysis_type.label())
                .show_ui(ui, |ui| {
                    for kind in AnalysisType::ALL {
                        ui.selectable_value(&mut self.settings.analysis_type, kind, kind.label());
                    }
                });
        });

        ui.add_space(8.0);
        ui.label("Additional context (optional)");
        ui.add(
            TextEdit::multiline(&mut self.settings.context)
                .desired_rows(4)
                .desired_width(f32::INFINITY)
                .hint_text("Example: Focus on specific demographic trends or historical patterns..."),
        );

        match self.settings.analysis_type.question() {
            Some(question) => {
                ui.add_space(5.0);
                ui.label(RichText::new(question).size(11.0).italics().color(Color32::GRAY));
            }
            None => {
                ui.add_space(8.0);
                ui.label("Your specific analysis question");
                ui.add(
                    TextEdit::multiline(&mut self.settings.custom_question)
                        .desired_rows(4)
                        .desired_width(f32::INFINITY)
                        .hint_text(
                            "Example: What is the correlation between gender and party support?",
                        ),
                );
            }
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Action Buttons =====
        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(self.analyze_enabled, |ui| {
                let button = egui::Button::new(RichText::new("▶ Analyze").size(16.0))
                    .min_size(egui::vec2(200.0, 35.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::Analyze;
                }
            });

            ui.add_space(8.0);

            ui.add_enabled_ui(self.download_enabled, |ui| {
                let button = egui::Button::new(RichText::new("💾 Download Analysis").size(14.0))
                    .min_size(egui::vec2(170.0, 30.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::DownloadAnalysis;
                }
            });

            ui.add_space(5.0);

            ui.add_enabled_ui(self.export_chart_enabled, |ui| {
                let button = egui::Button::new(RichText::new("🖼 Export Chart").size(14.0))
                    .min_size(egui::vec2(170.0, 30.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::ExportChart;
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Progress Section =====
        ui.label(RichText::new("📊 Progress").size(14.0).strong());
        ui.add_space(5.0);

        ui.add(
            egui::ProgressBar::new(self.progress / 100.0)
                .show_percentage()
                .animate(self.progress > 0.0 && self.progress < 100.0),
        );

        ui.add_space(5.0);

        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.contains("Complete") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(5.0);
        ui.label(RichText::new(TIPS).size(11.0).color(Color32::GRAY));

        action
    }

    /// Set progress and status
    pub fn set_progress(&mut self, progress: f32, status: &str) {
        self.progress = progress;
        self.status = status.to_string();
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    BrowseCsv,
    Analyze,
    DownloadAnalysis,
    ExportChart,
}
