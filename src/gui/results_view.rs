//! Results View Widget
//! Central panel: usage instructions, dataset preview, column validation,
//! the rendered narrative and the support chart.

use crate::analysis::AnalysisOutcome;
use crate::charts::{SupportChart, SupportPlotter};
use crate::data::{SchemaError, SurveyColumns};
use crate::gui::markdown::{parse_markdown, show_markdown, MdBlock};
use crate::stats::GenderGap;
use egui::{Color32, RichText, ScrollArea};

const CHART_HEIGHT: f32 = 320.0;

const INSTRUCTIONS: &str = "## Instructions
1. Upload a CSV file containing political survey data
2. Select your preferred AI provider (Ollama or Gemini Pro)
3. Select the type of analysis you want to perform
4. Add any relevant context
5. Click **Analyze** to generate insights

### Expected Data Format
Your CSV should include columns for:
- Gender
- Party support percentages
- Historical data (if available)
- Other demographic information
";

const WARNING_COLOR: Color32 = Color32::from_rgb(255, 193, 7);
const OK_COLOR: Color32 = Color32::from_rgb(40, 167, 69);

/// What the chart area shows after an analysis.
enum ChartState {
    None,
    Ready(SupportChart),
    Unavailable(String),
}

/// Narrative and extras from the last successful analysis.
struct RenderedAnalysis {
    heading: String,
    narrative: String,
    blocks: Vec<MdBlock>,
    chart: ChartState,
    gender_gaps: Vec<GenderGap>,
}

/// Central results area.
pub struct ResultsView {
    columns: Vec<String>,
    preview: Vec<Vec<String>>,
    row_count: usize,
    validation: Option<Result<SurveyColumns, SchemaError>>,
    analysis: Option<RenderedAnalysis>,
    instructions: Vec<MdBlock>,
}

impl Default for ResultsView {
    fn default() -> Self {
        Self {
            columns: Vec::new(),
            preview: Vec::new(),
            row_count: 0,
            validation: None,
            analysis: None,
            instructions: parse_markdown(INSTRUCTIONS),
        }
    }
}

impl ResultsView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show a freshly loaded dataset and drop any previous analysis.
    pub fn set_dataset(
        &mut self,
        columns: Vec<String>,
        preview: Vec<Vec<String>>,
        row_count: usize,
        validation: Result<SurveyColumns, SchemaError>,
    ) {
        self.columns = columns;
        self.preview = preview;
        self.row_count = row_count;
        self.validation = Some(validation);
        self.analysis = None;
    }

    pub fn clear(&mut self) {
        self.columns.clear();
        self.preview.clear();
        self.row_count = 0;
        self.validation = None;
        self.analysis = None;
    }

    pub fn set_analysis(&mut self, outcome: AnalysisOutcome) {
        let chart = match outcome.chart {
            None => ChartState::None,
            Some(Ok(chart)) => ChartState::Ready(chart),
            Some(Err(e)) => {
                tracing::warn!("Chart unavailable: {}", e);
                ChartState::Unavailable(e.to_string())
            }
        };

        self.analysis = Some(RenderedAnalysis {
            heading: format!(
                "{} via {} ({})",
                outcome.analysis_type.label(),
                outcome.provider,
                outcome.model
            ),
            blocks: parse_markdown(&outcome.narrative),
            narrative: outcome.narrative,
            chart,
            gender_gaps: outcome.gender_gaps,
        });
    }

    /// Raw narrative of the last analysis, for saving.
    pub fn narrative(&self) -> Option<&str> {
        self.analysis.as_ref().map(|a| a.narrative.as_str())
    }

    /// Chart of the last analysis, if one was drawn.
    pub fn chart(&self) -> Option<&SupportChart> {
        match self.analysis.as_ref().map(|a| &a.chart) {
            Some(ChartState::Ready(chart)) => Some(chart),
            _ => None,
        }
    }

    pub fn show(&mut self, ui: &mut egui::Ui) {
        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.heading(RichText::new("Political Survey Data Analysis").size(24.0));
                ui.add_space(10.0);

                if self.validation.is_none() {
                    egui::Frame::none()
                        .fill(ui.visuals().widgets.noninteractive.bg_fill)
                        .rounding(8.0)
                        .inner_margin(14.0)
                        .show(ui, |ui| show_markdown(ui, &self.instructions));
                    return;
                }

                self.show_preview(ui);
                ui.add_space(8.0);
                self.show_validation(ui);
                ui.add_space(12.0);

                if let Some(analysis) = &self.analysis {
                    Self::show_analysis(ui, analysis);
                }
            });
    }

    fn show_preview(&self, ui: &mut egui::Ui) {
        ui.label(RichText::new("Dataset Preview").size(18.0).strong());
        ui.label(
            RichText::new(format!(
                "{} rows, {} columns (first {} shown)",
                self.row_count,
                self.columns.len(),
                self.preview.len()
            ))
            .size(11.0)
            .color(Color32::GRAY),
        );
        ui.add_space(4.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ScrollArea::horizontal().id_salt("preview_scroll").show(ui, |ui| {
                    egui::Grid::new("dataset_preview")
                        .striped(true)
                        .min_col_width(60.0)
                        .spacing([12.0, 4.0])
                        .show(ui, |ui| {
                            for col in &self.columns {
                                ui.label(RichText::new(col).strong().size(12.0));
                            }
                            ui.end_row();

                            for row in &self.preview {
                                for cell in row {
                                    ui.label(RichText::new(cell).size(12.0));
                                }
                                ui.end_row();
                            }
                        });
                });
            });
    }

    fn show_validation(&self, ui: &mut egui::Ui) {
        match &self.validation {
            Some(Ok(found)) => {
                ui.label(
                    RichText::new(format!(
                        "✓ Required columns detected: {}, {}, {}",
                        found.gender, found.party, found.support
                    ))
                    .size(12.0)
                    .color(OK_COLOR),
                );
                if !found.demographics.is_empty() {
                    ui.label(
                        RichText::new(format!(
                            "Demographic fields: {}",
                            found.demographics.join(", ")
                        ))
                        .size(12.0)
                        .color(Color32::GRAY),
                    );
                }
            }
            Some(Err(e)) => {
                ui.label(
                    RichText::new(format!(
                        "⚠ {}. The narrative can still be generated, but charts are unavailable.",
                        e
                    ))
                    .size(12.0)
                    .color(WARNING_COLOR),
                );
            }
            None => {}
        }
    }

    fn show_analysis(ui: &mut egui::Ui, analysis: &RenderedAnalysis) {
        ui.separator();
        ui.label(RichText::new("Analysis Results").size(18.0).strong());
        ui.label(RichText::new(&analysis.heading).size(11.0).color(Color32::GRAY));
        ui.add_space(6.0);

        show_markdown(ui, &analysis.blocks);

        match &analysis.chart {
            ChartState::None => {}
            ChartState::Ready(chart) => {
                ui.add_space(12.0);
                ui.separator();
                SupportPlotter::draw_support_chart(ui, chart, CHART_HEIGHT);
                ui.add_space(8.0);
                SupportPlotter::draw_gap_table(ui, &analysis.gender_gaps);
            }
            ChartState::Unavailable(reason) => {
                ui.add_space(12.0);
                ui.label(
                    RichText::new("Could not create visualization with the current data format")
                        .color(WARNING_COLOR),
                );
                ui.label(RichText::new(reason).size(11.0).color(Color32::GRAY));
            }
        }
    }
}
