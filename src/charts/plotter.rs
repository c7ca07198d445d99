//! Chart Plotter Module
//! Interactive party support chart and gender gap table using egui_plot.

use crate::charts::{SupportChart, CHART_TITLE, PALETTE_RGB};
use crate::stats::GenderGap;
use egui::{Color32, RichText};
use egui_plot::{Bar, BarChart, Legend, Plot};

const SIGNIFICANT_COLOR: Color32 = Color32::from_rgb(220, 53, 69);

/// Draws survey charts into egui.
pub struct SupportPlotter;

impl SupportPlotter {
    /// Get color for a party by position.
    pub fn party_color(party_index: usize) -> Color32 {
        let (r, g, b) = PALETTE_RGB[party_index % PALETTE_RGB.len()];
        Color32::from_rgb(r, g, b)
    }

    /// Grouped bar chart: one group per gender, one bar per party.
    pub fn draw_support_chart(ui: &mut egui::Ui, chart: &SupportChart, height: f32) {
        ui.label(RichText::new(CHART_TITLE).size(16.0).strong());

        let x_labels = chart.genders.clone();
        let y_max = chart.max_value().max(1.0) * 1.15;

        Plot::new("support_by_gender")
            .height(height)
            .legend(Legend::default())
            .allow_scroll(false)
            .x_axis_label("Gender")
            .y_axis_label("Support")
            .include_y(0.0)
            .include_y(y_max)
            .x_grid_spacer(egui_plot::uniform_grid_spacer(|_| [1.0, 1.0, 1.0]))
            .x_axis_formatter(move |mark, _range| {
                let v = mark.value;
                if (v - v.round()).abs() > 1e-6 || v < 0.0 {
                    return String::new();
                }
                x_labels.get(v.round() as usize).cloned().unwrap_or_default()
            })
            .show(ui, |plot_ui| {
                for (p, party) in chart.parties.iter().enumerate() {
                    let bars: Vec<Bar> = chart.values[p]
                        .iter()
                        .enumerate()
                        .filter_map(|(g, value)| {
                            let value = (*value)?;
                            let (x, width) = chart.bar_layout(p, g);
                            Some(
                                Bar::new(x, value)
                                    .width(width)
                                    .name(format!("{} / {}", party, chart.genders[g])),
                            )
                        })
                        .collect();

                    plot_ui.bar_chart(
                        BarChart::new(bars)
                            .color(Self::party_color(p))
                            .name(party),
                    );
                }
            });
    }

    /// Gender gap table under the chart.
    pub fn draw_gap_table(ui: &mut egui::Ui, gaps: &[GenderGap]) {
        let Some(first) = gaps.first() else {
            return;
        };

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                egui::Grid::new("gender_gap_table")
                    .striped(true)
                    .min_col_width(70.0)
                    .spacing([10.0, 4.0])
                    .show(ui, |ui| {
                        ui.label(RichText::new("Party").strong().size(12.0));
                        ui.label(RichText::new(&first.first_gender).strong().size(12.0));
                        ui.label(RichText::new(&first.second_gender).strong().size(12.0));
                        ui.label(RichText::new("Gap").strong().size(12.0));
                        ui.label(RichText::new("P-value").strong().size(12.0));
                        ui.end_row();

                        let default_text_color = ui.visuals().text_color();

                        for gap in gaps {
                            let p_color = if gap.is_significant {
                                SIGNIFICANT_COLOR
                            } else {
                                default_text_color
                            };

                            ui.label(RichText::new(&gap.party).size(12.0));
                            ui.label(RichText::new(format!("{:.2}", gap.first_mean)).size(12.0));
                            ui.label(RichText::new(format!("{:.2}", gap.second_mean)).size(12.0));
                            ui.label(RichText::new(format!("{:+.2}", gap.gap)).size(12.0));
                            match gap.p_value {
                                Some(p) => ui.label(
                                    RichText::new(format!("{:.4}", p)).size(12.0).color(p_color),
                                ),
                                None => ui.label(RichText::new("-").size(12.0)),
                            };
                            ui.end_row();
                        }
                    });
            });
    }
}
