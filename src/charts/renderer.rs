//! Static Chart Renderer
//! Exports the party support chart to a PNG file with plotters.
//!
//! Layout mirrors the interactive chart: genders along the x axis, one
//! coloured bar per party inside each gender group, legend in the upper right.

use crate::charts::{ChartError, SupportChart, CHART_TITLE, PALETTE_RGB};
use plotters::prelude::*;
use std::path::Path;

pub const DEFAULT_EXPORT_NAME: &str = "party_support_by_gender.png";

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render `chart` as a PNG at `path`.
    pub fn render_png(
        chart: &SupportChart,
        path: &Path,
        width: u32,
        height: u32,
    ) -> Result<(), ChartError> {
        if chart.parties.is_empty() || chart.genders.is_empty() {
            return Err(ChartError::NoData);
        }

        Self::draw(chart, path, width, height).map_err(|e| ChartError::Render(e.to_string()))?;
        tracing::info!("Chart exported to {}", path.display());
        Ok(())
    }

    fn draw(
        chart: &SupportChart,
        path: &Path,
        width: u32,
        height: u32,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
        root.fill(&WHITE)?;

        let n_genders = chart.genders.len();
        let y_max = chart.max_value().max(1.0) * 1.15;

        let mut ctx = ChartBuilder::on(&root)
            .caption(CHART_TITLE, ("sans-serif", 28))
            .margin(20)
            .x_label_area_size(45)
            .y_label_area_size(60)
            .build_cartesian_2d(-0.5f64..(n_genders as f64 - 0.5), 0.0f64..y_max)?;

        let gender_label = |x: &f64| -> String {
            let idx = x.round();
            if (x - idx).abs() > 1e-6 || idx < 0.0 {
                return String::new();
            }
            chart.genders.get(idx as usize).cloned().unwrap_or_default()
        };

        ctx.configure_mesh()
            .disable_x_mesh()
            .x_labels(n_genders)
            .x_label_formatter(&gender_label)
            .x_desc("Gender")
            .y_desc("Support")
            .draw()?;

        for (p, party) in chart.parties.iter().enumerate() {
            let (r, g, b) = PALETTE_RGB[p % PALETTE_RGB.len()];
            let color = RGBColor(r, g, b);

            let bars = chart.values[p].iter().enumerate().filter_map(|(gi, value)| {
                let value = (*value)?;
                let (x, w) = chart.bar_layout(p, gi);
                Some(Rectangle::new(
                    [(x - w / 2.0, 0.0), (x + w / 2.0, value)],
                    color.filled(),
                ))
            });

            ctx.draw_series(bars)?
                .label(party.as_str())
                .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 12, y + 5)], color.filled()));
        }

        ctx.configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.85))
            .border_style(BLACK)
            .draw()?;

        root.present()?;
        Ok(())
    }
}
