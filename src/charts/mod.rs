//! Charts module - Chart data and rendering

mod model;
mod plotter;
mod renderer;

pub use model::{ChartError, SupportChart, CHART_TITLE};
pub use plotter::SupportPlotter;
pub use renderer::{StaticChartRenderer, DEFAULT_EXPORT_NAME};

/// Party colours shared by the interactive and exported charts.
pub const PALETTE_RGB: [(u8, u8, u8); 10] = [
    (52, 152, 219),  // Blue
    (231, 76, 60),   // Red
    (46, 204, 113),  // Green
    (155, 89, 182),  // Purple
    (243, 156, 18),  // Orange
    (26, 188, 156),  // Teal
    (233, 30, 99),   // Pink
    (0, 188, 212),   // Cyan
    (255, 87, 34),   // Deep Orange
    (96, 125, 139),  // Blue Grey
];
