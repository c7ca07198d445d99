//! GUI module - User interface components

mod app;
mod control_panel;
mod markdown;
mod results_view;

pub use app::SurveyInsightApp;
pub use control_panel::{ControlPanel, ControlPanelAction, ProviderKind, UserSettings};
pub use markdown::{parse_markdown, show_markdown, MdBlock, Span};
pub use results_view::ResultsView;
