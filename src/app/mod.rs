//! Viewer session: form state, fetch lifecycle and pointer dispatch.

mod config;
mod controller;
mod state;
mod table;

pub use config::AppConfig;
pub use controller::ChartController;
pub use state::{AppState, FetchOutcome, FetchTicket, MISSING_FIELDS_MESSAGE, ViewMode};
pub use table::{TableRow, render_table};
