//! Churn Lens: an interactive dashboard over a bank customer churn table.
//!
//! The pipeline is load → filter → aggregate → present, re-run in full on
//! every filter change. [`view::render`] is the pure entry point; the egui
//! front end in [`app`] and the JSON export in the binary both call it.

pub mod app;
pub mod cli;
pub mod color;
pub mod data;
pub mod error;
pub mod state;
pub mod ui;
pub mod view;

pub use app::ChurnLensApp;
pub use cli::Args;
pub use data::filter::{filter_records, DashboardDefaults, FilterCriteria};
pub use data::loader::load_file;
pub use data::model::{CustomerDataset, CustomerRecord, IntRange};
pub use error::{DashboardError, Result};
pub use view::{render, ViewModel};
