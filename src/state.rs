use std::path::Path;

use crate::color::ColorMap;
use crate::data::filter::{init_criteria, DashboardDefaults, FilterCriteria};
use crate::data::loader::load_file;
use crate::data::model::{CustomerDataset, IntRange, GEOGRAPHY};
use crate::view::{render, LayerVisibility, ViewModel};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Camera angles of the projected 3-D scatter, in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orbit {
    pub yaw: f32,
    pub pitch: f32,
}

impl Default for Orbit {
    fn default() -> Self {
        Self {
            yaw: 0.6,
            pitch: 0.35,
        }
    }
}

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset (None until a file is opened).
    pub dataset: Option<CustomerDataset>,

    /// Sidebar selection.
    pub criteria: FilterCriteria,

    /// Slider windows applied whenever a dataset is opened.
    pub defaults: DashboardDefaults,

    /// Output of the last pipeline run.
    pub view: Option<ViewModel>,

    /// Which map layers are drawn.
    pub layers: LayerVisibility,

    /// Colour per country.
    pub country_colors: Option<ColorMap>,

    pub orbit: Orbit,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(DashboardDefaults::default())
    }
}

impl AppState {
    pub fn new(defaults: DashboardDefaults) -> Self {
        Self {
            dataset: None,
            criteria: FilterCriteria {
                countries: Default::default(),
                age: defaults.age,
                credit_score: defaults.credit_score,
            },
            defaults,
            view: None,
            layers: LayerVisibility::default(),
            country_colors: None,
            orbit: Orbit::default(),
            status_message: None,
        }
    }

    /// Ingest a newly loaded dataset, initialise filters and colours.
    pub fn set_dataset(&mut self, dataset: CustomerDataset) {
        self.criteria = init_criteria(&dataset, &self.defaults);
        self.country_colors = Some(ColorMap::new(
            GEOGRAPHY,
            dataset.countries.iter().map(String::as_str),
        ));
        self.dataset = Some(dataset);
        self.status_message = None;
        self.refresh();
    }

    /// Load a file, surfacing failures as a status message.
    pub fn load_path(&mut self, path: &Path) {
        match load_file(path) {
            Ok(dataset) => {
                log::info!(
                    "Opened {} with countries {:?}",
                    path.display(),
                    dataset.countries
                );
                self.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load file: {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Re-run filter → aggregate → presentation for the current criteria.
    pub fn refresh(&mut self) {
        self.view = self
            .dataset
            .as_ref()
            .map(|ds| render(ds, &self.criteria));
    }

    /// Toggle a single country in the selection.
    pub fn toggle_country(&mut self, country: &str) {
        if !self.criteria.countries.remove(country) {
            self.criteria.countries.insert(country.to_string());
        }
        self.refresh();
    }

    /// Select every country present in the dataset.
    pub fn select_all_countries(&mut self) {
        if let Some(ds) = &self.dataset {
            self.criteria.countries = ds.countries.clone();
            self.refresh();
        }
    }

    /// Deselect all countries.
    pub fn select_no_countries(&mut self) {
        self.criteria.countries.clear();
        self.refresh();
    }

    pub fn set_age_range(&mut self, range: IntRange) {
        if self.criteria.age != range {
            self.criteria.age = range;
            self.refresh();
        }
    }

    pub fn set_credit_range(&mut self, range: IntRange) {
        if self.criteria.credit_score != range {
            self.criteria.credit_score = range;
            self.refresh();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CustomerRecord;

    fn customer(geography: &str, age: i64) -> CustomerRecord {
        CustomerRecord {
            geography: geography.to_string(),
            gender: "Male".to_string(),
            age,
            credit_score: 600,
            tenure: 1.0,
            balance: 0.0,
            num_of_products: 1,
            estimated_salary: 1000.0,
            is_active_member: false,
            exited: false,
        }
    }

    fn loaded() -> AppState {
        let mut state = AppState::default();
        state.set_dataset(CustomerDataset::from_records(
            vec![customer("France", 30), customer("Germany", 45), customer("Spain", 70)],
            0,
        ));
        state
    }

    fn count(state: &AppState) -> usize {
        state.view.as_ref().map(|v| v.customer_count).unwrap_or(0)
    }

    #[test]
    fn opening_a_dataset_renders_immediately() {
        let state = loaded();
        assert_eq!(state.criteria.countries.len(), 3);
        // Spain's only customer is outside the default 20-60 age window.
        assert_eq!(count(&state), 2);
        assert!(state.country_colors.is_some());
    }

    #[test]
    fn country_toggles_rerender() {
        let mut state = loaded();
        state.toggle_country("France");
        assert_eq!(count(&state), 1);
        state.toggle_country("France");
        assert_eq!(count(&state), 2);

        state.select_no_countries();
        assert_eq!(count(&state), 0);
        assert!(state.view.as_ref().unwrap().metrics.is_none());

        state.select_all_countries();
        assert_eq!(count(&state), 2);
    }

    #[test]
    fn range_changes_rerender() {
        let mut state = loaded();
        state.set_age_range(IntRange::new(40, 70));
        assert_eq!(count(&state), 2);
        state.set_credit_range(IntRange::new(700, 850));
        assert_eq!(count(&state), 0);
    }

    #[test]
    fn failed_load_keeps_previous_dataset() {
        let mut state = loaded();
        state.load_path(Path::new("/nonexistent/customers.csv"));
        assert!(state.dataset.is_some());
        assert!(state
            .status_message
            .as_deref()
            .is_some_and(|m| m.starts_with("Error:")));
    }
}
