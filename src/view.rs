//! Presentation adapter: turns a filtered, aggregated customer subset into
//! the shapes the dashboard widgets (and the JSON export) consume.

use serde::Serialize;

use crate::data::aggregate::{
    by_category_and_exit, by_country, salary_by_exit, scalar_means, CategoryField,
    CountryAggregate, GroupCount, SalaryDistribution, ScalarMeans,
};
use crate::data::filter::{filter_records, FilterCriteria};
use crate::data::model::{CustomerDataset, CustomerRecord};
use crate::error::DashboardError;

// ---------------------------------------------------------------------------
// Geography
// ---------------------------------------------------------------------------

/// Latitude / longitude in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Placement for countries without a known location.
pub const UNKNOWN_LOCATION: GeoPoint = GeoPoint::new(0.0, 0.0);

const FRANCE: GeoPoint = GeoPoint::new(46.603354, 1.888334);

const COUNTRY_COORDINATES: &[(&str, GeoPoint)] = &[
    ("France", FRANCE),
    ("Germany", GeoPoint::new(51.165691, 10.451526)),
    ("Spain", GeoPoint::new(40.463667, -3.74922)),
];

/// The map opens centred on France.
pub const MAP_CENTER: GeoPoint = FRANCE;

/// Marker location for a country; unknown countries land on (0, 0).
pub fn country_location(country: &str) -> GeoPoint {
    COUNTRY_COORDINATES
        .iter()
        .find(|(name, _)| *name == country)
        .map(|(_, point)| *point)
        .unwrap_or(UNKNOWN_LOCATION)
}

// ---------------------------------------------------------------------------
// Map layers
// ---------------------------------------------------------------------------

/// One of the three independently toggleable marker layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MapLayer {
    ExitRate,
    CreditScore,
    Balance,
}

impl MapLayer {
    pub const ALL: [MapLayer; 3] = [MapLayer::ExitRate, MapLayer::CreditScore, MapLayer::Balance];

    pub fn title(&self) -> &'static str {
        match self {
            MapLayer::ExitRate => "Exit Rate",
            MapLayer::CreditScore => "Average Credit Score",
            MapLayer::Balance => "Average Balance",
        }
    }

    /// Marker radius, proportional to the layer's metric.
    pub fn radius(&self, agg: &CountryAggregate) -> f64 {
        match self {
            MapLayer::ExitRate => 10.0 * agg.exit_rate,
            MapLayer::CreditScore => 10.0 * (agg.avg_credit_score / 100.0),
            MapLayer::Balance => 10.0 * (agg.avg_balance / 50_000.0),
        }
    }

    pub fn popup(&self, agg: &CountryAggregate) -> String {
        let detail = match self {
            MapLayer::ExitRate => format!("Exit Rate: {}", format_percent(agg.exit_rate)),
            MapLayer::CreditScore => format!("Avg Credit Score: {:.2}", agg.avg_credit_score),
            MapLayer::Balance => format!("Avg Balance: {}", format_currency(agg.avg_balance)),
        };
        format!("Country: {}\n{detail}", agg.country)
    }
}

/// Which marker layers are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LayerVisibility {
    pub exit_rate: bool,
    pub credit_score: bool,
    pub balance: bool,
}

impl Default for LayerVisibility {
    fn default() -> Self {
        Self {
            exit_rate: true,
            credit_score: true,
            balance: true,
        }
    }
}

impl LayerVisibility {
    pub fn is_visible(&self, layer: MapLayer) -> bool {
        *self.flag(layer)
    }

    pub fn flag_mut(&mut self, layer: MapLayer) -> &mut bool {
        match layer {
            MapLayer::ExitRate => &mut self.exit_rate,
            MapLayer::CreditScore => &mut self.credit_score,
            MapLayer::Balance => &mut self.balance,
        }
    }

    fn flag(&self, layer: MapLayer) -> &bool {
        match layer {
            MapLayer::ExitRate => &self.exit_rate,
            MapLayer::CreditScore => &self.credit_score,
            MapLayer::Balance => &self.balance,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapMarker {
    pub layer: MapLayer,
    pub country: String,
    pub location: GeoPoint,
    pub radius: f64,
    pub popup: String,
}

// ---------------------------------------------------------------------------
// Chart points
// ---------------------------------------------------------------------------

/// Balance × credit score, with hover fields.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub balance: f64,
    pub credit_score: f64,
    pub exited: bool,
    pub num_of_products: i64,
    pub age: i64,
}

/// Credit score × age × number of products.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScatterPoint3 {
    pub credit_score: f64,
    pub age: f64,
    pub num_of_products: f64,
    pub exited: bool,
}

/// The four headline numbers, raw and formatted for the metric tiles.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyMetrics {
    pub means: ScalarMeans,
    pub credit_score: String,
    pub age: String,
    pub tenure: String,
    pub balance: String,
}

impl From<ScalarMeans> for KeyMetrics {
    fn from(means: ScalarMeans) -> Self {
        Self {
            credit_score: format!("{:.2}", means.avg_credit_score),
            age: format!("{:.2}", means.avg_age),
            tenure: format!("{:.2}", means.avg_tenure),
            balance: format_currency(means.avg_balance),
            means,
        }
    }
}

// ---------------------------------------------------------------------------
// ViewModel
// ---------------------------------------------------------------------------

/// Everything the dashboard draws for one filter selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewModel {
    pub criteria: FilterCriteria,
    pub customer_count: usize,
    /// `None` when the filters match no customer ("no data").
    pub metrics: Option<KeyMetrics>,
    pub scatter: Vec<ScatterPoint>,
    pub scatter_3d: Vec<ScatterPoint3>,
    pub country_aggregates: Vec<CountryAggregate>,
    pub markers: Vec<MapMarker>,
    pub map_center: GeoPoint,
    pub gender_counts: Vec<GroupCount>,
    pub activity_counts: Vec<GroupCount>,
    pub salary_boxes: Vec<SalaryDistribution>,
}

impl ViewModel {
    /// Markers of one layer, in country order.
    pub fn layer_markers(&self, layer: MapLayer) -> impl Iterator<Item = &MapMarker> {
        self.markers.iter().filter(move |m| m.layer == layer)
    }
}

/// Run filter → aggregate → presentation for one selection.
pub fn render(dataset: &CustomerDataset, criteria: &FilterCriteria) -> ViewModel {
    let filtered = filter_records(&dataset.records, criteria);
    log::debug!(
        "Rendering {} of {} customers for {:?}",
        filtered.len(),
        dataset.len(),
        criteria
    );
    render_records(&filtered, criteria)
}

/// Build a view from an already-filtered subset.
pub fn render_records(filtered: &[&CustomerRecord], criteria: &FilterCriteria) -> ViewModel {
    let metrics = match scalar_means(filtered) {
        Ok(means) => Some(KeyMetrics::from(means)),
        Err(DashboardError::EmptyAggregate) => None,
        Err(e) => {
            log::warn!("Unexpected aggregation failure: {e}");
            None
        }
    };

    let country_aggregates = by_country(filtered);
    let markers = country_aggregates
        .iter()
        .flat_map(|agg| {
            let location = country_location(&agg.country);
            MapLayer::ALL.into_iter().map(move |layer| MapMarker {
                layer,
                country: agg.country.clone(),
                location,
                radius: layer.radius(agg),
                popup: layer.popup(agg),
            })
        })
        .collect();

    ViewModel {
        criteria: criteria.clone(),
        customer_count: filtered.len(),
        metrics,
        scatter: filtered
            .iter()
            .map(|r| ScatterPoint {
                balance: r.balance,
                credit_score: r.credit_score as f64,
                exited: r.exited,
                num_of_products: r.num_of_products,
                age: r.age,
            })
            .collect(),
        scatter_3d: filtered
            .iter()
            .map(|r| ScatterPoint3 {
                credit_score: r.credit_score as f64,
                age: r.age as f64,
                num_of_products: r.num_of_products as f64,
                exited: r.exited,
            })
            .collect(),
        country_aggregates,
        markers,
        map_center: MAP_CENTER,
        gender_counts: by_category_and_exit(filtered, CategoryField::Gender),
        activity_counts: by_category_and_exit(filtered, CategoryField::IsActiveMember),
        salary_boxes: salary_by_exit(filtered),
    }
}

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

/// `1234567.891` → `"$1,234,567.89"`.
pub fn format_currency(value: f64) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    format!("{sign}${}.{frac_part}", group_thousands(int_part))
}

/// `0.16154` → `"16.15%"`.
pub fn format_percent(fraction: f64) -> String {
    format!("{:.2}%", fraction * 100.0)
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::IntRange;

    fn customer(geography: &str, exited: bool, balance: f64) -> CustomerRecord {
        CustomerRecord {
            geography: geography.to_string(),
            gender: "Female".to_string(),
            age: 35,
            credit_score: 650,
            tenure: 4.0,
            balance,
            num_of_products: 2,
            estimated_salary: 80_000.0,
            is_active_member: true,
            exited,
        }
    }

    fn all_of(ds: &CustomerDataset) -> FilterCriteria {
        FilterCriteria {
            countries: ds.countries.clone(),
            age: IntRange::new(0, 150),
            credit_score: IntRange::new(0, 1000),
        }
    }

    #[test]
    fn currency_groups_thousands() {
        assert_eq!(format_currency(76485.889), "$76,485.89");
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(999.999), "$1,000.00");
        assert_eq!(format_currency(1234567.0), "$1,234,567.00");
        assert_eq!(format_currency(-50.5), "-$50.50");
    }

    #[test]
    fn percent_has_two_decimals() {
        assert_eq!(format_percent(0.16154), "16.15%");
        assert_eq!(format_percent(1.0), "100.00%");
    }

    #[test]
    fn unknown_country_lands_on_origin() {
        assert_eq!(country_location("Italy"), UNKNOWN_LOCATION);
        assert_eq!(country_location("Germany"), GeoPoint::new(51.165691, 10.451526));
    }

    #[test]
    fn markers_cover_every_layer_and_country() {
        let ds = CustomerDataset::from_records(
            vec![
                customer("France", true, 100_000.0),
                customer("France", false, 0.0),
                customer("Italy", false, 25_000.0),
            ],
            0,
        );
        let view = render(&ds, &all_of(&ds));
        assert_eq!(view.markers.len(), 6);

        let exit: Vec<&MapMarker> = view.layer_markers(MapLayer::ExitRate).collect();
        assert_eq!(exit[0].country, "France");
        assert!((exit[0].radius - 5.0).abs() < 1e-9);
        assert_eq!(exit[0].popup, "Country: France\nExit Rate: 50.00%");
        assert_eq!(exit[1].location, UNKNOWN_LOCATION);

        let balance: Vec<&MapMarker> = view.layer_markers(MapLayer::Balance).collect();
        assert!((balance[0].radius - 10.0).abs() < 1e-9);
        assert_eq!(balance[1].popup, "Country: Italy\nAvg Balance: $25,000.00");

        let credit: Vec<&MapMarker> = view.layer_markers(MapLayer::CreditScore).collect();
        assert!((credit[0].radius - 65.0).abs() < 1e-9);
        assert_eq!(credit[0].popup, "Country: France\nAvg Credit Score: 650.00");
    }

    #[test]
    fn empty_selection_renders_no_data() {
        let ds = CustomerDataset::from_records(vec![customer("Spain", true, 10.0)], 0);
        let mut criteria = all_of(&ds);
        criteria.countries.clear();
        let view = render(&ds, &criteria);

        assert_eq!(view.customer_count, 0);
        assert!(view.metrics.is_none());
        assert!(view.markers.is_empty());
        assert!(view.country_aggregates.is_empty());
        assert!(view.gender_counts.is_empty());
        assert!(view.salary_boxes.is_empty());
    }

    #[test]
    fn metrics_are_formatted_for_tiles() {
        let ds = CustomerDataset::from_records(vec![customer("Spain", false, 1500.0)], 0);
        let view = render(&ds, &all_of(&ds));
        let m = view.metrics.unwrap();
        assert_eq!(m.credit_score, "650.00");
        assert_eq!(m.age, "35.00");
        assert_eq!(m.tenure, "4.00");
        assert_eq!(m.balance, "$1,500.00");
    }

    #[test]
    fn layer_visibility_toggles_independently() {
        let mut layers = LayerVisibility::default();
        *layers.flag_mut(MapLayer::CreditScore) = false;
        assert!(layers.is_visible(MapLayer::ExitRate));
        assert!(!layers.is_visible(MapLayer::CreditScore));
        assert!(layers.is_visible(MapLayer::Balance));
    }
}
