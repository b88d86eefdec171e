use std::collections::BTreeSet;

use serde::Serialize;

use super::model::{CustomerDataset, CustomerRecord, IntRange};

// ---------------------------------------------------------------------------
// Filter predicate: selected countries plus two inclusive windows
// ---------------------------------------------------------------------------

/// The sidebar selection, rebuilt from widget state on every interaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterCriteria {
    /// Selected `Geography` values. Empty means nothing is shown.
    pub countries: BTreeSet<String>,
    pub age: IntRange,
    pub credit_score: IntRange,
}

impl FilterCriteria {
    /// Whether a single customer passes all three predicates.
    pub fn matches(&self, record: &CustomerRecord) -> bool {
        self.countries.contains(&record.geography)
            && self.age.contains(record.age)
            && self.credit_score.contains(record.credit_score)
    }
}

/// Slider windows applied when a dataset is first opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardDefaults {
    pub age: IntRange,
    pub credit_score: IntRange,
}

impl Default for DashboardDefaults {
    fn default() -> Self {
        Self {
            age: IntRange::new(20, 60),
            credit_score: IntRange::new(400, 850),
        }
    }
}

/// Initialise criteria with every country selected and the default windows
/// clamped into the dataset's observed bounds.
pub fn init_criteria(dataset: &CustomerDataset, defaults: &DashboardDefaults) -> FilterCriteria {
    let age = match dataset.age_bounds {
        Some(bounds) => defaults.age.clamp_to(bounds),
        None => defaults.age,
    };
    let credit_score = match dataset.credit_score_bounds {
        Some(bounds) => defaults.credit_score.clamp_to(bounds),
        None => defaults.credit_score,
    };
    FilterCriteria {
        countries: dataset.countries.clone(),
        age,
        credit_score,
    }
}

/// Return the records passing `criteria`, in input order.
///
/// Accepts anything yielding record references, so a filtered result can
/// be filtered again.
pub fn filter_records<'a, I>(records: I, criteria: &FilterCriteria) -> Vec<&'a CustomerRecord>
where
    I: IntoIterator<Item = &'a CustomerRecord>,
{
    if criteria.countries.is_empty() {
        return Vec::new();
    }
    records
        .into_iter()
        .filter(|record| criteria.matches(record))
        .collect()
}

/// Return indices of customers that pass the criteria.
pub fn filtered_indices(dataset: &CustomerDataset, criteria: &FilterCriteria) -> Vec<usize> {
    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, record)| criteria.matches(record))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer(geography: &str, age: i64, credit_score: i64) -> CustomerRecord {
        CustomerRecord {
            geography: geography.to_string(),
            gender: "Male".to_string(),
            age,
            credit_score,
            tenure: 5.0,
            balance: 1000.0,
            num_of_products: 2,
            estimated_salary: 40_000.0,
            is_active_member: false,
            exited: false,
        }
    }

    fn criteria(countries: &[&str], age: (i64, i64), credit: (i64, i64)) -> FilterCriteria {
        FilterCriteria {
            countries: countries.iter().map(|c| c.to_string()).collect(),
            age: IntRange::new(age.0, age.1),
            credit_score: IntRange::new(credit.0, credit.1),
        }
    }

    fn sample() -> Vec<CustomerRecord> {
        vec![
            customer("France", 30, 600),
            customer("Germany", 45, 700),
            customer("France", 20, 400),
            customer("Spain", 61, 500),
            customer("France", 60, 850),
            customer("Spain", 35, 399),
        ]
    }

    #[test]
    fn selects_only_matching_country() {
        let records = vec![customer("France", 30, 600), customer("Germany", 45, 700)];
        let out = filter_records(&records, &criteria(&["France"], (20, 60), (400, 850)));
        assert_eq!(out, vec![&records[0]]);
    }

    #[test]
    fn range_ends_are_inclusive() {
        let records = sample();
        let out = filter_records(&records, &criteria(&["France"], (20, 60), (400, 850)));
        let ages: Vec<i64> = out.iter().map(|r| r.age).collect();
        assert_eq!(ages, vec![30, 20, 60]);
    }

    #[test]
    fn empty_country_selection_yields_nothing() {
        let records = sample();
        let out = filter_records(&records, &criteria(&[], (0, 200), (0, 1000)));
        assert!(out.is_empty());
    }

    #[test]
    fn output_is_sound_complete_and_ordered() {
        let records = sample();
        let c = criteria(&["France", "Spain"], (25, 65), (400, 800));
        let out = filter_records(&records, &c);

        assert!(out.iter().all(|r| c.matches(r)));
        let expected: Vec<&CustomerRecord> = records.iter().filter(|r| c.matches(r)).collect();
        assert_eq!(out, expected);

        let idx = filtered_indices(
            &CustomerDataset::from_records(records.clone(), 0),
            &c,
        );
        let via_indices: Vec<&CustomerRecord> = idx.iter().map(|&i| &records[i]).collect();
        assert_eq!(out, via_indices);
    }

    #[test]
    fn filtering_twice_is_a_fixed_point() {
        let records = sample();
        let c = criteria(&["France", "Germany"], (20, 50), (450, 850));
        let once = filter_records(&records, &c);
        let twice = filter_records(once.iter().copied(), &c);
        assert_eq!(once, twice);
    }

    #[test]
    fn inverted_range_matches_nothing() {
        let records = sample();
        let out = filter_records(&records, &criteria(&["France"], (60, 20), (0, 1000)));
        assert!(out.is_empty());
    }

    #[test]
    fn init_selects_all_countries_and_clamps_windows() {
        let ds = CustomerDataset::from_records(sample(), 0);
        let c = init_criteria(&ds, &DashboardDefaults::default());
        assert_eq!(c.countries.len(), 3);
        assert_eq!(c.age, IntRange::new(20, 60));
        assert_eq!(c.credit_score, IntRange::new(400, 850));

        let narrow = CustomerDataset::from_records(
            vec![customer("France", 25, 500), customer("France", 40, 650)],
            0,
        );
        let c = init_criteria(&narrow, &DashboardDefaults::default());
        assert_eq!(c.age, IntRange::new(25, 40));
        assert_eq!(c.credit_score, IntRange::new(500, 650));
    }
}
