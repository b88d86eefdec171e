//! Summary statistics over a filtered customer subset.
//!
//! Every function here is order-independent: grouping goes through
//! ordered maps so results come back sorted by key.

use std::collections::BTreeMap;

use serde::Serialize;

use super::model::CustomerRecord;
use crate::error::{DashboardError, Result};

/// Multiplier on the inter-quartile range that bounds the box-plot whiskers.
pub const WHISKER_IQR_FACTOR: f64 = 1.5;

/// Means of the four headline fields.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScalarMeans {
    pub avg_credit_score: f64,
    pub avg_age: f64,
    pub avg_tenure: f64,
    pub avg_balance: f64,
}

/// Per-country summary used by the map layers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryAggregate {
    pub country: String,
    pub customers: usize,
    /// Fraction of customers that exited, in `0..=1`.
    pub exit_rate: f64,
    pub avg_credit_score: f64,
    pub avg_balance: f64,
}

/// Number of customers sharing a category value and exit status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupCount {
    pub category: String,
    pub exited: bool,
    pub count: usize,
}

/// The categorical axis of a grouped bar chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CategoryField {
    Gender,
    IsActiveMember,
}

impl CategoryField {
    /// Category label of a record. Membership uses the source's `0`/`1` spelling.
    pub fn label(&self, record: &CustomerRecord) -> String {
        match self {
            CategoryField::Gender => record.gender.clone(),
            CategoryField::IsActiveMember => u8::from(record.is_active_member).to_string(),
        }
    }
}

/// Box-plot summary of estimated salary for one exit status.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalaryDistribution {
    pub exited: bool,
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub lower_whisker: f64,
    pub upper_whisker: f64,
    pub mean: f64,
    pub outliers: Vec<f64>,
}

// ---------------------------------------------------------------------------
// Aggregations
// ---------------------------------------------------------------------------

/// Arithmetic means of credit score, age, tenure and balance.
///
/// Fails with [`DashboardError::EmptyAggregate`] on an empty input rather
/// than producing NaN.
pub fn scalar_means(records: &[&CustomerRecord]) -> Result<ScalarMeans> {
    if records.is_empty() {
        return Err(DashboardError::EmptyAggregate);
    }

    let (mut credit, mut age, mut tenure, mut balance) = (0.0, 0.0, 0.0, 0.0);
    for r in records {
        credit += r.credit_score as f64;
        age += r.age as f64;
        tenure += r.tenure;
        balance += r.balance;
    }

    let n = records.len() as f64;
    Ok(ScalarMeans {
        avg_credit_score: credit / n,
        avg_age: age / n,
        avg_tenure: tenure / n,
        avg_balance: balance / n,
    })
}

/// One entry per country present in `records`, sorted by country name.
pub fn by_country(records: &[&CustomerRecord]) -> Vec<CountryAggregate> {
    #[derive(Default)]
    struct Acc {
        n: usize,
        exited: usize,
        credit: f64,
        balance: f64,
    }

    let mut groups: BTreeMap<&str, Acc> = BTreeMap::new();
    for r in records {
        let acc = groups.entry(r.geography.as_str()).or_default();
        acc.n += 1;
        acc.exited += usize::from(r.exited);
        acc.credit += r.credit_score as f64;
        acc.balance += r.balance;
    }

    groups
        .into_iter()
        .map(|(country, acc)| {
            let n = acc.n as f64;
            CountryAggregate {
                country: country.to_string(),
                customers: acc.n,
                exit_rate: acc.exited as f64 / n,
                avg_credit_score: acc.credit / n,
                avg_balance: acc.balance / n,
            }
        })
        .collect()
}

/// Count customers per `(field, exited)` pair. Empty combinations are omitted.
pub fn by_category_and_exit(records: &[&CustomerRecord], field: CategoryField) -> Vec<GroupCount> {
    let mut counts: BTreeMap<(String, bool), usize> = BTreeMap::new();
    for r in records {
        *counts.entry((field.label(r), r.exited)).or_default() += 1;
    }

    counts
        .into_iter()
        .map(|((category, exited), count)| GroupCount {
            category,
            exited,
            count,
        })
        .collect()
}

/// Box-plot summaries of `EstimatedSalary`, one per exit status present
/// (stayed first).
pub fn salary_by_exit(records: &[&CustomerRecord]) -> Vec<SalaryDistribution> {
    let mut groups: BTreeMap<bool, Vec<f64>> = BTreeMap::new();
    for r in records {
        groups.entry(r.exited).or_default().push(r.estimated_salary);
    }

    groups
        .into_iter()
        .filter_map(|(exited, values)| distribution(exited, values))
        .collect()
}

fn distribution(exited: bool, mut values: Vec<f64>) -> Option<SalaryDistribution> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);

    let count = values.len();
    let q1 = percentile(&values, 25.0);
    let median = percentile(&values, 50.0);
    let q3 = percentile(&values, 75.0);
    let iqr = q3 - q1;
    let low_fence = q1 - WHISKER_IQR_FACTOR * iqr;
    let high_fence = q3 + WHISKER_IQR_FACTOR * iqr;

    let lower_whisker = values.iter().copied().find(|&v| v >= low_fence).unwrap_or(q1);
    let upper_whisker = values
        .iter()
        .rev()
        .copied()
        .find(|&v| v <= high_fence)
        .unwrap_or(q3);
    let outliers = values
        .iter()
        .copied()
        .filter(|&v| v < low_fence || v > high_fence)
        .collect();

    Some(SalaryDistribution {
        exited,
        count,
        min: values[0],
        q1,
        median,
        q3,
        max: values[count - 1],
        lower_whisker,
        upper_whisker,
        mean: values.iter().sum::<f64>() / count as f64,
        outliers,
    })
}

/// Percentile of sorted values using linear interpolation (NumPy compatible).
pub fn percentile(sorted_values: &[f64], p: f64) -> f64 {
    let n = sorted_values.len();
    if n == 0 {
        return f64::NAN;
    }
    if n == 1 {
        return sorted_values[0];
    }

    let rank = (p / 100.0) * (n - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = (rank.ceil() as usize).min(n - 1);
    let frac = rank - lower as f64;

    if lower == upper {
        sorted_values[lower]
    } else {
        sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn customer(geography: &str, gender: &str, exited: bool) -> CustomerRecord {
        CustomerRecord {
            geography: geography.to_string(),
            gender: gender.to_string(),
            age: 40,
            credit_score: 650,
            tenure: 3.0,
            balance: 10_000.0,
            num_of_products: 1,
            estimated_salary: 50_000.0,
            is_active_member: true,
            exited,
        }
    }

    #[test]
    fn means_of_single_record_are_its_values() {
        let mut r = customer("France", "Female", false);
        r.age = 30;
        r.credit_score = 600;
        r.tenure = 7.0;
        r.balance = 1234.5;
        let m = scalar_means(&[&r]).unwrap();
        assert_eq!(m.avg_age, 30.0);
        assert_eq!(m.avg_credit_score, 600.0);
        assert_eq!(m.avg_tenure, 7.0);
        assert_eq!(m.avg_balance, 1234.5);
    }

    #[test]
    fn means_over_empty_input_fail() {
        assert!(matches!(scalar_means(&[]), Err(DashboardError::EmptyAggregate)));
    }

    #[test]
    fn means_average_all_records() {
        let mut a = customer("France", "Male", false);
        let mut b = customer("Spain", "Male", true);
        a.age = 20;
        b.age = 50;
        a.balance = 0.0;
        b.balance = 100.0;
        let m = scalar_means(&[&a, &b]).unwrap();
        assert_relative_eq!(m.avg_age, 35.0);
        assert_relative_eq!(m.avg_balance, 50.0);
    }

    #[test]
    fn country_groups_only_present_countries() {
        let mut g = customer("Germany", "Male", true);
        g.credit_score = 700;
        g.balance = 120_000.0;
        let records = vec![
            customer("France", "Male", false),
            g,
            customer("France", "Female", true),
        ];
        let refs: Vec<&CustomerRecord> = records.iter().collect();
        let out = by_country(&refs);

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].country, "France");
        assert_eq!(out[0].customers, 2);
        assert_relative_eq!(out[0].exit_rate, 0.5);
        assert_eq!(out[1].country, "Germany");
        assert_relative_eq!(out[1].avg_credit_score, 700.0);
        assert_relative_eq!(out[1].avg_balance, 120_000.0);
        assert_eq!(out.iter().map(|c| c.customers).sum::<usize>(), records.len());
        assert!(out.iter().all(|c| c.country != "Spain"));
    }

    #[test]
    fn category_counts_omit_empty_pairs() {
        let records = vec![
            customer("France", "Male", false),
            customer("France", "Male", false),
            customer("France", "Female", true),
        ];
        let refs: Vec<&CustomerRecord> = records.iter().collect();
        let out = by_category_and_exit(&refs, CategoryField::Gender);

        assert_eq!(out.len(), 2);
        assert!(out.contains(&GroupCount {
            category: "Male".to_string(),
            exited: false,
            count: 2
        }));
        assert!(out.contains(&GroupCount {
            category: "Female".to_string(),
            exited: true,
            count: 1
        }));
    }

    #[test]
    fn membership_uses_numeric_labels() {
        let mut inactive = customer("Spain", "Male", true);
        inactive.is_active_member = false;
        let records = vec![inactive, customer("Spain", "Male", false)];
        let refs: Vec<&CustomerRecord> = records.iter().collect();
        let out = by_category_and_exit(&refs, CategoryField::IsActiveMember);
        let labels: Vec<(&str, bool)> = out.iter().map(|g| (g.category.as_str(), g.exited)).collect();
        assert_eq!(labels, vec![("0", true), ("1", false)]);
    }

    #[test]
    fn grouping_ignores_input_order() {
        let records = vec![
            customer("Spain", "Female", true),
            customer("France", "Male", false),
            customer("Germany", "Male", true),
            customer("France", "Female", false),
        ];
        let forward: Vec<&CustomerRecord> = records.iter().collect();
        let backward: Vec<&CustomerRecord> = records.iter().rev().collect();

        assert_eq!(by_country(&forward), by_country(&backward));
        assert_eq!(
            by_category_and_exit(&forward, CategoryField::Gender),
            by_category_and_exit(&backward, CategoryField::Gender)
        );
        assert_eq!(salary_by_exit(&forward), salary_by_exit(&backward));
    }

    #[test]
    fn percentile_matches_numpy_linear() {
        let v = [1.0, 2.0, 3.0, 4.0];
        assert_relative_eq!(percentile(&v, 25.0), 1.75);
        assert_relative_eq!(percentile(&v, 50.0), 2.5);
        assert_relative_eq!(percentile(&v, 75.0), 3.25);
        assert_relative_eq!(percentile(&[7.0], 90.0), 7.0);
        assert!(percentile(&[], 50.0).is_nan());
    }

    #[test]
    fn salary_box_flags_outliers() {
        let salaries = [10.0, 11.0, 12.0, 13.0, 14.0, 100.0];
        let records: Vec<CustomerRecord> = salaries
            .iter()
            .map(|&s| {
                let mut r = customer("France", "Male", true);
                r.estimated_salary = s;
                r
            })
            .collect();
        let refs: Vec<&CustomerRecord> = records.iter().collect();
        let out = salary_by_exit(&refs);

        assert_eq!(out.len(), 1);
        let d = &out[0];
        assert!(d.exited);
        assert_eq!(d.count, 6);
        assert_relative_eq!(d.q1, 11.25);
        assert_relative_eq!(d.median, 12.5);
        assert_relative_eq!(d.q3, 13.75);
        assert_relative_eq!(d.lower_whisker, 10.0);
        assert_relative_eq!(d.upper_whisker, 14.0);
        assert_eq!(d.outliers, vec![100.0]);
        assert_relative_eq!(d.max, 100.0);
    }
}
