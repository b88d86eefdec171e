use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::DashboardError;

// ---------------------------------------------------------------------------
// Column names as they appear in the source header
// ---------------------------------------------------------------------------

pub const GEOGRAPHY: &str = "Geography";
pub const AGE: &str = "Age";
pub const CREDIT_SCORE: &str = "CreditScore";
pub const TENURE: &str = "Tenure";
pub const BALANCE: &str = "Balance";
pub const NUM_OF_PRODUCTS: &str = "NumOfProducts";
pub const ESTIMATED_SALARY: &str = "EstimatedSalary";
pub const GENDER: &str = "Gender";
pub const IS_ACTIVE_MEMBER: &str = "IsActiveMember";
pub const EXITED: &str = "Exited";

/// Every column a source must provide, in the order they are reported when missing.
pub const REQUIRED_COLUMNS: [&str; 10] = [
    GEOGRAPHY,
    AGE,
    CREDIT_SCORE,
    TENURE,
    BALANCE,
    NUM_OF_PRODUCTS,
    ESTIMATED_SALARY,
    GENDER,
    IS_ACTIVE_MEMBER,
    EXITED,
];

// ---------------------------------------------------------------------------
// CustomerRecord – one cleaned row
// ---------------------------------------------------------------------------

/// A single bank customer (one row of the source table).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerRecord {
    pub geography: String,
    pub gender: String,
    pub age: i64,
    pub credit_score: i64,
    pub tenure: f64,
    pub balance: f64,
    pub num_of_products: i64,
    pub estimated_salary: f64,
    pub is_active_member: bool,
    /// Churn flag: the customer closed their account.
    pub exited: bool,
}

// ---------------------------------------------------------------------------
// IntRange – inclusive integer window used by the slider filters
// ---------------------------------------------------------------------------

/// Inclusive `[min, max]` range. An inverted range contains nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IntRange {
    pub min: i64,
    pub max: i64,
}

impl IntRange {
    pub const fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: i64) -> bool {
        self.min <= value && value <= self.max
    }

    /// Clamp both ends into `bounds`, keeping `min <= max`.
    pub fn clamp_to(&self, bounds: IntRange) -> IntRange {
        let min = self.min.clamp(bounds.min, bounds.max);
        let max = self.max.clamp(bounds.min, bounds.max);
        IntRange::new(min, max.max(min))
    }
}

impl fmt::Display for IntRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

/// Parses `"20-60"` (also accepts `..` and `:` as separators).
impl FromStr for IntRange {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DashboardError::InvalidRange(s.to_string());
        let trimmed = s.trim();
        let (lo, hi) = trimmed
            .split_once("..")
            .or_else(|| trimmed.split_once(':'))
            // Skip a leading sign so "-5-10" is not split at index 0.
            .or_else(|| {
                let offset = usize::from(trimmed.starts_with('-'));
                trimmed[offset..]
                    .find('-')
                    .map(|i| (&trimmed[..offset + i], &trimmed[offset + i + 1..]))
            })
            .ok_or_else(invalid)?;
        let min = lo.trim().parse::<i64>().map_err(|_| invalid())?;
        let max = hi.trim().parse::<i64>().map_err(|_| invalid())?;
        if min > max {
            return Err(invalid());
        }
        Ok(IntRange::new(min, max))
    }
}

// ---------------------------------------------------------------------------
// CustomerDataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The cleaned dataset plus the indices the filter widgets are built from.
#[derive(Debug, Clone)]
pub struct CustomerDataset {
    pub records: Vec<CustomerRecord>,
    /// Sorted distinct `Geography` values.
    pub countries: BTreeSet<String>,
    /// Observed age bounds (None when empty).
    pub age_bounds: Option<IntRange>,
    /// Observed credit-score bounds (None when empty).
    pub credit_score_bounds: Option<IntRange>,
    /// Rows discarded during cleaning.
    pub dropped_rows: usize,
}

impl CustomerDataset {
    /// Build the column indices from cleaned records.
    pub fn from_records(records: Vec<CustomerRecord>, dropped_rows: usize) -> Self {
        let countries = records.iter().map(|r| r.geography.clone()).collect();
        let age_bounds = bounds(records.iter().map(|r| r.age));
        let credit_score_bounds = bounds(records.iter().map(|r| r.credit_score));
        CustomerDataset {
            records,
            countries,
            age_bounds,
            credit_score_bounds,
            dropped_rows,
        }
    }

    /// Number of customers.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn bounds(values: impl Iterator<Item = i64>) -> Option<IntRange> {
    values.fold(None, |acc, v| match acc {
        None => Some(IntRange::new(v, v)),
        Some(r) => Some(IntRange::new(r.min.min(v), r.max.max(v))),
    })
}
