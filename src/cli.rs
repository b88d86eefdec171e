//! Command-line interface definitions and argument parsing

use std::collections::BTreeSet;
use std::path::PathBuf;

use clap::Parser;

use crate::data::filter::{DashboardDefaults, FilterCriteria};
use crate::data::model::{CustomerDataset, IntRange};

/// Default dataset looked up in the working directory.
pub const DEFAULT_DATA_FILE: &str = "bank_customer_churn_data.csv";

/// Interactive bank customer churn dashboard
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Dataset to open on startup (.csv, .json or .parquet)
    pub data: Option<PathBuf>,

    /// Render the dashboard without a window and write it as JSON ("-" for stdout)
    #[arg(short, long)]
    pub export: Option<PathBuf>,

    /// Country to include; repeat for several (default: all)
    #[arg(short, long = "country")]
    pub countries: Vec<String>,

    /// Inclusive age window, e.g. 20-60
    #[arg(long, default_value = "20-60")]
    pub age: IntRange,

    /// Inclusive credit score window, e.g. 400-850
    #[arg(long, default_value = "400-850")]
    pub credit_score: IntRange,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// The dataset to open: the positional argument, or the default file if present.
    pub fn data_path(&self) -> Option<PathBuf> {
        self.data.clone().or_else(|| {
            let fallback = PathBuf::from(DEFAULT_DATA_FILE);
            fallback.exists().then_some(fallback)
        })
    }

    pub fn defaults(&self) -> DashboardDefaults {
        DashboardDefaults {
            age: self.age,
            credit_score: self.credit_score,
        }
    }

    /// Criteria for a headless export. Without `--country` every country is selected.
    pub fn criteria(&self, dataset: &CustomerDataset) -> FilterCriteria {
        let countries: BTreeSet<String> = if self.countries.is_empty() {
            dataset.countries.clone()
        } else {
            self.countries.iter().cloned().collect()
        };
        FilterCriteria {
            countries,
            age: self.age,
            credit_score: self.credit_score,
        }
    }

    /// `log` filter used when `RUST_LOG` is unset.
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_filters_and_defaults() {
        let args = Args::parse_from(["churn-lens", "data.csv", "-c", "France", "--country", "Spain"]);
        assert_eq!(args.data, Some(PathBuf::from("data.csv")));
        assert_eq!(args.countries, vec!["France", "Spain"]);
        assert_eq!(args.age, IntRange::new(20, 60));
        assert_eq!(args.credit_score, IntRange::new(400, 850));
        assert_eq!(args.log_level(), "info");
    }

    #[test]
    fn rejects_malformed_ranges() {
        assert!(Args::try_parse_from(["churn-lens", "--age", "sixty"]).is_err());
        assert!(Args::try_parse_from(["churn-lens", "--credit-score", "850-400"]).is_err());
    }

    #[test]
    fn criteria_default_to_every_country() {
        let args = Args::parse_from(["churn-lens", "--age", "30-40", "-v"]);
        let ds = CustomerDataset::from_records(Vec::new(), 0);
        let c = args.criteria(&ds);
        assert!(c.countries.is_empty());
        assert_eq!(c.age, IntRange::new(30, 40));
        assert_eq!(args.log_level(), "debug");

        let args = Args::parse_from(["churn-lens", "-c", "Germany"]);
        let c = args.criteria(&ds);
        assert_eq!(c.countries.len(), 1);
    }
}
