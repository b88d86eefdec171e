/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse + drop rows with missing/inf cells → CustomerDataset
///   └──────────┘
///        │
///        ▼
///   ┌─────────────────┐
///   │ CustomerDataset │  Vec<CustomerRecord>, country index, slider bounds
///   └─────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  countries ∧ age ∧ credit score → Vec<&CustomerRecord>
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate │  means, per-country stats, group counts, salary boxes
///   └───────────┘
/// ```

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
