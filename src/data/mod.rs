/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → AccidentDataset (missing DEAD → 0)
///   └──────────┘
///        │
///        ▼
///   ┌─────────────────┐
///   │ AccidentDataset  │  Vec<AccidentRecord>, city totals, fatality marks
///   └─────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  vehicle ∧ age ∧ fatality range → matching records
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  group by city → counts ascending
///   └───────────┘
/// ```

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
