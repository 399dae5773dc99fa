/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  <league>_rating_backtest.csv  (one file, or a directory of them)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse + league tagging → BetTable
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ BetTable  │  Vec<BetRecord>, column domains, rating bounds
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  FilterSet → FilteredView (row indices)
///   └──────────┘
///        │
///        ├──────────────┐
///        ▼              ▼
///   ┌──────────┐   ┌──────────┐
///   │ summary   │   │  export   │  view → CSV
///   └──────────┘   └──────────┘
///   metrics + chart series
/// ```

pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
pub mod summary;
