//! Match rating betting dashboard core: load value-odds backtest CSVs, filter
//! them and aggregate profit for charting.

pub mod config;
pub mod data;
pub mod error;
