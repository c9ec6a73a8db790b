//! Data preparation and aggregation behind the customer-success dashboard.
//!
//! Startup is [`Dashboard::init`]: load the sheet and the state boundaries,
//! join every row to a region and derive month, day and satisfaction rating.
//! Each request is then a [`FilterSelection`] passed to one of the
//! `Dashboard::get_*` queries, which return plain rows for whatever draws
//! the charts.

pub mod aggregate;
pub mod config;
pub mod dashboard;
pub mod derive;
pub mod error;
pub mod filter;
pub mod geo;
pub mod loader;
pub mod output;
pub mod types;
pub mod util;

pub use config::{ChartTheme, DashboardConfig};
pub use dashboard::Dashboard;
pub use error::DashboardError;
pub use geo::{GeoCollection, GeoFeature, GeoIndex};
pub use types::{
    AcquisitionRevenueRow, DashboardView, DayRevenueRow, EnrichedRecord, FilterSelection, Kpis,
    ProductUnitsRow, RawRecord, RegionRevenueRow,
};
