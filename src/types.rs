use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tabled::Tabled;

/// Column names the source table must carry. Anything else is ignored.
pub const REQUIRED_COLUMNS: [&str; 8] = [
    "Date",
    "State",
    "Customer",
    "Customer Acquisition Type",
    "Product",
    "Revenue",
    "Units",
    "Customer Satisfaction",
];

#[derive(Debug, Deserialize)]
pub struct RawRow {
    #[serde(rename = "Date")]
    pub date: Option<String>,
    #[serde(rename = "State")]
    pub state: Option<String>,
    #[serde(rename = "Customer")]
    pub customer: Option<String>,
    #[serde(rename = "Customer Acquisition Type")]
    pub customer_acquisition_type: Option<String>,
    #[serde(rename = "Product")]
    pub product: Option<String>,
    #[serde(rename = "Revenue")]
    pub revenue: Option<String>,
    #[serde(rename = "Units")]
    pub units: Option<String>,
    #[serde(rename = "Customer Satisfaction")]
    pub customer_satisfaction: Option<String>,
}

/// One typed row of the source table, before any derivation.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub date: NaiveDate,
    pub state: String,
    pub customer: String,
    pub customer_acquisition_type: String,
    pub product: String,
    pub revenue: f64,
    pub units: i64,
    pub customer_satisfaction: String,
}

/// A [`RawRecord`] plus the fields derived from it at load time.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedRecord {
    pub raw: RawRecord,
    /// `year-month`, month not zero-padded (`2023-9`).
    pub month: String,
    pub day: u32,
    pub satisfaction_rating: Option<u64>,
    pub region_id: String,
}

/// The user's current narrowing of the dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterSelection {
    pub month: String,
    pub states: BTreeSet<String>,
    pub customers: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct DayRevenueRow {
    #[serde(rename = "Day")]
    #[tabled(rename = "Day")]
    pub day: u32,
    #[serde(rename = "Revenue")]
    #[tabled(rename = "Revenue")]
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct ProductUnitsRow {
    #[serde(rename = "Product")]
    #[tabled(rename = "Product")]
    pub product: String,
    #[serde(rename = "Units")]
    #[tabled(rename = "Units")]
    pub units: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct RegionRevenueRow {
    #[serde(rename = "id")]
    #[tabled(rename = "id")]
    pub region_id: String,
    #[serde(rename = "State")]
    #[tabled(rename = "State")]
    pub state: String,
    #[serde(rename = "Revenue")]
    #[tabled(rename = "Revenue")]
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct AcquisitionRevenueRow {
    #[serde(rename = "Customer Acquisition Type")]
    #[tabled(rename = "Customer Acquisition Type")]
    pub acquisition_type: String,
    #[serde(rename = "Revenue")]
    #[tabled(rename = "Revenue")]
    pub revenue: f64,
}

/// Scalar metrics shown above the charts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Kpis {
    pub records: usize,
    pub total_revenue: f64,
    pub average_revenue: f64,
    /// `None` when no record in the selection carries a rating.
    pub average_satisfaction: Option<f64>,
    pub stars: u32,
}

/// Every aggregate for one selection, as handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub selection: FilterSelection,
    pub kpis: Kpis,
    pub revenue_by_day: Vec<DayRevenueRow>,
    pub units_by_product: Vec<ProductUnitsRow>,
    pub revenue_by_region: Vec<RegionRevenueRow>,
    pub revenue_by_acquisition_type: Vec<AcquisitionRevenueRow>,
}
