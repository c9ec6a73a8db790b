//! The query surface handed to the presentation layer.
//!
//! [`Dashboard::init`] does the expensive part once: read the sheet, read the
//! boundaries, join and derive. After that the dataset is immutable and every
//! `get_*` call is a filter plus one aggregate over in-memory records.

use crate::aggregate;
use crate::config::DashboardConfig;
use crate::derive::enrich;
use crate::error::DashboardError;
use crate::filter::{self, distinct_customers, distinct_months, distinct_states};
use crate::geo::{GeoCollection, GeoIndex};
use crate::loader::{load_records, LoadOptions, LoadReport};
use crate::types::{
    AcquisitionRevenueRow, DashboardView, DayRevenueRow, EnrichedRecord, FilterSelection, Kpis,
    ProductUnitsRow, RawRecord, RegionRevenueRow,
};

#[derive(Debug, Clone)]
pub struct Dashboard {
    records: Vec<EnrichedRecord>,
    geo: GeoCollection,
    load_report: Option<LoadReport>,
}

impl Dashboard {
    /// Load, join and enrich everything named in `config`.
    ///
    /// # Errors
    ///
    /// Any startup failure: unreadable inputs, missing columns, untyped
    /// rows, a duplicated region name, or a state with no boundary.
    pub fn init(config: &DashboardConfig) -> Result<Self, DashboardError> {
        let geo = GeoCollection::from_path(&config.geo_path)?;
        let options = LoadOptions {
            max_rows: config.max_rows,
        };
        let (raw, report) = load_records(&config.data_path, &options)?;
        let mut dashboard = Self::from_parts(raw, geo)?;
        dashboard.load_report = Some(report);
        Ok(dashboard)
    }

    /// Build from records and boundaries already in memory.
    ///
    /// # Errors
    ///
    /// [`DashboardError::DuplicateName`] or [`DashboardError::UnknownRegion`].
    pub fn from_parts(raw: Vec<RawRecord>, geo: GeoCollection) -> Result<Self, DashboardError> {
        let index = GeoIndex::build(&geo.features)?;
        let records = enrich(raw, &index)?;
        log::info!(
            "Joined {} records against {} regions",
            records.len(),
            index.len()
        );
        Ok(Self {
            records,
            geo,
            load_report: None,
        })
    }

    pub fn records(&self) -> &[EnrichedRecord] {
        &self.records
    }

    pub fn geo(&self) -> &GeoCollection {
        &self.geo
    }

    pub fn load_report(&self) -> Option<&LoadReport> {
        self.load_report.as_ref()
    }

    pub fn months(&self) -> Vec<String> {
        distinct_months(&self.records)
    }

    pub fn states(&self) -> Vec<String> {
        distinct_states(&self.records)
    }

    pub fn customers(&self) -> Vec<String> {
        distinct_customers(&self.records)
    }

    pub fn default_selection(&self) -> Option<FilterSelection> {
        FilterSelection::default_for(&self.records)
    }

    /// # Errors
    ///
    /// [`DashboardError::EmptySelection`] when nothing matches.
    pub fn filtered(
        &self,
        selection: &FilterSelection,
    ) -> Result<Vec<EnrichedRecord>, DashboardError> {
        filter::apply(&self.records, selection)
    }

    /// # Errors
    ///
    /// [`DashboardError::EmptySelection`] when nothing matches.
    pub fn get_kpis(&self, selection: &FilterSelection) -> Result<Kpis, DashboardError> {
        Ok(aggregate::kpis(&self.filtered(selection)?))
    }

    /// # Errors
    ///
    /// [`DashboardError::EmptySelection`] when nothing matches.
    pub fn get_revenue_by_day(
        &self,
        selection: &FilterSelection,
    ) -> Result<Vec<DayRevenueRow>, DashboardError> {
        Ok(aggregate::revenue_by_day(&self.filtered(selection)?))
    }

    /// # Errors
    ///
    /// [`DashboardError::EmptySelection`] when nothing matches.
    pub fn get_units_by_product(
        &self,
        selection: &FilterSelection,
    ) -> Result<Vec<ProductUnitsRow>, DashboardError> {
        Ok(aggregate::units_by_product(&self.filtered(selection)?))
    }

    /// # Errors
    ///
    /// [`DashboardError::EmptySelection`] when nothing matches.
    pub fn get_revenue_by_region(
        &self,
        selection: &FilterSelection,
    ) -> Result<Vec<RegionRevenueRow>, DashboardError> {
        Ok(aggregate::revenue_by_region(&self.filtered(selection)?))
    }

    /// # Errors
    ///
    /// [`DashboardError::EmptySelection`] when nothing matches.
    pub fn get_revenue_by_acquisition_type(
        &self,
        selection: &FilterSelection,
    ) -> Result<Vec<AcquisitionRevenueRow>, DashboardError> {
        Ok(aggregate::revenue_by_acquisition_type(
            &self.filtered(selection)?,
        ))
    }

    /// All aggregates for one selection, filtering once.
    ///
    /// # Errors
    ///
    /// [`DashboardError::EmptySelection`] when nothing matches.
    pub fn view(&self, selection: &FilterSelection) -> Result<DashboardView, DashboardError> {
        let data = self.filtered(selection)?;
        Ok(DashboardView {
            selection: selection.clone(),
            kpis: aggregate::kpis(&data),
            revenue_by_day: aggregate::revenue_by_day(&data),
            units_by_product: aggregate::units_by_product(&data),
            revenue_by_region: aggregate::revenue_by_region(&data),
            revenue_by_acquisition_type: aggregate::revenue_by_acquisition_type(&data),
        })
    }
}
