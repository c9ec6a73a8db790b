use crate::error::DashboardError;
use crate::types::{EnrichedRecord, FilterSelection};
use std::collections::HashSet;

/// Distinct values of `key` in order of first appearance.
fn distinct<'a, F>(records: &'a [EnrichedRecord], key: F) -> Vec<String>
where
    F: Fn(&'a EnrichedRecord) -> &'a str,
{
    let mut seen: HashSet<&str> = HashSet::new();
    records
        .iter()
        .map(key)
        .filter(|v| seen.insert(*v))
        .map(str::to_string)
        .collect()
}

/// Month keys as they appear in the (date-descending) record set, so the
/// first entry is the most recent month.
pub fn distinct_months(records: &[EnrichedRecord]) -> Vec<String> {
    distinct(records, |r| r.month.as_str())
}

pub fn distinct_states(records: &[EnrichedRecord]) -> Vec<String> {
    distinct(records, |r| r.raw.state.as_str())
}

pub fn distinct_customers(records: &[EnrichedRecord]) -> Vec<String> {
    distinct(records, |r| r.raw.customer.as_str())
}

impl FilterSelection {
    pub fn new<S, C>(month: impl Into<String>, states: S, customers: C) -> Self
    where
        S: IntoIterator,
        S::Item: Into<String>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self {
            month: month.into(),
            states: states.into_iter().map(Into::into).collect(),
            customers: customers.into_iter().map(Into::into).collect(),
        }
    }

    /// `month` with every state and customer in `records` selected.
    pub fn all_for_month(records: &[EnrichedRecord], month: impl Into<String>) -> Self {
        Self::new(month, distinct_states(records), distinct_customers(records))
    }

    /// Most recent month, all states, all customers. `None` for an empty
    /// dataset.
    pub fn default_for(records: &[EnrichedRecord]) -> Option<Self> {
        let month = distinct_months(records).into_iter().next()?;
        Some(Self::all_for_month(records, month))
    }

    pub fn matches(&self, record: &EnrichedRecord) -> bool {
        record.month == self.month
            && self.states.contains(&record.raw.state)
            && self.customers.contains(&record.raw.customer)
    }
}

/// Records matching all three predicates, original order kept.
///
/// # Errors
///
/// [`DashboardError::EmptySelection`] if nothing matches; callers stop
/// rendering for this request rather than aggregate an empty set.
pub fn apply(
    records: &[EnrichedRecord],
    selection: &FilterSelection,
) -> Result<Vec<EnrichedRecord>, DashboardError> {
    let selected: Vec<EnrichedRecord> = records
        .iter()
        .filter(|r| selection.matches(r))
        .cloned()
        .collect();
    if selected.is_empty() {
        log::warn!(
            "No records for month {} across {} state(s) and {} customer(s)",
            selection.month,
            selection.states.len(),
            selection.customers.len()
        );
        return Err(DashboardError::EmptySelection);
    }
    log::debug!(
        "Selection for {} kept {} of {} records",
        selection.month,
        selected.len(),
        records.len()
    );
    Ok(selected)
}
