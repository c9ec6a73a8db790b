use crate::error::DashboardError;
use crate::types::{RawRecord, RawRow, REQUIRED_COLUMNS};
use crate::util::{parse_date_safe, parse_f64_safe, parse_i64_safe};
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Stop after this many data rows; the source table has a known extent.
    pub max_rows: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub total_rows: usize,
    pub loaded_rows: usize,
    pub blank_rows: usize,
}

pub fn load_records(
    path: impl AsRef<Path>,
    options: &LoadOptions,
) -> Result<(Vec<RawRecord>, LoadReport), DashboardError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| DashboardError::SourceUnavailable {
        path: path.display().to_string(),
        source,
    })?;
    let (records, report) = load_from_reader(file, options)?;
    log::info!(
        "Loaded {} records from {} ({} rows read, {} blank)",
        report.loaded_rows,
        path.display(),
        report.total_rows,
        report.blank_rows
    );
    Ok((records, report))
}

/// Structural ingestion only: check the header, then type every cell.
/// A row that cannot be typed aborts the whole load.
pub fn load_from_reader<R: Read>(
    reader: R,
    options: &LoadOptions,
) -> Result<(Vec<RawRecord>, LoadReport), DashboardError> {
    let mut rdr = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::Headers)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|col| !headers.iter().any(|h| h == **col))
        .map(|col| (*col).to_string())
        .collect();
    if !missing.is_empty() {
        return Err(DashboardError::Schema { missing });
    }

    let limit = options.max_rows.unwrap_or(usize::MAX);
    let mut total_rows = 0usize;
    let mut blank_rows = 0usize;
    let mut records: Vec<RawRecord> = Vec::new();

    for (idx, result) in rdr.deserialize::<RawRow>().take(limit).enumerate() {
        total_rows += 1;
        // Header is line 1.
        let line = idx + 2;
        let row = result?;
        if is_blank(&row) {
            blank_rows += 1;
            continue;
        }
        records.push(type_row(row, line)?);
    }

    let report = LoadReport {
        total_rows,
        loaded_rows: records.len(),
        blank_rows,
    };
    Ok((records, report))
}

fn is_blank(row: &RawRow) -> bool {
    [
        &row.date,
        &row.state,
        &row.customer,
        &row.customer_acquisition_type,
        &row.product,
        &row.revenue,
        &row.units,
        &row.customer_satisfaction,
    ]
    .iter()
    .all(|cell| cell.as_deref().map_or(true, |s| s.trim().is_empty()))
}

fn type_row(row: RawRow, line: usize) -> Result<RawRecord, DashboardError> {
    let invalid = |message: String| DashboardError::InvalidRow { row: line, message };

    let date = parse_date_safe(row.date.as_deref())
        .ok_or_else(|| invalid(format!("unparsable Date {:?}", row.date)))?;
    let revenue = parse_f64_safe(row.revenue.as_deref())
        .ok_or_else(|| invalid(format!("unparsable Revenue {:?}", row.revenue)))?;
    let units = parse_i64_safe(row.units.as_deref())
        .ok_or_else(|| invalid(format!("unparsable Units {:?}", row.units)))?;

    let text = |cell: Option<String>, column: &str| -> Result<String, DashboardError> {
        match cell.map(|s| s.trim().to_string()) {
            Some(s) if !s.is_empty() => Ok(s),
            _ => Err(invalid(format!("empty {column}"))),
        }
    };

    Ok(RawRecord {
        date,
        state: text(row.state, "State")?,
        customer: text(row.customer, "Customer")?,
        customer_acquisition_type: text(
            row.customer_acquisition_type,
            "Customer Acquisition Type",
        )?,
        product: text(row.product, "Product")?,
        revenue,
        units,
        // Free text; an empty cell just means there is no rating.
        customer_satisfaction: row
            .customer_satisfaction
            .unwrap_or_default()
            .trim()
            .to_string(),
    })
}
