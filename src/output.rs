use crate::config::DashboardConfig;
use crate::error::DashboardError;
use crate::geo::GeoCollection;
use crate::types::DashboardView;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table, Tabled};

pub const REVENUE_BY_DAY_FILE: &str = "revenue_by_day.csv";
pub const UNITS_BY_PRODUCT_FILE: &str = "units_by_product.csv";
pub const REVENUE_BY_REGION_FILE: &str = "revenue_by_region.csv";
pub const REVENUE_BY_ACQUISITION_FILE: &str = "revenue_by_acquisition_type.csv";
pub const SUMMARY_FILE: &str = "summary.json";
pub const GEOJSON_FILE: &str = "regions.geojson";

pub fn write_csv<T: Serialize>(path: impl AsRef<Path>, rows: &[T]) -> Result<(), DashboardError> {
    let mut wtr = csv::Writer::from_path(path)?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<T: Serialize + ?Sized>(
    path: impl AsRef<Path>,
    value: &T,
) -> Result<(), DashboardError> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

#[derive(Serialize)]
struct Summary<'a> {
    title: &'a str,
    #[serde(flatten)]
    view: &'a DashboardView,
    theme: &'a crate::config::ChartTheme,
}

/// Write every table of `view` as CSV, a JSON summary with the chart theme,
/// and the boundaries with region ids set. Returns the files written.
pub fn export_view(
    dir: impl AsRef<Path>,
    view: &DashboardView,
    config: &DashboardConfig,
    geo: &GeoCollection,
) -> Result<Vec<PathBuf>, DashboardError> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;

    let mut written = Vec::new();
    let mut out = |name: &str| {
        let path = dir.join(name);
        written.push(path.clone());
        path
    };

    write_csv(out(REVENUE_BY_DAY_FILE), &view.revenue_by_day)?;
    write_csv(out(UNITS_BY_PRODUCT_FILE), &view.units_by_product)?;
    write_csv(out(REVENUE_BY_REGION_FILE), &view.revenue_by_region)?;
    write_csv(out(REVENUE_BY_ACQUISITION_FILE), &view.revenue_by_acquisition_type)?;
    write_json(
        out(SUMMARY_FILE),
        &Summary {
            title: &config.title,
            view,
            theme: &config.theme,
        },
    )?;
    write_json(out(GEOJSON_FILE), &geo.to_geojson())?;

    log::info!("Exported {} files to {}", written.len(), dir.display());
    Ok(written)
}

pub fn preview_table<T>(title: &str, rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    println!("{}\n", title);
    preview_table_rows(rows, max_rows);
}

pub fn preview_table_rows<T>(rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().take(max_rows).cloned().collect();
    if slice.is_empty() {
        println!("(no rows)\n");
        return;
    }
    let table_str = Table::new(slice).with(Style::markdown()).to_string();
    println!("{}\n", table_str);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DayRevenueRow, FilterSelection, Kpis};
    use tempfile::TempDir;

    fn view() -> DashboardView {
        DashboardView {
            selection: FilterSelection::new("2023-9", ["Texas"], ["Acme"]),
            kpis: Kpis {
                records: 2,
                total_revenue: 300.0,
                average_revenue: 150.0,
                average_satisfaction: None,
                stars: 0,
            },
            revenue_by_day: vec![
                DayRevenueRow { day: 1, revenue: 100.0 },
                DayRevenueRow { day: 2, revenue: 200.0 },
            ],
            units_by_product: vec![],
            revenue_by_region: vec![],
            revenue_by_acquisition_type: vec![],
        }
    }

    #[test]
    fn exports_tables_summary_and_boundaries() {
        let dir = TempDir::new().unwrap();
        let geo = GeoCollection::from_json_str(
            r#"{"features": [{"properties": {"NAME": "Texas", "STATEFP": "48"}, "geometry": null}]}"#,
        )
        .unwrap();
        let written =
            export_view(dir.path(), &view(), &DashboardConfig::default(), &geo).unwrap();
        assert_eq!(written.len(), 6);

        let days = std::fs::read_to_string(dir.path().join(REVENUE_BY_DAY_FILE)).unwrap();
        assert_eq!(days, "Day,Revenue\n1,100.0\n2,200.0\n");

        let summary: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(dir.path().join(SUMMARY_FILE)).unwrap(),
        )
        .unwrap();
        assert_eq!(summary["title"], "Customer Success Dashboard");
        assert_eq!(summary["kpis"]["total_revenue"], 300.0);
        assert!(summary["kpis"]["average_satisfaction"].is_null());
        assert_eq!(summary["selection"]["month"], "2023-9");
        assert_eq!(summary["theme"]["bar_color"], "#0083B8");

        let regions: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(dir.path().join(GEOJSON_FILE)).unwrap(),
        )
        .unwrap();
        assert_eq!(regions["features"][0]["id"], "48");
    }
}
