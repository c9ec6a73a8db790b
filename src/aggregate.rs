// Grouped aggregates over a filtered record set.
//
// Every function is pure. Callers are expected to pass a non-empty slice,
// which `filter::apply` guarantees.
use crate::types::{
    AcquisitionRevenueRow, DayRevenueRow, EnrichedRecord, Kpis, ProductUnitsRow,
    RegionRevenueRow,
};
use crate::util::{mean, round_to};
use std::collections::{BTreeMap, HashMap};

pub fn total_revenue(data: &[EnrichedRecord]) -> f64 {
    data.iter().map(|r| r.raw.revenue).sum()
}

/// Mean revenue rounded to cents; 0 for an empty slice.
pub fn average_revenue(data: &[EnrichedRecord]) -> f64 {
    let revenue: Vec<f64> = data.iter().map(|r| r.raw.revenue).collect();
    mean(&revenue).map_or(0.0, |m| round_to(m, 2))
}

/// Mean of the ratings that are present, one decimal. `None` when no record
/// has a rating.
pub fn average_satisfaction(data: &[EnrichedRecord]) -> Option<f64> {
    let ratings: Vec<f64> = data
        .iter()
        .filter_map(|r| r.satisfaction_rating)
        .map(|rating| rating as f64)
        .collect();
    mean(&ratings).map(|m| round_to(m, 1))
}

/// Whole stars for an average rating, ties to even.
pub fn star_count(average: Option<f64>) -> u32 {
    average.map_or(0, |avg| round_to(avg, 0).max(0.0) as u32)
}

pub fn kpis(data: &[EnrichedRecord]) -> Kpis {
    let average_satisfaction = average_satisfaction(data);
    Kpis {
        records: data.len(),
        total_revenue: total_revenue(data),
        average_revenue: average_revenue(data),
        average_satisfaction,
        stars: star_count(average_satisfaction),
    }
}

/// Revenue per day of month, ascending by day. Only days present appear.
pub fn revenue_by_day(data: &[EnrichedRecord]) -> Vec<DayRevenueRow> {
    let mut map: BTreeMap<u32, f64> = BTreeMap::new();
    for r in data {
        *map.entry(r.day).or_insert(0.0) += r.raw.revenue;
    }
    map.into_iter()
        .map(|(day, revenue)| DayRevenueRow { day, revenue })
        .collect()
}

/// Units per product, ascending by units; equal totals fall back to the
/// product name so the order is stable.
pub fn units_by_product(data: &[EnrichedRecord]) -> Vec<ProductUnitsRow> {
    let mut map: HashMap<&str, i64> = HashMap::new();
    for r in data {
        *map.entry(r.raw.product.as_str()).or_default() += r.raw.units;
    }
    let mut rows: Vec<ProductUnitsRow> = map
        .into_iter()
        .map(|(product, units)| ProductUnitsRow {
            product: product.to_string(),
            units,
        })
        .collect();
    rows.sort_by(|a, b| a.units.cmp(&b.units).then_with(|| a.product.cmp(&b.product)));
    rows
}

/// Revenue per `(region id, state)`, ordered by region id then state.
pub fn revenue_by_region(data: &[EnrichedRecord]) -> Vec<RegionRevenueRow> {
    let mut map: BTreeMap<(&str, &str), f64> = BTreeMap::new();
    for r in data {
        *map.entry((r.region_id.as_str(), r.raw.state.as_str()))
            .or_insert(0.0) += r.raw.revenue;
    }
    map.into_iter()
        .map(|((region_id, state), revenue)| RegionRevenueRow {
            region_id: region_id.to_string(),
            state: state.to_string(),
            revenue,
        })
        .collect()
}

/// Revenue per acquisition type, ordered by the label, not the amount.
pub fn revenue_by_acquisition_type(data: &[EnrichedRecord]) -> Vec<AcquisitionRevenueRow> {
    let mut map: BTreeMap<&str, f64> = BTreeMap::new();
    for r in data {
        *map.entry(r.raw.customer_acquisition_type.as_str())
            .or_insert(0.0) += r.raw.revenue;
    }
    map.into_iter()
        .map(|(label, revenue)| AcquisitionRevenueRow {
            acquisition_type: label.to_string(),
            revenue,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RawRecord;
    use chrono::NaiveDate;

    struct Rec {
        day: u32,
        state: &'static str,
        region: &'static str,
        product: &'static str,
        acquisition: &'static str,
        revenue: f64,
        units: i64,
        rating: Option<u64>,
    }

    impl Default for Rec {
        fn default() -> Self {
            Self {
                day: 1,
                state: "Texas",
                region: "48",
                product: "Widget",
                acquisition: "Referral",
                revenue: 0.0,
                units: 0,
                rating: None,
            }
        }
    }

    impl Rec {
        fn build(self) -> EnrichedRecord {
            EnrichedRecord {
                raw: RawRecord {
                    date: NaiveDate::from_ymd_opt(2023, 9, self.day).unwrap(),
                    state: self.state.to_string(),
                    customer: "Acme".to_string(),
                    customer_acquisition_type: self.acquisition.to_string(),
                    product: self.product.to_string(),
                    revenue: self.revenue,
                    units: self.units,
                    customer_satisfaction: String::new(),
                },
                month: "2023-9".to_string(),
                day: self.day,
                satisfaction_rating: self.rating,
                region_id: self.region.to_string(),
            }
        }
    }

    #[test]
    fn revenue_totals_and_mean() {
        let data = vec![
            Rec { revenue: 100.0, ..Rec::default() }.build(),
            Rec { revenue: 200.0, ..Rec::default() }.build(),
        ];
        assert_eq!(total_revenue(&data), 300.0);
        assert_eq!(average_revenue(&data), 150.0);
    }

    #[test]
    fn average_revenue_rounds_to_cents() {
        let data = vec![
            Rec { revenue: 10.0, ..Rec::default() }.build(),
            Rec { revenue: 10.0, ..Rec::default() }.build(),
            Rec { revenue: 10.01, ..Rec::default() }.build(),
        ];
        assert_eq!(average_revenue(&data), 10.0);
    }

    #[test]
    fn satisfaction_skips_missing_ratings() {
        let data = vec![
            Rec { rating: Some(4), ..Rec::default() }.build(),
            Rec { rating: None, ..Rec::default() }.build(),
            Rec { rating: Some(2), ..Rec::default() }.build(),
        ];
        assert_eq!(average_satisfaction(&data), Some(3.0));
        let unrated = vec![Rec::default().build()];
        assert_eq!(average_satisfaction(&unrated), None);
        assert_eq!(kpis(&unrated).stars, 0);
    }

    #[test]
    fn stars_round_half_to_even() {
        assert_eq!(star_count(Some(4.5)), 4);
        assert_eq!(star_count(Some(3.5)), 4);
        assert_eq!(star_count(Some(3.4)), 3);
        assert_eq!(star_count(None), 0);
    }

    #[test]
    fn day_groups_only_present_days() {
        let data = vec![
            Rec { day: 12, revenue: 5.0, ..Rec::default() }.build(),
            Rec { day: 3, revenue: 1.0, ..Rec::default() }.build(),
            Rec { day: 12, revenue: 2.5, ..Rec::default() }.build(),
        ];
        assert_eq!(
            revenue_by_day(&data),
            vec![
                DayRevenueRow { day: 3, revenue: 1.0 },
                DayRevenueRow { day: 12, revenue: 7.5 },
            ]
        );
    }

    #[test]
    fn products_ascend_by_units() {
        let data = vec![
            Rec { product: "Gadget", units: 9, ..Rec::default() }.build(),
            Rec { product: "Widget", units: 2, ..Rec::default() }.build(),
            Rec { product: "Gizmo", units: 5, ..Rec::default() }.build(),
            Rec { product: "Widget", units: 1, ..Rec::default() }.build(),
            Rec { product: "Doohickey", units: 5, ..Rec::default() }.build(),
        ];
        let rows = units_by_product(&data);
        let order: Vec<(&str, i64)> = rows.iter().map(|r| (r.product.as_str(), r.units)).collect();
        assert_eq!(
            order,
            vec![("Widget", 3), ("Doohickey", 5), ("Gizmo", 5), ("Gadget", 9)]
        );
        assert!(rows.windows(2).all(|w| w[0].units <= w[1].units));
    }

    #[test]
    fn region_keeps_display_name() {
        let data = vec![
            Rec { state: "Texas", region: "48", revenue: 10.0, ..Rec::default() }.build(),
            Rec { state: "Ohio", region: "39", revenue: 4.0, ..Rec::default() }.build(),
            Rec { state: "Texas", region: "48", revenue: 1.0, ..Rec::default() }.build(),
        ];
        assert_eq!(
            revenue_by_region(&data),
            vec![
                RegionRevenueRow {
                    region_id: "39".to_string(),
                    state: "Ohio".to_string(),
                    revenue: 4.0
                },
                RegionRevenueRow {
                    region_id: "48".to_string(),
                    state: "Texas".to_string(),
                    revenue: 11.0
                },
            ]
        );
    }

    #[test]
    fn acquisition_types_sorted_by_label() {
        let data = vec![
            Rec { acquisition: "Referral", revenue: 500.0, ..Rec::default() }.build(),
            Rec { acquisition: "Ads", revenue: 300.0, ..Rec::default() }.build(),
        ];
        let labels: Vec<String> = revenue_by_acquisition_type(&data)
            .into_iter()
            .map(|r| r.acquisition_type)
            .collect();
        assert_eq!(labels, vec!["Ads", "Referral"]);
    }
}
