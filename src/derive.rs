use crate::error::DashboardError;
use crate::geo::GeoIndex;
use crate::types::{EnrichedRecord, RawRecord};
use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

// First run of digits wrapped in parentheses, e.g. "Satisfied (4)".
static RATING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(([0-9]+)\)").expect("rating pattern is valid"));

/// `2023-9`, `2023-10`: year, dash, month without zero padding.
///
/// These keys do not sort lexicographically; order months by date instead
/// (see [`crate::filter::distinct_months`]).
pub fn month_key(date: NaiveDate) -> String {
    format!("{}-{}", date.year(), date.month())
}

/// `None` only when the text has no parenthesized digits. A run too long
/// for `u64` is kept as `u64::MAX` and logged rather than dropped.
pub fn extract_rating(text: &str) -> Option<u64> {
    let digits = RATING_RE.captures(text)?.get(1)?.as_str();
    match digits.parse() {
        Ok(rating) => Some(rating),
        Err(_) => {
            log::warn!("Satisfaction rating {digits} in {text:?} overflows, clamped to {}", u64::MAX);
            Some(u64::MAX)
        }
    }
}

pub fn enrich_record(record: RawRecord, geo: &GeoIndex) -> Result<EnrichedRecord, DashboardError> {
    let region_id = geo.lookup(&record.state)?.to_string();
    Ok(EnrichedRecord {
        month: month_key(record.date),
        day: record.date.day(),
        satisfaction_rating: extract_rating(&record.customer_satisfaction),
        region_id,
        raw: record,
    })
}

/// Derive month, day, rating and region id for every record, most recent
/// first. One state missing from `geo` fails the whole batch.
pub fn enrich(
    mut records: Vec<RawRecord>,
    geo: &GeoIndex,
) -> Result<Vec<EnrichedRecord>, DashboardError> {
    records.sort_by(|a, b| b.date.cmp(&a.date));
    let enriched = records
        .into_iter()
        .map(|r| enrich_record(r, geo))
        .collect::<Result<Vec<_>, _>>()?;

    let unrated = enriched
        .iter()
        .filter(|r| r.satisfaction_rating.is_none())
        .count();
    if unrated > 0 {
        log::info!("{unrated} of {} records carry no satisfaction rating", enriched.len());
    }
    Ok(enriched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::GeoFeature;

    fn geo() -> GeoIndex {
        let feature = |name: &str, id: &str| GeoFeature {
            name: name.to_string(),
            region_id: id.to_string(),
            geometry: serde_json::Value::Null,
            properties: serde_json::Map::new(),
        };
        GeoIndex::build(&[feature("Texas", "48"), feature("Ohio", "39")]).unwrap()
    }

    fn raw(date: (i32, u32, u32), state: &str, satisfaction: &str) -> RawRecord {
        RawRecord {
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            state: state.to_string(),
            customer: "Acme".to_string(),
            customer_acquisition_type: "Referral".to_string(),
            product: "Widget".to_string(),
            revenue: 100.0,
            units: 1,
            customer_satisfaction: satisfaction.to_string(),
        }
    }

    #[test]
    fn derives_month_day_and_region() {
        let r = enrich_record(raw((2023, 9, 5), "Texas", "Satisfied (4)"), &geo()).unwrap();
        assert_eq!(r.month, "2023-9");
        assert_eq!(r.day, 5);
        assert_eq!(r.region_id, "48");
        assert_eq!(r.satisfaction_rating, Some(4));
    }

    #[test]
    fn month_key_is_not_padded() {
        let oct = NaiveDate::from_ymd_opt(2023, 10, 1).unwrap();
        assert_eq!(month_key(oct), "2023-10");
    }

    #[test]
    fn rating_extraction() {
        assert_eq!(extract_rating("Happy (5)"), Some(5));
        assert_eq!(extract_rating("N/A"), None);
        assert_eq!(extract_rating("Neutral () (3)"), Some(3));
        assert_eq!(extract_rating("(12) then (3)"), Some(12));
        assert_eq!(extract_rating(""), None);
        assert_eq!(extract_rating("Okay (٣)"), None);
    }

    #[test]
    fn wide_ratings_stay_present() {
        assert_eq!(extract_rating("Odd (4294967296)"), Some(4_294_967_296));
        assert_eq!(
            extract_rating("Broken (99999999999999999999999)"),
            Some(u64::MAX)
        );
    }

    #[test]
    fn sorts_most_recent_first() {
        let out = enrich(
            vec![
                raw((2023, 8, 1), "Ohio", ""),
                raw((2023, 9, 5), "Texas", ""),
                raw((2023, 8, 20), "Texas", ""),
            ],
            &geo(),
        )
        .unwrap();
        let days: Vec<u32> = out.iter().map(|r| r.day).collect();
        assert_eq!(days, vec![5, 20, 1]);
    }

    #[test]
    fn unknown_state_fails_the_batch() {
        let err = enrich(
            vec![raw((2023, 9, 5), "Texas", ""), raw((2023, 9, 6), "Atlantis", "")],
            &geo(),
        )
        .unwrap_err();
        assert!(matches!(err, DashboardError::UnknownRegion { .. }));
    }
}
