//! Calendar bucketing for timeline charts
//!
//! Rows carry a date or datetime string in the x field plus one numeric field
//! per dataset. The bucket unit is chosen from the span of the parsed
//! timestamps, rows are accumulated per bucket, and buckets are emitted in
//! chronological order.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, Timelike};
use dash_core::{values, Row};
use indexmap::IndexMap;
use serde_json::Value;

/// Calendar unit a timeline is bucketed by
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BucketUnit {
    Hour,
    Day,
    Week,
    Month,
    Year,
}

/// Average year length used for the month/year threshold
const DAYS_PER_YEAR: f64 = 365.25;

impl BucketUnit {
    /// First matching threshold, checked from finest to coarsest
    pub fn for_span(span: Duration) -> Self {
        let seconds = span.num_seconds();
        let days = seconds as f64 / 86_400.0;

        if span < Duration::hours(24) {
            BucketUnit::Hour
        } else if span <= Duration::days(14) {
            BucketUnit::Day
        } else if span <= Duration::weeks(12) {
            BucketUnit::Week
        } else if days <= DAYS_PER_YEAR {
            BucketUnit::Month
        } else {
            BucketUnit::Year
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BucketUnit::Hour => "hour",
            BucketUnit::Day => "day",
            BucketUnit::Week => "week",
            BucketUnit::Month => "month",
            BucketUnit::Year => "year",
        }
    }

    /// `(display key, sort key)` for an instant.
    ///
    /// Sort keys share one zero-padded ISO shape so they order lexicographically.
    pub fn keys(&self, at: NaiveDateTime) -> (String, String) {
        let date = at.date();
        match self {
            BucketUnit::Hour => (
                format!("{} {:02}:00", date.format("%Y-%m-%d"), at.hour()),
                format!("{}T{:02}:00:00", date.format("%Y-%m-%d"), at.hour()),
            ),
            BucketUnit::Day => {
                let day = date.format("%Y-%m-%d").to_string();
                let sort = format!("{}T00:00:00", day);
                (day, sort)
            }
            BucketUnit::Week => {
                let monday = date - Duration::days(date.weekday().num_days_from_monday() as i64);
                let monday = monday.format("%Y-%m-%d").to_string();
                (format!("Week of {}", monday), format!("{}T00:00:00", monday))
            }
            BucketUnit::Month => (
                format!("{:04}-{:02}", date.year(), date.month()),
                format!("{:04}-{:02}-01T00:00:00", date.year(), date.month()),
            ),
            BucketUnit::Year => (
                format!("{:04}", date.year()),
                format!("{:04}-01-01T00:00:00", date.year()),
            ),
        }
    }
}

/// One calendar bucket
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineBucket {
    pub label: String,
    pub sort_key: String,
    /// Number of rows that fell into this bucket
    pub count: usize,
    /// One value per dataset field, in field order
    pub values: Vec<f64>,
}

/// Bucketed series ready for a line or bar chart
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    pub unit: BucketUnit,
    pub fields: Vec<String>,
    pub buckets: Vec<TimelineBucket>,
}

impl Timeline {
    pub fn labels(&self) -> Vec<&str> {
        self.buckets.iter().map(|b| b.label.as_str()).collect()
    }

    /// Values of one field across all buckets
    pub fn series(&self, field_index: usize) -> Vec<f64> {
        self.buckets
            .iter()
            .map(|b| b.values.get(field_index).copied().unwrap_or(0.0))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

/// Parse a date or datetime string leniently.
///
/// `"2024-01-02 10:00"` is read as `"2024-01-02T10:00"`; offsets are
/// normalised to UTC; a bare date is midnight.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let normalized = if raw.contains(' ') && !raw.contains('T') {
        raw.replacen(' ', "T", 1)
    } else {
        raw.to_string()
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(&normalized) {
        return Some(dt.naive_utc());
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(&normalized, format) {
            return Some(dt);
        }
    }

    // Trailing `Z` without seconds, e.g. "2024-01-02T10:00Z"
    if let Some(stripped) = normalized.strip_suffix('Z') {
        if let Ok(dt) = NaiveDateTime::parse_from_str(stripped, "%Y-%m-%dT%H:%M") {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(&normalized, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn row_timestamp(row: &Row, x_field: &str) -> Option<NaiveDateTime> {
    match row.get(x_field)? {
        Value::String(s) => parse_timestamp(s),
        _ => None,
    }
}

/// Bucket rows by calendar unit and accumulate `fields` per bucket.
///
/// Rows whose x value does not parse are dropped. In percentage mode each
/// field becomes its per-bucket average, rescaled so a bucket sums to 100.
pub fn aggregate_timeline<S: AsRef<str>>(
    rows: &[Row],
    x_field: &str,
    fields: &[S],
    percentage: bool,
) -> Timeline {
    let fields: Vec<String> = fields.iter().map(|f| f.as_ref().to_string()).collect();

    let mut parsed: Vec<(NaiveDateTime, &Row)> = rows
        .iter()
        .filter_map(|row| row_timestamp(row, x_field).map(|at| (at, row)))
        .collect();

    let dropped = rows.len() - parsed.len();
    if dropped > 0 {
        tracing::warn!("Dropped {} timeline row(s) with unparseable '{}'", dropped, x_field);
    }

    if parsed.is_empty() {
        return Timeline { unit: BucketUnit::Day, fields, buckets: Vec::new() };
    }

    parsed.sort_by_key(|(at, _)| *at);

    let span = parsed[parsed.len() - 1].0 - parsed[0].0;
    let unit = BucketUnit::for_span(span);

    let mut buckets: IndexMap<String, TimelineBucket> = IndexMap::new();
    for (at, row) in &parsed {
        let (label, sort_key) = unit.keys(*at);
        let bucket = buckets.entry(label.clone()).or_insert_with(|| TimelineBucket {
            label,
            sort_key,
            count: 0,
            values: vec![0.0; fields.len()],
        });
        bucket.count += 1;
        for (slot, field) in bucket.values.iter_mut().zip(&fields) {
            *slot += values::number_or_zero(row.get(field));
        }
    }

    let mut buckets: Vec<TimelineBucket> = buckets.into_values().collect();

    if percentage {
        for bucket in &mut buckets {
            let averages: Vec<f64> = bucket
                .values
                .iter()
                .map(|sum| if bucket.count > 0 { sum / bucket.count as f64 } else { 0.0 })
                .collect();
            bucket.values = normalize_to_percent(&averages);
        }
    }

    buckets.sort_by(|a, b| a.sort_key.cmp(&b.sort_key));

    tracing::debug!("Timeline bucketed {} rows into {} {} bucket(s)", parsed.len(), buckets.len(), unit.as_str());

    Timeline { unit, fields, buckets }
}

/// Rescale values to sum to exactly 100 at one decimal place.
///
/// Tenths are allotted by largest remainder so independent rounding cannot drift.
pub fn normalize_to_percent(values: &[f64]) -> Vec<f64> {
    let total: f64 = values.iter().sum();
    if values.is_empty() || !(total > 0.0) {
        return vec![0.0; values.len()];
    }

    let scaled: Vec<f64> = values.iter().map(|v| v / total * 1000.0).collect();
    let mut tenths: Vec<i64> = scaled.iter().map(|v| v.floor() as i64).collect();

    let mut deficit = 1000 - tenths.iter().sum::<i64>();
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| {
        let ra = scaled[a] - scaled[a].floor();
        let rb = scaled[b] - scaled[b].floor();
        rb.partial_cmp(&ra).unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut i = 0;
    while deficit > 0 && !order.is_empty() {
        tenths[order[i % order.len()]] += 1;
        deficit -= 1;
        i += 1;
    }

    tenths.into_iter().map(|t| t as f64 / 10.0).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows(value: Value) -> Vec<Row> {
        serde_json::from_value(value).unwrap()
    }

    fn span_rows(span: Duration) -> Vec<Row> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        let end = start + span;
        rows(json!([
            { "date": start.format("%Y-%m-%dT%H:%M:%S").to_string(), "v": 1 },
            { "date": end.format("%Y-%m-%dT%H:%M:%S").to_string(), "v": 1 }
        ]))
    }

    fn unit_for(span: Duration) -> BucketUnit {
        aggregate_timeline(&span_rows(span), "date", &["v"], false).unit
    }

    #[test]
    fn test_unit_thresholds() {
        assert_eq!(unit_for(Duration::hours(23)), BucketUnit::Hour);
        assert_eq!(unit_for(Duration::hours(24)), BucketUnit::Day);
        assert_eq!(unit_for(Duration::hours(25)), BucketUnit::Day);
        assert_eq!(unit_for(Duration::days(13)), BucketUnit::Day);
        assert_eq!(unit_for(Duration::days(15)), BucketUnit::Week);
        assert_eq!(unit_for(Duration::days(100)), BucketUnit::Month);
        assert_eq!(unit_for(Duration::days(400)), BucketUnit::Year);
        assert_eq!(unit_for(Duration::days(800)), BucketUnit::Year);
    }

    #[test]
    fn test_unit_is_monotonic_in_span() {
        let mut previous = BucketUnit::Hour;
        for hours in (0..24 * 900).step_by(37) {
            let unit = BucketUnit::for_span(Duration::hours(hours));
            assert!(unit >= previous, "unit went from {:?} to {:?} at {}h", previous, unit, hours);
            previous = unit;
        }
    }

    #[test]
    fn test_two_days_bucket_by_day() {
        let data = rows(json!([
            { "date": "2024-01-01", "v": 1 },
            { "date": "2024-01-02", "v": 3 }
        ]));
        let timeline = aggregate_timeline(&data, "date", &["v"], false);

        assert_eq!(timeline.unit, BucketUnit::Day);
        assert_eq!(timeline.labels(), vec!["2024-01-01", "2024-01-02"]);
        assert_eq!(timeline.series(0), vec![1.0, 3.0]);
    }

    #[test]
    fn test_space_separated_datetimes_and_bad_rows() {
        let data = rows(json!([
            { "date": "2024-03-05 14:20:00", "added": 5, "removed": "2" },
            { "date": "2024-03-05 14:50:00", "added": 1 },
            { "date": "not a date", "added": 100 },
            { "added": 100 },
            { "date": "2024-03-05 16:05:00", "added": "x", "removed": 4 }
        ]));
        let timeline = aggregate_timeline(&data, "date", &["added", "removed"], false);

        assert_eq!(timeline.unit, BucketUnit::Hour);
        assert_eq!(timeline.labels(), vec!["2024-03-05 14:00", "2024-03-05 16:00"]);
        assert_eq!(timeline.buckets[0].count, 2);
        assert_eq!(timeline.buckets[0].values, vec![6.0, 2.0]);
        assert_eq!(timeline.buckets[1].values, vec![0.0, 4.0]);
        assert_eq!(timeline.buckets[0].sort_key, "2024-03-05T14:00:00");
    }

    #[test]
    fn test_week_buckets_snap_to_monday() {
        // 2024-01-03 is a Wednesday, 2024-01-28 a Sunday
        let data = rows(json!([
            { "date": "2024-01-03", "v": 2 },
            { "date": "2024-01-07", "v": 3 },
            { "date": "2024-01-28", "v": 4 }
        ]));
        let timeline = aggregate_timeline(&data, "date", &["v"], false);

        assert_eq!(timeline.unit, BucketUnit::Week);
        assert_eq!(timeline.labels(), vec!["Week of 2024-01-01", "Week of 2024-01-22"]);
        assert_eq!(timeline.series(0), vec![5.0, 4.0]);
    }

    #[test]
    fn test_buckets_follow_chronology_not_input_order() {
        let data = rows(json!([
            { "date": "2024-11-20", "v": 1 },
            { "date": "2024-02-10", "v": 1 },
            { "date": "2024-09-01", "v": 1 }
        ]));
        let timeline = aggregate_timeline(&data, "date", &["v"], false);

        assert_eq!(timeline.unit, BucketUnit::Month);
        assert_eq!(timeline.labels(), vec!["2024-02", "2024-09", "2024-11"]);
    }

    #[test]
    fn test_percentage_mode_sums_to_hundred() {
        let data = rows(json!([
            { "date": "2024-01-01", "a": 1, "b": 1, "c": 1 },
            { "date": "2024-01-02", "a": 10, "b": 20, "c": 5 },
            { "date": "2024-01-02", "a": 0, "b": 3, "c": 0 },
            { "date": "2024-01-03", "a": 0, "b": 0, "c": 0 }
        ]));
        let timeline = aggregate_timeline(&data, "date", &["a", "b", "c"], true);

        for bucket in &timeline.buckets {
            let total: f64 = bucket.values.iter().sum();
            if bucket.label == "2024-01-03" {
                assert_eq!(total, 0.0);
            } else {
                assert!((total - 100.0).abs() <= 0.1, "{} sums to {}", bucket.label, total);
            }
        }
        assert_eq!(timeline.buckets[0].values, vec![33.4, 33.3, 33.3]);
    }

    #[test]
    fn test_percentages_already_summing_to_hundred_are_kept() {
        assert_eq!(normalize_to_percent(&[30.0, 70.0]), vec![30.0, 70.0]);
        assert_eq!(normalize_to_percent(&[0.0, 0.0]), vec![0.0, 0.0]);
        assert!(normalize_to_percent(&[]).is_empty());
    }

    #[test]
    fn test_parse_timestamp_forms() {
        let expected = NaiveDate::from_ymd_opt(2024, 5, 6).unwrap().and_hms_opt(7, 8, 0).unwrap();
        assert_eq!(parse_timestamp("2024-05-06 07:08"), Some(expected));
        assert_eq!(parse_timestamp("2024-05-06T07:08:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2024-05-06T09:08:00+02:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-05-06T07:08:00.000"), Some(expected));
        assert!(parse_timestamp("2024-05-06").is_some());
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("06/05/2024"), None);
    }
}
