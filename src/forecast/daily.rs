use chrono::{DateTime, FixedOffset, NaiveDate};
use indexmap::IndexMap;

use crate::weather::{Condition, ForecastItem};

/// Number of day buckets surfaced to the forecast card
pub const FORECAST_DAYS: usize = 5;

/// Forecast samples that fall on one local calendar date
#[derive(Debug, Clone)]
pub struct DailyForecast<'a> {
    pub date: NaiveDate,
    /// Samples in arrival order, never empty
    pub items: Vec<&'a ForecastItem>,
}

impl DailyForecast<'_> {
    /// Highest `temp_max` of the day
    pub fn max_temp(&self) -> f64 {
        self.items
            .iter()
            .map(|i| i.main.temp_max)
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Lowest `temp_min` of the day
    pub fn min_temp(&self) -> f64 {
        self.items
            .iter()
            .map(|i| i.main.temp_min)
            .fold(f64::INFINITY, f64::min)
    }

    /// Mean probability of precipitation, 0..=1
    pub fn precipitation_probability(&self) -> f64 {
        if self.items.is_empty() {
            return 0.0;
        }
        self.items.iter().map(|i| i.pop).sum::<f64>() / self.items.len() as f64
    }

    /// The first sample's condition stands for the whole day
    pub fn condition(&self) -> Option<&Condition> {
        self.items.first().and_then(|i| i.condition())
    }
}

/// Calendar date of a timestamp at the provider's local offset
///
/// Offsets the provider should never send (a day or more) fall back to UTC.
pub fn local_date(timestamp: i64, utc_offset_secs: i32) -> Option<NaiveDate> {
    let offset = FixedOffset::east_opt(utc_offset_secs)
        .or_else(|| FixedOffset::east_opt(0))?;
    DateTime::from_timestamp(timestamp, 0).map(|dt| dt.with_timezone(&offset).date_naive())
}

/// Group forecast samples by local date
///
/// Buckets keep first-seen order (not sorted by date) and samples keep
/// arrival order inside a bucket. Only the first [`FORECAST_DAYS`] dates
/// are returned.
pub fn group_by_day(items: &[ForecastItem], utc_offset_secs: i32) -> Vec<DailyForecast<'_>> {
    let mut buckets: IndexMap<NaiveDate, Vec<&ForecastItem>> = IndexMap::new();

    for item in items {
        match local_date(item.dt, utc_offset_secs) {
            Some(date) => buckets.entry(date).or_default().push(item),
            None => tracing::warn!(dt = item.dt, "Skipping forecast sample with invalid timestamp"),
        }
    }

    buckets
        .into_iter()
        .take(FORECAST_DAYS)
        .map(|(date, items)| DailyForecast { date, items })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weather::models::ForecastReadings;

    const DAY: i64 = 86_400;
    // 2023-11-14T00:00:00Z
    const MIDNIGHT_UTC: i64 = 1_699_920_000;

    fn item(dt: i64, temp_min: f64, temp_max: f64, pop: f64, icon: &str) -> ForecastItem {
        ForecastItem {
            dt,
            main: ForecastReadings {
                temp: (temp_min + temp_max) / 2.0,
                feels_like: temp_min,
                temp_min,
                temp_max,
                humidity: 70,
            },
            pop,
            weather: vec![Condition {
                id: 500,
                main: "Rain".to_string(),
                description: format!("sky {}", icon),
                icon: icon.to_string(),
            }],
        }
    }

    /// 3-hourly samples starting at `start` for `count` steps
    fn series(start: i64, count: usize) -> Vec<ForecastItem> {
        (0..count)
            .map(|n| {
                let t = n as f64;
                item(start + n as i64 * 3 * 3600, t, t + 2.0, (n % 5) as f64 / 10.0, "04d")
            })
            .collect()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn test_local_date_applies_offset() {
        // 23:00 UTC on the 14th is already the 15th in UTC+2
        let ts = MIDNIGHT_UTC + 23 * 3600;
        assert_eq!(local_date(ts, 0), Some(date(2023, 11, 14)));
        assert_eq!(local_date(ts, 7200), Some(date(2023, 11, 15)));
        // and still the 14th in New York
        assert_eq!(local_date(ts, -18000), Some(date(2023, 11, 14)));
    }

    #[test]
    fn test_local_date_invalid_offset_falls_back_to_utc() {
        assert_eq!(local_date(MIDNIGHT_UTC, 90_000), Some(date(2023, 11, 14)));
    }

    #[test]
    fn test_buckets_by_date_preserving_order() {
        let items = vec![
            item(MIDNIGHT_UTC + 3600, 1.0, 3.0, 0.1, "01n"),
            item(MIDNIGHT_UTC + 4 * 3600, 2.0, 5.0, 0.3, "02d"),
            item(MIDNIGHT_UTC + DAY + 3600, 0.0, 1.0, 0.0, "13d"),
        ];

        let days = group_by_day(&items, 0);
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, date(2023, 11, 14));
        assert_eq!(
            days[0].items.iter().map(|i| i.dt).collect::<Vec<_>>(),
            vec![MIDNIGHT_UTC + 3600, MIDNIGHT_UTC + 4 * 3600]
        );
        assert_eq!(days[1].date, date(2023, 11, 15));
        assert_eq!(days[1].items.len(), 1);
    }

    #[test]
    fn test_buckets_keep_first_seen_order_not_sorted() {
        let items = vec![
            item(MIDNIGHT_UTC + 2 * DAY, 0.0, 1.0, 0.0, "01d"),
            item(MIDNIGHT_UTC, 0.0, 1.0, 0.0, "01d"),
            item(MIDNIGHT_UTC + 2 * DAY + 3600, 0.0, 1.0, 0.0, "01d"),
        ];

        let days = group_by_day(&items, 0);
        assert_eq!(days[0].date, date(2023, 11, 16));
        assert_eq!(days[0].items.len(), 2);
        assert_eq!(days[1].date, date(2023, 11, 14));
    }

    #[test]
    fn test_at_most_five_days_surface() {
        // 7 days of 3-hourly samples
        let items = series(MIDNIGHT_UTC, 56);
        let days = group_by_day(&items, 0);

        assert_eq!(days.len(), FORECAST_DAYS);
        assert_eq!(days[0].date, date(2023, 11, 14));
        assert_eq!(days[4].date, date(2023, 11, 18));
        assert!(days.iter().all(|d| d.items.len() == 8));
    }

    #[test]
    fn test_typical_forecast_starting_mid_day_has_partial_first_bucket() {
        // Provider window of 40 samples starting 15:00 local
        let items = series(MIDNIGHT_UTC + 15 * 3600, 40);
        let days = group_by_day(&items, 0);

        assert_eq!(days.len(), FORECAST_DAYS);
        assert_eq!(days[0].items.len(), 3);
        assert!(days.iter().all(|d| !d.items.is_empty()));
    }

    #[test]
    fn test_aggregates_match_bucket_contents() {
        let items = vec![
            item(MIDNIGHT_UTC, 4.0, 9.5, 0.2, "10d"),
            item(MIDNIGHT_UTC + 3 * 3600, -1.5, 12.25, 0.6, "01d"),
            item(MIDNIGHT_UTC + 6 * 3600, 2.0, 7.0, 0.1, "03d"),
        ];

        let days = group_by_day(&items, 0);
        let day = &days[0];

        assert_eq!(day.max_temp(), 12.25);
        assert_eq!(day.min_temp(), -1.5);
        assert!((day.precipitation_probability() - 0.3).abs() < 1e-9);
        assert_eq!(day.condition().map(|c| c.icon.as_str()), Some("10d"));
    }

    #[test]
    fn test_grouping_is_idempotent() {
        let items = series(MIDNIGHT_UTC + 9 * 3600, 40);

        let summarize = |days: Vec<DailyForecast<'_>>| {
            days.into_iter()
                .map(|d| (d.date, d.items.iter().map(|i| i.dt).collect::<Vec<_>>()))
                .collect::<Vec<_>>()
        };

        let first = summarize(group_by_day(&items, 3600));
        let second = summarize(group_by_day(&items, 3600));
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_input_yields_no_buckets() {
        assert!(group_by_day(&[], 0).is_empty());
    }
}
