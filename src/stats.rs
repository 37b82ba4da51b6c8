//! Reporting windows and rating arithmetic shared by analytics and reports.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// `?period=` window on `created_at`. Unknown values mean all time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Period {
    Day,
    Week,
    Month,
    #[default]
    All,
}

impl Period {
    pub fn parse(s: Option<&str>) -> Self {
        match s.map(str::trim) {
            Some("1d") => Period::Day,
            Some("7d") => Period::Week,
            Some("30d") => Period::Month,
            _ => Period::All,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Day => "1d",
            Period::Week => "7d",
            Period::Month => "30d",
            Period::All => "all",
        }
    }

    /// Earliest `created_at` inside the window, `None` for all time.
    pub fn cutoff(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Period::Day => Some(now - Duration::days(1)),
            Period::Week => Some(now - Duration::days(7)),
            Period::Month => Some(now - Duration::days(30)),
            Period::All => None,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct PeriodQuery {
    pub period: Option<String>,
}

impl PeriodQuery {
    pub fn period(&self) -> Period {
        Period::parse(self.period.as_deref())
    }
}

/// Round half away from zero to one decimal place.
pub fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
pub struct RatingBucket {
    pub rating: i32,
    pub count: i64,
    pub percentage: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RatingSummary {
    pub average_rating: f64,
    pub total_reviews: i64,
    /// Always five buckets, 1 through 5.
    pub distribution: Vec<RatingBucket>,
}

/// Summarise `(rating, count)` pairs. Ratings outside 1..=5 are ignored.
pub fn rating_summary(counts: &[(i32, i64)]) -> RatingSummary {
    let valid = || counts.iter().filter(|(r, _)| (1..=5).contains(r));
    let total: i64 = valid().map(|(_, c)| c).sum();
    let points: i64 = valid().map(|(r, c)| *r as i64 * c).sum();
    let distribution = (1..=5)
        .map(|rating| {
            let count: i64 = valid().filter(|(r, _)| *r == rating).map(|(_, c)| c).sum();
            let percentage = if total > 0 {
                round1(count as f64 * 100.0 / total as f64)
            } else {
                0.0
            };
            RatingBucket {
                rating,
                count,
                percentage,
            }
        })
        .collect();
    RatingSummary {
        average_rating: if total > 0 {
            round1(points as f64 / total as f64)
        } else {
            0.0
        },
        total_reviews: total,
        distribution,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parses_known_windows_only() {
        assert_eq!(Period::parse(Some("1d")), Period::Day);
        assert_eq!(Period::parse(Some("7d")), Period::Week);
        assert_eq!(Period::parse(Some("30d")), Period::Month);
        assert_eq!(Period::parse(Some("90d")), Period::All);
        assert_eq!(Period::parse(None), Period::All);
    }

    #[test]
    fn cutoffs() {
        let now = Utc.with_ymd_and_hms(2024, 3, 31, 12, 0, 0).unwrap();
        assert_eq!(Period::Day.cutoff(now), Some(Utc.with_ymd_and_hms(2024, 3, 30, 12, 0, 0).unwrap()));
        assert_eq!(Period::Month.cutoff(now), Some(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()));
        assert_eq!(Period::All.cutoff(now), None);
    }

    #[test]
    fn summary_rounds_to_one_decimal() {
        let s = rating_summary(&[(5, 2), (4, 1)]);
        assert_eq!(s.total_reviews, 3);
        assert_eq!(s.average_rating, 4.7);
        assert_eq!(s.distribution.len(), 5);
        assert_eq!(s.distribution[4], RatingBucket { rating: 5, count: 2, percentage: 66.7 });
        assert_eq!(s.distribution[3].percentage, 33.3);
        assert_eq!(s.distribution[0].count, 0);
    }

    #[test]
    fn empty_summary_is_zero() {
        let s = rating_summary(&[]);
        assert_eq!(s.average_rating, 0.0);
        assert_eq!(s.total_reviews, 0);
        assert!(s.distribution.iter().all(|b| b.count == 0 && b.percentage == 0.0));
    }
}
