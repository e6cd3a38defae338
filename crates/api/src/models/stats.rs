//! Dashboard statistics.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::Serialize;

/// Number of months reported in [`DashboardStats::monthly_registrations`].
pub const REGISTRATION_MONTHS: u32 = 6;

/// Label used for startups that have not set a sector.
pub const UNSPECIFIED_SECTOR: &str = "Unspecified";

/// Aggregated numbers for the admin dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub startups: StartupCounts,
    pub startups_by_sector: Vec<SectorCount>,
    pub monthly_registrations: Vec<MonthlyCount>,
    pub events: EventCounts,
    pub announcements: i64,
    pub upcoming_meetings: i64,
    pub generated_at: DateTime<Utc>,
}

/// Startups per review status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct StartupCounts {
    pub total: i64,
    pub pending: i64,
    pub approved: i64,
    pub rejected: i64,
}

/// Startups in one sector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct SectorCount {
    pub sector: String,
    pub count: i64,
}

/// Registrations in one calendar month (`YYYY-MM`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct MonthlyCount {
    pub month: String,
    pub count: i64,
}

/// Total and upcoming events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct EventCounts {
    pub total: i64,
    pub upcoming: i64,
}

/// Format a month as `YYYY-MM`.
#[must_use]
pub fn month_label(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

/// Build a gap-free series of `months` consecutive months ending with the
/// month containing `today`, taking counts from `rows` and reporting 0 for
/// months that have none. Rows outside the window are ignored.
#[must_use]
pub fn fill_monthly_series(rows: &[MonthlyCount], today: NaiveDate, months: u32) -> Vec<MonthlyCount> {
    let counts: HashMap<&str, i64> = rows.iter().map(|r| (r.month.as_str(), r.count)).collect();

    let end = i64::from(today.year()) * 12 + i64::from(today.month0());
    let start = end - i64::from(months) + 1;

    (start..=end)
        .map(|index| {
            let month = format!("{:04}-{:02}", index.div_euclid(12), index.rem_euclid(12) + 1);
            let count = counts.get(month.as_str()).copied().unwrap_or(0);
            MonthlyCount { month, count }
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn row(month: &str, count: i64) -> MonthlyCount {
        MonthlyCount {
            month: month.to_string(),
            count,
        }
    }

    #[test]
    fn test_month_label_pads() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 9).unwrap();
        assert_eq!(month_label(date), "2026-03");
    }

    #[test]
    fn test_fill_monthly_series_fills_gaps_with_zero() {
        let today = NaiveDate::from_ymd_opt(2026, 6, 15).unwrap();
        let series = fill_monthly_series(&[row("2026-02", 4), row("2026-06", 1)], today, 6);

        let months: Vec<&str> = series.iter().map(|m| m.month.as_str()).collect();
        assert_eq!(
            months,
            ["2026-01", "2026-02", "2026-03", "2026-04", "2026-05", "2026-06"]
        );
        let counts: Vec<i64> = series.iter().map(|m| m.count).collect();
        assert_eq!(counts, [0, 4, 0, 0, 0, 1]);
    }

    #[test]
    fn test_fill_monthly_series_crosses_year_boundary() {
        let today = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
        let series = fill_monthly_series(&[row("2025-11", 2)], today, 6);

        assert_eq!(series.first().unwrap().month, "2025-09");
        assert_eq!(series.last().unwrap().month, "2026-02");
        assert_eq!(series.get(2).unwrap(), &row("2025-11", 2));
    }

    #[test]
    fn test_fill_monthly_series_ignores_rows_outside_window() {
        let today = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();
        let series = fill_monthly_series(&[row("2024-01", 9)], today, REGISTRATION_MONTHS);

        assert_eq!(series.len(), 6);
        assert!(series.iter().all(|m| m.count == 0));
    }
}
