use chrono::{DateTime, Datelike, NaiveDate, Utc};
use chrono_tz::Tz;

/// Converts a UTC instant to the calendar date observed in `tz`.
///
/// Budgets and dashboard periods are evaluated against this date so that a
/// user's "this month" follows their own timezone.
pub fn local_date_from_utc(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

/// Today's date in the given timezone.
pub fn today_in(tz: Tz) -> NaiveDate {
    local_date_from_utc(Utc::now(), tz)
}

/// First and last day of the month containing `date`.
pub fn month_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = first_of_month(date);
    let end = next_month(start).pred_opt().unwrap_or(start);
    (start, end)
}

/// January 1st and December 31st of the year containing `date`.
pub fn year_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date);
    let end = NaiveDate::from_ymd_opt(date.year(), 12, 31).unwrap_or(date);
    (start, end)
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// First day of the month following the month of `date`.
pub fn next_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(date)
}

/// First day of the month `months` months before the month of `reference`.
pub fn first_day_months_ago(reference: NaiveDate, months: u32) -> NaiveDate {
    let mut year = reference.year();
    let mut month = reference.month() as i32 - months as i32;
    while month <= 0 {
        month += 12;
        year -= 1;
    }
    NaiveDate::from_ymd_opt(year, month as u32, 1).unwrap_or(reference)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn month_bounds_handles_leap_february() {
        assert_eq!(month_bounds(d(2024, 2, 10)), (d(2024, 2, 1), d(2024, 2, 29)));
        assert_eq!(month_bounds(d(2023, 2, 10)), (d(2023, 2, 1), d(2023, 2, 28)));
        assert_eq!(month_bounds(d(2023, 12, 31)), (d(2023, 12, 1), d(2023, 12, 31)));
    }

    #[test]
    fn year_bounds_cover_whole_year() {
        assert_eq!(year_bounds(d(2025, 6, 15)), (d(2025, 1, 1), d(2025, 12, 31)));
    }

    #[test]
    fn first_day_months_ago_wraps_years() {
        assert_eq!(first_day_months_ago(d(2025, 3, 18), 0), d(2025, 3, 1));
        assert_eq!(first_day_months_ago(d(2025, 3, 18), 5), d(2024, 10, 1));
        assert_eq!(first_day_months_ago(d(2025, 1, 2), 13), d(2023, 12, 1));
    }

    #[test]
    fn local_date_respects_timezone() {
        let instant = DateTime::parse_from_rfc3339("2025-01-01T02:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(local_date_from_utc(instant, chrono_tz::UTC), d(2025, 1, 1));
        assert_eq!(
            local_date_from_utc(instant, chrono_tz::America::New_York),
            d(2024, 12, 31)
        );
    }
}
