//! Calendar arithmetic shared by the accrual rules

use chrono::{Datelike, Days, NaiveDate};

/// Elapsed time between issue and a reference date, in calendar terms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthSpan {
    /// Whole calendar months (year*12 + month difference, day ignored)
    pub months: i32,
    /// Reference day-of-month has reached the issue day-of-month
    pub day_passed: bool,
}

impl MonthSpan {
    /// Months counted with the current month included once its day has come
    pub fn months_with_current(&self) -> i32 {
        self.months + i32::from(self.day_passed)
    }
}

pub fn elapsed(issued: NaiveDate, today: NaiveDate) -> MonthSpan {
    MonthSpan {
        months: months_between(issued.year(), issued.month(), today.year(), today.month()),
        day_passed: today.day() >= issued.day(),
    }
}

/// Month index difference `(to - from)` in year*12 + month arithmetic
pub fn months_between(from_year: i32, from_month: u32, to_year: i32, to_month: u32) -> i32 {
    (to_year - from_year) * 12 + (to_month as i32 - from_month as i32)
}

/// Date for `(year, month, day)` where a day past the end of the month rolls
/// into the next month: (2024, 4, 31) is 2024-05-01, (2023, 2, 30) is
/// 2023-03-02. `None` only for a month outside 1-12.
pub fn rolled_date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)?
        .checked_add_days(Days::new(u64::from(day.saturating_sub(1))))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_elapsed() {
        let span = elapsed(date(2024, 1, 15), date(2024, 4, 20));
        assert_eq!(span, MonthSpan { months: 3, day_passed: true });
        assert_eq!(span.months_with_current(), 4);

        let span = elapsed(date(2023, 11, 30), date(2024, 2, 1));
        assert_eq!(span, MonthSpan { months: 3, day_passed: false });
        assert_eq!(span.months_with_current(), 3);
    }

    #[test]
    fn test_months_between_ignores_days() {
        assert_eq!(months_between(2024, 1, 2024, 1), 0);
        assert_eq!(months_between(2023, 12, 2024, 1), 1);
        assert_eq!(months_between(2024, 5, 2024, 2), -3);
        assert_eq!(months_between(2022, 6, 2024, 6), 24);
    }

    #[test]
    fn test_rolled_date() {
        assert_eq!(rolled_date(2024, 4, 15), Some(date(2024, 4, 15)));
        assert_eq!(rolled_date(2024, 4, 31), Some(date(2024, 5, 1)));
        assert_eq!(rolled_date(2023, 2, 30), Some(date(2023, 3, 2)));
        assert_eq!(rolled_date(2024, 2, 29), Some(date(2024, 2, 29)));
        assert_eq!(rolled_date(2024, 12, 31), Some(date(2024, 12, 31)));
        assert_eq!(rolled_date(2024, 13, 1), None);
        assert_eq!(rolled_date(2024, 0, 1), None);
    }
}
