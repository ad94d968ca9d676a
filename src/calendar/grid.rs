use chrono::{Datelike, NaiveDate};

/// The currently displayed month, kept at day 1 of that month.
///
/// Month navigation constructs fresh dates rather than mutating in place, so
/// Dec -> Jan and Jan -> Dec rollover fall out of the year arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarCursor {
    month: NaiveDate,
}

impl CalendarCursor {
    /// Create a cursor for the month containing `day`.
    pub fn containing(day: NaiveDate) -> Self {
        Self {
            month: day.with_day(1).unwrap_or(day),
        }
    }

    /// First day of the displayed month.
    pub fn month_start(&self) -> NaiveDate {
        self.month
    }

    pub fn year(&self) -> i32 {
        self.month.year()
    }

    pub fn month_number(&self) -> u32 {
        self.month.month()
    }

    /// Cursor for the previous month.
    pub fn prev_month(&self) -> Self {
        let (year, month) = if self.month.month() == 1 {
            (self.month.year() - 1, 12)
        } else {
            (self.month.year(), self.month.month() - 1)
        };
        Self {
            month: NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(self.month),
        }
    }

    /// Cursor for the next month.
    pub fn next_month(&self) -> Self {
        let (year, month) = if self.month.month() == 12 {
            (self.month.year() + 1, 1)
        } else {
            (self.month.year(), self.month.month() + 1)
        };
        Self {
            month: NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(self.month),
        }
    }
}

/// Number of days in the month containing `day`.
///
/// Computed as the distance from day 1 to day 1 of the following month.
pub fn days_in_month(day: NaiveDate) -> u32 {
    let first = day.with_day(1).unwrap_or(day);
    let next = CalendarCursor::containing(first).next_month().month_start();
    (next - first).num_days() as u32
}

/// Derive the ordered cell sequence for the month view containing `day`.
///
/// Leading `None` cells pad the row so day 1 lands on its weekday column
/// (0 = Sunday), followed by one `Some(date)` per day of the month. The
/// result has exactly `weekday_index_of_day_1 + days_in_month` entries.
pub fn month_grid(day: NaiveDate) -> Vec<Option<NaiveDate>> {
    let first = day.with_day(1).unwrap_or(day);
    let lead = first.weekday().num_days_from_sunday() as usize;
    let count = days_in_month(first);

    let mut cells: Vec<Option<NaiveDate>> = vec![None; lead];
    cells.reserve(count as usize);
    cells.extend((1..=count).map(|d| NaiveDate::from_ymd_opt(first.year(), first.month(), d)));
    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
    }

    #[test]
    fn test_september_2025_grid() {
        // 2025-09-01 is a Monday: one leading blank, 30 day cells.
        let grid = month_grid(date(2025, 9, 15));

        assert_eq!(grid.len(), 31);
        assert_eq!(grid[0], None);
        assert_eq!(grid[1], Some(date(2025, 9, 1)));
        assert_eq!(grid[30], Some(date(2025, 9, 30)));
    }

    #[rstest]
    #[case(date(2025, 1, 1), 31)]
    #[case(date(2025, 2, 10), 28)]
    #[case(date(2024, 2, 29), 29)] // leap year
    #[case(date(2025, 4, 30), 30)]
    #[case(date(2025, 12, 25), 31)]
    fn test_days_in_month(#[case] day: NaiveDate, #[case] expected: u32) {
        assert_eq!(days_in_month(day), expected);
    }

    #[test]
    fn test_grid_shape_for_all_months() {
        for year in [2023, 2024, 2025, 2026] {
            for month in 1..=12 {
                let first = date(year, month, 1);
                let grid = month_grid(first);
                let lead = first.weekday().num_days_from_sunday() as usize;

                assert_eq!(grid.len(), lead + days_in_month(first) as usize);
                assert!(grid[..lead].iter().all(Option::is_none));

                // Concrete dates increase by exactly one day with no gaps.
                let days: Vec<NaiveDate> = grid[lead..].iter().map(|c| c.expect("day cell")).collect();
                assert_eq!(days[0], first);
                for pair in days.windows(2) {
                    assert_eq!(pair[1] - pair[0], chrono::Duration::days(1));
                }
            }
        }
    }

    #[test]
    fn test_cursor_year_rollover() {
        let dec = CalendarCursor::containing(date(2025, 12, 31));
        assert_eq!(dec.next_month().month_start(), date(2026, 1, 1));

        let jan = CalendarCursor::containing(date(2026, 1, 5));
        assert_eq!(jan.prev_month().month_start(), date(2025, 12, 1));
    }

    #[test]
    fn test_cursor_round_trip() {
        let cursor = CalendarCursor::containing(date(2025, 6, 17));
        assert_eq!(cursor.next_month().prev_month(), cursor);
        assert_eq!(cursor.month_start(), date(2025, 6, 1));
    }
}
