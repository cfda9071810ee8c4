//! Month and day arithmetic plus the Monday-first month grid the calendar
//! screen renders.

use std::collections::HashSet;

use chrono::{Datelike, Days, NaiveDate};

use crate::models::Workout;

/// A calendar month. `month` is always within `1..=12`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    /// `None` unless `month` is within `1..=12`.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    /// The month containing `date`.
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The month before this one. January steps back to December of the
    /// previous year.
    pub fn prev(self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// The month after this one. December rolls over into January.
    pub fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// The first of the month. `None` only outside chrono's date range.
    pub fn first_day(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    /// The date for `day` in this month, if such a day exists.
    pub fn day(self, day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, day)
    }

    /// Number of days in the month, leap years included.
    pub fn days_in_month(self) -> u32 {
        let next = self.next();
        match (self.first_day(), next.first_day()) {
            (Some(first), Some(following)) => (following - first).num_days() as u32,
            _ => 0,
        }
    }

    /// English month name followed by the year, e.g. `June 2025`.
    pub fn title(self) -> String {
        self.first_day()
            .map(|date| date.format("%B %Y").to_string())
            .unwrap_or_else(|| format!("{}-{:02}", self.year, self.month))
    }
}

/// The day before `date`, crossing month and year boundaries.
pub fn prev_day(date: NaiveDate) -> Option<NaiveDate> {
    date.checked_sub_days(Days::new(1))
}

/// The day after `date`, crossing month and year boundaries.
pub fn next_day(date: NaiveDate) -> Option<NaiveDate> {
    date.checked_add_days(Days::new(1))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCell {
    pub day: u32,
    pub has_activity: bool,
}

/// One Monday-to-Sunday row. Padding slots before the first or after the last
/// day of the month are `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekRow {
    pub iso_week: u32,
    pub days: [Option<DayCell>; 7],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    pub month: YearMonth,
    pub weeks: Vec<WeekRow>,
}

impl MonthGrid {
    /// Lay out `month` in Monday-first rows, marking every day that has at
    /// least one workout in `workouts`.
    pub fn build(month: YearMonth, workouts: &[Workout]) -> Self {
        let active = active_days(month, workouts);
        let Some(first) = month.first_day() else {
            return Self {
                month,
                weeks: Vec::new(),
            };
        };

        let lead = first.weekday().num_days_from_monday() as usize;
        let total = month.days_in_month();
        let mut weeks = Vec::new();
        let mut slot = lead;
        let mut row: [Option<DayCell>; 7] = [None; 7];
        let mut row_first: Option<u32> = None;

        for day in 1..=total {
            row[slot] = Some(DayCell {
                day,
                has_activity: active.contains(&day),
            });
            row_first.get_or_insert(day);
            slot += 1;
            if slot == 7 {
                weeks.push(Self::finish_row(month, row, row_first));
                row = [None; 7];
                row_first = None;
                slot = 0;
            }
        }
        if row_first.is_some() {
            weeks.push(Self::finish_row(month, row, row_first));
        }

        Self { month, weeks }
    }

    fn finish_row(month: YearMonth, days: [Option<DayCell>; 7], first: Option<u32>) -> WeekRow {
        let iso_week = first
            .and_then(|day| month.day(day))
            .map(|date| date.iso_week().week())
            .unwrap_or_default();
        WeekRow { iso_week, days }
    }

    pub fn cells(&self) -> impl Iterator<Item = &DayCell> {
        self.weeks.iter().flat_map(|week| week.days.iter().flatten())
    }

    /// Days carrying a workout marker, in ascending order.
    pub fn active_days(&self) -> Vec<u32> {
        self.cells()
            .filter(|cell| cell.has_activity)
            .map(|cell| cell.day)
            .collect()
    }
}

/// Days of `month` that appear in the workout list. Recomputed from the full
/// list on every render.
pub fn active_days(month: YearMonth, workouts: &[Workout]) -> HashSet<u32> {
    workouts
        .iter()
        .filter(|workout| YearMonth::of(workout.date) == month)
        .map(|workout| workout.date.day())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn workout(id: i64, on: NaiveDate) -> Workout {
        Workout {
            id,
            date: on,
            name: format!("w{id}"),
        }
    }

    #[test]
    fn month_navigation_wraps_years() {
        let january = YearMonth::new(2025, 1).unwrap();
        assert_eq!(january.prev(), YearMonth::new(2024, 12).unwrap());

        let december = YearMonth::new(2025, 12).unwrap();
        assert_eq!(december.next(), YearMonth::new(2026, 1).unwrap());

        let june = YearMonth::new(2025, 6).unwrap();
        assert_eq!(june.next().prev(), june);
    }

    #[test]
    fn rejects_out_of_range_months() {
        assert!(YearMonth::new(2025, 0).is_none());
        assert!(YearMonth::new(2025, 13).is_none());
    }

    #[test]
    fn days_in_month_handles_leap_years() {
        assert_eq!(YearMonth::new(2024, 2).unwrap().days_in_month(), 29);
        assert_eq!(YearMonth::new(2025, 2).unwrap().days_in_month(), 28);
        assert_eq!(YearMonth::new(2025, 12).unwrap().days_in_month(), 31);
    }

    #[test]
    fn day_steps_cross_month_and_year() {
        assert_eq!(next_day(date(2025, 5, 31)), Some(date(2025, 6, 1)));
        assert_eq!(next_day(date(2025, 12, 31)), Some(date(2026, 1, 1)));
        assert_eq!(prev_day(date(2026, 1, 1)), Some(date(2025, 12, 31)));
        assert_eq!(prev_day(date(2024, 3, 1)), Some(date(2024, 2, 29)));
    }

    #[test]
    fn june_2025_grid_layout() {
        // June 1st 2025 is a Sunday, so the first row holds a single day.
        let grid = MonthGrid::build(YearMonth::new(2025, 6).unwrap(), &[]);
        assert_eq!(grid.weeks.len(), 6);

        let first = &grid.weeks[0];
        assert!(first.days[..6].iter().all(Option::is_none));
        assert_eq!(first.days[6].map(|cell| cell.day), Some(1));
        assert_eq!(first.iso_week, 22);

        assert_eq!(grid.weeks[1].days[0].map(|cell| cell.day), Some(2));
        assert_eq!(grid.weeks[1].iso_week, 23);

        let last = grid.weeks.last().unwrap();
        assert_eq!(last.days[0].map(|cell| cell.day), Some(30));
        assert!(last.days[1..].iter().all(Option::is_none));
        assert_eq!(grid.cells().count(), 30);
    }

    #[test]
    fn first_row_of_january_can_belong_to_previous_iso_year() {
        // 2021-01-01 is a Friday in ISO week 53 of 2020.
        let grid = MonthGrid::build(YearMonth::new(2021, 1).unwrap(), &[]);
        assert_eq!(grid.weeks[0].iso_week, 53);
        assert_eq!(grid.weeks[1].iso_week, 1);
    }

    #[test]
    fn marks_only_days_in_displayed_month() {
        let workouts = vec![
            workout(1, date(2025, 6, 3)),
            workout(2, date(2025, 6, 17)),
            workout(3, date(2025, 6, 17)),
            workout(4, date(2024, 5, 3)),
        ];

        let june = MonthGrid::build(YearMonth::new(2025, 6).unwrap(), &workouts);
        assert_eq!(june.active_days(), vec![3, 17]);

        let may = MonthGrid::build(YearMonth::new(2025, 5).unwrap(), &workouts);
        assert!(may.active_days().is_empty());
    }

    #[test]
    fn title_names_month_and_year() {
        assert_eq!(YearMonth::new(2025, 6).unwrap().title(), "June 2025");
    }
}
