//! Monthly calendar grid.
//!
//! Weeks start on Sunday. The grid covers the whole requested month plus the
//! days of the neighbouring months needed to fill the first and last week.

use super::{Task, TaskDomainError, TaskSort, TaskStatus};
use chrono::{Datelike, Days, NaiveDate};
use std::collections::BTreeMap;

const DAYS_PER_WEEK: usize = 7;

/// A validated calendar month with its visible date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarMonth {
    year: i32,
    month: u32,
    first_day: NaiveDate,
    last_day: NaiveDate,
    grid_start: NaiveDate,
    grid_end: NaiveDate,
}

impl CalendarMonth {
    /// Creates a calendar month.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidCalendarMonth`] when `month` is not in
    /// `1..=12` or the visible range falls outside the representable dates.
    pub fn new(year: i32, month: u32) -> Result<Self, TaskDomainError> {
        let invalid = || TaskDomainError::InvalidCalendarMonth { year, month };
        let first_day = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
        let last_day = first_day
            .iter_days()
            .take_while(|day| day.month() == month)
            .last()
            .unwrap_or(first_day);
        let leading = u64::from(first_day.weekday().num_days_from_sunday());
        let trailing = 6 - u64::from(last_day.weekday().num_days_from_sunday());
        let grid_start = first_day
            .checked_sub_days(Days::new(leading))
            .ok_or_else(invalid)?;
        let grid_end = last_day
            .checked_add_days(Days::new(trailing))
            .ok_or_else(invalid)?;

        Ok(Self {
            year,
            month,
            first_day,
            last_day,
            grid_start,
            grid_end,
        })
    }

    /// Returns the month containing `date`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidCalendarMonth`] when the month's
    /// visible range is not representable.
    pub fn containing(date: NaiveDate) -> Result<Self, TaskDomainError> {
        Self::new(date.year(), date.month())
    }

    /// Returns the year.
    #[must_use]
    pub const fn year(self) -> i32 {
        self.year
    }

    /// Returns the month number, `1` being January.
    #[must_use]
    pub const fn month(self) -> u32 {
        self.month
    }

    /// Returns the first day of the month.
    #[must_use]
    pub const fn first_day(self) -> NaiveDate {
        self.first_day
    }

    /// Returns the last day of the month.
    #[must_use]
    pub const fn last_day(self) -> NaiveDate {
        self.last_day
    }

    /// Returns the first and last date shown on the grid, inclusive.
    #[must_use]
    pub const fn visible_range(self) -> (NaiveDate, NaiveDate) {
        (self.grid_start, self.grid_end)
    }

    /// Returns the month before this one, stepping back from its first day.
    #[must_use]
    pub fn previous(self) -> Option<Self> {
        self.first_day
            .pred_opt()
            .and_then(|day| Self::containing(day).ok())
    }

    /// Returns the month after this one, stepping forward from its last day.
    #[must_use]
    pub fn next(self) -> Option<Self> {
        self.last_day
            .succ_opt()
            .and_then(|day| Self::containing(day).ok())
    }
}

/// One date cell of the calendar grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarDay {
    date: NaiveDate,
    in_month: bool,
    is_today: bool,
    tasks: Vec<Task>,
}

impl CalendarDay {
    /// Returns the cell date.
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    /// Returns whether the date belongs to the requested month.
    #[must_use]
    pub const fn in_month(&self) -> bool {
        self.in_month
    }

    /// Returns whether the date is the current date.
    #[must_use]
    pub const fn is_today(&self) -> bool {
        self.is_today
    }

    /// Returns the pending tasks due on this date.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }
}

/// Seven consecutive days starting on a Sunday.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarWeek {
    days: Vec<CalendarDay>,
}

impl CalendarWeek {
    /// Returns the days of the week, Sunday first.
    #[must_use]
    pub fn days(&self) -> &[CalendarDay] {
        &self.days
    }
}

/// Week-major grid for one month with navigation to its neighbours.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthCalendar {
    month: CalendarMonth,
    weeks: Vec<CalendarWeek>,
    previous: Option<CalendarMonth>,
    next: Option<CalendarMonth>,
}

impl MonthCalendar {
    /// Builds the grid for `month`, placing each pending task on its due date.
    ///
    /// Tasks that are not pending or fall outside the visible range are
    /// ignored.
    #[must_use]
    pub fn build(
        month: CalendarMonth,
        tasks: impl IntoIterator<Item = Task>,
        today: NaiveDate,
    ) -> Self {
        let (start, end) = month.visible_range();
        let mut buckets: BTreeMap<NaiveDate, Vec<Task>> = BTreeMap::new();
        for task in tasks {
            let due = task.due_date();
            if task.status() == TaskStatus::Pending && due >= start && due <= end {
                buckets.entry(due).or_default().push(task);
            }
        }

        let mut weeks = Vec::new();
        let mut current = Vec::with_capacity(DAYS_PER_WEEK);
        for date in start.iter_days().take_while(|day| *day <= end) {
            let mut day_tasks = buckets.remove(&date).unwrap_or_default();
            day_tasks.sort_by(|left, right| TaskSort::DueDate.compare(left, right));
            let in_month = date.month() == month.month() && date.year() == month.year();
            current.push(CalendarDay {
                date,
                in_month,
                is_today: in_month && date == today,
                tasks: day_tasks,
            });
            if current.len() == DAYS_PER_WEEK {
                weeks.push(CalendarWeek {
                    days: std::mem::replace(&mut current, Vec::with_capacity(DAYS_PER_WEEK)),
                });
            }
        }

        Self {
            month,
            weeks,
            previous: month.previous(),
            next: month.next(),
        }
    }

    /// Returns the displayed month.
    #[must_use]
    pub const fn month(&self) -> CalendarMonth {
        self.month
    }

    /// Returns the grid rows.
    #[must_use]
    pub fn weeks(&self) -> &[CalendarWeek] {
        &self.weeks
    }

    /// Returns the preceding month, if representable.
    #[must_use]
    pub const fn previous(&self) -> Option<CalendarMonth> {
        self.previous
    }

    /// Returns the following month, if representable.
    #[must_use]
    pub const fn next(&self) -> Option<CalendarMonth> {
        self.next
    }

    /// Iterates every cell in week-major order.
    pub fn days(&self) -> impl Iterator<Item = &CalendarDay> {
        self.weeks.iter().flat_map(|week| week.days.iter())
    }
}
