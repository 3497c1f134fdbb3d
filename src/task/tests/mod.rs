//! Unit tests for the task module.


use crate::task::domain::{
    CategoryId, Priority, Task, TaskDescription, TaskFields, TaskStatus, TaskTitle,
};
use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use mockable::Clock;

/// Clock pinned to noon of a fixed local date.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FixedClock {
    now: DateTime<Local>,
}

impl FixedClock {
    pub(crate) fn on(date: NaiveDate) -> Self {
        let noon = date.and_hms_opt(12, 0, 0).expect("noon is a valid time");
        let now = Local
            .from_local_datetime(&noon)
            .earliest()
            .expect("noon exists in the local time zone");
        Self { now }
    }
}

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.now
    }

    fn utc(&self) -> DateTime<Utc> {
        self.now.with_timezone(&Utc)
    }
}

pub(crate) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
}

pub(crate) fn task_with(
    title: &str,
    due_date: NaiveDate,
    priority: Priority,
    status: TaskStatus,
    category_id: CategoryId,
    clock: &impl Clock,
) -> Task {
    let fields = TaskFields {
        title: TaskTitle::new(title).expect("valid title"),
        description: TaskDescription::new(format!("{title} details")).expect("valid description"),
        due_date,
        priority,
        category_id,
    };
    let mut task = Task::new(fields, clock);
    task.set_status(status, clock);
    task
}

pub(crate) fn pending_with(
    title: &str,
    due_date: NaiveDate,
    priority: Priority,
    category_id: CategoryId,
    clock: &impl Clock,
) -> Task {
    task_with(
        title,
        due_date,
        priority,
        TaskStatus::Pending,
        category_id,
        clock,
    )
}
