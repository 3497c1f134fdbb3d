//! Task aggregate root and related task lifecycle types.

use super::{
    CategoryId, ParsePriorityError, ParseTaskStatusError, TaskDescription, TaskId, TaskTitle,
};
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use std::fmt;

/// Task status, which also selects the list partition a task appears in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TaskStatus {
    /// Task is still to be done.
    #[default]
    Pending,
    /// Task has been completed.
    Completed,
    /// Task has been put off.
    Postponed,
}

impl TaskStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pendente",
            Self::Completed => "concluído",
            Self::Postponed => "adiado",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_lowercase();
        match normalized.as_str() {
            "pendente" => Ok(Self::Pending),
            "concluído" => Ok(Self::Completed),
            "adiado" => Ok(Self::Postponed),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

/// Task priority.
///
/// The storage representation is also the lexical tie-break used by the
/// date-ordered list, so `alta < baixa < média` there, while the priority
/// ordered list uses [`Priority::rank`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Priority {
    /// Most urgent.
    High,
    /// Normal urgency.
    #[default]
    Medium,
    /// Least urgent.
    Low,
}

impl Priority {
    /// All priorities in rank order.
    pub const ALL: [Self; 3] = [Self::High, Self::Medium, Self::Low];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "alta",
            Self::Medium => "média",
            Self::Low => "baixa",
        }
    }

    /// Returns the severity rank, `1` being the most urgent.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::High => 1,
            Self::Medium => 2,
            Self::Low => 3,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Priority {
    type Error = ParsePriorityError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_lowercase();
        match normalized.as_str() {
            "alta" => Ok(Self::High),
            "média" => Ok(Self::Medium),
            "baixa" => Ok(Self::Low),
            _ => Err(ParsePriorityError(value.to_owned())),
        }
    }
}

/// Validated user-editable task fields.
///
/// Produced by the task form and applied on both creation and edit. Status is
/// deliberately absent: it only changes through lifecycle transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskFields {
    /// Task title.
    pub title: TaskTitle,
    /// Task description.
    pub description: TaskDescription,
    /// Due date.
    pub due_date: NaiveDate,
    /// Priority.
    pub priority: Priority,
    /// Owning category.
    pub category_id: CategoryId,
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    id: TaskId,
    title: TaskTitle,
    description: TaskDescription,
    due_date: NaiveDate,
    priority: Priority,
    status: TaskStatus,
    category_id: CategoryId,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted editable fields.
    pub fields: TaskFields,
    /// Persisted status.
    pub status: TaskStatus,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new pending task.
    #[must_use]
    pub fn new(fields: TaskFields, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        let TaskFields {
            title,
            description,
            due_date,
            priority,
            category_id,
        } = fields;

        Self {
            id: TaskId::new(),
            title,
            description,
            due_date,
            priority,
            status: TaskStatus::Pending,
            category_id,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        let PersistedTaskData {
            id,
            fields,
            status,
            created_at,
            updated_at,
        } = data;

        Self {
            id,
            title: fields.title,
            description: fields.description,
            due_date: fields.due_date,
            priority: fields.priority,
            status,
            category_id: fields.category_id,
            created_at,
            updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the task title.
    #[must_use]
    pub const fn title(&self) -> &TaskTitle {
        &self.title
    }

    /// Returns the task description.
    #[must_use]
    pub const fn description(&self) -> &TaskDescription {
        &self.description
    }

    /// Returns the due date.
    #[must_use]
    pub const fn due_date(&self) -> NaiveDate {
        self.due_date
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Returns the status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the owning category identifier.
    #[must_use]
    pub const fn category_id(&self) -> CategoryId {
        self.category_id
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the editable fields as a form-ready value.
    #[must_use]
    pub fn fields(&self) -> TaskFields {
        TaskFields {
            title: self.title.clone(),
            description: self.description.clone(),
            due_date: self.due_date,
            priority: self.priority,
            category_id: self.category_id,
        }
    }

    /// Returns whether a pending task is due before `today`.
    #[must_use]
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status == TaskStatus::Pending && self.due_date < today
    }

    /// Overwrites every editable field, leaving the status untouched.
    pub fn apply_edit(&mut self, fields: TaskFields, clock: &impl Clock) {
        let TaskFields {
            title,
            description,
            due_date,
            priority,
            category_id,
        } = fields;
        self.title = title;
        self.description = description;
        self.due_date = due_date;
        self.priority = priority;
        self.category_id = category_id;
        self.touch(clock);
    }

    /// Moves the task to `status`.
    ///
    /// Setting the current status again is allowed and only refreshes the
    /// modification timestamp.
    pub fn set_status(&mut self, status: TaskStatus, clock: &impl Clock) {
        self.status = status;
        self.touch(clock);
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
