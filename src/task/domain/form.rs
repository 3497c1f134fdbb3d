//! Form validation for task and category input.
//!
//! Raw form submissions arrive as strings. Validation converts them into
//! domain values and collects every failure against the field that caused
//! it, so a form can be re-rendered with inline messages.

use super::{
    Category, CategoryId, CategoryName, Priority, Task, TaskDescription, TaskDomainError,
    TaskFields, TaskTitle,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Input fields exposed by the task and category forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FormField {
    /// Task title.
    Title,
    /// Task description.
    Description,
    /// Task due date.
    DueDate,
    /// Task priority.
    Priority,
    /// Task category.
    Category,
    /// Category name.
    Name,
}

impl FormField {
    /// Returns the wire name used by the HTML form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Title => "titulo",
            Self::Description => "descricao",
            Self::DueDate => "data",
            Self::Priority => "prioridade",
            Self::Category => "categoria",
            Self::Name => "nome",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field-level validation failures for a single form submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("form has {} invalid field(s)", .errors.len())]
pub struct FormErrors {
    errors: Vec<(FormField, TaskDomainError)>,
}

impl FormErrors {
    /// Records a failure against `field`.
    pub fn push(&mut self, field: FormField, error: TaskDomainError) {
        self.errors.push((field, error));
    }

    /// Returns `true` when no failure was recorded.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the failures recorded against `field`.
    pub fn for_field(&self, field: FormField) -> impl Iterator<Item = &TaskDomainError> {
        self.errors
            .iter()
            .filter(move |(candidate, _)| *candidate == field)
            .map(|(_, error)| error)
    }

    /// Returns messages grouped by wire field name, ready for templates.
    #[must_use]
    pub fn messages(&self) -> BTreeMap<&'static str, Vec<String>> {
        let mut grouped: BTreeMap<&'static str, Vec<String>> = BTreeMap::new();
        for (field, error) in &self.errors {
            grouped
                .entry(field.as_str())
                .or_default()
                .push(error.to_string());
        }
        grouped
    }

    fn capture<T>(&mut self, field: FormField, result: Result<T, TaskDomainError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(error) => {
                self.push(field, error);
                None
            }
        }
    }
}

/// Which validation rules apply to a task form submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    /// New task; due dates before `today` are rejected.
    Create {
        /// Current local date.
        today: NaiveDate,
    },
    /// Existing task; any valid date is accepted.
    Edit,
}

/// Raw task form submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskFormInput {
    /// Raw title.
    #[serde(rename = "titulo", default)]
    pub title: String,
    /// Raw description.
    #[serde(rename = "descricao", default)]
    pub description: String,
    /// Raw due date in `YYYY-MM-DD` form.
    #[serde(rename = "data", default)]
    pub due_date: String,
    /// Raw priority storage value.
    #[serde(rename = "prioridade", default)]
    pub priority: String,
    /// Raw category identifier.
    #[serde(rename = "categoria", default)]
    pub category: String,
}

impl TaskFormInput {
    /// Returns a blank form with the default priority preselected.
    #[must_use]
    pub fn blank() -> Self {
        Self {
            priority: Priority::default().as_str().to_owned(),
            ..Self::default()
        }
    }

    /// Returns a form pre-filled with the current values of `task`.
    #[must_use]
    pub fn from_task(task: &Task) -> Self {
        Self {
            title: task.title().as_str().to_owned(),
            description: task.description().as_str().to_owned(),
            due_date: task.due_date().format("%Y-%m-%d").to_string(),
            priority: task.priority().as_str().to_owned(),
            category: task.category_id().to_string(),
        }
    }

    /// Validates the submission against the known `categories`.
    ///
    /// # Errors
    ///
    /// Returns [`FormErrors`] listing every invalid field.
    pub fn validate(
        &self,
        mode: FormMode,
        categories: &[Category],
    ) -> Result<TaskFields, FormErrors> {
        let mut errors = FormErrors::default();

        let parsed_title = errors.capture(FormField::Title, TaskTitle::new(self.title.as_str()));
        let parsed_description = errors.capture(
            FormField::Description,
            TaskDescription::new(self.description.as_str()),
        );
        let parsed_due_date =
            errors.capture(FormField::DueDate, parse_due_date(&self.due_date, mode));
        let parsed_priority = errors.capture(FormField::Priority, parse_priority(&self.priority));
        let parsed_category = errors.capture(
            FormField::Category,
            resolve_category(&self.category, categories),
        );

        let (
            Some(title),
            Some(description),
            Some(due_date),
            Some(priority),
            Some(category_id),
        ) = (
            parsed_title,
            parsed_description,
            parsed_due_date,
            parsed_priority,
            parsed_category,
        ) else {
            return Err(errors);
        };

        Ok(TaskFields {
            title,
            description,
            due_date,
            priority,
            category_id,
        })
    }
}

/// Raw category form submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryFormInput {
    /// Raw category name.
    #[serde(rename = "nome", default)]
    pub name: String,
}

impl CategoryFormInput {
    /// Validates the submission.
    ///
    /// # Errors
    ///
    /// Returns [`FormErrors`] when the name is blank or too long.
    pub fn validate(&self) -> Result<CategoryName, FormErrors> {
        let mut errors = FormErrors::default();
        errors
            .capture(FormField::Name, CategoryName::new(self.name.as_str()))
            .ok_or(errors)
    }
}

fn parse_due_date(raw: &str, mode: FormMode) -> Result<NaiveDate, TaskDomainError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TaskDomainError::MissingDueDate);
    }
    let date = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map_err(|_| TaskDomainError::InvalidDueDate(raw.to_owned()))?;
    match mode {
        FormMode::Create { today } if date < today => Err(TaskDomainError::DueDateInPast(date)),
        FormMode::Create { .. } | FormMode::Edit => Ok(date),
    }
}

fn parse_priority(raw: &str) -> Result<Priority, TaskDomainError> {
    if raw.trim().is_empty() {
        return Ok(Priority::default());
    }
    Priority::try_from(raw).map_err(|err| TaskDomainError::InvalidPriority(err.0))
}

fn resolve_category(raw: &str, categories: &[Category]) -> Result<CategoryId, TaskDomainError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TaskDomainError::MissingCategory);
    }
    trimmed
        .parse::<CategoryId>()
        .ok()
        .filter(|id| categories.iter().any(|category| category.id() == *id))
        .ok_or_else(|| TaskDomainError::UnknownCategory(raw.to_owned()))
}
