//! List query construction for the status partitions.
//!
//! A [`TaskQuery`] describes one list view: the status partition, an optional
//! search term, an optional category filter and the ordering. Adapters either
//! translate it to SQL or evaluate it directly with [`TaskQuery::matches`] and
//! [`TaskQuery::compare`].

use super::{CategoryId, Task, TaskStatus};
use std::cmp::Ordering;

/// Case-insensitive substring searched in title, description and category name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm {
    raw: String,
    folded: String,
}

impl SearchTerm {
    /// Creates a search term, returning `None` for blank input.
    #[must_use]
    pub fn new(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self {
            raw: trimmed.to_owned(),
            folded: trimmed.to_lowercase(),
        })
    }

    /// Returns the trimmed term as typed by the user.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns whether `haystack` contains the term, ignoring case.
    #[must_use]
    pub fn is_found_in(&self, haystack: &str) -> bool {
        haystack.to_lowercase().contains(&self.folded)
    }

    /// Returns a SQL `LIKE` pattern matching the term anywhere in a value.
    ///
    /// `%`, `_` and `\` are escaped with a backslash.
    #[must_use]
    pub fn like_pattern(&self) -> String {
        let mut pattern = String::with_capacity(self.raw.len() + 2);
        pattern.push('%');
        for ch in self.raw.chars() {
            if matches!(ch, '%' | '_' | '\\') {
                pattern.push('\\');
            }
            pattern.push(ch);
        }
        pattern.push('%');
        pattern
    }
}

/// Ordering applied to a list view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskSort {
    /// Due date ascending, then the priority storage value (lexical).
    #[default]
    DueDate,
    /// Priority rank ascending, then due date ascending.
    Priority,
}

impl TaskSort {
    /// Interprets the `ordenar_por` query parameter.
    ///
    /// Only `prioridade` (or `priority`) selects the priority ordering; any
    /// other value falls back to the date ordering.
    #[must_use]
    pub fn from_param(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("prioridade" | "priority") => Self::Priority,
            _ => Self::DueDate,
        }
    }

    /// Returns the canonical query parameter value.
    #[must_use]
    pub const fn as_param(self) -> &'static str {
        match self {
            Self::DueDate => "data",
            Self::Priority => "prioridade",
        }
    }

    /// Compares two tasks under this ordering.
    ///
    /// Ties fall back to creation time and then identifier so results are
    /// stable across adapters.
    #[must_use]
    pub fn compare(self, left: &Task, right: &Task) -> Ordering {
        let primary = match self {
            Self::Priority => left
                .priority()
                .rank()
                .cmp(&right.priority().rank())
                .then_with(|| left.due_date().cmp(&right.due_date())),
            Self::DueDate => left
                .due_date()
                .cmp(&right.due_date())
                .then_with(|| left.priority().as_str().cmp(right.priority().as_str())),
        };
        primary
            .then_with(|| left.created_at().cmp(&right.created_at()))
            .then_with(|| left.id().cmp(&right.id()))
    }
}

/// Filter and ordering for one status partition list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskQuery {
    status: TaskStatus,
    search: Option<SearchTerm>,
    category: Option<CategoryId>,
    sort: TaskSort,
}

impl TaskQuery {
    /// Creates an unfiltered, date-ordered query for `status`.
    #[must_use]
    pub const fn new(status: TaskStatus) -> Self {
        Self {
            status,
            search: None,
            category: None,
            sort: TaskSort::DueDate,
        }
    }

    /// Sets the search term; blank input clears it.
    #[must_use]
    pub fn with_search(mut self, value: &str) -> Self {
        self.search = SearchTerm::new(value);
        self
    }

    /// Restricts results to one category.
    #[must_use]
    pub const fn with_category(mut self, category: CategoryId) -> Self {
        self.category = Some(category);
        self
    }

    /// Sets the ordering.
    #[must_use]
    pub const fn with_sort(mut self, sort: TaskSort) -> Self {
        self.sort = sort;
        self
    }

    /// Returns the status partition.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the search term, if any.
    #[must_use]
    pub const fn search(&self) -> Option<&SearchTerm> {
        self.search.as_ref()
    }

    /// Returns the category filter, if any.
    #[must_use]
    pub const fn category(&self) -> Option<CategoryId> {
        self.category
    }

    /// Returns the ordering.
    #[must_use]
    pub const fn sort(&self) -> TaskSort {
        self.sort
    }

    /// Returns whether `task`, whose category is named `category_name`,
    /// belongs in the result set.
    #[must_use]
    pub fn matches(&self, task: &Task, category_name: &str) -> bool {
        if task.status() != self.status {
            return false;
        }
        if self.category.is_some_and(|id| task.category_id() != id) {
            return false;
        }
        self.search.as_ref().is_none_or(|term| {
            term.is_found_in(task.title().as_str())
                || term.is_found_in(task.description().as_str())
                || term.is_found_in(category_name)
        })
    }

    /// Compares two tasks under the query ordering.
    #[must_use]
    pub fn compare(&self, left: &Task, right: &Task) -> Ordering {
        self.sort.compare(left, right)
    }
}
