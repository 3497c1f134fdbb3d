//! Category entity used to group tasks.

use super::{CategoryId, TaskDomainError};
use std::fmt;

/// Validated category label of at most 50 characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CategoryName(String);

impl CategoryName {
    /// Maximum name length, matching the `VARCHAR(50)` column.
    pub const MAX_LENGTH: usize = 50;

    /// Name of the category created when none is supplied.
    pub const DEFAULT: &'static str = "General";

    /// Creates a validated category name.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyCategoryName`] when the value is empty
    /// after trimming, or [`TaskDomainError::CategoryNameTooLong`] when it
    /// exceeds 50 characters.
    pub fn new(value: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            return Err(TaskDomainError::EmptyCategoryName);
        }

        if trimmed.chars().count() > Self::MAX_LENGTH {
            return Err(TaskDomainError::CategoryNameTooLong {
                max: Self::MAX_LENGTH,
            });
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CategoryName {
    fn default() -> Self {
        Self(Self::DEFAULT.to_owned())
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for CategoryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Named grouping label referenced by tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    id: CategoryId,
    name: CategoryName,
}

impl Category {
    /// Creates a category with a fresh identifier.
    #[must_use]
    pub fn new(name: CategoryName) -> Self {
        Self {
            id: CategoryId::new(),
            name,
        }
    }

    /// Reconstructs a category from persisted storage.
    #[must_use]
    pub const fn from_persisted(id: CategoryId, name: CategoryName) -> Self {
        Self { id, name }
    }

    /// Returns the category identifier.
    #[must_use]
    pub const fn id(&self) -> CategoryId {
        self.id
    }

    /// Returns the category name.
    #[must_use]
    pub const fn name(&self) -> &CategoryName {
        &self.name
    }
}

impl Default for Category {
    fn default() -> Self {
        Self::new(CategoryName::default())
    }
}
