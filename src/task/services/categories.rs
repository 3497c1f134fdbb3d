//! Service layer for category creation and lookup.

use crate::task::{
    domain::{Category, CategoryFormInput},
    ports::CategoryRepository,
};
use std::sync::Arc;
use tracing::info;

use super::TaskServiceResult;

/// Category orchestration service.
#[derive(Clone)]
pub struct CategoryService<R>
where
    R: CategoryRepository,
{
    repository: Arc<R>,
}

impl<R> CategoryService<R>
where
    R: CategoryRepository,
{
    /// Creates a new category service.
    #[must_use]
    pub const fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Validates a category form and stores the new category.
    ///
    /// # Errors
    ///
    /// Returns [`super::TaskServiceError::Validation`] when the name is invalid
    /// or [`super::TaskServiceError::Repository`] when persistence fails.
    pub async fn create(&self, input: &CategoryFormInput) -> TaskServiceResult<Category> {
        let name = input.validate()?;
        let category = Category::new(name);
        self.repository.store_category(&category).await?;
        info!(category_id = %category.id(), name = %category.name(), "category created");
        Ok(category)
    }

    /// Returns every category ordered by name.
    ///
    /// # Errors
    ///
    /// Returns [`super::TaskServiceError::Repository`] when persistence lookup
    /// fails.
    pub async fn list(&self) -> TaskServiceResult<Vec<Category>> {
        Ok(self.repository.list_categories().await?)
    }

    /// Creates the default category when no category exists yet.
    ///
    /// Returns the created category, or `None` when categories already exist.
    ///
    /// # Errors
    ///
    /// Returns [`super::TaskServiceError::Repository`] when persistence fails.
    pub async fn ensure_default(&self) -> TaskServiceResult<Option<Category>> {
        if !self.repository.list_categories().await?.is_empty() {
            return Ok(None);
        }
        let category = Category::default();
        self.repository.store_category(&category).await?;
        info!(category_id = %category.id(), "default category created");
        Ok(Some(category))
    }
}
