use std::sync::Arc;

use crate::category::category_models::{Category, CategoryColor, CategoryPatch};
use crate::category::category_repository::CategoryRepository;
use crate::domain::{PageRequest, PagedResult};
use crate::error::{AppError, Result};

/// Service layer for category business logic.
#[derive(Clone)]
pub struct CategoryService {
    repo: Arc<dyn CategoryRepository>,
}

impl CategoryService {
    pub fn new(repo: Arc<dyn CategoryRepository>) -> Self {
        Self { repo }
    }

    pub async fn create_category(
        &self,
        name: &str,
        description: Option<&str>,
        color: CategoryColor,
    ) -> Result<Category> {
        let category = Category::create(name, description, color)?;
        let category = self.repo.add(category).await?;
        tracing::info!(
            "Created category {:?}: {} ({})",
            category.id(),
            category.name(),
            category.color()
        );
        Ok(category)
    }

    pub async fn get_category(&self, id: i32) -> Result<Category> {
        self.repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Category not found".into()))
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        self.repo.get_all().await
    }

    pub async fn get_paged_categories(&self, page: PageRequest) -> Result<PagedResult<Category>> {
        self.repo.get_paged(page).await
    }

    pub async fn update_category(&self, id: i32, patch: CategoryPatch) -> Result<Category> {
        let mut category = self.get_category(id).await?;
        category.update(&patch)?;
        self.repo.update(&category).await?;
        tracing::info!("Updated category {}", id);
        Ok(category)
    }

    /// Deletes a category and, through the store's cascade, its tasks.
    pub async fn delete_category(&self, id: i32) -> Result<()> {
        if !self.repo.exists(id).await? {
            tracing::debug!("Category {} does not exist, nothing to delete", id);
            return Ok(());
        }
        self.repo.delete(id).await?;
        tracing::info!("Deleted category {}", id);
        Ok(())
    }
}
