use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use super::category_models::{Category, CategoryColor, PersistedCategory};
use crate::{
    domain::{PageRequest, PagedResult},
    error::{AppError, Result},
};

/// Storage contract for categories. Deleting a category also deletes its
/// tasks.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn get_by_id(&self, id: i32) -> Result<Option<Category>>;

    /// All categories ordered by id.
    async fn get_all(&self) -> Result<Vec<Category>>;

    async fn get_paged(&self, page: PageRequest) -> Result<PagedResult<Category>>;

    /// Stores a new category and returns it with its assigned id.
    async fn add(&self, category: Category) -> Result<Category>;

    async fn update(&self, category: &Category) -> Result<()>;

    /// Removes a category. Missing ids are ignored.
    async fn delete(&self, id: i32) -> Result<()>;

    async fn exists(&self, id: i32) -> Result<bool>;
}

/// Column list for `categories` queries.
const CATEGORY_COLUMNS: &str = "id, name, description, color, created_at, updated_at";

#[derive(Debug, FromRow)]
struct CategoryRow {
    id: i32,
    name: String,
    description: Option<String>,
    color: i32,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

impl TryFrom<CategoryRow> for Category {
    type Error = AppError;

    fn try_from(row: CategoryRow) -> Result<Self> {
        let color = CategoryColor::from_code(row.color)
            .map_err(|e| AppError::Database(sqlx::Error::Decode(Box::new(e))))?;

        Ok(Category::from_persisted(PersistedCategory {
            id: row.id,
            name: row.name,
            description: row.description,
            color,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }))
    }
}

pub(crate) fn persisted_id(entity: &str, id: Option<i32>) -> Result<i32> {
    id.ok_or_else(|| {
        tracing::error!("Attempted to update a {} that was never stored", entity);
        AppError::InternalError
    })
}

#[derive(Clone)]
pub struct PgCategoryRepository {
    pool: PgPool,
}

impl PgCategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryRepository for PgCategoryRepository {
    async fn get_by_id(&self, id: i32) -> Result<Option<Category>> {
        let query = format!("SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = $1");
        let row = sqlx::query_as::<_, CategoryRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Category::try_from).transpose()
    }

    async fn get_all(&self) -> Result<Vec<Category>> {
        let query = format!("SELECT {CATEGORY_COLUMNS} FROM categories ORDER BY id");
        let rows = sqlx::query_as::<_, CategoryRow>(&query)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Category::try_from).collect()
    }

    async fn get_paged(&self, page: PageRequest) -> Result<PagedResult<Category>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories")
            .fetch_one(&self.pool)
            .await?;

        let query = format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories ORDER BY id LIMIT $1 OFFSET $2"
        );
        let rows = sqlx::query_as::<_, CategoryRow>(&query)
            .bind(i64::from(page.page_size()))
            .bind(i64::try_from(page.offset()).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await?;

        let items = rows
            .into_iter()
            .map(Category::try_from)
            .collect::<Result<Vec<_>>>()?;

        Ok(PagedResult::new(items, total.max(0) as u64, page))
    }

    async fn add(&self, mut category: Category) -> Result<Category> {
        let id: i32 = sqlx::query_scalar(
            "INSERT INTO categories (name, description, color, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id",
        )
        .bind(category.name())
        .bind(category.description())
        .bind(category.color().code())
        .bind(category.created_at())
        .bind(category.updated_at())
        .fetch_one(&self.pool)
        .await?;

        category.assign_id(id);
        Ok(category)
    }

    async fn update(&self, category: &Category) -> Result<()> {
        let id = persisted_id("category", category.id())?;

        sqlx::query(
            "UPDATE categories SET
                name = $1,
                description = $2,
                color = $3,
                updated_at = $4
             WHERE id = $5",
        )
        .bind(category.name())
        .bind(category.description())
        .bind(category.color().code())
        .bind(category.updated_at())
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, id: i32) -> Result<()> {
        sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn exists(&self, id: i32) -> Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM categories WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }
}
