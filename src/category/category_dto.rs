use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::category_models::{Category, CategoryColor, CategoryPatch};
use crate::domain::{DomainError, Patch};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub description: Option<String>,
    /// Palette color name; defaults to Black
    pub color: Option<String>,
}

impl CreateCategoryRequest {
    pub fn color(&self) -> Result<CategoryColor, DomainError> {
        match self.color.as_deref() {
            Some(color) => color.parse(),
            None => Ok(CategoryColor::default()),
        }
    }
}

/// Omitted fields stay unchanged; `"description": null` clears the
/// description.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateCategoryRequest {
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub name: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub description: Patch<String>,
    pub color: Option<String>,
}

impl TryFrom<UpdateCategoryRequest> for CategoryPatch {
    type Error = DomainError;

    fn try_from(request: UpdateCategoryRequest) -> Result<Self, Self::Error> {
        let color = request
            .color
            .as_deref()
            .map(str::parse::<CategoryColor>)
            .transpose()?;

        Ok(CategoryPatch {
            name: request.name,
            description: request.description,
            color,
        })
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CategoryResponse {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub color: CategoryColor,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            id: category.id().unwrap_or_default(),
            name: category.name().to_string(),
            description: category.description().map(str::to_string),
            color: category.color(),
            created_at: category.created_at(),
            updated_at: category.updated_at(),
        }
    }
}
