use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;

use crate::domain::{
    error::{optional_text, required_text},
    DomainError, EntityMeta, Patch,
};

pub const MAX_NAME_LENGTH: usize = 30;

/// The fixed palette a category can be drawn with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum CategoryColor {
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Purple,
    #[default]
    Black,
    White,
}

impl CategoryColor {
    /// Integer code stored in the `categories.color` column.
    pub fn code(self) -> i32 {
        match self {
            CategoryColor::Red => 0,
            CategoryColor::Orange => 1,
            CategoryColor::Yellow => 2,
            CategoryColor::Green => 3,
            CategoryColor::Blue => 4,
            CategoryColor::Purple => 5,
            CategoryColor::Black => 6,
            CategoryColor::White => 7,
        }
    }

    pub fn from_code(code: i32) -> Result<Self, DomainError> {
        match code {
            0 => Ok(CategoryColor::Red),
            1 => Ok(CategoryColor::Orange),
            2 => Ok(CategoryColor::Yellow),
            3 => Ok(CategoryColor::Green),
            4 => Ok(CategoryColor::Blue),
            5 => Ok(CategoryColor::Purple),
            6 => Ok(CategoryColor::Black),
            7 => Ok(CategoryColor::White),
            other => Err(DomainError::validation(
                "color",
                format!("Unknown category color code {}", other),
            )),
        }
    }
}

impl std::fmt::Display for CategoryColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CategoryColor::Red => write!(f, "Red"),
            CategoryColor::Orange => write!(f, "Orange"),
            CategoryColor::Yellow => write!(f, "Yellow"),
            CategoryColor::Green => write!(f, "Green"),
            CategoryColor::Blue => write!(f, "Blue"),
            CategoryColor::Purple => write!(f, "Purple"),
            CategoryColor::Black => write!(f, "Black"),
            CategoryColor::White => write!(f, "White"),
        }
    }
}

impl FromStr for CategoryColor {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "red" => Ok(CategoryColor::Red),
            "orange" => Ok(CategoryColor::Orange),
            "yellow" => Ok(CategoryColor::Yellow),
            "green" => Ok(CategoryColor::Green),
            "blue" => Ok(CategoryColor::Blue),
            "purple" => Ok(CategoryColor::Purple),
            "black" => Ok(CategoryColor::Black),
            "white" => Ok(CategoryColor::White),
            _ => Err(DomainError::validation(
                "color",
                format!("Unknown category color '{}'", value),
            )),
        }
    }
}

/// Sparse update for a category.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryPatch {
    pub name: Patch<String>,
    pub description: Patch<String>,
    pub color: Option<CategoryColor>,
}

/// Row data for rebuilding a stored category.
#[derive(Debug, Clone)]
pub struct PersistedCategory {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub color: CategoryColor,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct Category {
    meta: EntityMeta,
    name: String,
    description: Option<String>,
    color: CategoryColor,
}

fn validate_name(name: &str) -> Result<String, DomainError> {
    required_text("name", "Category name", name, MAX_NAME_LENGTH)
}

impl Category {
    pub fn create(
        name: &str,
        description: Option<&str>,
        color: CategoryColor,
    ) -> Result<Self, DomainError> {
        let name = validate_name(name)?;
        let description = description
            .map(|d| optional_text("description", "Description", d, None))
            .transpose()?;

        Ok(Self {
            meta: EntityMeta::new(),
            name,
            description,
            color,
        })
    }

    pub fn from_persisted(data: PersistedCategory) -> Self {
        Self {
            meta: EntityMeta::persisted(data.id, data.created_at, data.updated_at),
            name: data.name,
            description: data.description,
            color: data.color,
        }
    }

    /// Applies every field present in `patch`. Nothing is written unless the
    /// whole patch is valid; the update stamp moves even for an empty patch.
    pub fn update(&mut self, patch: &CategoryPatch) -> Result<(), DomainError> {
        let name = match &patch.name {
            Patch::Keep => None,
            Patch::Clear => Some(validate_name("")?),
            Patch::Set(name) => Some(validate_name(name)?),
        };
        let description = match &patch.description {
            Patch::Keep => Patch::Keep,
            Patch::Clear => Patch::Clear,
            Patch::Set(d) => Patch::Set(optional_text("description", "Description", d, None)?),
        };

        if let Some(name) = name {
            self.name = name;
        }
        description.apply_to(&mut self.description);
        if let Some(color) = patch.color {
            self.color = color;
        }

        self.meta.mark_updated();
        Ok(())
    }

    pub fn id(&self) -> Option<i32> {
        self.meta.id()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn color(&self) -> CategoryColor {
        self.color
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.meta.created_at()
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.meta.updated_at()
    }

    pub(crate) fn assign_id(&mut self, id: i32) {
        self.meta.assign_id(id);
    }
}

impl PartialEq for Category {
    fn eq(&self, other: &Self) -> bool {
        self.meta.same_identity(&other.meta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn category() -> Category {
        Category::create("Original Name", Some("Original Description"), CategoryColor::Green)
            .unwrap()
    }

    #[test]
    fn test_create_with_valid_values() {
        let category = Category::create("Work", None, CategoryColor::Blue).unwrap();
        assert_eq!(category.name(), "Work");
        assert_eq!(category.description(), None);
        assert_eq!(category.color(), CategoryColor::Blue);
        assert_eq!(category.id(), None);
        assert!(category.updated_at().is_none());
    }

    #[rstest]
    #[case("a".to_string())]
    #[case("  Trimmed Name  ".to_string())]
    #[case("n".repeat(30))]
    #[case(format!("   {}   ", "n".repeat(30)))]
    fn test_create_accepts_valid_names(#[case] name: String) {
        let category = Category::create(&name, None, CategoryColor::Red).unwrap();
        assert_eq!(category.name(), name.trim());
    }

    #[rstest]
    #[case(String::new(), "Category name cannot be empty")]
    #[case("    ".to_string(), "Category name cannot be empty")]
    #[case("n".repeat(31), "Category name cannot exceed 30 characters")]
    fn test_create_rejects_invalid_names(#[case] name: String, #[case] message: &str) {
        let err = Category::create(&name, None, CategoryColor::Red).unwrap_err();
        assert_eq!(err, DomainError::validation("name", message));
    }

    #[test]
    fn test_create_trims_description() {
        let category = Category::create("Work", Some("  notes  "), CategoryColor::Red).unwrap();
        assert_eq!(category.description(), Some("notes"));
    }

    #[test]
    fn test_update_with_all_fields() {
        let mut category = category();
        let patch = CategoryPatch {
            name: Patch::Set("Updated Category Name".into()),
            description: Patch::Set("Updated Description".into()),
            color: Some(CategoryColor::White),
        };

        category.update(&patch).unwrap();

        assert_eq!(category.name(), "Updated Category Name");
        assert_eq!(category.description(), Some("Updated Description"));
        assert_eq!(category.color(), CategoryColor::White);
        assert!(category.updated_at().unwrap() > category.created_at());
    }

    #[test]
    fn test_update_with_name_only() {
        let mut category = category();
        let patch = CategoryPatch {
            name: Patch::Set("New Name".into()),
            ..Default::default()
        };

        category.update(&patch).unwrap();

        assert_eq!(category.name(), "New Name");
        assert_eq!(category.color(), CategoryColor::Green);
        assert_eq!(category.description(), Some("Original Description"));
    }

    #[test]
    fn test_update_with_empty_patch_only_moves_timestamp() {
        let mut category = category();
        category.update(&CategoryPatch::default()).unwrap();
        let first = category.updated_at().unwrap();

        category.update(&CategoryPatch::default()).unwrap();

        assert_eq!(category.name(), "Original Name");
        assert_eq!(category.description(), Some("Original Description"));
        assert_eq!(category.color(), CategoryColor::Green);
        assert!(category.updated_at().unwrap() > first);
    }

    #[rstest]
    #[case(Patch::Set(String::new()), "Category name cannot be empty")]
    #[case(Patch::Set("   ".to_string()), "Category name cannot be empty")]
    #[case(Patch::Clear, "Category name cannot be empty")]
    #[case(Patch::Set("a".repeat(31)), "Category name cannot exceed 30 characters")]
    fn test_update_rejects_invalid_names(#[case] name: Patch<String>, #[case] message: &str) {
        let mut category = category();
        let patch = CategoryPatch {
            name,
            description: Patch::Set("changed".into()),
            color: Some(CategoryColor::Red),
        };

        let err = category.update(&patch).unwrap_err();

        assert_eq!(err, DomainError::validation("name", message));
        assert_eq!(category.name(), "Original Name");
        assert_eq!(category.description(), Some("Original Description"));
        assert_eq!(category.color(), CategoryColor::Green);
        assert!(category.updated_at().is_none());
    }

    #[test]
    fn test_update_trims_name() {
        let mut category = category();
        let patch = CategoryPatch {
            name: Patch::Set("  Trimmed Name  ".into()),
            ..Default::default()
        };
        category.update(&patch).unwrap();
        assert_eq!(category.name(), "Trimmed Name");
    }

    #[test]
    fn test_update_clear_description() {
        let mut category = category();
        let patch = CategoryPatch {
            description: Patch::Clear,
            ..Default::default()
        };
        category.update(&patch).unwrap();
        assert_eq!(category.description(), None);
    }

    #[rstest]
    #[case("Blue", CategoryColor::Blue)]
    #[case("blue", CategoryColor::Blue)]
    #[case(" WHITE ", CategoryColor::White)]
    fn test_color_from_str(#[case] raw: &str, #[case] expected: CategoryColor) {
        assert_eq!(raw.parse::<CategoryColor>().unwrap(), expected);
    }

    #[test]
    fn test_color_from_str_rejects_unknown() {
        let err = "Magenta".parse::<CategoryColor>().unwrap_err();
        assert!(matches!(err, DomainError::Validation { field: "color", .. }));
    }

    #[test]
    fn test_color_codes() {
        for color in [
            CategoryColor::Red,
            CategoryColor::Orange,
            CategoryColor::Yellow,
            CategoryColor::Green,
            CategoryColor::Blue,
            CategoryColor::Purple,
            CategoryColor::Black,
            CategoryColor::White,
        ] {
            assert_eq!(CategoryColor::from_code(color.code()).unwrap(), color);
        }
        assert!(CategoryColor::from_code(42).is_err());
    }

    #[test]
    fn test_equality_by_identity() {
        let now = Utc::now();
        let stored = |name: &str| {
            Category::from_persisted(PersistedCategory {
                id: 1,
                name: name.into(),
                description: None,
                color: CategoryColor::Red,
                created_at: now,
                updated_at: None,
            })
        };
        assert_eq!(stored("First"), stored("Second"));
        assert_ne!(category(), category());
    }
}
