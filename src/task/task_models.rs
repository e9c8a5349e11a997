use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    error::{optional_text, required_text},
    DomainError, EntityMeta, Patch,
};

pub const MAX_TITLE_LENGTH: usize = 50;
pub const MAX_DESCRIPTION_LENGTH: usize = 500;

/// Completion state of a task. `Completed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum TaskState {
    Incomplete,
    Completed,
}

impl std::fmt::Display for TaskState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskState::Incomplete => write!(f, "Incomplete"),
            TaskState::Completed => write!(f, "Completed"),
        }
    }
}

/// Everything needed to create a task.
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub assigned_to: Option<i32>,
    pub reminder_at: Option<DateTime<Utc>>,
    pub due_date: Option<DateTime<Utc>>,
    pub category_id: Option<i32>,
}

#[cfg(test)]
impl NewTask {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }
}

/// Sparse update for a task.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskPatch {
    pub title: Patch<String>,
    pub description: Patch<String>,
    pub assigned_to: Option<i32>,
    pub category_id: Option<i32>,
    pub reminder_at: Patch<DateTime<Utc>>,
    pub due_date: Patch<DateTime<Utc>>,
}

/// Row data for rebuilding a stored task.
#[derive(Debug, Clone)]
pub struct PersistedTask {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub assigned_to: i32,
    pub reminder_at: Option<DateTime<Utc>>,
    pub is_completed: bool,
    pub due_date: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub category_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct Task {
    meta: EntityMeta,
    title: String,
    description: Option<String>,
    assigned_to: i32,
    reminder_at: Option<DateTime<Utc>>,
    due_date: Option<DateTime<Utc>>,
    // Some exactly when the task is completed.
    completed_at: Option<DateTime<Utc>>,
    category_id: i32,
}

fn validate_title(title: &str) -> Result<String, DomainError> {
    required_text("title", "Title", title, MAX_TITLE_LENGTH)
}

fn validate_description(description: &str) -> Result<String, DomainError> {
    optional_text(
        "description",
        "Description",
        description,
        Some(MAX_DESCRIPTION_LENGTH),
    )
}

impl Task {
    pub fn create(request: NewTask) -> Result<Self, DomainError> {
        let title = validate_title(&request.title)?;
        let description = request
            .description
            .as_deref()
            .map(validate_description)
            .transpose()?;

        Ok(Self {
            meta: EntityMeta::new(),
            title,
            description,
            assigned_to: request.assigned_to.unwrap_or(0),
            reminder_at: request.reminder_at,
            due_date: request.due_date,
            completed_at: None,
            category_id: request.category_id.unwrap_or(0),
        })
    }

    pub fn from_persisted(data: PersistedTask) -> Result<Self, DomainError> {
        let completed_at = match (data.is_completed, data.completed_at) {
            (true, Some(at)) => Some(at),
            (false, _) => None,
            (true, None) => {
                return Err(DomainError::invalid_state(format!(
                    "Task {} is completed but has no completion time",
                    data.id
                )))
            }
        };

        Ok(Self {
            meta: EntityMeta::persisted(data.id, data.created_at, data.updated_at),
            title: data.title,
            description: data.description,
            assigned_to: data.assigned_to,
            reminder_at: data.reminder_at,
            due_date: data.due_date,
            completed_at,
            category_id: data.category_id,
        })
    }

    /// Applies every field present in `patch`. Nothing is written unless the
    /// whole patch is valid; the update stamp moves even for an empty patch.
    pub fn update(&mut self, patch: &TaskPatch) -> Result<(), DomainError> {
        let title = match &patch.title {
            Patch::Keep => None,
            Patch::Clear => Some(validate_title("")?),
            Patch::Set(title) => Some(validate_title(title)?),
        };
        let description = match &patch.description {
            Patch::Keep => Patch::Keep,
            Patch::Clear => Patch::Clear,
            Patch::Set(d) => Patch::Set(validate_description(d)?),
        };

        if let Some(title) = title {
            self.title = title;
        }
        description.apply_to(&mut self.description);
        if let Some(assigned_to) = patch.assigned_to {
            self.assigned_to = assigned_to;
        }
        if let Some(category_id) = patch.category_id {
            self.category_id = category_id;
        }
        patch.reminder_at.clone().apply_to(&mut self.reminder_at);
        patch.due_date.clone().apply_to(&mut self.due_date);

        self.meta.mark_updated();
        Ok(())
    }

    pub fn complete(&mut self) -> Result<(), DomainError> {
        if self.is_completed() {
            return Err(DomainError::invalid_state("Task is already completed"));
        }

        let now = self.meta.mark_updated();
        self.completed_at = Some(now);
        Ok(())
    }

    pub fn state(&self) -> TaskState {
        if self.is_completed() {
            TaskState::Completed
        } else {
            TaskState::Incomplete
        }
    }

    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    pub fn is_overdue(&self) -> bool {
        self.is_overdue_at(Utc::now())
    }

    pub fn is_overdue_at(&self, now: DateTime<Utc>) -> bool {
        match self.due_date {
            Some(due) => !self.is_completed() && now > due,
            None => false,
        }
    }

    pub fn id(&self) -> Option<i32> {
        self.meta.id()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn assigned_to(&self) -> i32 {
        self.assigned_to
    }

    pub fn reminder_at(&self) -> Option<DateTime<Utc>> {
        self.reminder_at
    }

    pub fn due_date(&self) -> Option<DateTime<Utc>> {
        self.due_date
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    pub fn category_id(&self) -> i32 {
        self.category_id
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

impl PartialEq for Task {
    fn eq(&self, other: &Self) -> bool {
        self.meta.same_identity(&other.meta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rstest::rstest;

    fn task() -> Task {
        Task::create(NewTask {
            title: "Buy milk".into(),
            description: Some("Semi-skimmed".into()),
            assigned_to: Some(3),
            category_id: Some(2),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_task_state_display() {
        assert_eq!(TaskState::Incomplete.to_string(), "Incomplete");
        assert_eq!(TaskState::Completed.to_string(), "Completed");
    }

    #[test]
    fn test_create_defaults() {
        let task = Task::create(NewTask::titled("  Buy milk  ")).unwrap();
        assert_eq!(task.title(), "Buy milk");
        assert_eq!(task.description(), None);
        assert_eq!(task.assigned_to(), 0);
        assert_eq!(task.category_id(), 0);
        assert!(!task.is_completed());
        assert_eq!(task.state(), TaskState::Incomplete);
        assert!(task.completed_at().is_none());
        assert!(task.updated_at().is_none());
        assert_eq!(task.id(), None);
    }

    #[rstest]
    #[case("t".repeat(50), None)]
    #[case("t".to_string(), Some("d".repeat(500)))]
    #[case(format!("  {}  ", "t".repeat(50)), Some(String::new()))]
    fn test_create_accepts_bounds(#[case] title: String, #[case] description: Option<String>) {
        let task = Task::create(NewTask {
            title: title.clone(),
            description,
            ..Default::default()
        });
        assert_eq!(task.unwrap().title(), title.trim());
    }

    #[rstest]
    #[case(String::new(), None, "title", "Title cannot be empty")]
    #[case("   ".to_string(), None, "title", "Title cannot be empty")]
    #[case("t".repeat(51), None, "title", "Title cannot exceed 50 characters")]
    #[case(
        "ok".to_string(),
        Some("d".repeat(501)),
        "description",
        "Description cannot exceed 500 characters"
    )]
    #[case(
        "ok".to_string(),
        Some(format!("{} ", "d".repeat(500))),
        "description",
        "Description cannot exceed 500 characters"
    )]
    fn test_create_rejects_out_of_bounds(
        #[case] title: String,
        #[case] description: Option<String>,
        #[case] field: &'static str,
        #[case] message: &str,
    ) {
        let err = Task::create(NewTask {
            title,
            description,
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(err, DomainError::validation(field, message));
    }

    #[test]
    fn test_complete_is_one_shot() {
        let mut task = Task::create(NewTask::titled("Buy milk")).unwrap();

        task.complete().unwrap();
        let completed_at = task.completed_at();
        assert!(task.is_completed());
        assert!(completed_at.is_some());
        assert_eq!(task.updated_at(), completed_at);

        let err = task.complete().unwrap_err();
        assert_eq!(err, DomainError::invalid_state("Task is already completed"));
        assert!(task.is_completed());
        assert_eq!(task.completed_at(), completed_at);
        assert_eq!(task.state(), TaskState::Completed);
    }

    #[test]
    fn test_update_with_empty_patch_only_moves_timestamp() {
        let mut task = task();
        task.update(&TaskPatch::default()).unwrap();
        let first = task.updated_at().unwrap();

        task.update(&TaskPatch::default()).unwrap();

        assert_eq!(task.title(), "Buy milk");
        assert_eq!(task.description(), Some("Semi-skimmed"));
        assert_eq!(task.assigned_to(), 3);
        assert_eq!(task.category_id(), 2);
        assert!(task.updated_at().unwrap() > first);
    }

    #[test]
    fn test_update_applies_present_fields() {
        let mut task = task();
        let due = Utc::now() + Duration::days(2);
        let patch = TaskPatch {
            title: Patch::Set("  Buy oat milk ".into()),
            description: Patch::Clear,
            assigned_to: Some(9),
            category_id: Some(4),
            reminder_at: Patch::Set(due - Duration::hours(1)),
            due_date: Patch::Set(due),
        };

        task.update(&patch).unwrap();

        assert_eq!(task.title(), "Buy oat milk");
        assert_eq!(task.description(), None);
        assert_eq!(task.assigned_to(), 9);
        assert_eq!(task.category_id(), 4);
        assert_eq!(task.reminder_at(), Some(due - Duration::hours(1)));
        assert_eq!(task.due_date(), Some(due));
    }

    #[test]
    fn test_update_clears_dates() {
        let mut task = Task::create(NewTask {
            title: "Dentist".into(),
            due_date: Some(Utc::now()),
            reminder_at: Some(Utc::now()),
            ..Default::default()
        })
        .unwrap();

        task.update(&TaskPatch {
            due_date: Patch::Clear,
            reminder_at: Patch::Clear,
            ..Default::default()
        })
        .unwrap();

        assert!(task.due_date().is_none());
        assert!(task.reminder_at().is_none());
    }

    #[test]
    fn test_update_rejects_long_description_without_side_effects() {
        let mut task = task();
        let patch = TaskPatch {
            title: Patch::Set("New title".into()),
            description: Patch::Set("d".repeat(501)),
            ..Default::default()
        };

        let err = task.update(&patch).unwrap_err();

        assert!(matches!(err, DomainError::Validation { field: "description", .. }));
        assert_eq!(task.title(), "Buy milk");
        assert!(task.updated_at().is_none());
    }

    #[rstest]
    #[case(Patch::Clear)]
    #[case(Patch::Set("  ".to_string()))]
    #[case(Patch::Set("t".repeat(51)))]
    fn test_update_rejects_invalid_titles(#[case] title: Patch<String>) {
        let mut task = task();
        let err = task
            .update(&TaskPatch {
                title,
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation { field: "title", .. }));
    }

    #[test]
    fn test_update_does_not_reopen_completed_task() {
        let mut task = task();
        task.complete().unwrap();
        task.update(&TaskPatch {
            title: Patch::Set("Renamed".into()),
            ..Default::default()
        })
        .unwrap();
        assert!(task.is_completed());
    }

    #[test]
    fn test_is_overdue_at() {
        let now = Utc::now();
        let mut task = Task::create(NewTask {
            title: "Report".into(),
            due_date: Some(now),
            ..Default::default()
        })
        .unwrap();

        assert!(!task.is_overdue_at(now));
        assert!(task.is_overdue_at(now + Duration::seconds(1)));

        task.complete().unwrap();
        assert!(!task.is_overdue_at(now + Duration::seconds(1)));

        let undated = Task::create(NewTask::titled("Someday")).unwrap();
        assert!(!undated.is_overdue());
    }

    #[test]
    fn test_from_persisted_rejects_completed_without_timestamp() {
        let now = Utc::now();
        let data = PersistedTask {
            id: 1,
            title: "Broken".into(),
            description: None,
            assigned_to: 0,
            reminder_at: None,
            is_completed: true,
            due_date: None,
            completed_at: None,
            category_id: 0,
            created_at: now,
            updated_at: None,
        };
        assert!(matches!(
            Task::from_persisted(data),
            Err(DomainError::InvalidState(_))
        ));
    }

    #[test]
    fn test_from_persisted_ignores_stray_completion_time() {
        let now = Utc::now();
        let task = Task::from_persisted(PersistedTask {
            id: 5,
            title: "Open".into(),
            description: None,
            assigned_to: 1,
            reminder_at: None,
            is_completed: false,
            due_date: None,
            completed_at: Some(now),
            category_id: 3,
            created_at: now,
            updated_at: None,
        })
        .unwrap();
        assert_eq!(task.id(), Some(5));
        assert!(!task.is_completed());
        assert!(task.completed_at().is_none());
    }
}
