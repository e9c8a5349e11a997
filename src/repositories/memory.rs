use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::{
    atomic::{AtomicI32, Ordering},
    Arc,
};

use crate::{
    category::{category_models::Category, category_repository::CategoryRepository},
    domain::{paginate, PageRequest, PagedResult},
    error::Result,
    task::{task_models::Task, task_repository::TaskRepository},
};

#[derive(Default)]
struct Tables {
    categories: DashMap<i32, Category>,
    tasks: DashMap<i32, Task>,
    category_seq: AtomicI32,
    task_seq: AtomicI32,
}

/// Process-local storage shared by the in-memory repositories.
///
/// Ids are handed out sequentially from 1. Deleting a category removes its
/// tasks, the same as the `ON DELETE CASCADE` key in Postgres.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category_repository(&self) -> InMemoryCategoryRepository {
        InMemoryCategoryRepository {
            store: self.clone(),
        }
    }

    pub fn task_repository(&self) -> InMemoryTaskRepository {
        InMemoryTaskRepository {
            store: self.clone(),
        }
    }
}

fn sorted<T: Clone, K: Ord>(map: &DashMap<i32, T>, key: impl Fn(&T) -> K) -> Vec<T> {
    let mut items: Vec<T> = map.iter().map(|entry| entry.value().clone()).collect();
    items.sort_by_key(|item| key(item));
    items
}

#[derive(Clone)]
pub struct InMemoryCategoryRepository {
    store: MemoryStore,
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn get_by_id(&self, id: i32) -> Result<Option<Category>> {
        Ok(self
            .store
            .tables
            .categories
            .get(&id)
            .map(|entry| entry.value().clone()))
    }

    async fn get_all(&self) -> Result<Vec<Category>> {
        Ok(sorted(&self.store.tables.categories, Category::id))
    }

    async fn get_paged(&self, page: PageRequest) -> Result<PagedResult<Category>> {
        Ok(paginate(self.get_all().await?, page))
    }

    async fn add(&self, mut category: Category) -> Result<Category> {
        let id = self.store.tables.category_seq.fetch_add(1, Ordering::SeqCst) + 1;
        category.assign_id(id);
        self.store.tables.categories.insert(id, category.clone());
        Ok(category)
    }

    async fn update(&self, category: &Category) -> Result<()> {
        if let Some(id) = category.id() {
            if let Some(mut stored) = self.store.tables.categories.get_mut(&id) {
                *stored = category.clone();
            }
        }
        Ok(())
    }

    async fn delete(&self, id: i32) -> Result<()> {
        if self.store.tables.categories.remove(&id).is_some() {
            self.store
                .tables
                .tasks
                .retain(|_, task| task.category_id() != id);
        }
        Ok(())
    }

    async fn exists(&self, id: i32) -> Result<bool> {
        Ok(self.store.tables.categories.contains_key(&id))
    }
}

#[derive(Clone)]
pub struct InMemoryTaskRepository {
    store: MemoryStore,
}

impl InMemoryTaskRepository {
    fn filtered(&self, keep: impl Fn(&Task) -> bool) -> Vec<Task> {
        sorted(&self.store.tables.tasks, Task::id)
            .into_iter()
            .filter(|task| keep(task))
            .collect()
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn get_by_id(&self, id: i32) -> Result<Option<Task>> {
        Ok(self
            .store
            .tables
            .tasks
            .get(&id)
            .map(|entry| entry.value().clone()))
    }

    async fn get_all(&self) -> Result<Vec<Task>> {
        Ok(sorted(&self.store.tables.tasks, Task::id))
    }

    async fn get_by_category(&self, category_id: i32) -> Result<Vec<Task>> {
        Ok(self.filtered(|task| task.category_id() == category_id))
    }

    async fn get_by_assignee(&self, assigned_to: i32) -> Result<Vec<Task>> {
        Ok(self.filtered(|task| task.assigned_to() == assigned_to))
    }

    async fn get_paged(&self, page: PageRequest) -> Result<PagedResult<Task>> {
        Ok(paginate(self.get_all().await?, page))
    }

    async fn add(&self, mut task: Task) -> Result<Task> {
        let id = self.store.tables.task_seq.fetch_add(1, Ordering::SeqCst) + 1;
        task.assign_id(id);
        self.store.tables.tasks.insert(id, task.clone());
        Ok(task)
    }

    async fn update(&self, task: &Task) -> Result<()> {
        if let Some(id) = task.id() {
            if let Some(mut stored) = self.store.tables.tasks.get_mut(&id) {
                *stored = task.clone();
            }
        }
        Ok(())
    }

    async fn delete(&self, id: i32) -> Result<()> {
        self.store.tables.tasks.remove(&id);
        Ok(())
    }

    async fn exists(&self, id: i32) -> Result<bool> {
        Ok(self.store.tables.tasks.contains_key(&id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{category::category_models::CategoryColor, task::task_models::NewTask};

    async fn seed_category(repo: &InMemoryCategoryRepository, name: &str) -> Category {
        repo.add(Category::create(name, None, CategoryColor::Blue).unwrap())
            .await
            .unwrap()
    }

    async fn seed_task(repo: &InMemoryTaskRepository, title: &str, category_id: i32) -> Task {
        let task = Task::create(NewTask {
            title: title.into(),
            category_id: Some(category_id),
            ..Default::default()
        })
        .unwrap();
        repo.add(task).await.unwrap()
    }

    #[tokio::test]
    async fn test_add_assigns_sequential_ids() {
        let store = MemoryStore::new();
        let categories = store.category_repository();

        let first = seed_category(&categories, "Work").await;
        let second = seed_category(&categories, "Home").await;

        assert_eq!(first.id(), Some(1));
        assert_eq!(second.id(), Some(2));
        assert!(categories.exists(2).await.unwrap());
        assert!(!categories.exists(3).await.unwrap());
    }

    #[tokio::test]
    async fn test_get_paged_orders_by_id() {
        let store = MemoryStore::new();
        let categories = store.category_repository();
        for name in ["A", "B", "C"] {
            seed_category(&categories, name).await;
        }

        let first = categories
            .get_paged(PageRequest::new(1, 2).unwrap())
            .await
            .unwrap();
        let third = categories
            .get_paged(PageRequest::new(3, 2).unwrap())
            .await
            .unwrap();

        let names: Vec<_> = first.items.iter().map(|c| c.name().to_string()).collect();
        assert_eq!(names, vec!["A", "B"]);
        assert_eq!(first.total_count, 3);
        assert!(third.items.is_empty());
        assert_eq!(third.total_count, 3);
    }

    #[tokio::test]
    async fn test_update_replaces_stored_task() {
        let store = MemoryStore::new();
        let tasks = store.task_repository();
        let mut task = seed_task(&tasks, "Buy milk", 0).await;

        task.complete().unwrap();
        tasks.update(&task).await.unwrap();

        let stored = tasks.get_by_id(1).await.unwrap().unwrap();
        assert!(stored.is_completed());
    }

    #[tokio::test]
    async fn test_update_of_unsaved_task_is_ignored() {
        let store = MemoryStore::new();
        let tasks = store.task_repository();
        let unsaved = Task::create(NewTask::titled("Ghost")).unwrap();

        tasks.update(&unsaved).await.unwrap();

        assert!(tasks.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_deleting_category_cascades_to_tasks() {
        let store = MemoryStore::new();
        let categories = store.category_repository();
        let tasks = store.task_repository();
        let work = seed_category(&categories, "Work").await.id().unwrap();
        let home = seed_category(&categories, "Home").await.id().unwrap();
        seed_task(&tasks, "Report", work).await;
        seed_task(&tasks, "Dishes", home).await;
        seed_task(&tasks, "Loose end", 0).await;

        categories.delete(work).await.unwrap();

        assert!(categories.get_by_id(work).await.unwrap().is_none());
        assert!(tasks.get_by_category(work).await.unwrap().is_empty());
        assert_eq!(tasks.get_by_category(home).await.unwrap().len(), 1);
        assert_eq!(tasks.get_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_delete_missing_is_noop() {
        let store = MemoryStore::new();
        store.category_repository().delete(99).await.unwrap();
        store.task_repository().delete(99).await.unwrap();
    }

    #[tokio::test]
    async fn test_get_by_assignee() {
        let store = MemoryStore::new();
        let tasks = store.task_repository();
        for (title, assignee) in [("a", 1), ("b", 2), ("c", 1)] {
            let task = Task::create(NewTask {
                title: title.into(),
                assigned_to: Some(assignee),
                ..Default::default()
            })
            .unwrap();
            tasks.add(task).await.unwrap();
        }

        let titles: Vec<_> = tasks
            .get_by_assignee(1)
            .await
            .unwrap()
            .iter()
            .map(|t| t.title().to_string())
            .collect();
        assert_eq!(titles, vec!["a", "c"]);
    }
}
