use anyhow::{bail, Context};
use std::sync::Arc;

use crate::category::{category_repository::PgCategoryRepository, CategoryService};
use crate::db::DbPool;
use crate::domain::pagination::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::repositories::memory::MemoryStore;
use crate::task::{task_repository::PgTaskRepository, TaskService};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub category_service: CategoryService,
    pub task_service: TaskService,
}

impl AppState {
    pub fn with_postgres(config: Arc<Config>, db: DbPool) -> Self {
        Self {
            config,
            category_service: CategoryService::new(Arc::new(PgCategoryRepository::new(db.clone()))),
            task_service: TaskService::new(
                Arc::new(PgTaskRepository::new(db.clone())),
                Arc::new(PgCategoryRepository::new(db)),
            ),
        }
    }

    pub fn in_memory(config: Arc<Config>) -> Self {
        let store = MemoryStore::new();
        Self {
            config,
            category_service: CategoryService::new(Arc::new(store.category_repository())),
            task_service: TaskService::new(
                Arc::new(store.task_repository()),
                Arc::new(store.category_repository()),
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl std::str::FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> anyhow::Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            "memory" => Ok(StorageBackend::Memory),
            other => bail!("STORAGE_BACKEND must be 'postgres' or 'memory', got '{}'", other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub storage: StorageBackend,
    pub database_url: Option<String>,
    pub host: String,
    pub port: u16,
    pub default_page_size: u32,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let storage = match lookup("STORAGE_BACKEND") {
            Some(value) => value.parse()?,
            None => StorageBackend::Postgres,
        };

        let database_url = lookup("DATABASE_URL");
        if storage == StorageBackend::Postgres && database_url.is_none() {
            bail!("DATABASE_URL must be set when STORAGE_BACKEND is postgres");
        }

        let port: u16 = lookup("PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse()
            .context("PORT must be a port number")?;

        let default_page_size: u32 = match lookup("DEFAULT_PAGE_SIZE") {
            Some(value) => value
                .parse()
                .context("DEFAULT_PAGE_SIZE must be a number")?,
            None => DEFAULT_PAGE_SIZE,
        };
        if !(1..=MAX_PAGE_SIZE).contains(&default_page_size) {
            bail!("DEFAULT_PAGE_SIZE must be between 1 and {}", MAX_PAGE_SIZE);
        }

        Ok(Self {
            storage,
            database_url,
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port,
            default_page_size,
        })
    }

    #[cfg(test)]
    pub fn in_memory() -> Self {
        Self {
            storage: StorageBackend::Memory,
            database_url: None,
            host: "127.0.0.1".to_string(),
            port: 0,
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
