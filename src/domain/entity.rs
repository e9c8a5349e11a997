use chrono::{DateTime, Duration, Utc};

/// Identity and timestamp lifecycle shared by every entity.
///
/// The identifier is `None` until the persistence layer assigns one, so two
/// entities that have never been saved are never considered the same.
#[derive(Debug, Clone)]
pub struct EntityMeta {
    id: Option<i32>,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

impl EntityMeta {
    pub fn new() -> Self {
        Self {
            id: None,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    /// Rebuilds metadata for an entity loaded from storage.
    pub fn persisted(
        id: i32,
        created_at: DateTime<Utc>,
        updated_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id: Some(id),
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> Option<i32> {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    pub(crate) fn assign_id(&mut self, id: i32) {
        self.id = Some(id);
    }

    /// Stamps the update time and returns it.
    ///
    /// The stamp is strictly later than both the creation time and any
    /// previous update stamp, even when the wall clock has not moved.
    pub(crate) fn mark_updated(&mut self) -> DateTime<Utc> {
        let floor = self.updated_at.unwrap_or(self.created_at);
        let now = Utc::now();
        let stamp = if now > floor {
            now
        } else {
            floor + Duration::microseconds(1)
        };
        self.updated_at = Some(stamp);
        stamp
    }

    pub fn same_identity(&self, other: &EntityMeta) -> bool {
        matches!((self.id, other.id), (Some(a), Some(b)) if a == b)
    }
}

impl Default for EntityMeta {
    fn default() -> Self {
        Self::new()
    }
}
