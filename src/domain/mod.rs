pub mod entity;
pub mod error;
pub mod pagination;
pub mod patch;

pub use entity::EntityMeta;
pub use error::DomainError;
pub use pagination::{paginate, PageRequest, PagedResult};
pub use patch::Patch;
