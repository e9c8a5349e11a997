use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::category::category_dto::CategoryResponse;
use crate::domain::{DomainError, PageRequest, PagedResult};
use crate::task::task_dto::TaskResponse;

/// Query string of the `/paged` endpoints.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// 1-based page number (defaults to 1)
    pub page_number: Option<u32>,
    /// Items per page, 1 to 100 (defaults to the configured page size)
    pub page_size: Option<u32>,
}

impl PageQuery {
    pub fn into_page_request(self, default_page_size: u32) -> Result<PageRequest, DomainError> {
        PageRequest::new(
            self.page_number.unwrap_or(1),
            self.page_size.unwrap_or(default_page_size),
        )
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[aliases(
    PaginatedCategories = PaginatedResponse<CategoryResponse>,
    PaginatedTasks = PaginatedResponse<TaskResponse>
)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub total_count: u64,
    pub page_number: u32,
    pub page_size: u32,
    pub total_pages: u64,
}

impl<T, U: From<T>> From<PagedResult<T>> for PaginatedResponse<U> {
    fn from(page: PagedResult<T>) -> Self {
        let total_pages = page.total_pages();
        let page = page.map(U::from);
        Self {
            items: page.items,
            total_count: page.total_count,
            page_number: page.page_number,
            page_size: page.page_size,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_query_defaults() {
        let request = PageQuery::default().into_page_request(20).unwrap();
        assert_eq!(request.page_number(), 1);
        assert_eq!(request.page_size(), 20);
    }

    #[test]
    fn test_page_query_rejects_oversized_page() {
        let query = PageQuery {
            page_number: Some(1),
            page_size: Some(500),
        };
        assert!(query.into_page_request(20).is_err());
    }
}
