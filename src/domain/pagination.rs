use validator::Validate;

use super::DomainError;

/// Page size used when a caller does not ask for one.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Largest page a caller may request.
pub const MAX_PAGE_SIZE: u32 = 100;

/// A validated, 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Validate)]
pub struct PageRequest {
    #[validate(range(min = 1))]
    page_number: u32,
    #[validate(range(min = 1, max = 100))]
    page_size: u32,
}

impl PageRequest {
    pub fn new(page_number: u32, page_size: u32) -> Result<Self, DomainError> {
        let request = Self {
            page_number,
            page_size,
        };
        request.validate().map_err(|_| {
            if page_number < 1 {
                DomainError::validation("page_number", "Page number must be at least 1")
            } else {
                DomainError::validation(
                    "page_size",
                    format!("Page size must be between 1 and {}", MAX_PAGE_SIZE),
                )
            }
        })?;
        Ok(request)
    }

    pub fn page_number(&self) -> u32 {
        self.page_number
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Number of items that precede this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page_number - 1) * u64::from(self.page_size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page_number: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of an ordered collection together with the collection's size.
#[derive(Debug, Clone, PartialEq)]
pub struct PagedResult<T> {
    pub items: Vec<T>,
    pub total_count: u64,
    pub page_number: u32,
    pub page_size: u32,
}

impl<T> PagedResult<T> {
    pub fn new(items: Vec<T>, total_count: u64, request: PageRequest) -> Self {
        Self {
            items,
            total_count,
            page_number: request.page_number(),
            page_size: request.page_size(),
        }
    }

    pub fn total_pages(&self) -> u64 {
        self.total_count.div_ceil(u64::from(self.page_size.max(1)))
    }

    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> PagedResult<U> {
        PagedResult {
            items: self.items.into_iter().map(f).collect(),
            total_count: self.total_count,
            page_number: self.page_number,
            page_size: self.page_size,
        }
    }
}

/// Slices an already-ordered collection down to the requested page.
///
/// Pages past the end are empty but still report the full count.
pub fn paginate<T>(items: Vec<T>, request: PageRequest) -> PagedResult<T> {
    let total_count = items.len() as u64;
    let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
    let page = items
        .into_iter()
        .skip(offset)
        .take(request.page_size as usize)
        .collect();
    PagedResult::new(page, total_count, request)
}
