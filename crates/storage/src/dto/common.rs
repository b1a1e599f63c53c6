use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Clone, Copy, Deserialize, IntoParams, ToSchema)]
pub struct PaginationParams {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    50
}

impl PaginationParams {
    pub fn validate(&self) -> Result<(), String> {
        if self.page < 1 {
            return Err("page must be >= 1".to_string());
        }
        if self.page_size < 1 || self.page_size > 100 {
            return Err("page_size must be between 1 and 100".to_string());
        }
        Ok(())
    }

    /// Saturates instead of overflowing on pages far past the end.
    pub fn offset(&self) -> usize {
        (self.page.saturating_sub(1) as usize).saturating_mul(self.limit())
    }

    pub fn limit(&self) -> usize {
        self.page_size as usize
    }

    /// Cuts the requested page out of an already ordered list.
    pub fn paginate<T: Clone>(&self, items: &[T]) -> PaginatedResponse<T> {
        let data = items
            .iter()
            .skip(self.offset())
            .take(self.limit())
            .cloned()
            .collect();

        PaginatedResponse::new(data, self.page, self.page_size, items.len() as i64)
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginationMeta {
    pub page: u32,
    pub page_size: u32,
    pub total_items: i64,
    pub total_pages: u32,
}

impl PaginationMeta {
    pub fn new(page: u32, page_size: u32, total_items: i64) -> Self {
        let total_pages = ((total_items as f64) / (page_size as f64)).ceil() as u32;
        Self {
            page,
            page_size,
            total_items,
            total_pages,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, page: u32, page_size: u32, total_items: i64) -> Self {
        Self {
            data,
            pagination: PaginationMeta::new(page, page_size, total_items),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paginate_second_page() {
        let params = PaginationParams { page: 2, page_size: 3 };
        let items: Vec<u32> = (1..=8).collect();

        let page = params.paginate(&items);

        assert_eq!(page.data, vec![4, 5, 6]);
        assert_eq!(page.pagination.total_items, 8);
        assert_eq!(page.pagination.total_pages, 3);
    }

    #[test]
    fn test_paginate_past_the_end_is_empty() {
        let params = PaginationParams { page: 5, page_size: 10 };
        let page = params.paginate(&[1, 2, 3]);
        assert!(page.data.is_empty());
        assert_eq!(page.pagination.total_pages, 1);
    }

    #[test]
    fn test_page_size_bounds() {
        assert!(PaginationParams { page: 1, page_size: 0 }.validate().is_err());
        assert!(PaginationParams { page: 1, page_size: 101 }.validate().is_err());
        assert!(PaginationParams { page: 0, page_size: 10 }.validate().is_err());
        assert!(PaginationParams { page: 1, page_size: 100 }.validate().is_ok());
    }

    #[test]
    fn test_huge_page_number_is_empty() {
        let params = PaginationParams { page: 50_000_000, page_size: 100 };
        assert!(params.validate().is_ok());

        let page = params.paginate(&[1, 2, 3]);
        assert!(page.data.is_empty());
        assert_eq!(page.pagination.page, 50_000_000);

        let last = PaginationParams { page: u32::MAX, page_size: 100 };
        assert!(last.paginate(&[1, 2, 3]).data.is_empty());
    }
}
