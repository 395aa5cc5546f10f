//! Pagination envelope for list endpoints.

use serde::{Deserialize, Serialize};

/// Pagination metadata returned alongside parcel listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_parcels: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    /// Compute the envelope for a page of results.
    ///
    /// `page` is 1-based. A zero total yields zero pages with neither
    /// neighbor flag set.
    #[must_use]
    pub fn compute(page: u32, page_size: u32, total: u64) -> Self {
        let page_size = u64::from(page_size.max(1));
        let total_pages = u32::try_from(total.div_ceil(page_size)).unwrap_or(u32::MAX);

        Self {
            current_page: page,
            total_pages,
            total_parcels: total,
            has_next: page < total_pages,
            has_prev: page > 1,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_middle_page() {
        let p = Pagination::compute(2, 10, 25);
        assert_eq!(p.current_page, 2);
        assert_eq!(p.total_pages, 3);
        assert_eq!(p.total_parcels, 25);
        assert!(p.has_next);
        assert!(p.has_prev);
    }

    #[test]
    fn test_first_page() {
        let p = Pagination::compute(1, 10, 25);
        assert!(p.has_next);
        assert!(!p.has_prev);
    }

    #[test]
    fn test_last_page() {
        let p = Pagination::compute(3, 10, 25);
        assert!(!p.has_next);
        assert!(p.has_prev);
    }

    #[test]
    fn test_exact_multiple() {
        let p = Pagination::compute(2, 10, 20);
        assert_eq!(p.total_pages, 2);
        assert!(!p.has_next);
    }

    #[test]
    fn test_empty_result() {
        let p = Pagination::compute(1, 10, 0);
        assert_eq!(p.total_pages, 0);
        assert!(!p.has_next);
        assert!(!p.has_prev);
    }

    #[test]
    fn test_serde_camel_case() {
        let p = Pagination::compute(2, 10, 25);
        let json = serde_json::to_value(p).unwrap();
        assert_eq!(json["currentPage"], 2);
        assert_eq!(json["totalParcels"], 25);
        assert_eq!(json["hasNext"], true);
        assert_eq!(json["hasPrev"], true);
    }
}
