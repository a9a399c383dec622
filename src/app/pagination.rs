//! In-memory pagination over a full upstream result.

use crate::domain::PageRequest;

/// One slice of a larger list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Length of the full list
    pub total: usize,
    /// `ceil(total / limit)`; zero exactly when `total` is zero
    pub total_pages: usize,
}

/// Slice `items[(page-1)*limit .. (page-1)*limit + limit]`, keeping order.
///
/// Pages past the end yield an empty slice rather than an error.
#[must_use]
pub fn paginate<T>(items: Vec<T>, request: PageRequest) -> Page<T> {
    let total = items.len();
    let limit = request.limit as usize;
    if limit == 0 {
        return Page {
            items: Vec::new(),
            total,
            total_pages: 0,
        };
    }

    let start = (request.page.max(1) as usize - 1).saturating_mul(limit);
    let items = items.into_iter().skip(start).take(limit).collect();

    Page {
        items,
        total,
        total_pages: total.div_ceil(limit),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(page: u32, limit: u32) -> PageRequest {
        PageRequest { page, limit }
    }

    #[test]
    fn test_middle_page() {
        let page = paginate((0..12).collect::<Vec<_>>(), req(2, 5));
        assert_eq!(page.items, vec![5, 6, 7, 8, 9]);
        assert_eq!(page.total, 12);
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn test_last_partial_page() {
        let page = paginate((0..12).collect::<Vec<_>>(), req(3, 5));
        assert_eq!(page.items, vec![10, 11]);
    }

    #[test]
    fn test_page_past_end_is_empty() {
        let page = paginate(vec!['a', 'b', 'c'], req(5, 5));
        assert!(page.items.is_empty());
        assert_eq!(page.total, 3);
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn test_empty_list_has_zero_pages() {
        let page = paginate(Vec::<u8>::new(), req(1, 10));
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 0);
    }

    #[test]
    fn test_huge_page_number_does_not_overflow() {
        let page = paginate(vec![1, 2, 3], req(u32::MAX, 50));
        assert!(page.items.is_empty());
    }

    #[test]
    fn test_length_and_page_count_over_grid() {
        for len in 0..40usize {
            for limit in crate::domain::ALLOWED_LIMITS {
                for p in 1..12u32 {
                    let page = paginate((0..len).collect::<Vec<_>>(), req(p, limit));
                    let skipped = (p as usize - 1) * limit as usize;
                    let expected = (limit as usize).min(len.saturating_sub(skipped));
                    assert_eq!(page.items.len(), expected, "len={len} limit={limit} p={p}");
                    assert_eq!(page.total_pages, len.div_ceil(limit as usize));
                    assert_eq!(page.total_pages == 0, len == 0);
                    if let Some(first) = page.items.first() {
                        assert_eq!(*first, skipped);
                    }
                }
            }
        }
    }
}
