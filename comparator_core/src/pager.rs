//! Fixed-size pagination over a reading-log snapshot.
//!
//! Pure functions of the slice passed in; nothing is cached, so mutations of
//! the log are reflected on the next call. Page numbers are 1-based.
//! Callers are responsible for keeping the page number inside
//! [1, total_pages]; the pager does not clamp.

/// ceil(len / page_size). An empty log has zero displayable pages.
#[inline]
pub fn total_pages(len: usize, page_size: usize) -> usize {
    debug_assert!(page_size >= 1, "page_size must be >= 1");
    len.div_ceil(page_size.max(1))
}

/// The `page_no`-th page (1-based) of `items`.
pub fn page<T>(items: &[T], page_size: usize, page_no: usize) -> &[T] {
    debug_assert!(page_no >= 1, "page numbers are 1-based");
    debug_assert!(
        page_no <= total_pages(items.len(), page_size).max(1),
        "page {page_no} out of range"
    );
    let start = (page_no.max(1) - 1).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = (start + page_size).min(items.len());
    &items[start..end]
}
