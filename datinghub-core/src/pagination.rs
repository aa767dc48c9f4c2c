//! Lenient page slicing for listings.

use serde::Serialize;

/// One page of a listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number actually served
    pub number: usize,
    pub num_pages: usize,
    pub total: usize,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn next_page_number(&self) -> Option<usize> {
        self.has_next().then_some(self.number + 1)
    }

    pub fn previous_page_number(&self) -> Option<usize> {
        self.has_previous().then_some(self.number - 1)
    }
}

/// Slice `items` into the requested page.
///
/// A missing or unparsable page number serves page 1 and a number past the
/// end serves the last page. An empty listing still has one (empty) page.
pub fn paginate<T>(items: Vec<T>, per_page: usize, requested: Option<&str>) -> Page<T> {
    let per_page = per_page.max(1);
    let total = items.len();
    let num_pages = total.div_ceil(per_page).max(1);

    let number = requested
        .and_then(|raw| raw.trim().parse::<usize>().ok())
        .map(|n| n.clamp(1, num_pages))
        .unwrap_or(1);

    let items = items
        .into_iter()
        .skip((number - 1) * per_page)
        .take(per_page)
        .collect();

    Page {
        items,
        number,
        num_pages,
        total,
    }
}
