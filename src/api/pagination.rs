//! Review-list pagination with lenient page resolution: whatever arrives in
//! the `page` query parameter, the reader always lands on a valid page.

/// One page of an item list, produced by [`Paginator::get_page`].
#[derive(Debug)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number after clamping.
    pub number: usize,
    pub num_pages: usize,
    pub total: usize,
}

impl<T> Page<T> {
    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn previous_page_number(&self) -> usize {
        self.number.saturating_sub(1).max(1)
    }

    pub fn next_page_number(&self) -> usize {
        (self.number + 1).min(self.num_pages)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Paginator {
    per_page: usize,
}

impl Paginator {
    pub fn new(per_page: usize) -> Self {
        debug_assert!(per_page > 0, "per_page must be greater than 0");
        Self { per_page }
    }

    /// An empty list still has one (empty) page.
    pub fn num_pages(&self, total: usize) -> usize {
        if total == 0 {
            1
        } else {
            total.div_ceil(self.per_page)
        }
    }

    /// Resolve a raw `page` query value: missing or non-integer input goes
    /// to the first page, an out-of-range number (including zero and
    /// negatives) to the last page.
    fn resolve(&self, requested: Option<&str>, num_pages: usize) -> usize {
        let raw = match requested {
            Some(raw) => raw,
            None => return 1,
        };
        match raw.trim().parse::<i64>() {
            Err(_) => 1,
            Ok(n) if n < 1 => num_pages,
            Ok(n) => usize::try_from(n).unwrap_or(usize::MAX).min(num_pages),
        }
    }

    /// Slice out the requested page of `items`.
    pub fn get_page<T>(&self, mut items: Vec<T>, requested: Option<&str>) -> Page<T> {
        let total = items.len();
        let num_pages = self.num_pages(total);
        let number = self.resolve(requested, num_pages);

        let start = (number - 1) * self.per_page;
        let end = (start + self.per_page).min(total);
        let items = if start >= total {
            Vec::new()
        } else {
            items.drain(start..end).collect()
        };

        Page {
            items,
            number,
            num_pages,
            total,
        }
    }
}
