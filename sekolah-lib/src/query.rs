use serde::{Serialize, Deserialize};

pub const DEFAULT_LIMIT: u32 = 10;
pub const MAX_LIMIT: u32 = 100;

/// pagination block returned alongside every list response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    #[serde(default)]
    pub total_items: u64,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default = "first_page")]
    pub current_page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn first_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

impl Metadata {
    /// the safe state a list falls back to when nothing could be loaded
    pub fn first_page(limit: u32) -> Self {
        Metadata {
            total_items: 0,
            total_pages: 1,
            current_page: 1,
            limit: clamp_limit(limit),
        }
    }

    /// repairs metadata so that `current_page` lies within
    /// `[1, total_pages]` whenever there are pages at all
    pub fn normalized(mut self) -> Self {
        if self.limit == 0 {
            self.limit = DEFAULT_LIMIT;
        }

        if self.total_pages == 0 && self.total_items > 0 {
            self.total_pages = total_pages(self.total_items, self.limit);
        }

        if self.current_page == 0 {
            self.current_page = 1;
        }

        if self.total_pages > 0 && self.current_page > self.total_pages {
            self.current_page = self.total_pages;
        }

        self
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub fn has_prev(&self) -> bool {
        self.current_page > 1
    }
}

impl Default for Metadata {
    fn default() -> Self {
        Metadata::first_page(DEFAULT_LIMIT)
    }
}

/// page/limit pair sent as query parameters on list requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageQuery {
    pub page: u32,
    pub limit: u32,
}

impl PageQuery {
    pub fn new(page: u32, limit: u32) -> Self {
        PageQuery {
            page: page.max(1),
            limit: clamp_limit(limit),
        }
    }
}

impl Default for PageQuery {
    fn default() -> Self {
        PageQuery::new(1, DEFAULT_LIMIT)
    }
}

pub fn clamp_limit(limit: u32) -> u32 {
    if limit == 0 {
        DEFAULT_LIMIT
    } else {
        limit.min(MAX_LIMIT)
    }
}

pub fn total_pages(total_items: u64, limit: u32) -> u32 {
    let limit = clamp_limit(limit) as u64;
    let pages = (total_items + limit - 1) / limit;

    pages.try_into().unwrap_or(u32::MAX)
}

/// the page to show after removing one item from `current_page`.
///
/// when the removed item was the only one on a page past the first, the
/// page would come back empty so the previous page is used instead.
pub fn page_after_removal(current_page: u32, items_on_page: usize) -> u32 {
    if current_page > 1 && items_on_page <= 1 {
        current_page - 1
    } else {
        current_page.max(1)
    }
}
