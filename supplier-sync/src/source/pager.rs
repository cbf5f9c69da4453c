//! Offset pagination over a [`RestSource`].

use std::sync::Arc;

use supplier_sync_shared::Item;

use crate::source::client::{FetchError, Page, PageRequest, RestSource};

/// Items requested per page.
pub const PAGE_SIZE: usize = 100;

/// Pagination state for one resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    pub offset: usize,
    pub has_more: bool,
    pub page_size: usize,
}

impl Default for PageCursor {
    fn default() -> Self {
        Self {
            offset: 0,
            has_more: true,
            page_size: PAGE_SIZE,
        }
    }
}

impl PageCursor {
    fn advance(&mut self, has_more: bool) {
        self.offset += self.page_size;
        self.has_more = has_more;
    }

    fn finish(&mut self) {
        self.has_more = false;
    }
}

/// Query refinements applied to every page request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PagerQuery {
    pub fields: Vec<String>,
    pub order_by: Option<String>,
}

impl PagerQuery {
    pub fn fields<S: AsRef<str>>(fields: &[S]) -> Self {
        Self {
            fields: fields.iter().map(|f| f.as_ref().to_string()).collect(),
            order_by: None,
        }
    }

    /// Order results by `field`, newest first.
    pub fn order_by_desc(mut self, field: &str) -> Self {
        self.order_by = Some(format!("{}:desc", field));
        self
    }
}

/// Outcome of one pagination step.
#[derive(Debug)]
pub enum PageStep {
    /// A page of items. More may follow.
    Batch(Vec<Item>),
    /// The server reported no further data.
    Exhausted,
    /// The request failed. The pager is finished; the caller decides what it means.
    Failed(FetchError),
}

/// Walks a paginated resource one page at a time.
///
/// The sequence is finite and cannot be restarted. [`Pager::next_batch`] performs
/// a single request with no retry; callers wanting retry drive
/// [`Pager::fetch_current`] and [`Pager::accept`] themselves.
pub struct Pager {
    source: Arc<dyn RestSource>,
    url: String,
    query: PagerQuery,
    cursor: PageCursor,
}

impl Pager {
    pub fn new(source: Arc<dyn RestSource>, url: impl Into<String>, query: PagerQuery) -> Self {
        Self {
            source,
            url: url.into(),
            query,
            cursor: PageCursor::default(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn cursor(&self) -> PageCursor {
        self.cursor
    }

    pub fn has_more(&self) -> bool {
        self.cursor.has_more
    }

    /// The request for the page at the current offset.
    pub fn request(&self) -> PageRequest {
        let mut query = vec![
            ("limit".to_string(), self.cursor.page_size.to_string()),
            ("onlyData".to_string(), "true".to_string()),
            ("totalResults".to_string(), "true".to_string()),
        ];
        if !self.query.fields.is_empty() {
            query.push(("fields".to_string(), self.query.fields.join(",")));
        }
        if let Some(order_by) = &self.query.order_by {
            query.push(("orderBy".to_string(), order_by.clone()));
        }
        query.push(("offset".to_string(), self.cursor.offset.to_string()));

        PageRequest {
            url: self.url.clone(),
            query,
        }
    }

    /// Issue the request for the current offset without moving the cursor.
    pub async fn fetch_current(&self) -> Result<Page, FetchError> {
        self.source.fetch_page(&self.request()).await
    }

    /// Fold a fetched page into the cursor.
    ///
    /// Returns `None` when the page carried no item list, which finishes the pager.
    pub fn accept(&mut self, page: Page) -> Option<Vec<Item>> {
        match page.items {
            Some(items) => {
                self.cursor.advance(page.has_more);
                Some(items)
            }
            None => {
                self.cursor.finish();
                None
            }
        }
    }

    /// Stop paging after a failed request.
    pub fn abandon(&mut self) {
        self.cursor.finish();
    }

    /// Fetch the next page.
    pub async fn next_batch(&mut self) -> PageStep {
        if !self.cursor.has_more {
            return PageStep::Exhausted;
        }
        match self.fetch_current().await {
            Ok(page) => match self.accept(page) {
                Some(items) => PageStep::Batch(items),
                None => PageStep::Exhausted,
            },
            Err(e) => {
                self.abandon();
                PageStep::Failed(e)
            }
        }
    }
}
