//! In-memory source for tests and local runs.
//!
//! `MockRestSource` answers page requests from per-URL queues of scripted
//! responses. A URL with an empty (or no) queue answers with an empty final
//! page, so unscripted child tables simply render as empty.
//!
//! # Example
//!
//! ```ignore
//! use serde_json::json;
//! use supplier_sync::source::{MockRestSource, MockResponse, FetchError};
//!
//! let source = MockRestSource::new();
//! source.push_page("https://erp/suppliers", json!({
//!     "items": [{ "SupplierId": "1", "Supplier": "Acme" }],
//!     "hasMore": false
//! }));
//! source.push_failures("https://erp/suppliers/1/child/sites", 3, FetchError::transport("reset"));
//! ```

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use serde_json::Value;

use crate::source::client::{FetchError, Page, PageRequest, RestSource, SourceConnector};

/// One scripted answer.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// A JSON body, parsed as a page when served.
    Page(Value),
    /// A failed request.
    Fail(FetchError),
}

#[derive(Default)]
struct MockState {
    responses: HashMap<String, VecDeque<MockResponse>>,
    requests: Vec<PageRequest>,
    tokens: Vec<String>,
}

/// Scripted [`RestSource`]. Clones share state.
#[derive(Clone, Default)]
pub struct MockRestSource {
    state: Arc<Mutex<MockState>>,
}

impl MockRestSource {
    /// Create an empty mock source.
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queue a response for `url`.
    pub fn push(&self, url: &str, response: MockResponse) {
        self.state()
            .responses
            .entry(url.to_string())
            .or_default()
            .push_back(response);
    }

    /// Queue a page body for `url`.
    pub fn push_page(&self, url: &str, body: Value) {
        self.push(url, MockResponse::Page(body));
    }

    /// Queue `times` consecutive failures for `url`.
    pub fn push_failures(&self, url: &str, times: usize, error: FetchError) {
        for _ in 0..times {
            self.push(url, MockResponse::Fail(error.clone()));
        }
    }

    /// Every request served so far, in order.
    pub fn requests(&self) -> Vec<PageRequest> {
        self.state().requests.clone()
    }

    /// Number of requests served for `url`.
    pub fn request_count(&self, url: &str) -> usize {
        self.state().requests.iter().filter(|r| r.url == url).count()
    }

    /// Bearer tokens passed to [`SourceConnector::connect`].
    pub fn tokens(&self) -> Vec<String> {
        self.state().tokens.clone()
    }
}

#[async_trait]
impl RestSource for MockRestSource {
    async fn fetch_page(&self, request: &PageRequest) -> Result<Page, FetchError> {
        let next = {
            let mut state = self.state();
            state.requests.push(request.clone());
            state
                .responses
                .get_mut(&request.url)
                .and_then(VecDeque::pop_front)
        };

        match next {
            Some(MockResponse::Page(body)) => {
                serde_json::from_value(body).map_err(|e| FetchError::malformed(e.to_string()))
            }
            Some(MockResponse::Fail(e)) => Err(e),
            None => Ok(Page {
                items: Some(Vec::new()),
                has_more: false,
            }),
        }
    }
}

impl SourceConnector for MockRestSource {
    fn connect(&self, bearer_token: String) -> Arc<dyn RestSource> {
        self.state().tokens.push(bearer_token);
        Arc::new(self.clone())
    }
}
