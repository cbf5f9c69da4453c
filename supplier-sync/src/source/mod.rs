//! Source side of the pipeline: authentication, paging and child tables.

mod auth;
mod child_tables;
mod client;
mod mock;
mod pager;
mod retry;

pub use auth::{OAuthCredentials, OAuthTokenProvider, TokenProvider};
pub use child_tables::{ChildTable, ChildTableFetcher};
pub use client::{
    FetchError, FusionClient, FusionConnector, Page, PageRequest, RestSource, SourceConnector,
};
pub use mock::{MockResponse, MockRestSource};
pub use pager::{PageCursor, PageStep, Pager, PagerQuery, PAGE_SIZE};
pub use retry::{RetryPolicy, DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DELAY};
