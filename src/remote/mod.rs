mod client;
mod fixtures;

pub use client::{FetchError, NewsClient, NewsResponse, DEFAULT_BASE_URL, DEFAULT_PAGE_SIZE};
