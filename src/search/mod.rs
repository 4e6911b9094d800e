mod client;

pub use client::{strip_markup, SearchClient, SearchQuery, DEFAULT_SEARCH_API_URL, MAX_DISPLAY};
