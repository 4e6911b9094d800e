//! Blog review lens: search blog posts about a product, cache them locally and
//! ask a language model how much of the coverage is advertising and what real
//! users like and dislike.

pub mod ai;
pub mod app;
pub mod config;
pub mod db;
pub mod desk;
pub mod error;
pub mod models;
pub mod search;
pub mod tui;

pub use desk::{AnalyzeOutcome, CachedView, ReviewDesk, SearchOutcome, Session};
pub use error::{AppError, Result};
