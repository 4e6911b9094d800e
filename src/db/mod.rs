mod repository;
mod schema;

pub use repository::{concatenate_posts, Repository, DEFAULT_POST_LIMIT};
