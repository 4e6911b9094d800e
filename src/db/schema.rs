pub const SCHEMA: &str = r#"
-- blog_posts table: one generation of search hits per product
CREATE TABLE IF NOT EXISTS blog_posts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    product_name TEXT NOT NULL,
    title TEXT NOT NULL,
    description TEXT,
    link TEXT,
    blogger_name TEXT,
    post_date TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_blog_posts_product_name ON blog_posts(product_name);

-- analysis_results table: single row per product
CREATE TABLE IF NOT EXISTS analysis_results (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    product_name TEXT NOT NULL UNIQUE,
    positive_opinions TEXT,
    negative_opinions TEXT,
    summary TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;
