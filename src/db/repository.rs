use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension, Row};
use tokio_rusqlite::Connection;

use crate::error::Result;
use crate::models::{AnalysisResult, BlogPost, NewBlogPost};

use super::schema::SCHEMA;

/// Default number of cached posts fed to the analyzer.
pub const DEFAULT_POST_LIMIT: usize = 50;

pub struct Repository {
    conn: Connection,
}

impl Repository {
    /// Open the store at `db_path`, creating the file and tables on first use.
    pub async fn open(db_path: impl AsRef<Path>) -> Result<Self> {
        let db_path = db_path.as_ref();
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(db_path).await?;
        Self::with_connection(conn).await
    }

    pub async fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().await?;
        Self::with_connection(conn).await
    }

    async fn with_connection(conn: Connection) -> Result<Self> {
        conn.call(|conn| {
            conn.execute_batch(SCHEMA)?;
            Ok(())
        })
        .await?;

        Ok(Self { conn })
    }

    pub async fn close(self) -> Result<()> {
        self.conn.close().await?;
        Ok(())
    }

    /// Delete the backing file. Returns false when there was nothing to delete.
    pub fn reset(db_path: impl AsRef<Path>) -> Result<bool> {
        match std::fs::remove_file(db_path.as_ref()) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    // Post operations

    /// Swap the cached generation of posts for `product_name` with `posts`.
    pub async fn replace_posts(&self, product_name: &str, posts: Vec<NewBlogPost>) -> Result<usize> {
        let product_name = product_name.to_string();
        let inserted = self
            .conn
            .call(move |conn| {
                let tx = conn.transaction()?;
                tx.execute(
                    "DELETE FROM blog_posts WHERE product_name = ?1",
                    params![product_name],
                )?;
                {
                    let mut stmt = tx.prepare(
                        r#"INSERT INTO blog_posts (product_name, title, description, link, blogger_name, post_date)
                           VALUES (?1, ?2, ?3, ?4, ?5, ?6)"#,
                    )?;
                    for post in &posts {
                        stmt.execute(params![
                            product_name,
                            post.title,
                            post.description,
                            post.link,
                            post.blogger_name,
                            post.post_date,
                        ])?;
                    }
                }
                tx.commit()?;
                Ok(posts.len())
            })
            .await?;

        tracing::debug!("Stored {} posts", inserted);
        Ok(inserted)
    }

    pub async fn get_posts(&self, product_name: &str, limit: usize) -> Result<Vec<BlogPost>> {
        let product_name = product_name.to_string();
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let posts = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    r#"SELECT id, product_name, title, description, link, blogger_name, post_date, created_at
                       FROM blog_posts
                       WHERE product_name = ?1
                       ORDER BY id
                       LIMIT ?2"#,
                )?;
                let posts = stmt
                    .query_map(params![product_name, limit], post_from_row)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(posts)
            })
            .await?;
        Ok(posts)
    }

    // Analysis operations

    /// Upsert keyed by `result.product_name`; the UNIQUE constraint keeps one row per product.
    pub async fn replace_analysis(&self, result: AnalysisResult) -> Result<()> {
        self.conn
            .call(move |conn| {
                conn.execute(
                    r#"INSERT INTO analysis_results (product_name, positive_opinions, negative_opinions, summary, created_at)
                       VALUES (?1, ?2, ?3, ?4, ?5)
                       ON CONFLICT(product_name) DO UPDATE SET
                           positive_opinions = excluded.positive_opinions,
                           negative_opinions = excluded.negative_opinions,
                           summary = excluded.summary,
                           created_at = excluded.created_at"#,
                    params![
                        result.product_name,
                        result.positive_opinions,
                        result.negative_opinions,
                        result.summary,
                        result.created_at.to_rfc3339(),
                    ],
                )?;
                Ok(())
            })
            .await?;
        Ok(())
    }

    pub async fn get_analysis(&self, product_name: &str) -> Result<Option<AnalysisResult>> {
        let product_name = product_name.to_string();
        let analysis = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    r#"SELECT product_name, positive_opinions, negative_opinions, summary, created_at
                       FROM analysis_results
                       WHERE product_name = ?1"#,
                )?;
                let analysis = stmt
                    .query_row(params![product_name], analysis_from_row)
                    .optional()?;
                Ok(analysis)
            })
            .await?;
        Ok(analysis)
    }

    #[cfg(test)]
    async fn count_analyses(&self, product_name: &str) -> Result<i64> {
        let product_name = product_name.to_string();
        let count = self
            .conn
            .call(move |conn| {
                let count: i64 = conn.query_row(
                    "SELECT COUNT(*) FROM analysis_results WHERE product_name = ?1",
                    params![product_name],
                    |row| row.get(0),
                )?;
                Ok(count)
            })
            .await?;
        Ok(count)
    }
}

/// Render posts as the single document the analyzer reads.
pub fn concatenate_posts(posts: &[BlogPost]) -> String {
    posts
        .iter()
        .map(|post| {
            format!(
                "Title: {}\nContent: {}\nAuthor: {}\nDate: {}",
                post.title, post.description, post.blogger_name, post.post_date
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    // Try RFC3339 first (e.g., "2026-01-11T12:34:56+00:00")
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    // Try SQLite datetime format (e.g., "2026-01-11 12:34:56")
    if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    None
}

fn post_from_row(row: &Row) -> rusqlite::Result<BlogPost> {
    Ok(BlogPost {
        id: row.get(0)?,
        product_name: row.get(1)?,
        title: row.get(2)?,
        description: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
        link: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
        blogger_name: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
        post_date: row.get::<_, Option<String>>(6)?.unwrap_or_default(),
        created_at: row
            .get::<_, String>(7)
            .ok()
            .and_then(|s| parse_datetime(&s))
            .unwrap_or_else(Utc::now),
    })
}

fn analysis_from_row(row: &Row) -> rusqlite::Result<AnalysisResult> {
    Ok(AnalysisResult {
        product_name: row.get(0)?,
        positive_opinions: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
        negative_opinions: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        summary: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
        created_at: row
            .get::<_, String>(4)
            .ok()
            .and_then(|s| parse_datetime(&s))
            .unwrap_or_else(Utc::now),
    })
}
