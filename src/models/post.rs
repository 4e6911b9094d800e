use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A cached search hit, owned by one product name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogPost {
    pub id: i64,
    pub product_name: String,
    pub title: String,
    pub description: String,
    pub link: String,
    pub blogger_name: String,
    pub post_date: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBlogPost {
    pub title: String,
    pub description: String,
    pub link: String,
    pub blogger_name: String,
    pub post_date: String,
}

impl From<BlogPost> for NewBlogPost {
    fn from(post: BlogPost) -> Self {
        NewBlogPost {
            title: post.title,
            description: post.description,
            link: post.link,
            blogger_name: post.blogger_name,
            post_date: post.post_date,
        }
    }
}

/// One page of search results as reported by the search API.
#[derive(Debug, Clone, Default)]
pub struct SearchPage {
    pub total: u64,
    pub start: u32,
    pub display: u32,
    pub items: Vec<NewBlogPost>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    #[default]
    Newest,
    Relevance,
}

impl SortMode {
    /// Value of the search API's `sort` parameter.
    pub fn as_param(&self) -> &'static str {
        match self {
            SortMode::Newest => "date",
            SortMode::Relevance => "sim",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortMode::Newest => "Newest",
            SortMode::Relevance => "Relevance",
        }
    }

    pub fn cycle(&self) -> Self {
        match self {
            SortMode::Newest => SortMode::Relevance,
            SortMode::Relevance => SortMode::Newest,
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortMode::Newest => "newest",
            SortMode::Relevance => "relevance",
        })
    }
}

impl FromStr for SortMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "newest" | "date" => Ok(SortMode::Newest),
            "relevance" | "sim" => Ok(SortMode::Relevance),
            other => Err(format!("unknown sort mode '{other}' (expected newest or relevance)")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_mode_maps_to_api_values() {
        assert_eq!(SortMode::Newest.as_param(), "date");
        assert_eq!(SortMode::Relevance.as_param(), "sim");
        assert_eq!("sim".parse::<SortMode>().unwrap(), SortMode::Relevance);
        assert_eq!("Newest".parse::<SortMode>().unwrap(), SortMode::Newest);
        assert!("oldest".parse::<SortMode>().is_err());
    }

    #[test]
    fn sort_mode_cycles_between_both_modes() {
        assert_eq!(SortMode::Newest.cycle(), SortMode::Relevance);
        assert_eq!(SortMode::Newest.cycle().cycle(), SortMode::Newest);
    }
}
