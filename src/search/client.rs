use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use crate::config::SearchCredentials;
use crate::error::{AppError, Result};
use crate::models::{NewBlogPost, SearchPage, SortMode};

pub const DEFAULT_SEARCH_API_URL: &str = "https://openapi.naver.com/v1/search";

pub const MIN_DISPLAY: u32 = 1;
pub const MAX_DISPLAY: u32 = 100;
const MAX_START: u32 = 1000;

/// Parameters of one blog search. Counts are clamped to what the API accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub query: String,
    pub display: u32,
    pub start: u32,
    pub sort: SortMode,
}

impl SearchQuery {
    pub fn new(query: impl Into<String>, count: u32, sort: SortMode) -> Self {
        Self {
            query: query.into(),
            display: count.clamp(MIN_DISPLAY, MAX_DISPLAY),
            start: 1,
            sort,
        }
    }

    pub fn starting_at(mut self, start: u32) -> Self {
        self.start = start.clamp(1, MAX_START);
        self
    }
}

#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    #[serde(default)]
    total: u64,
    #[serde(default)]
    start: u32,
    #[serde(default)]
    display: u32,
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    title: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    bloggername: String,
    #[serde(default)]
    postdate: String,
}

impl From<SearchItem> for NewBlogPost {
    fn from(item: SearchItem) -> Self {
        NewBlogPost {
            title: strip_markup(&item.title),
            description: strip_markup(&item.description),
            link: item.link,
            blogger_name: item.bloggername,
            post_date: item.postdate,
        }
    }
}

/// Remove the highlight tags and quote entity the search API embeds in text fields.
pub fn strip_markup(text: &str) -> String {
    text.replace("<b>", "")
        .replace("</b>", "")
        .replace("&quot;", "\"")
}

pub struct SearchClient {
    client: Client,
    base_url: String,
}

impl SearchClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("review-lens/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    fn blog_url(&self, query: &SearchQuery) -> String {
        format!(
            "{}/blog?sort={}&display={}&start={}&query={}",
            self.base_url.trim_end_matches('/'),
            query.sort.as_param(),
            query.display,
            query.start,
            urlencoding::encode(&query.query),
        )
    }

    pub async fn search(
        &self,
        credentials: &SearchCredentials,
        query: &SearchQuery,
    ) -> Result<SearchPage> {
        let url = self.blog_url(query);
        tracing::debug!("Searching blogs: {}", url);

        let response = self
            .client
            .get(&url)
            .header("X-Naver-Client-Id", &credentials.client_id)
            .header("X-Naver-Client-Secret", &credentials.client_secret)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::SearchApi {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let envelope: SearchEnvelope = serde_json::from_str(&body)?;

        tracing::debug!(
            "Search returned {} of {} posts",
            envelope.items.len(),
            envelope.total
        );

        Ok(SearchPage {
            total: envelope.total,
            start: envelope.start,
            display: envelope.display,
            items: envelope.items.into_iter().map(NewBlogPost::from).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;
    use serde_json::json;

    use super::*;

    fn credentials() -> SearchCredentials {
        SearchCredentials {
            client_id: "client-id".to_string(),
            client_secret: "client-secret".to_string(),
        }
    }

    #[test]
    fn strips_highlight_tags_and_quotes() {
        assert_eq!(
            strip_markup("<b>Great</b> &quot;Product&quot;"),
            "Great \"Product\""
        );
        assert_eq!(strip_markup("plain"), "plain");
    }

    #[test]
    fn query_counts_are_clamped() {
        assert_eq!(SearchQuery::new("x", 0, SortMode::Newest).display, 1);
        assert_eq!(SearchQuery::new("x", 500, SortMode::Newest).display, 100);
        assert_eq!(SearchQuery::new("x", 50, SortMode::Newest).display, 50);
        assert_eq!(SearchQuery::new("x", 10, SortMode::Newest).starting_at(0).start, 1);
        assert_eq!(
            SearchQuery::new("x", 10, SortMode::Newest).starting_at(5000).start,
            1000
        );
    }

    #[test]
    fn query_text_is_percent_encoded() {
        let client = SearchClient::new("https://api.example.com/v1/search/").unwrap();
        let url = client.blog_url(&SearchQuery::new("무선 이어폰 & case", 10, SortMode::Relevance));
        assert!(url.starts_with("https://api.example.com/v1/search/blog?sort=sim&display=10&start=1&query="));
        assert!(url.ends_with("%EB%AC%B4%EC%84%A0%20%EC%9D%B4%EC%96%B4%ED%8F%B0%20%26%20case"));
    }

    #[tokio::test]
    async fn search_sends_signed_request_and_decodes_items() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/blog")
                    .query_param("sort", "date")
                    .query_param("display", "10")
                    .query_param("start", "1")
                    .query_param("query", "widget pro")
                    .header("x-naver-client-id", "client-id")
                    .header("x-naver-client-secret", "client-secret");
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(json!({
                        "lastBuildDate": "Mon, 19 Oct 2026 10:00:00 +0900",
                        "total": 1234,
                        "start": 1,
                        "display": 1,
                        "items": [{
                            "title": "<b>Great</b> &quot;Product&quot;",
                            "link": "https://blog.example.com/1",
                            "description": "I bought the <b>widget</b> myself",
                            "bloggername": "amy",
                            "bloggerlink": "blog.example.com/amy",
                            "postdate": "20261001"
                        }]
                    }));
            })
            .await;

        let client = SearchClient::new(server.base_url()).unwrap();
        let page = client
            .search(&credentials(), &SearchQuery::new("widget pro", 10, SortMode::Newest))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(page.total, 1234);
        assert_eq!(page.items.len(), 1);
        let post = &page.items[0];
        assert_eq!(post.title, "Great \"Product\"");
        assert_eq!(post.description, "I bought the widget myself");
        assert_eq!(post.blogger_name, "amy");
        assert_eq!(post.post_date, "20261001");
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/blog");
                then.status(401).body(r#"{"errorCode":"024"}"#);
            })
            .await;

        let client = SearchClient::new(server.base_url()).unwrap();
        let err = client
            .search(&credentials(), &SearchQuery::new("widget", 10, SortMode::Newest))
            .await
            .unwrap_err();

        match err {
            AppError::SearchApi { status, body } => {
                assert_eq!(status, 401);
                assert!(body.contains("024"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn refused_connection_is_an_http_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let client = SearchClient::new(base_url).unwrap();
        let err = client
            .search(&credentials(), &SearchQuery::new("widget", 10, SortMode::Newest))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Http(_)));
    }

    #[tokio::test]
    async fn undecodable_envelope_is_an_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/blog");
                then.status(200).body("<html>maintenance</html>");
            })
            .await;

        let client = SearchClient::new(server.base_url()).unwrap();
        let err = client
            .search(&credentials(), &SearchQuery::new("widget", 10, SortMode::Newest))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Json(_)));
    }
}
