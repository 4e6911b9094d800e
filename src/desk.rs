//! The actions a user can trigger, shared by the CLI and the TUI.
//!
//! Each action opens the store, does its work and closes the store again, and
//! makes at most one outbound call. State that outlives an action is kept in
//! [`Session`], which callers own and pass in explicitly.

use std::path::Path;

use crate::ai::{CompletionClient, OpenAiClient, ReviewAnalyzer};
use crate::config::Config;
use crate::db::{concatenate_posts, Repository, DEFAULT_POST_LIMIT};
use crate::error::{AppError, Result};
use crate::models::{AnalysisResult, BlogPost, NewBlogPost, SortMode};
use crate::search::{SearchClient, SearchQuery};

/// Per-user context carried between actions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub current_product: Option<String>,
    pub results_available: bool,
    /// Skip the cached analysis on the next `analyze`.
    pub reanalyze: bool,
}

impl Session {
    /// A session already pointed at `product_name`, as if it had just been searched.
    pub fn for_product(product_name: &str) -> Self {
        Self {
            current_product: Some(product_name.trim().to_string()),
            results_available: true,
            reanalyze: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub product_name: String,
    /// Hits the search API reports in total, not just this page.
    pub total: u64,
    /// 1-based position of the first post in this page.
    pub start: u32,
    pub stored: usize,
    pub posts: Vec<NewBlogPost>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalyzeOutcome {
    Cached(AnalysisResult),
    Fresh {
        result: AnalysisResult,
        ad_analysis: String,
        truncated: bool,
    },
}

impl AnalyzeOutcome {
    pub fn result(&self) -> &AnalysisResult {
        match self {
            AnalyzeOutcome::Cached(result) => result,
            AnalyzeOutcome::Fresh { result, .. } => result,
        }
    }

    pub fn is_cached(&self) -> bool {
        matches!(self, AnalyzeOutcome::Cached(_))
    }
}

/// Everything the store holds for one product.
#[derive(Debug, Clone, Default)]
pub struct CachedView {
    pub posts: Vec<BlogPost>,
    pub analysis: Option<AnalysisResult>,
}

pub struct ReviewDesk<C> {
    config: Config,
    search: SearchClient,
    analyzer: ReviewAnalyzer<C>,
}

impl ReviewDesk<OpenAiClient> {
    pub fn from_config(config: Config) -> Result<Self> {
        let completion = OpenAiClient::new(&config.completion_api_url, &config.completion_model)?;
        Self::new(config, completion)
    }
}

impl<C: CompletionClient> ReviewDesk<C> {
    pub fn new(config: Config, completion: C) -> Result<Self> {
        let search = SearchClient::new(&config.search_api_url)?;
        Ok(Self {
            config,
            search,
            analyzer: ReviewAnalyzer::new(completion),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn db_path(&self) -> &Path {
        Path::new(&self.config.db_path)
    }

    /// Search blogs for `product_name` and cache the hits as its new generation.
    pub async fn search(
        &self,
        session: &mut Session,
        product_name: &str,
        count: u32,
        sort: SortMode,
    ) -> Result<SearchOutcome> {
        self.search_from(session, product_name, count, sort, 1).await
    }

    /// Like [`search`](Self::search), but the page begins at the `start`th hit.
    pub async fn search_from(
        &self,
        session: &mut Session,
        product_name: &str,
        count: u32,
        sort: SortMode,
        start: u32,
    ) -> Result<SearchOutcome> {
        let product_name = product_name.trim();
        // Nothing was searched, so the session stays as it was.
        if product_name.is_empty() {
            return Err(AppError::InvalidInput("product name is empty".to_string()));
        }

        let query = SearchQuery::new(product_name, count, sort).starting_at(start);
        let result = self.run_search(query).await;
        match &result {
            Ok(outcome) => {
                session.current_product = Some(outcome.product_name.clone());
                session.results_available = true;
            }
            Err(_) => session.results_available = false,
        }
        result
    }

    async fn run_search(&self, query: SearchQuery) -> Result<SearchOutcome> {
        let credentials = self.config.search_credentials()?;
        let page = self.search.search(&credentials, &query).await?;
        let product_name = query.query.as_str();

        if page.items.is_empty() {
            return Err(AppError::NoResults(product_name.to_string()));
        }

        let repo = Repository::open(self.db_path()).await?;
        let stored = repo
            .replace_posts(product_name, page.items.clone())
            .await?;
        repo.close().await?;

        tracing::info!(
            "Cached {} posts for '{}' (hits {}..{} of {})",
            stored,
            product_name,
            page.start,
            page.start.saturating_add(page.display).saturating_sub(1),
            page.total
        );

        Ok(SearchOutcome {
            product_name: product_name.to_string(),
            total: page.total,
            start: page.start.max(query.start),
            stored,
            posts: page.items,
        })
    }

    /// Analyse the session's current product, preferring the cached result.
    pub async fn analyze(&self, session: &mut Session) -> Result<AnalyzeOutcome> {
        let product_name = match (&session.current_product, session.results_available) {
            (Some(product_name), true) => product_name.clone(),
            _ => {
                return Err(AppError::NoData(
                    "run a successful search before analysing".to_string(),
                ))
            }
        };

        let repo = Repository::open(self.db_path()).await?;

        if !session.reanalyze {
            if let Some(cached) = repo.get_analysis(&product_name).await? {
                repo.close().await?;
                tracing::debug!("Using cached analysis for '{}'", product_name);
                return Ok(AnalyzeOutcome::Cached(cached));
            }
        }

        let posts = repo.get_posts(&product_name, DEFAULT_POST_LIMIT).await?;
        if posts.is_empty() {
            repo.close().await?;
            session.results_available = false;
            return Err(AppError::NoData(format!(
                "no blog posts cached for '{product_name}', run a search first"
            )));
        }

        let text = concatenate_posts(&posts);
        let analysis = self
            .analyzer
            .analyze(self.config.completion_api_key(), &text, &product_name)
            .await?;

        let ad_analysis = analysis.ad_analysis.clone();
        let truncated = analysis.truncated;
        let result = analysis.into_result(&product_name);

        repo.replace_analysis(result.clone()).await?;
        repo.close().await?;

        session.reanalyze = false;
        tracing::info!(
            "Analysed {} posts for '{}' with {}",
            posts.len(),
            product_name,
            self.analyzer.model_version()
        );

        Ok(AnalyzeOutcome::Fresh {
            result,
            ad_analysis,
            truncated,
        })
    }

    pub async fn cached(&self, product_name: &str) -> Result<CachedView> {
        let product_name = product_name.trim();
        let repo = Repository::open(self.db_path()).await?;
        let posts = repo.get_posts(product_name, DEFAULT_POST_LIMIT).await?;
        let analysis = repo.get_analysis(product_name).await?;
        repo.close().await?;
        Ok(CachedView { posts, analysis })
    }

    /// Remove the store file and forget the session.
    pub fn reset(&self, session: &mut Session) -> Result<bool> {
        let removed = Repository::reset(self.db_path())?;
        *session = Session::default();
        if removed {
            tracing::info!("Removed database {}", self.config.db_path);
        }
        Ok(removed)
    }
}
