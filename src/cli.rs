//! Command-line definitions and handlers.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use review_lens::ai::OpenAiClient;
use review_lens::config::Config;
use review_lens::models::{NewBlogPost, SortMode};
use review_lens::{ReviewDesk, Session};

use crate::output;

/// Check what bloggers really say about a product
#[derive(Parser)]
#[command(name = "review-lens")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the SQLite cache (defaults to the config file's db_path)
    #[arg(long, global = true, env = "REVIEW_LENS_DB")]
    pub db: Option<PathBuf>,

    /// Naver search API client id
    #[arg(long, global = true, env = "NAVER_CLIENT_ID", hide_env_values = true)]
    pub naver_client_id: Option<String>,

    /// Naver search API client secret
    #[arg(long, global = true, env = "NAVER_CLIENT_SECRET", hide_env_values = true)]
    pub naver_client_secret: Option<String>,

    /// OpenAI API key
    #[arg(long, global = true, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search blog posts for a product and cache them
    Search {
        /// Product name to search for
        product: String,

        /// Number of posts to fetch (1-100)
        #[arg(short = 'n', long)]
        count: Option<u32>,

        /// Result order: newest or relevance
        #[arg(short, long)]
        sort: Option<SortMode>,

        /// Position of the first hit to fetch (1-1000)
        #[arg(long, default_value_t = 1)]
        start: u32,
    },

    /// Analyse the cached posts of a product
    Analyze {
        /// Product name used in a previous search
        product: String,

        /// Ignore a cached analysis and ask the model again
        #[arg(long)]
        reanalyze: bool,
    },

    /// Print what is cached for a product
    Show {
        product: String,
    },

    /// Delete the local database file
    Reset,

    /// Open the interactive terminal UI (default)
    Tui,
}

impl Cli {
    /// Config file values with command-line and environment overrides applied.
    pub fn config(&self) -> review_lens::Result<Config> {
        let mut config = Config::load()?;
        if let Some(db) = &self.db {
            config.db_path = db.to_string_lossy().to_string();
        }
        if let Some(id) = &self.naver_client_id {
            config.naver_client_id = Some(id.clone());
        }
        if let Some(secret) = &self.naver_client_secret {
            config.naver_client_secret = Some(secret.clone());
        }
        if let Some(key) = &self.openai_api_key {
            config.openai_api_key = Some(key.clone());
        }
        Ok(config)
    }
}

/// Run `command`. Warnings are reported and are not failures.
pub async fn execute(command: Commands, config: Config) -> anyhow::Result<()> {
    let desk = ReviewDesk::from_config(config)?;

    match run(command, desk).await {
        Ok(()) => Ok(()),
        Err(e) if e.is_warning() => {
            output::print_warning(&e);
            Ok(())
        }
        Err(e) => {
            tracing::error!("{}", e);
            if let Some(raw) = e.raw_reply() {
                output::print_raw_reply(raw);
            }
            Err(e.into())
        }
    }
}

async fn run(command: Commands, desk: ReviewDesk<OpenAiClient>) -> review_lens::Result<()> {
    let default_count = desk.config().default_count;
    let default_sort = desk.config().default_sort;

    match command {
        Commands::Search {
            product,
            count,
            sort,
            start,
        } => {
            let mut session = Session::default();
            let outcome = desk
                .search_from(
                    &mut session,
                    &product,
                    count.unwrap_or(default_count),
                    sort.unwrap_or(default_sort),
                    start,
                )
                .await?;
            output::print_search(&outcome);
        }

        Commands::Analyze { product, reanalyze } => {
            let mut session = Session::for_product(&product);
            session.reanalyze = reanalyze;
            let outcome = desk.analyze(&mut session).await?;
            output::print_analysis(&outcome);
        }

        Commands::Show { product } => {
            let view = desk.cached(&product).await?;
            let posts: Vec<NewBlogPost> = view.posts.into_iter().map(NewBlogPost::from).collect();
            output::print_posts(&posts);
            match view.analysis {
                Some(analysis) => output::print_result(&analysis),
                None => println!("\nNo analysis cached for '{}'.", product.trim()),
            }
        }

        Commands::Reset => {
            let mut session = Session::default();
            if desk.reset(&mut session)? {
                println!("Database reset: {}", desk.config().db_path);
            } else {
                println!("No database at {}", desk.config().db_path);
            }
        }

        Commands::Tui => crate::run_tui(desk).await?,
    }

    Ok(())
}
