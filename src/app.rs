use crate::ai::OpenAiClient;
use crate::desk::{AnalyzeOutcome, ReviewDesk, Session};
use crate::error::{AppError, Result};
use crate::models::{AnalysisStatus, NewBlogPost, SortMode};
use crate::search::MAX_DISPLAY;
use crate::tui::AppAction;

const MIN_COUNT: u32 = 10;
const COUNT_STEP: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }
}

pub struct App {
    // Data
    pub posts: Vec<NewBlogPost>,
    pub total_hits: u64,
    pub first_hit: u32,
    pub analysis: Option<AnalyzeOutcome>,
    pub raw_reply: Option<String>,

    // UI State
    pub selected_index: usize,
    pub show_help: bool,
    pub product_input_active: bool,
    pub product_input: String,
    pub count: u32,
    pub sort: SortMode,
    pub notice: Option<Notice>,
    pub analysis_status: AnalysisStatus,
    pub busy: Option<&'static str>,

    // Session
    pub session: Session,

    // Services
    desk: ReviewDesk<OpenAiClient>,
}

impl App {
    pub fn new(desk: ReviewDesk<OpenAiClient>) -> Self {
        let config = desk.config();
        let count = config.default_count.clamp(MIN_COUNT, MAX_DISPLAY);
        let sort = config.default_sort;
        let analysis_status = if config.completion_api_key().is_some() {
            AnalysisStatus::NotGenerated
        } else {
            AnalysisStatus::NoApiKey
        };

        Self {
            posts: Vec::new(),
            total_hits: 0,
            first_hit: 1,
            analysis: None,
            raw_reply: None,
            selected_index: 0,
            show_help: false,
            product_input_active: false,
            product_input: String::new(),
            count,
            sort,
            notice: None,
            analysis_status,
            busy: None,
            session: Session::default(),
            desk,
        }
    }

    pub fn selected_post(&self) -> Option<&NewBlogPost> {
        self.posts.get(self.selected_index)
    }

    /// Status line to show while a blocking action runs.
    pub fn busy_message(action: &AppAction) -> Option<&'static str> {
        match action {
            AppAction::Search | AppAction::ProductInputConfirm => Some("Searching blogs..."),
            AppAction::Analyze | AppAction::Reanalyze => Some("Analysing reviews..."),
            _ => None,
        }
    }

    pub async fn handle_action(&mut self, action: AppAction) -> Result<bool> {
        match action {
            AppAction::Quit => return Ok(true),

            AppAction::MoveUp => {
                if self.selected_index > 0 {
                    self.selected_index -= 1;
                }
            }

            AppAction::MoveDown => {
                let len = self.posts.len();
                if len > 0 && self.selected_index < len - 1 {
                    self.selected_index += 1;
                }
            }

            AppAction::MoveToTop => {
                self.selected_index = 0;
            }

            AppAction::MoveToBottom => {
                self.selected_index = self.posts.len().saturating_sub(1);
            }

            AppAction::EditProduct => {
                self.product_input_active = true;
                self.product_input = self.session.current_product.clone().unwrap_or_default();
            }

            AppAction::ProductInputChar(c) => {
                self.product_input.push(c);
            }

            AppAction::ProductInputBackspace => {
                self.product_input.pop();
            }

            AppAction::ProductInputConfirm => {
                self.product_input_active = false;
                let product = std::mem::take(&mut self.product_input);
                if product.trim().is_empty() {
                    self.notice = Some(Notice {
                        level: NoticeLevel::Warning,
                        message: "Enter a product name to search".to_string(),
                    });
                } else {
                    self.search(&product).await;
                }
            }

            AppAction::ProductInputCancel => {
                self.product_input_active = false;
                self.product_input.clear();
            }

            AppAction::Search => match self.session.current_product.clone() {
                Some(product) => self.search(&product).await,
                None => {
                    self.product_input_active = true;
                    self.product_input.clear();
                }
            },

            AppAction::Analyze => {
                self.analyze().await;
            }

            AppAction::Reanalyze => {
                self.session.reanalyze = true;
                self.analyze().await;
            }

            AppAction::CycleSort => {
                self.sort = self.sort.cycle();
            }

            AppAction::IncreaseCount => {
                self.count = (self.count + COUNT_STEP).min(MAX_DISPLAY);
            }

            AppAction::DecreaseCount => {
                self.count = self.count.saturating_sub(COUNT_STEP).max(MIN_COUNT);
            }

            AppAction::OpenInBrowser => {
                if let Some(post) = self.selected_post() {
                    let link = post.link.clone();
                    if let Err(e) = open::that(&link) {
                        tracing::warn!("Failed to open {}: {}", link, e);
                    }
                }
            }

            AppAction::ResetDatabase => match self.desk.reset(&mut self.session) {
                Ok(removed) => {
                    self.posts.clear();
                    self.total_hits = 0;
                    self.selected_index = 0;
                    self.clear_analysis();
                    self.notice = Some(Notice::info(if removed {
                        "Database reset"
                    } else {
                        "Database was already empty"
                    }));
                }
                Err(e) => self.report(e),
            },

            AppAction::ShowHelp => {
                self.show_help = true;
            }

            AppAction::HideHelp => {
                self.show_help = false;
            }
        }

        Ok(false)
    }

    async fn search(&mut self, product: &str) {
        match self
            .desk
            .search(&mut self.session, product, self.count, self.sort)
            .await
        {
            Ok(outcome) => {
                self.notice = Some(Notice::info(format!(
                    "Stored {} posts for '{}' ({} found)",
                    outcome.stored, outcome.product_name, outcome.total
                )));
                self.posts = outcome.posts;
                self.total_hits = outcome.total;
                self.first_hit = outcome.start;
                self.selected_index = 0;
                self.clear_analysis();
            }
            Err(e) => {
                self.posts.clear();
                self.total_hits = 0;
                self.selected_index = 0;
                self.clear_analysis();
                self.report(e);
            }
        }
    }

    async fn analyze(&mut self) {
        self.raw_reply = None;
        match self.desk.analyze(&mut self.session).await {
            Ok(outcome) => {
                self.analysis_status = if outcome.is_cached() {
                    AnalysisStatus::Cached
                } else {
                    AnalysisStatus::Fresh
                };
                self.notice = match &outcome {
                    AnalyzeOutcome::Fresh { truncated: true, .. } => Some(Notice {
                        level: NoticeLevel::Warning,
                        message: "Review text was too long; only the beginning was analysed"
                            .to_string(),
                    }),
                    AnalyzeOutcome::Cached(_) => {
                        Some(Notice::info("Showing cached analysis, press g to re-run"))
                    }
                    _ => Some(Notice::info("Analysis complete")),
                };
                self.analysis = Some(outcome);
            }
            Err(e) => {
                self.session.reanalyze = false;
                self.analysis_status = match &e {
                    AppError::MissingCredential(_) => AnalysisStatus::NoApiKey,
                    _ if e.is_warning() => AnalysisStatus::NotGenerated,
                    _ => AnalysisStatus::Failed,
                };
                self.analysis = None;
                self.report(e);
            }
        }
    }

    fn clear_analysis(&mut self) {
        self.analysis = None;
        self.raw_reply = None;
        if self.analysis_status != AnalysisStatus::NoApiKey {
            self.analysis_status = AnalysisStatus::NotGenerated;
        }
    }

    /// Turn a failed action into a notice; the app keeps running.
    fn report(&mut self, err: AppError) {
        let level = if err.is_warning() {
            tracing::warn!("{}", err);
            NoticeLevel::Warning
        } else {
            tracing::error!("{}", err);
            NoticeLevel::Error
        };
        self.raw_reply = err.raw_reply().map(str::to_string);
        self.notice = Some(Notice {
            level,
            message: err.to_string(),
        });
    }
}
