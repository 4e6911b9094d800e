mod analyzer;
mod completion;
mod schema;

pub use analyzer::{build_prompt, truncate_input, ReviewAnalyzer, MAX_INPUT_CHARS, TRUNCATION_MARKER};
pub use completion::{
    CompletionClient, CompletionRequest, OpenAiClient, DEFAULT_COMPLETION_API_URL,
    DEFAULT_COMPLETION_MODEL,
};
pub use schema::{parse_reply, AnalysisReply, REPLY_FIELDS, REPLY_SCHEMA_VERSION};
