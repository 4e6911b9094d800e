use std::borrow::Cow;

use crate::error::{AppError, Result};
use crate::models::ReviewAnalysis;

use super::completion::{CompletionClient, CompletionRequest};
use super::schema::parse_reply;

/// Character budget for the review text embedded in the prompt.
pub const MAX_INPUT_CHARS: usize = 15_000;
pub const TRUNCATION_MARKER: &str = "... (truncated)";

const TEMPERATURE: f32 = 0.2;
const MAX_TOKENS: u32 = 2048;

const SYSTEM_PROMPT: &str = "You are an expert in product review analysis. You analyse the \
provided content thoroughly, identify advertising and sponsored posts, and extract information \
grounded in genuine user experience. You reason from objective evidence, separate positive and \
negative opinion patterns clearly, and give deep analysis rather than a plain summary, ending \
with an overall assessment the reader can trust.";

/// Keep at most [`MAX_INPUT_CHARS`] characters of `text`, marking the cut.
///
/// The cut is positional: only the prefix survives.
pub fn truncate_input(text: &str) -> (Cow<'_, str>, bool) {
    match text.char_indices().nth(MAX_INPUT_CHARS) {
        Some((cut, _)) => (
            Cow::Owned(format!("{}{}", &text[..cut], TRUNCATION_MARKER)),
            true,
        ),
        None => (Cow::Borrowed(text), false),
    }
}

pub fn build_prompt(product_name: &str, reviews: &str) -> String {
    format!(
        r#"The following are blog posts about '{product_name}'. Analyse the content thoroughly and respond according to the requests below:

1. Identify promotional content:
- First judge objectively whether the posts are advertising.
- Criteria: explicit sponsorship or advertising notices, an overly positive tone, many purchase links, content focused on promoting the product.
- Estimate what share of the posts is promotional. Exclude promotional posts from the opinion analysis or give them less weight.

2. Positive opinions:
- Focus on concrete strengths that real users experienced first-hand.
- Separate objective facts from subjective satisfaction.
- Put the most frequently mentioned positive traits first.
- Keep it to 5-7 concise lines.

3. Negative opinions:
- Focus on real users' complaints and points for improvement.
- Concentrate on concrete drawbacks and problems rather than simple grumbling.
- Put the most frequently mentioned negative traits first.
- Keep it to 5-7 concise lines.
- If there are hardly any negative opinions, explain why (many promotional posts, genuinely high satisfaction, and so on).

4. Overall assessment:
- Give a balanced verdict that weighs the ratio and reliability of positive and negative opinions.
- Say how far genuine user opinion is reflected, given the share of promotional content.
- Assess the product's main characteristics and user satisfaction objectively.
- Keep it to 5-7 concise lines.

Blog content:
{reviews}

Reply with a single JSON object and do not use Markdown. Every value must be a plain string:
{{
"ad_analysis": "analysis of promotional content, including an estimate of its share",
"positive": "summary of concrete positive opinions (based on real user experience)",
"negative": "summary of concrete negative opinions (based on real user experience)",
"summary": "objective overall summary and assessment"
}}"#
    )
}

pub struct ReviewAnalyzer<C> {
    client: C,
}

impl<C: CompletionClient> ReviewAnalyzer<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub fn model_version(&self) -> &str {
        self.client.model_version()
    }

    /// Ask the completion endpoint to classify and summarise `reviews`.
    pub async fn analyze(
        &self,
        api_key: Option<&str>,
        reviews: &str,
        product_name: &str,
    ) -> Result<ReviewAnalysis> {
        let api_key = api_key
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(AppError::MissingCredential("OpenAI API key"))?;

        let (reviews, truncated) = truncate_input(reviews);
        if truncated {
            tracing::warn!(
                "Review text for '{}' exceeds {} characters, analysing the prefix only",
                product_name,
                MAX_INPUT_CHARS
            );
        }

        let request = CompletionRequest {
            system: SYSTEM_PROMPT.to_string(),
            user: build_prompt(product_name, &reviews),
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let raw = self.client.complete(api_key, &request).await?;
        if raw.trim().is_empty() {
            return Err(AppError::EmptyReply);
        }

        let reply = parse_reply(&raw)?;

        Ok(ReviewAnalysis {
            ad_analysis: reply.ad_analysis,
            positive: reply.positive,
            negative: reply.negative,
            summary: reply.summary,
            truncated,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;

    /// Replays a canned reply and remembers what it was sent.
    struct StubCompletion {
        reply: String,
        seen: Mutex<Vec<CompletionRequest>>,
    }

    impl StubCompletion {
        fn replying(reply: &str) -> Self {
            Self {
                reply: reply.to_string(),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl CompletionClient for StubCompletion {
        async fn complete(&self, _api_key: &str, request: &CompletionRequest) -> Result<String> {
            self.seen.lock().unwrap().push(request.clone());
            Ok(self.reply.clone())
        }

        fn model_version(&self) -> &str {
            "stub"
        }
    }

    const GOOD_REPLY: &str =
        r#"{"ad_analysis":"mostly organic","positive":"P","negative":"N","summary":"S"}"#;

    #[test]
    fn short_text_passes_through_untouched() {
        let (text, truncated) = truncate_input("short review");
        assert!(!truncated);
        assert!(matches!(text, Cow::Borrowed("short review")));

        let exact = "a".repeat(MAX_INPUT_CHARS);
        let (text, truncated) = truncate_input(&exact);
        assert!(!truncated);
        assert_eq!(text.len(), MAX_INPUT_CHARS);
    }

    #[test]
    fn long_text_keeps_prefix_and_marker() {
        let long = format!("{}{}", "가".repeat(MAX_INPUT_CHARS), "tail that must be dropped");
        let (text, truncated) = truncate_input(&long);

        assert!(truncated);
        assert!(text.ends_with(TRUNCATION_MARKER));
        let kept = text.strip_suffix(TRUNCATION_MARKER).unwrap();
        assert_eq!(kept.chars().count(), MAX_INPUT_CHARS);
        assert!(long.starts_with(kept));
    }

    #[test]
    fn prompt_embeds_product_and_reply_contract() {
        let prompt = build_prompt("widget", "Title: One\nContent: great");
        assert!(prompt.contains("'widget'"));
        assert!(prompt.contains("Title: One\nContent: great"));
        for field in super::super::schema::REPLY_FIELDS {
            assert!(prompt.contains(&format!("\"{field}\"")), "missing {field}");
        }
    }

    #[tokio::test]
    async fn analyze_returns_reply_fields() {
        let analyzer = ReviewAnalyzer::new(StubCompletion::replying(GOOD_REPLY));
        let analysis = analyzer
            .analyze(Some("sk-test"), "Title: One", "widget")
            .await
            .unwrap();

        assert_eq!(analysis.ad_analysis, "mostly organic");
        assert_eq!(analysis.positive, "P");
        assert_eq!(analysis.negative, "N");
        assert_eq!(analysis.summary, "S");
        assert!(!analysis.truncated);

        let seen = analyzer.client.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].temperature, 0.2);
        assert_eq!(seen[0].system, SYSTEM_PROMPT);
    }

    #[tokio::test]
    async fn analyze_forwards_truncated_text() {
        let analyzer = ReviewAnalyzer::new(StubCompletion::replying(GOOD_REPLY));
        let long = format!("{}{}", "x".repeat(MAX_INPUT_CHARS), "OVERFLOW");

        let analysis = analyzer
            .analyze(Some("sk-test"), &long, "widget")
            .await
            .unwrap();
        assert!(analysis.truncated);

        let seen = analyzer.client.seen.lock().unwrap();
        let prompt = &seen[0].user;
        assert!(!prompt.contains("OVERFLOW"));
        assert!(prompt.contains(&format!("{}{}", "x".repeat(MAX_INPUT_CHARS), TRUNCATION_MARKER)));
        assert!(!prompt.contains(&"x".repeat(MAX_INPUT_CHARS + 1)));
    }

    #[tokio::test]
    async fn missing_key_fails_before_calling_out() {
        let analyzer = ReviewAnalyzer::new(StubCompletion::replying(GOOD_REPLY));

        for key in [None, Some(""), Some("  ")] {
            let err = analyzer.analyze(key, "text", "widget").await.unwrap_err();
            assert!(matches!(err, AppError::MissingCredential(_)));
        }
        assert!(analyzer.client.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_reply_is_its_own_error() {
        let analyzer = ReviewAnalyzer::new(StubCompletion::replying(""));
        let err = analyzer
            .analyze(Some("sk-test"), "text", "widget")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::EmptyReply));
    }

    #[tokio::test]
    async fn malformed_reply_surfaces_raw_text() {
        let analyzer = ReviewAnalyzer::new(StubCompletion::replying("Sure! Here is the analysis"));
        let err = analyzer
            .analyze(Some("sk-test"), "text", "widget")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::MalformedReply { .. }));
        assert_eq!(err.raw_reply(), Some("Sure! Here is the analysis"));
    }
}
