//! Contract for the completion reply.
//!
//! The prompt asks for a flat JSON object; this module checks the reply against
//! that shape so a change in the model's output fails instead of leaking
//! half-parsed text into the cache.

use serde_json::{Map, Value};

use crate::error::{AppError, Result};

pub const REPLY_SCHEMA_VERSION: u32 = 1;

/// Keys required in a v1 reply. Every value must be a string.
pub const REPLY_FIELDS: [&str; 4] = ["ad_analysis", "positive", "negative", "summary"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisReply {
    pub ad_analysis: String,
    pub positive: String,
    pub negative: String,
    pub summary: String,
}

/// Parse `raw` strictly as a v1 reply. No repair is attempted.
pub fn parse_reply(raw: &str) -> Result<AnalysisReply> {
    let value: Value = serde_json::from_str(raw).map_err(|source| AppError::MalformedReply {
        source,
        raw: raw.to_string(),
    })?;

    let mut object = match value {
        Value::Object(object) => object,
        other => {
            return Err(schema_error(
                format!("expected a JSON object, got {}", kind(&other)),
                raw,
            ))
        }
    };

    if let Some(unexpected) = object
        .keys()
        .find(|key| !REPLY_FIELDS.contains(&key.as_str()))
    {
        return Err(schema_error(format!("unexpected field '{unexpected}'"), raw));
    }

    let mut take = |field: &str| take_string(&mut object, field, raw);
    Ok(AnalysisReply {
        ad_analysis: take("ad_analysis")?,
        positive: take("positive")?,
        negative: take("negative")?,
        summary: take("summary")?,
    })
}

fn take_string(object: &mut Map<String, Value>, field: &str, raw: &str) -> Result<String> {
    match object.remove(field) {
        Some(Value::String(s)) => Ok(s),
        Some(other) => Err(schema_error(
            format!("field '{field}' must be a string, got {}", kind(&other)),
            raw,
        )),
        None => Err(schema_error(format!("missing field '{field}'"), raw)),
    }
}

fn schema_error(problem: String, raw: &str) -> AppError {
    AppError::ReplySchema {
        version: REPLY_SCHEMA_VERSION,
        problem,
        raw: raw.to_string(),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn problem(raw: &str) -> String {
        match parse_reply(raw) {
            Err(AppError::ReplySchema { problem, raw: kept, version }) => {
                assert_eq!(kept, raw);
                assert_eq!(version, REPLY_SCHEMA_VERSION);
                problem
            }
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn accepts_well_formed_reply() {
        let reply = parse_reply(
            r#"{"ad_analysis":"about 40% sponsored","positive":"P","negative":"N","summary":"S"}"#,
        )
        .unwrap();
        assert_eq!(
            reply,
            AnalysisReply {
                ad_analysis: "about 40% sponsored".into(),
                positive: "P".into(),
                negative: "N".into(),
                summary: "S".into(),
            }
        );
    }

    #[test]
    fn invalid_json_keeps_raw_text() {
        let raw = "```json\n{\"positive\": \"P\"}\n```";
        let err = parse_reply(raw).unwrap_err();
        assert!(matches!(err, AppError::MalformedReply { .. }));
        assert_eq!(err.raw_reply(), Some(raw));
    }

    #[test]
    fn rejects_non_object() {
        assert_eq!(problem(r#"["P","N","S"]"#), "expected a JSON object, got an array");
    }

    #[test]
    fn rejects_missing_field() {
        assert_eq!(
            problem(r#"{"ad_analysis":"a","positive":"P","negative":"N"}"#),
            "missing field 'summary'"
        );
    }

    #[test]
    fn rejects_unexpected_field() {
        assert_eq!(
            problem(r#"{"ad_analysis":"a","positive":"P","negative":"N","summary":"S","score":3}"#),
            "unexpected field 'score'"
        );
    }

    #[test]
    fn rejects_nested_values() {
        assert_eq!(
            problem(r#"{"ad_analysis":"a","positive":["P"],"negative":"N","summary":"S"}"#),
            "field 'positive' must be a string, got an array"
        );
    }
}
