//! REST API types for the dashboard.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};

use crate::error::ServerError;

/// Body of `POST /analyze`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default, deserialize_with = "lenient_text")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub question: Option<String>,
}

/// Accept any JSON value: strings as is, `null` as absent, anything else as
/// its JSON text (`20240101` reads as `"20240101"`).
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

impl AnalyzeRequest {
    /// Trimmed `(date, question)`, both required and non-blank.
    pub fn validate(self) -> Result<(String, String), ServerError> {
        let non_blank = |v: Option<String>| v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());

        match (non_blank(self.date), non_blank(self.question)) {
            (Some(date), Some(question)) => Ok((date, question)),
            _ => Err(ServerError::BadRequest("Missing date or question".to_string())),
        }
    }
}

/// Response of `POST /analyze`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerResponse {
    pub answer: String,
}

/// Error payload: `{"error": "..."}`
pub fn error_body(error: &str) -> Value {
    json!({ "error": error })
}
