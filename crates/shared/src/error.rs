use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Error payload returned by the story service on non-2xx responses.
///
/// `detail` is usually a string; request validation failures carry a list of
/// `{ "loc": [...], "msg": "..." }` objects instead.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub detail: Option<Value>,
}

impl ApiErrorBody {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: Some(Value::String(detail.into())),
        }
    }

    pub fn detail_message(&self) -> Option<String> {
        let message = match self.detail.as_ref()? {
            Value::String(text) => text.trim().to_string(),
            Value::Array(items) => items
                .iter()
                .filter_map(|item| match item {
                    Value::String(text) => Some(text.clone()),
                    Value::Object(map) => map.get("msg").and_then(Value::as_str).map(str::to_string),
                    _ => None,
                })
                .collect::<Vec<_>>()
                .join("; "),
            Value::Null => String::new(),
            other => other.to_string(),
        };

        if message.is_empty() {
            None
        } else {
            Some(message)
        }
    }
}
