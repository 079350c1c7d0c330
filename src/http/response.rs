//! HTTP response handling and formatting

use crate::error::Result;
use serde_json::Value;

/// A response described as plain data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub status_text: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Response payload: parsed JSON when the body is JSON, the raw text
    /// otherwise.
    pub fn data(&self) -> Value {
        serde_json::from_str(&self.body).unwrap_or_else(|_| Value::String(self.body.clone()))
    }
}

/// Response formatter for different output formats
pub struct ResponseFormatter {
    format_json: bool,
}

impl ResponseFormatter {
    pub fn new(format_json: bool) -> Self {
        Self { format_json }
    }

    /// Format response body based on content type
    pub fn format(&self, body: &str, content_type: Option<&str>) -> Result<String> {
        if self.format_json && self.is_json_content(content_type) {
            self.format_json_body(body)
        } else {
            Ok(body.to_string())
        }
    }

    fn is_json_content(&self, content_type: Option<&str>) -> bool {
        content_type
            .map(|ct| ct.contains("application/json"))
            .unwrap_or(false)
    }

    fn format_json_body(&self, body: &str) -> Result<String> {
        let value: Value = serde_json::from_str(body)?;
        Ok(serde_json::to_string_pretty(&value)?)
    }
}
