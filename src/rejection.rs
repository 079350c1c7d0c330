//! Failed responses and the shared notification sink

use crate::error::CopsError;
use crate::http::response::ApiResponse;
use serde::Deserialize;
use std::fmt;
use std::io::Write;

/// Structured error payload a backend attaches to a failed response
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct RejectionData {
    #[serde(default)]
    pub message: Option<String>,
}

/// The failure outcome of a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub status: u16,
    pub status_text: String,
    pub data: Option<RejectionData>,
}

impl Rejection {
    pub fn new(status: u16, status_text: impl Into<String>) -> Self {
        Self {
            status,
            status_text: status_text.into(),
            data: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.data = Some(RejectionData {
            message: Some(message.into()),
        });
        self
    }

    /// Build a rejection from a non-2xx response. The body is only used as
    /// `data` when it is a JSON object.
    pub fn from_response(response: &ApiResponse) -> Self {
        let data = serde_json::from_str::<serde_json::Value>(&response.body)
            .ok()
            .filter(|value| value.is_object())
            .and_then(|value| serde_json::from_value::<RejectionData>(value).ok());

        Self {
            status: response.status,
            status_text: response.status_text.clone(),
            data,
        }
    }

    /// Turn any request failure into a rejection. Failures that never
    /// produced a response get status 0 and the error text.
    pub fn from_error(err: CopsError) -> Self {
        match err {
            CopsError::Rejected(rejection) => rejection,
            other => Self::new(0, other.to_string()),
        }
    }

    /// `data.message`, or empty when absent
    pub fn message(&self) -> &str {
        self.data
            .as_ref()
            .and_then(|data| data.message.as_deref())
            .unwrap_or("")
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ERROR {} {}", self.status, self.status_text)
    }
}

/// Blocking, user-facing notification
pub trait Notifier {
    fn alert(&self, message: &str);
}

/// Writes alerts to standard error
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn alert(&self, message: &str) {
        let mut stderr = std::io::stderr().lock();
        let _ = stderr.write_all(message.as_bytes());
        let _ = stderr.flush();
    }
}

/// Render a rejection as the alert text
pub fn format_rejection(rejection: &Rejection) -> String {
    let mut msg = String::from("Response:\n");
    msg.push_str(&format!("ERROR {}\n", rejection.status));
    msg.push_str(&format!("{}\n", rejection.status_text));
    msg.push_str(&format!("{}\n", rejection.message()));
    msg
}

/// Shared failure sink: format the rejection and alert it
pub fn handle_rejection<N: Notifier + ?Sized>(notifier: &N, rejection: &Rejection) {
    log::debug!(
        "Request rejected with status {} {}",
        rejection.status,
        rejection.status_text
    );
    notifier.alert(&format_rejection(rejection));
}
