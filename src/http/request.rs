//! Request descriptors and the builder that produces them

use crate::config::{ClientOptions, HttpMethod};
use crate::form::{FormData, FormEncoding};

/// Content type of every request that carries a body
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=UTF-8";

/// A request described as plain data, consumed by a
/// [`Transport`](super::Transport).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
    /// Attach session cookies and accept cookies set by the response
    pub with_credentials: bool,
}

impl RequestDescriptor {
    /// First header value with the given name, ignoring case
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Builds [`RequestDescriptor`]s against one base URL
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    base_url: String,
    with_credentials: bool,
    form_encoding: FormEncoding,
}

impl RequestBuilder {
    pub fn new(options: &ClientOptions) -> Self {
        Self {
            base_url: options.base_url.clone(),
            with_credentials: options.with_credentials,
            form_encoding: options.form_encoding,
        }
    }

    /// Absolute URL for an API path. The path is appended as-is.
    pub fn url_for(&self, api: &str) -> String {
        format!("{}{}", self.base_url, api)
    }

    /// Build a request. GET ignores `data`; the other methods always carry
    /// a form body, empty when `data` is `None`.
    pub fn build(&self, method: HttpMethod, api: &str, data: Option<&FormData>) -> RequestDescriptor {
        let (headers, body) = if method.has_body() {
            let body = data
                .map(|form| form.encode_with(self.form_encoding))
                .unwrap_or_default();
            (
                vec![("Content-Type".to_string(), FORM_CONTENT_TYPE.to_string())],
                Some(body),
            )
        } else {
            (Vec::new(), None)
        };

        RequestDescriptor {
            method,
            url: self.url_for(api),
            headers,
            body,
            with_credentials: self.with_credentials,
        }
    }

    pub fn get(&self, api: &str) -> RequestDescriptor {
        self.build(HttpMethod::Get, api, None)
    }

    pub fn with_body(&self, method: HttpMethod, api: &str, data: &FormData) -> RequestDescriptor {
        self.build(method, api, Some(data))
    }
}
