//! Configuration management for cops-client

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::cookies::CookieStore;
use crate::error::{CopsError, Result};
use crate::form::FormEncoding;

/// Name of the session cookie carrying the API base URL.
pub const URL_COOKIE: &str = "url";

/// Logout endpoint, relative to the API base URL.
pub const LOGOUT_PATH: &str = "/api/logout";

/// Health check endpoint, relative to the API base URL.
pub const HEALTH_CHECK_PATH: &str = "/api/health_check";

/// Page shown after navigating home. Not prefixed with the base URL.
pub const HOME_PAGE: &str = "home.html";

/// Login page the logout flow redirects to. Not prefixed with the base URL.
pub const LOGIN_PAGE: &str = "sso.html";

/// HTTP methods the request helpers dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    /// Whether requests with this method carry a form body
    pub fn has_body(self) -> bool {
        !matches!(self, HttpMethod::Get)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let method = match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        };
        write!(f, "{}", method)
    }
}

impl FromStr for HttpMethod {
    type Err = CopsError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "DELETE" | "DEL" => Ok(HttpMethod::Delete),
            _ => Err(CopsError::Config(format!("Unknown HTTP method: {}", s))),
        }
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Options every request built by an [`ApiClient`](crate::http::ApiClient)
/// inherits.
///
/// An empty `base_url` means "not configured"; [`ClientOptions::resolve_base_url`]
/// then falls back to the `url` session cookie.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub base_url: String,
    pub with_credentials: bool,
    pub form_encoding: FormEncoding,
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub user_agent: Option<String>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        ClientOptions {
            base_url: String::new(),
            with_credentials: true,
            form_encoding: FormEncoding::Verbatim,
            timeout: Duration::from_secs(300),
            connect_timeout: Duration::from_secs(30),
            user_agent: Some(format!("cops/{}", crate::VERSION)),
        }
    }
}

impl ClientOptions {
    /// Options pointing at an explicit base URL
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        ClientOptions {
            base_url: base_url.into(),
            ..ClientOptions::default()
        }
    }

    /// Fill in the base URL from the `url` session cookie unless one is
    /// already configured.
    pub fn resolve_base_url<C: CookieStore + ?Sized>(mut self, cookies: &C) -> Result<Self> {
        if self.base_url.is_empty() {
            self.base_url = cookies.get(URL_COOKIE).ok_or(CopsError::MissingBaseUrl)?;
        }
        Ok(self)
    }
}
