//! HTTP client module
//!
//! [`ApiClient`] turns API paths and form data into [`RequestDescriptor`]s
//! and dispatches them through a [`Transport`]. [`ReqwestTransport`] is the
//! network-backed transport; tests can plug in their own.

use crate::config::{ClientOptions, HttpMethod, HEALTH_CHECK_PATH};
use crate::error::{CopsError, Result};
use crate::form::FormData;
use crate::rejection::Rejection;
use async_trait::async_trait;
use reqwest::cookie::{CookieStore as _, Jar};
use reqwest::header::{COOKIE, SET_COOKIE};
use reqwest::{Client, ClientBuilder};
use std::sync::Arc;
use url::Url;

pub mod request;
pub mod response;

pub use request::{RequestBuilder, RequestDescriptor, FORM_CONTENT_TYPE};
pub use response::{ApiResponse, ResponseFormatter};

/// Executes a request descriptor and returns whatever the server answered,
/// success or not.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: RequestDescriptor) -> Result<ApiResponse>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for &T {
    async fn send(&self, request: RequestDescriptor) -> Result<ApiResponse> {
        (**self).send(request).await
    }
}

/// Transport backed by reqwest with its own session cookie jar
pub struct ReqwestTransport {
    client: Client,
    jar: Arc<Jar>,
}

impl ReqwestTransport {
    /// Create a transport honouring the timeouts and user agent in `options`
    pub fn new(options: &ClientOptions) -> Result<Self> {
        let mut builder = ClientBuilder::new()
            .timeout(options.timeout)
            .connect_timeout(options.connect_timeout);

        if let Some(user_agent) = &options.user_agent {
            builder = builder.user_agent(user_agent.clone());
        }

        let client = builder.build().map_err(CopsError::Http)?;

        Ok(Self {
            client,
            jar: Arc::new(Jar::default()),
        })
    }

    /// Seed the jar with session cookies scoped to `base_url`
    pub fn with_session_cookies<'a, I>(self, base_url: &str, cookies: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let url = parse_url(base_url)?;
        for (name, value) in cookies {
            self.jar.add_cookie_str(&format!("{}={}; Path=/", name, value), &url);
        }
        Ok(self)
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: RequestDescriptor) -> Result<ApiResponse> {
        let url = parse_url(&request.url)?;
        log::debug!("> {} {}", request.method, url);

        let mut builder = self.client.request(request.method.into(), url.clone());

        for (key, value) in &request.headers {
            builder = builder.header(key, value);
        }

        if request.with_credentials {
            if let Some(cookies) = self.jar.cookies(&url) {
                builder = builder.header(COOKIE, cookies);
            }
        }

        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(CopsError::Http)?;

        if request.with_credentials {
            let mut set_cookies = response.headers().get_all(SET_COOKIE).iter().peekable();
            if set_cookies.peek().is_some() {
                self.jar.set_cookies(&mut set_cookies, &url);
            }
        }

        let status = response.status();
        log::debug!("< {}", status);

        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    value.to_str().unwrap_or("<non-utf8>").to_string(),
                )
            })
            .collect();
        let body = response.text().await.map_err(CopsError::Http)?;

        Ok(ApiResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or("").to_string(),
            headers,
            body,
        })
    }
}

fn parse_url(input: &str) -> Result<Url> {
    Url::parse(input).map_err(|e| CopsError::InvalidUrl(format!("Invalid URL '{}': {}", input, e)))
}

/// Verb helpers against one API base URL
pub struct ApiClient<T> {
    transport: T,
    builder: RequestBuilder,
}

impl<T: Transport> ApiClient<T> {
    pub fn new(transport: T, options: &ClientOptions) -> Self {
        Self {
            transport,
            builder: RequestBuilder::new(options),
        }
    }

    pub fn request_builder(&self) -> &RequestBuilder {
        &self.builder
    }

    /// GET `base_url + api`
    pub async fn get(&self, api: &str) -> Result<ApiResponse> {
        self.dispatch(self.builder.get(api)).await
    }

    /// POST a form body to `base_url + api`
    pub async fn post(&self, api: &str, data: &FormData) -> Result<ApiResponse> {
        self.dispatch(self.builder.with_body(HttpMethod::Post, api, data))
            .await
    }

    /// PUT a form body to `base_url + api`
    pub async fn put(&self, api: &str, data: &FormData) -> Result<ApiResponse> {
        self.dispatch(self.builder.with_body(HttpMethod::Put, api, data))
            .await
    }

    /// DELETE with a form body at `base_url + api`
    pub async fn del(&self, api: &str, data: &FormData) -> Result<ApiResponse> {
        self.dispatch(self.builder.with_body(HttpMethod::Delete, api, data))
            .await
    }

    /// Dispatch any verb; `data` is ignored for GET
    pub async fn send(
        &self,
        method: HttpMethod,
        api: &str,
        data: Option<&FormData>,
    ) -> Result<ApiResponse> {
        self.dispatch(self.builder.build(method, api, data)).await
    }

    /// Whether the backend reports the current session as alive. A rejected
    /// check is `false`; transport failures are errors.
    pub async fn health(&self) -> Result<bool> {
        match self.get(HEALTH_CHECK_PATH).await {
            Ok(_) => Ok(true),
            Err(CopsError::Rejected(rejection)) => {
                log::debug!("Health check rejected with status {}", rejection.status);
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }

    async fn dispatch(&self, request: RequestDescriptor) -> Result<ApiResponse> {
        let response = self.transport.send(request).await?;
        if response.is_success() {
            Ok(response)
        } else {
            Err(CopsError::Rejected(Rejection::from_response(&response)))
        }
    }
}
