//! HTTP execution abstraction for testing.
//!
//! Commands talk to an [`HttpExecutor`] so tests can swap the network for
//! canned responses.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;

use crate::error::Error;
use crate::types::{HttpRequest, HttpResponse};

const USER_AGENT: &str = concat!("webos/", env!("CARGO_PKG_VERSION"));

/// Trait for executing HTTP requests.
#[async_trait]
pub trait HttpExecutor: Send + Sync {
    /// Execute a request and return whatever response came back.
    ///
    /// Non-2xx statuses are not errors at this level; callers decide.
    async fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, Error>;
}

/// Production HTTP executor using reqwest.
pub struct ReqwestExecutor {
    client: Client,
}

impl ReqwestExecutor {
    /// Create a new executor; `None` disables the timeout.
    pub fn new(timeout: Option<Duration>) -> Result<Self, Error> {
        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }
}

fn header_map(headers: &HashMap<String, String>) -> Result<HeaderMap, Error> {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        let header_name =
            HeaderName::try_from(name.as_str()).map_err(|e| Error::InvalidHeader {
                message: format!("{}: {}", name, e),
            })?;
        let header_value =
            HeaderValue::try_from(value.as_str()).map_err(|e| Error::InvalidHeader {
                message: format!("{}: {}", name, e),
            })?;
        map.insert(header_name, header_value);
    }
    Ok(map)
}

#[async_trait]
impl HttpExecutor for ReqwestExecutor {
    async fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, Error> {
        let url = url::Url::parse(&request.url)?;
        log::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .headers(header_map(&request.headers)?)
            .send()
            .await?;

        let status = response.status().as_u16();
        let status_text = response
            .status()
            .canonical_reason()
            .unwrap_or("Unknown")
            .to_string();

        let mut resp_headers = HashMap::new();
        for (name, value) in response.headers() {
            if let Ok(v) = value.to_str() {
                resp_headers.insert(name.to_string(), v.to_string());
            }
        }

        let body = response.text().await?;
        log::debug!("{} {} ({} bytes)", status, status_text, body.len());

        Ok(HttpResponse {
            status,
            status_text,
            headers: resp_headers,
            body,
        })
    }
}

/// Mock HTTP executor for testing.
///
/// Returns predefined responses keyed by full URL.
#[cfg(any(test, feature = "test-utils"))]
pub mod mock {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// A mock HTTP executor that returns predefined responses.
    #[derive(Clone, Default)]
    pub struct MockExecutor {
        responses: Arc<Mutex<HashMap<String, HttpResponse>>>,
        recorded_requests: Arc<Mutex<Vec<HttpRequest>>>,
        fail_all: Arc<Mutex<Option<String>>>,
    }

    impl MockExecutor {
        pub fn new() -> Self {
            Self::default()
        }

        /// Answer `url` with `response`.
        pub fn with_response(self, url: impl Into<String>, response: HttpResponse) -> Self {
            self.responses.lock().unwrap().insert(url.into(), response);
            self
        }

        /// Answer `url` with a 200 carrying `body`.
        pub fn with_body(self, url: impl Into<String>, body: impl Into<String>) -> Self {
            self.with_response(url, ok(body))
        }

        /// Configure to fail all requests with a transport error.
        pub fn fail_with(self, message: impl Into<String>) -> Self {
            *self.fail_all.lock().unwrap() = Some(message.into());
            self
        }

        /// Get all recorded requests.
        pub fn recorded_requests(&self) -> Vec<HttpRequest> {
            self.recorded_requests.lock().unwrap().clone()
        }
    }

    /// A 200 response with `body`.
    pub fn ok(body: impl Into<String>) -> HttpResponse {
        HttpResponse {
            status: 200,
            status_text: "OK".to_string(),
            headers: HashMap::new(),
            body: body.into(),
        }
    }

    /// A bodiless response with the given status.
    pub fn status(status: u16, status_text: &str) -> HttpResponse {
        HttpResponse {
            status,
            status_text: status_text.to_string(),
            headers: HashMap::new(),
            body: String::new(),
        }
    }

    #[async_trait]
    impl HttpExecutor for MockExecutor {
        async fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, Error> {
            self.recorded_requests.lock().unwrap().push(request.clone());

            if let Some(message) = self.fail_all.lock().unwrap().clone() {
                return Err(Error::Status {
                    context: message,
                    status: 0,
                    status_text: "unreachable".to_string(),
                });
            }

            Ok(self
                .responses
                .lock()
                .unwrap()
                .get(&request.url)
                .cloned()
                .unwrap_or_else(|| status(404, "Not Found")))
        }
    }
}
