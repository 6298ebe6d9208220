//! HTTP implementation of the Poll Service client
//!
//! Uses reqwest with JSON bodies. Every response is decoded into the
//! explicit model types and checked before it is handed back; anything
//! unexpected becomes [`NetworkError::MalformedResponse`].

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::{CreatePollRequest, PollService, UpdatePollRequest};
use crate::config::Config;
use crate::error::{NetworkError, NetworkResult};
use crate::models::{Id, Poll};

/// Path prefix shared by every endpoint
const API_PREFIX: [&str; 2] = ["api", "polls"];

/// Poll Service client over HTTP
#[derive(Debug, Clone)]
pub struct HttpPollService {
    /// Parsed base address
    base_url: Url,
    /// Shared connection pool
    client: reqwest::Client,
}

impl HttpPollService {
    /// Create a client from the application configuration
    pub fn new(config: &Config) -> NetworkResult<Self> {
        let invalid = |details: String| NetworkError::InvalidBaseUrl {
            url: config.base_url.clone(),
            details,
        };

        let base_url = Url::parse(&config.base_url).map_err(|e| invalid(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(invalid("URL cannot have path segments".to_string()));
        }

        let mut builder =
            reqwest::Client::builder().user_agent(concat!("ballotbox/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|source| NetworkError::Transport {
                url: config.base_url.clone(),
                source,
            })?;

        Ok(Self { base_url, client })
    }

    /// Build an endpoint URL under `/api/polls`
    ///
    /// Segments are percent-encoded, so ids may contain any characters.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(API_PREFIX).extend(segments);
        }
        url
    }

    /// Send a request and return the successful response body
    async fn send(&self, request: RequestBuilder, url: &Url) -> NetworkResult<String> {
        let response = request.send().await.map_err(|source| {
            warn!("Request to {} failed: {}", url, source);
            NetworkError::Transport {
                url: url.to_string(),
                source,
            }
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| NetworkError::Transport {
                url: url.to_string(),
                source,
            })?;

        if !status.is_success() {
            warn!("Poll Service returned {} for {}", status, url);
            return Err(NetworkError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }

    /// Send a request and decode its JSON body
    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        url: &Url,
    ) -> NetworkResult<T> {
        let body = self.send(request, url).await?;
        serde_json::from_str(&body).map_err(|e| malformed(url, e.to_string()))
    }

    /// Send a request whose response is a single poll
    async fn send_poll(&self, request: RequestBuilder, url: &Url) -> NetworkResult<Poll> {
        let poll: Poll = self.send_json(request, url).await?;
        poll.check_shape().map_err(|details| malformed(url, details))?;
        Ok(poll)
    }

    fn request(&self, method: Method, url: &Url) -> RequestBuilder {
        debug!("{} {}", method, url);
        self.client.request(method, url.clone())
    }
}

fn malformed(url: &Url, details: String) -> NetworkError {
    warn!("Malformed response from {}: {}", url, details);
    NetworkError::MalformedResponse {
        url: url.to_string(),
        details,
    }
}

#[async_trait]
impl PollService for HttpPollService {
    async fn fetch_polls(&self) -> NetworkResult<Vec<Poll>> {
        let url = self.endpoint(&["getPolls"]);
        let polls: Vec<Poll> = self
            .send_json(self.request(Method::GET, &url), &url)
            .await?;

        for poll in &polls {
            poll.check_shape().map_err(|details| malformed(&url, details))?;
        }
        debug!("Fetched {} poll(s)", polls.len());
        Ok(polls)
    }

    async fn create_poll(&self, request: &CreatePollRequest) -> NetworkResult<Poll> {
        let url = self.endpoint(&["createPoll"]);
        self.send_poll(self.request(Method::POST, &url).json(request), &url)
            .await
    }

    async fn update_poll(&self, poll_id: &Id, request: &UpdatePollRequest) -> NetworkResult<Poll> {
        let url = self.endpoint(&[&poll_id.to_string()]);
        self.send_poll(self.request(Method::PUT, &url).json(request), &url)
            .await
    }

    async fn cast_vote(&self, poll_id: &Id, option_id: &Id) -> NetworkResult<Poll> {
        let url = self.endpoint(&[&poll_id.to_string(), "vote", &option_id.to_string()]);
        self.send_poll(self.request(Method::GET, &url), &url).await
    }

    async fn delete_poll(&self, poll_id: &Id) -> NetworkResult<()> {
        let url = self.endpoint(&[&poll_id.to_string()]);
        self.send(self.request(Method::DELETE, &url), &url).await?;
        Ok(())
    }
}
