// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! HTTPS connector for the Mastodon API.
//!
//! Service structures in this module provide a low-level way to talk to a
//! Mastodon instance: they send a single authenticated GET request and hand
//! back the raw response body. Decoding is left to the
//! [client](crate::client).

use crate::auth::Auth;
use log::debug;
use reqwest::{Client, ClientBuilder, header};
use std::time::Duration;
use thiserror::Error;

/// A service for retrieving resources from a Mastodon instance.
///
/// Using this trait, clients can implement different ways of connecting
/// to the Mastodon API, such as an actual connector for production code,
/// and a deterministic connector for testing purposes.
pub trait Service {
    /// Performs a GET request for `endpoint` and returns the raw body.
    ///
    /// `endpoint` is a path plus query string relative to the instance's
    /// base URL, e.g. `/api/v1/timelines/home?limit=20`.
    fn get(&self, endpoint: &str) -> impl Future<Output = HTTPResult<String>> + Send;
}

/// An appropriate user agent to use when making HTTP requests.
pub fn user_agent() -> String {
    format!("{} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

/// A service that contacts a Mastodon instance directly.
#[derive(Debug)]
pub struct MastodonService {
    client: Client,
    base_url: String,
    auth: Auth,
}

impl MastodonService {
    /// Creates a new service for the instance at `base_url`, authenticating
    /// every request with `auth`.
    ///
    /// Fails only if the underlying HTTP client cannot be initialized.
    pub fn new(base_url: impl Into<String>, auth: Auth) -> HTTPResult<Self> {
        let client = ClientBuilder::new().user_agent(user_agent()).build()?;
        let base_url = base_url.into();
        Ok(Self {
            client,
            base_url,
            auth,
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{endpoint}", self.base_url)
    }
}

impl Service for MastodonService {
    async fn get(&self, endpoint: &str) -> HTTPResult<String> {
        let url = self.url(endpoint);
        debug!("GET {url}");

        let resp = self
            .client
            .get(&url)
            .header(header::AUTHORIZATION, self.auth.bearer())
            .header(header::CONTENT_TYPE, "application/json")
            .send()
            .await?;

        let status = resp.status();
        debug!("{url} returned HTTP {status}");
        let body = resp.text().await?;

        if status.is_success() {
            Ok(body)
        } else {
            Err(HTTPError::Api {
                status: status.as_u16(),
                body,
            })
        }
    }
}

/// The result of an HTTP request.
pub type HTTPResult<T> = Result<T, HTTPError>;

/// Indicates an error has occurred when making an HTTP call.
#[derive(Debug, Error)]
pub enum HTTPError {
    /// The request could not be completed: DNS failure, refused
    /// connection, TLS error, or a body that could not be read.
    #[error("making request: {0}")]
    Transport(#[from] reqwest::Error),

    /// The request did not complete before the deadline.
    #[error("request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    /// The instance answered with an unsuccessful status code.
    ///
    /// `body` is the raw response body.
    #[error("API error (status {status}): {body}")]
    Api { status: u16, body: String },
}
