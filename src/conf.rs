// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Request configuration and configuration errors.

use crate::auth::AuthError;
use std::time::Duration;
use thiserror::Error;

/// Instance contacted when `--instance` is not given.
pub const DEFAULT_INSTANCE: &str = "https://mastodon.social";

/// Number of items requested when `--limit` is not given.
pub const DEFAULT_LIMIT: u32 = 20;

/// Overall request deadline, in seconds, when `--timeout` is not given.
pub const DEFAULT_TIMEOUT: u64 = 30;

/// Environment variable holding the access token.
pub const TOKEN_VAR: &str = "MASTODON_TOKEN";

/// How fetched data is written to standard output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// The raw API response wrapped in a `{"success":true,"data":...}` envelope.
    Json,

    /// A plain-text summary meant for humans.
    #[default]
    Text,
}

/// Options shared by the fetcher and the renderer for one invocation.
#[derive(Clone, Debug, PartialEq)]
pub struct RequestConfig {
    instance: String,
    limit: u32,
    timeout: Duration,
    format: OutputFormat,
}

impl Default for RequestConfig {
    fn default() -> Self {
        RequestConfig::build().build()
    }
}

impl RequestConfig {
    /// Incrementally builds a new request configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use mastodon_scout::conf::{OutputFormat, RequestConfig};
    /// use std::time::Duration;
    ///
    /// let config = RequestConfig::build()
    ///     .instance("https://fosstodon.org/")
    ///     .limit(5)
    ///     .format(OutputFormat::Json)
    ///     .build();
    /// assert_eq!(config.instance(), "https://fosstodon.org");
    /// assert_eq!(config.limit(), 5);
    /// assert_eq!(config.timeout(), Duration::from_secs(30));
    /// ```
    pub fn build() -> RequestConfigBuilder {
        RequestConfigBuilder::default()
    }

    /// Base URL of the Mastodon instance, without a trailing slash.
    pub fn instance(&self) -> &str {
        &self.instance
    }

    /// Maximum number of items requested from the API.
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Deadline for the whole fetch.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// How output should be rendered.
    pub fn format(&self) -> OutputFormat {
        self.format
    }
}

/// A builder for request configuration.
///
/// You probably don't want to use this directly; call
/// [`RequestConfig::build()`] and construct it incrementally instead.
#[derive(Debug)]
#[must_use]
pub struct RequestConfigBuilder {
    instance: String,
    limit: u32,
    timeout: Duration,
    format: OutputFormat,
}

impl Default for RequestConfigBuilder {
    fn default() -> Self {
        Self {
            instance: DEFAULT_INSTANCE.to_string(),
            limit: DEFAULT_LIMIT,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT),
            format: OutputFormat::default(),
        }
    }
}

impl RequestConfigBuilder {
    /// Sets the instance base URL. Trailing slashes are removed.
    pub fn instance(mut self, instance: impl AsRef<str>) -> Self {
        self.instance = instance.as_ref().trim_end_matches('/').to_string();
        self
    }

    /// Sets the number of items to request.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// Sets the overall request deadline.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the output format.
    pub fn format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Finalizes the [`RequestConfig`].
    pub fn build(self) -> RequestConfig {
        RequestConfig {
            instance: self.instance,
            limit: self.limit,
            timeout: self.timeout,
            format: self.format,
        }
    }
}

/// An invalid invocation, detected before any request is made.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No usable access token in the environment.
    #[error("{var} environment variable not set")]
    MissingToken {
        var: &'static str,
        #[source]
        source: AuthError,
    },

    /// `search` was run without a query.
    #[error("search command requires a query argument")]
    MissingQuery,

    /// The command name is not one of the supported commands.
    #[error("unknown command: {0}")]
    UnknownCommand(String),
}
