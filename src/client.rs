// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Clients for reading timelines, mentions, and search results from a
//! Mastodon instance.

use crate::conf::{ConfigError, RequestConfig};
use crate::http::{HTTPError, Service};
use crate::thing::{Payload, Record};
use log::{info, warn};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use tokio::time;

/// One of the read-only resources this program knows how to fetch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// The authenticated user's home timeline.
    Home,

    /// Statuses posted by the authenticated user.
    UserTweets,

    /// Notifications in which the authenticated user was mentioned.
    Mentions,

    /// Statuses matching a free-text query.
    Search { query: String },
}

impl Command {
    /// Resolves a command from its command-line `name` and optional `query`.
    ///
    /// `query` is only used by `search`, which fails without one.
    ///
    /// # Examples
    ///
    /// ```
    /// use mastodon_scout::client::Command;
    /// let command = Command::parse("search", Some(String::from("#rust"))).unwrap();
    /// assert_eq!(command, Command::Search { query: String::from("#rust") });
    /// assert!(Command::parse("search", None).is_err());
    /// assert!(Command::parse("followers", None).is_err());
    /// ```
    pub fn parse(name: &str, query: Option<String>) -> Result<Self, ConfigError> {
        match name {
            "home" => Ok(Command::Home),
            "user-tweets" => Ok(Command::UserTweets),
            "mentions" => Ok(Command::Mentions),
            "search" => query
                .map(|query| Command::Search { query })
                .ok_or(ConfigError::MissingQuery),
            _ => Err(ConfigError::UnknownCommand(name.to_string())),
        }
    }

    /// Name of the command as typed on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Home => "home",
            Command::UserTweets => "user-tweets",
            Command::Mentions => "mentions",
            Command::Search { .. } => "search",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fetches resources from a Mastodon instance through a [`Service`].
#[derive(Debug)]
pub struct Client<S: Service> {
    service: S,
    limit: u32,
    timeout: Duration,
}

impl<S: Service> Client<S> {
    /// Creates a new client that sends requests through `service`, using
    /// the limit and deadline in `config`.
    pub fn new(service: S, config: &RequestConfig) -> Self {
        Self {
            service,
            limit: config.limit(),
            timeout: config.timeout(),
        }
    }

    /// Fetches the resource named by `command`.
    ///
    /// The whole fetch, including both requests made by `user-tweets`,
    /// must finish before the configured deadline. When it doesn't, the
    /// in-flight request is dropped and [`HTTPError::Timeout`] is returned.
    /// Nothing is ever retried.
    pub async fn fetch(&self, command: &Command) -> Result<Payload, Error> {
        info!("Fetching {command} (limit {})", self.limit);
        match time::timeout(self.timeout, self.fetch_payload(command)).await {
            Ok(result) => result,
            Err(_) => {
                warn!("Gave up on {command} after {}s", self.timeout.as_secs());
                Err(HTTPError::Timeout(self.timeout).into())
            }
        }
    }

    async fn fetch_payload(&self, command: &Command) -> Result<Payload, Error> {
        match command {
            Command::Home => {
                let body = self.service.get(&self.home_endpoint()).await?;
                Ok(Payload::Statuses(decode(&body, "response")?))
            }
            Command::UserTweets => {
                let id = self.account_id().await?;
                let body = self.service.get(&self.statuses_endpoint(&id)).await?;
                Ok(Payload::Statuses(decode(&body, "response")?))
            }
            Command::Mentions => {
                let body = self.service.get(&self.mentions_endpoint()).await?;
                Ok(Payload::Notifications(decode(&body, "response")?))
            }
            Command::Search { query } => {
                let body = self.service.get(&self.search_endpoint(query)).await?;
                Ok(Payload::Search(decode(&body, "response")?))
            }
        }
    }

    async fn account_id(&self) -> Result<String, Error> {
        let body = self.service.get(Self::CREDENTIALS_ENDPOINT).await?;
        let account: Record = decode(&body, "account")?;
        account
            .get("id")
            .and_then(Value::as_str)
            .map(String::from)
            .ok_or(Error::Auth)
    }

    const CREDENTIALS_ENDPOINT: &'static str = "/api/v1/accounts/verify_credentials";

    fn home_endpoint(&self) -> String {
        format!("/api/v1/timelines/home?limit={}", self.limit)
    }

    fn statuses_endpoint(&self, account_id: &str) -> String {
        let account_id = urlencoding::encode(account_id);
        format!("/api/v1/accounts/{account_id}/statuses?limit={}", self.limit)
    }

    fn mentions_endpoint(&self) -> String {
        format!("/api/v1/notifications?limit={}&types[]=mention", self.limit)
    }

    fn search_endpoint(&self, query: &str) -> String {
        let query = urlencoding::encode(query);
        format!("/api/v2/search?q={query}&type=statuses&limit={}", self.limit)
    }
}

fn decode<T: DeserializeOwned>(body: &str, context: &'static str) -> Result<T, Error> {
    serde_json::from_str(body).map_err(|source| Error::Decode { context, source })
}

/// A client error.
#[derive(Debug, Error)]
pub enum Error {
    /// The invocation is invalid; no request was made.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// An error from the underlying HTTP service.
    #[error(transparent)]
    Http(#[from] HTTPError),

    /// A response body that could not be decoded.
    #[error("parsing {context}: {source}")]
    Decode {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// Output that could not be encoded as JSON.
    #[error("encoding output: {0}")]
    Encode(#[source] serde_json::Error),

    /// The authenticated account has no usable identifier.
    #[error("account ID not found")]
    Auth,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{Reply, TestService, load_data};
    use serde_json::json;

    fn client(service: TestService) -> Client<TestService> {
        Client::new(service, &RequestConfig::default())
    }

    mod command {
        use super::*;

        #[test]
        fn it_parses_every_command() {
            assert_eq!(Command::parse("home", None).unwrap(), Command::Home);
            assert_eq!(
                Command::parse("user-tweets", None).unwrap(),
                Command::UserTweets
            );
            assert_eq!(Command::parse("mentions", None).unwrap(), Command::Mentions);
            assert_eq!(
                Command::parse("search", Some(String::from("rust"))).unwrap(),
                Command::Search {
                    query: String::from("rust")
                }
            );
        }

        #[test]
        fn it_ignores_queries_for_other_commands() {
            let command = Command::parse("home", Some(String::from("ignored"))).unwrap();
            assert_eq!(command, Command::Home);
        }

        #[test]
        fn it_requires_a_search_query() {
            let err = Command::parse("search", None).unwrap_err();
            assert!(matches!(err, ConfigError::MissingQuery));
        }

        #[test]
        fn it_rejects_unknown_commands() {
            let err = Command::parse("favourites", None).unwrap_err();
            assert!(matches!(err, ConfigError::UnknownCommand(name) if name == "favourites"));
        }

        #[test]
        fn it_displays_its_name() {
            let command = Command::Search {
                query: String::from("rust"),
            };
            assert_eq!(command.to_string(), "search");
            assert_eq!(Command::UserTweets.to_string(), "user-tweets");
        }
    }

    mod endpoints {
        use super::*;

        #[test]
        fn it_returns_an_endpoint_for_the_home_timeline() {
            let client = client(TestService::new());
            assert_eq!(client.home_endpoint(), "/api/v1/timelines/home?limit=20");
        }

        #[test]
        fn it_returns_an_endpoint_for_account_statuses() {
            let client = client(TestService::new());
            assert_eq!(
                client.statuses_endpoint("109302"),
                "/api/v1/accounts/109302/statuses?limit=20"
            );
        }

        #[test]
        fn it_returns_an_endpoint_for_mentions() {
            let client = client(TestService::new());
            assert_eq!(
                client.mentions_endpoint(),
                "/api/v1/notifications?limit=20&types[]=mention"
            );
        }

        #[test]
        fn it_encodes_search_queries() {
            let client = client(TestService::new());
            assert_eq!(
                client.search_endpoint("#rust & wasm"),
                "/api/v2/search?q=%23rust%20%26%20wasm&type=statuses&limit=20"
            );
        }

        #[test]
        fn it_uses_the_configured_limit() {
            let config = RequestConfig::build().limit(5).build();
            let client = Client::new(TestService::new(), &config);
            assert_eq!(client.home_endpoint(), "/api/v1/timelines/home?limit=5");
        }
    }

    mod fetch {
        use super::*;
        use pretty_assertions::assert_eq;

        const HOME: &str = "/api/v1/timelines/home?limit=20";
        const CREDENTIALS: &str = "/api/v1/accounts/verify_credentials";
        const STATUSES: &str = "/api/v1/accounts/109302/statuses?limit=20";
        const MENTIONS: &str = "/api/v1/notifications?limit=20&types[]=mention";
        const SEARCH: &str = "/api/v2/search?q=rust&type=statuses&limit=20";

        fn records(file: &str) -> Vec<Option<Record>> {
            serde_json::from_str(&load_data(file)).unwrap()
        }

        #[tokio::test]
        async fn it_fetches_the_home_timeline() {
            let service = TestService::new().reply(HOME, Reply::fixture("home"));
            let client = client(service.clone());
            let payload = client.fetch(&Command::Home).await.unwrap();
            assert_eq!(payload, Payload::Statuses(records("home")));
            assert_eq!(service.requests(), vec![HOME]);
        }

        #[tokio::test]
        async fn it_keeps_null_statuses_instead_of_failing() {
            let service = TestService::new().reply(HOME, Reply::Body(String::from("[null]")));
            let payload = client(service).fetch(&Command::Home).await.unwrap();
            assert_eq!(payload, Payload::Statuses(vec![None]));
        }

        #[tokio::test]
        async fn it_keeps_null_mentions_instead_of_failing() {
            let body = json!([null, {"type": "mention"}]).to_string();
            let service = TestService::new().reply(MENTIONS, Reply::Body(body));
            let payload = client(service).fetch(&Command::Mentions).await.unwrap();
            let mention: Record = serde_json::from_value(json!({"type": "mention"})).unwrap();
            assert_eq!(payload, Payload::Notifications(vec![None, Some(mention)]));
        }

        #[tokio::test]
        async fn it_fetches_the_users_statuses_in_two_requests() {
            let service = TestService::new()
                .reply(CREDENTIALS, Reply::fixture("verify_credentials"))
                .reply(STATUSES, Reply::fixture("statuses"));
            let client = client(service.clone());
            let payload = client.fetch(&Command::UserTweets).await.unwrap();
            assert_eq!(payload, Payload::Statuses(records("statuses")));
            assert_eq!(service.requests(), vec![CREDENTIALS, STATUSES]);
        }

        #[tokio::test]
        async fn it_fails_when_the_account_has_no_id() {
            let service = TestService::new().reply(
                CREDENTIALS,
                Reply::Body(json!({"username": "scout"}).to_string()),
            );
            let client = client(service.clone());
            let err = client.fetch(&Command::UserTweets).await.unwrap_err();
            assert!(matches!(err, Error::Auth));
            assert_eq!(err.to_string(), "account ID not found");
            assert_eq!(service.requests(), vec![CREDENTIALS]);
        }

        #[tokio::test]
        async fn it_fails_when_the_account_id_is_not_a_string() {
            let service = TestService::new().reply(
                CREDENTIALS,
                Reply::Body(json!({"id": 109302}).to_string()),
            );
            let client = client(service.clone());
            let err = client.fetch(&Command::UserTweets).await.unwrap_err();
            assert!(matches!(err, Error::Auth));
            assert_eq!(service.requests(), vec![CREDENTIALS]);
        }

        #[tokio::test]
        async fn it_fetches_mentions() {
            let service = TestService::new().reply(MENTIONS, Reply::fixture("mentions"));
            let client = client(service.clone());
            let payload = client.fetch(&Command::Mentions).await.unwrap();
            assert_eq!(payload, Payload::Notifications(records("mentions")));
        }

        #[tokio::test]
        async fn it_searches_statuses() {
            let service = TestService::new().reply(SEARCH, Reply::fixture("search"));
            let client = client(service.clone());
            let command = Command::Search {
                query: String::from("rust"),
            };
            let payload = client.fetch(&command).await.unwrap();
            let expected: Record = serde_json::from_str(&load_data("search")).unwrap();
            assert_eq!(payload, Payload::Search(expected));
            assert_eq!(service.requests(), vec![SEARCH]);
        }

        #[tokio::test]
        async fn it_reports_api_errors_with_the_raw_body() {
            let body = r#"{"error":"Record not found"}"#;
            let service = TestService::new().reply(HOME, Reply::Status(404, body.to_string()));
            let err = client(service).fetch(&Command::Home).await.unwrap_err();
            assert!(matches!(err, Error::Http(HTTPError::Api { status: 404, .. })));
            let message = err.to_string();
            assert!(message.contains("404"), "{message}");
            assert!(message.contains(body), "{message}");
        }

        #[tokio::test]
        async fn it_reports_malformed_bodies() {
            let service = TestService::new().reply(HOME, Reply::Body(String::from("<html>")));
            let err = client(service).fetch(&Command::Home).await.unwrap_err();
            assert!(matches!(err, Error::Decode { context: "response", .. }));
            assert!(err.to_string().starts_with("parsing response: "));
        }

        #[tokio::test]
        async fn it_reports_malformed_accounts() {
            let service =
                TestService::new().reply(CREDENTIALS, Reply::Body(String::from("nope")));
            let err = client(service).fetch(&Command::UserTweets).await.unwrap_err();
            assert!(matches!(err, Error::Decode { context: "account", .. }));
        }

        #[tokio::test]
        async fn it_rejects_search_results_that_are_not_objects() {
            let service = TestService::new().reply(SEARCH, Reply::Body(String::from("[]")));
            let command = Command::Search {
                query: String::from("rust"),
            };
            let err = client(service).fetch(&command).await.unwrap_err();
            assert!(matches!(err, Error::Decode { .. }));
        }

        #[tokio::test(start_paused = true)]
        async fn it_times_out_when_the_service_stalls() {
            let service = TestService::new().reply(HOME, Reply::Stall);
            let config = RequestConfig::build().timeout(Duration::from_secs(5)).build();
            let client = Client::new(service, &config);
            let err = client.fetch(&Command::Home).await.unwrap_err();
            assert!(matches!(err, Error::Http(HTTPError::Timeout(_))));
            assert_eq!(err.to_string(), "request timed out after 5s");
        }

        #[tokio::test(start_paused = true)]
        async fn it_applies_one_deadline_to_both_user_requests() {
            let service = TestService::new()
                .reply(CREDENTIALS, Reply::fixture("verify_credentials"))
                .reply(STATUSES, Reply::Stall);
            let config = RequestConfig::build().timeout(Duration::from_secs(5)).build();
            let client = Client::new(service.clone(), &config);
            let err = client.fetch(&Command::UserTweets).await.unwrap_err();
            assert!(matches!(&err, Error::Http(HTTPError::Timeout(_))));
            assert_eq!(service.requests(), vec![CREDENTIALS, STATUSES]);
        }
    }
}
