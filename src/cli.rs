// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Drives the command-line program.

pub use crate::client::Error;
use crate::auth::Auth;
use crate::client::{Client, Command};
use crate::conf::{
    ConfigError, DEFAULT_INSTANCE, DEFAULT_LIMIT, DEFAULT_TIMEOUT, OutputFormat, RequestConfig,
    TOKEN_VAR,
};
use crate::http::{MastodonService, Service};
use crate::view::{self, Envelope};
use clap::Parser;
use clap_verbosity_flag::Verbosity;
use log::{debug, warn};
use std::process::ExitCode;
use std::time::Duration;

/// Program configuration.
#[derive(Debug, Parser)]
#[command(version)]
#[command(
    about = "Reads your Mastodon home timeline, posts, mentions and search results",
    long_about = None,
    after_help = "Commands:\n  home              Get home timeline\n  user-tweets       Get your own posts\n  mentions          Get mentions\n  search <query>    Search for posts\n\nThe access token is read from $MASTODON_TOKEN."
)]
pub struct Config {
    #[command(flatten)]
    verbosity: Verbosity,

    /// Mastodon instance URL
    #[arg(long, value_name = "URL", env = "MASTODON_INSTANCE", default_value = DEFAULT_INSTANCE)]
    instance: String,

    /// Number of items to return
    #[arg(long, value_name = "N", default_value_t = DEFAULT_LIMIT)]
    limit: u32,

    /// Timeout in seconds
    #[arg(long, value_name = "SECONDS", default_value_t = DEFAULT_TIMEOUT)]
    timeout: u64,

    /// Output in JSON format
    #[arg(long, default_value_t = false)]
    json: bool,

    /// One of: home, user-tweets, mentions, search
    command: String,

    /// Search query, required by `search`; any further arguments are ignored
    #[arg(value_name = "QUERY")]
    args: Vec<String>,
}

impl Config {
    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    /// Options for fetching and rendering, derived from the command line.
    pub fn request_config(&self) -> RequestConfig {
        let format = if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        };
        RequestConfig::build()
            .instance(&self.instance)
            .limit(self.limit)
            .timeout(Duration::from_secs(self.timeout))
            .format(format)
            .build()
    }
}

/// Runs the command-line program.
#[derive(Debug)]
pub struct Runner<S: Service> {
    client: Client<S>,
    command: Command,
    config: RequestConfig,
}

impl Runner<MastodonService> {
    /// Create a new program runner using the given `config`.
    ///
    /// Returns an error if no access token is set or the command line names
    /// an invalid command. No request has been made at that point.
    pub fn new(config: Config) -> Result<Self, Error> {
        let auth = Auth::from_env(TOKEN_VAR).map_err(|source| ConfigError::MissingToken {
            var: TOKEN_VAR,
            source,
        })?;
        let service = MastodonService::new(config.request_config().instance(), auth)?;
        Self::new_with_service(config, service)
    }
}

impl<S: Service> Runner<S> {
    /// Create a new program runner that sends its requests through `service`.
    pub(crate) fn new_with_service(config: Config, service: S) -> Result<Self, Error> {
        if config.args.len() > 1 {
            warn!("Ignoring extra arguments: {}", config.args[1..].join(" "));
        }
        let command = Command::parse(&config.command, config.args.first().cloned())?;
        let request_config = config.request_config();
        debug!("Using instance {}", request_config.instance());
        let client = Client::new(service, &request_config);
        Ok(Self {
            client,
            command,
            config: request_config,
        })
    }

    /// Fetches the configured command and renders it for standard output.
    pub async fn run(&self) -> Result<String, Error> {
        let payload = self.client.fetch(&self.command).await?;
        view::render(&payload, self.config.format())
    }
}

/// Runs the program to completion and returns its exit status.
///
/// On success the rendered output is printed to stdout. On failure a JSON
/// error envelope is printed to stdout, whatever the output format, and a
/// human-readable message is printed to stderr.
pub async fn run(config: Config) -> ExitCode {
    let result = match Runner::new(config) {
        Ok(runner) => runner.run().await,
        Err(err) => Err(err),
    };

    match result {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            report(&err);
            ExitCode::FAILURE
        }
    }
}

fn report(err: &Error) {
    let message = err.to_string();
    match Envelope::failure(&message).to_json() {
        Ok(json) => println!("{json}"),
        Err(encode_err) => debug!("Could not encode error envelope: {encode_err}"),
    }
    eprintln!("Error: {message}");
}
