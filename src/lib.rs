// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! mastodon-scout is a command-line tool for reading a Mastodon account
//! from the terminal. It fetches a single page of the home timeline, the
//! account's own posts, its mentions, or a status search, and prints it
//! either as a plain-text summary or as the raw API response wrapped in a
//! small JSON envelope.
//!
//! # Examples
//!
//! Every command needs an access token in `$MASTODON_TOKEN`:
//!
//! ```bash
//! export MASTODON_TOKEN='your access token'
//! ```
//!
//! Display the last 20 posts in your home timeline:
//!
//! ```bash
//! mastodon-scout home
//! ```
//!
//! Display your own last 5 posts on another instance:
//!
//! ```bash
//! mastodon-scout --instance https://fosstodon.org --limit 5 user-tweets
//! ```
//!
//! Display your mentions as JSON:
//!
//! ```bash
//! mastodon-scout --json mentions
//! ```
//!
//! Search for posts:
//!
//! ```bash
//! mastodon-scout search '#rustlang'
//! ```
//!
//! Get usage and help for the tool:
//!
//! ```bash
//! mastodon-scout --help
//! ```
//!
//! # Access tokens
//!
//! Create an application under *Preferences → Development* on your
//! instance with the `read` scope, then copy its access token. The token
//! is only ever sent in the `Authorization` header; it is never logged or
//! printed.
//!
//! # Output
//!
//! With `--json`, successful output is `{"success":true,"data":...}`, where
//! `data` is the API response exactly as received. Failures are always
//! reported as `{"success":false,"error":"..."}` on stdout, with an
//! `Error: ...` line on stderr and an exit status of 1.
//!
//! # License
//!
//! mastodon-scout is licensed under the terms of the [Apache License 2.0].
//! Please see the LICENSE file accompanying this source code or visit the
//! previous link for more information on licensing.
//!
//! [Apache License 2.0]: https://www.apache.org/licenses/LICENSE-2.0

pub mod auth;
pub mod cli;
pub mod client;
pub mod conf;
pub mod http;
pub mod text;
pub mod thing;
pub mod view;

#[cfg(test)]
mod test_utils;
