// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Draws fetched payloads as JSON or as plain text for a terminal.

use crate::client::Error;
use crate::conf::OutputFormat;
use crate::thing::{DisplayMention, DisplayPost, Payload, Record};
use indoc::formatdoc;
use itertools::Itertools;
use serde::Serialize;
use serde_json::Value;

/// Marks an item that can be converted into a string for display on a terminal.
pub trait Viewable {
    /// Converts the item into a string for display on a terminal.
    fn view(&self) -> String;
}

impl Viewable for DisplayPost {
    fn view(&self) -> String {
        let boosted = match &self.boosted_by {
            Some(booster) => format!("🔁 @{booster} boosted\n"),
            None => String::new(),
        };
        formatdoc! {"
            {boosted}@{username} ({display_name})
            {created_at}

            {content}

            💬 {replies}  🔁 {reblogs}  ⭐ {favorites}
            🔗 {url}
            ",
            boosted = boosted,
            username = self.author_username,
            display_name = self.author_display_name,
            created_at = self.created_at,
            content = self.content,
            replies = self.reply_count,
            reblogs = self.reblog_count,
            favorites = self.favorite_count,
            url = self.url,
        }
    }
}

impl Viewable for DisplayMention {
    fn view(&self) -> String {
        formatdoc! {"
            @{username} ({display_name}) mentioned you
            {created_at}

            {content}
            ",
            username = self.username,
            display_name = self.display_name,
            created_at = self.created_at,
            content = self.content,
        }
    }
}

impl Viewable for Payload {
    fn view(&self) -> String {
        let empty = Record::new();
        match self {
            Payload::Statuses(statuses) => {
                view_posts(statuses.iter().map(|status| status.as_ref().unwrap_or(&empty)))
            }
            Payload::Notifications(notifications) => view_mentions(
                notifications
                    .iter()
                    .map(|notification| notification.as_ref().unwrap_or(&empty)),
            ),
            Payload::Search(result) => {
                let statuses = result
                    .get("statuses")
                    .and_then(Value::as_array)
                    .into_iter()
                    .flatten()
                    .map(|status| status.as_object().unwrap_or(&empty));
                view_posts(statuses)
            }
        }
    }
}

fn view_posts<'a>(statuses: impl Iterator<Item = &'a Record>) -> String {
    let output = statuses
        .map(DisplayPost::from_status)
        .enumerate()
        .map(|(i, post)| format!("--- Post {} ---\n{}", i + 1, post.view()))
        .join("\n");
    if output.is_empty() {
        String::from("No posts found.")
    } else {
        output
    }
}

fn view_mentions<'a>(notifications: impl Iterator<Item = &'a Record>) -> String {
    let output = notifications
        .map(DisplayMention::from_notification)
        .enumerate()
        .map(|(i, mention)| format!("--- Mention {} ---\n{}", i + 1, mention.view()))
        .join("\n");
    if output.is_empty() {
        String::from("No mentions found.")
    } else {
        output
    }
}

/// Renders `payload` for standard output in the requested `format`.
///
/// The caller is expected to print the result followed by a newline, which
/// leaves a blank line after the last post or mention.
pub fn render(payload: &Payload, format: OutputFormat) -> Result<String, Error> {
    match format {
        OutputFormat::Json => Envelope::success(payload).to_json(),
        OutputFormat::Text => Ok(payload.view()),
    }
}

/// The `{success, data | error}` wrapper around all JSON output.
#[derive(Debug, Serialize)]
pub struct Envelope<'a> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a Payload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<'a> Envelope<'a> {
    /// Wraps a successfully fetched payload.
    pub fn success(data: &'a Payload) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Wraps an error message.
    ///
    /// # Examples
    ///
    /// ```
    /// use mastodon_scout::view::Envelope;
    /// let json = Envelope::failure("unknown command: boost").to_json().unwrap();
    /// assert_eq!(json, r#"{"success":false,"error":"unknown command: boost"}"#);
    /// ```
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }

    /// Serializes the envelope onto a single line.
    pub fn to_json(&self) -> Result<String, Error> {
        serde_json::to_string(self).map_err(Error::Encode)
    }
}
