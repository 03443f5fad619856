// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Statuses, notifications, and the other "things" the Mastodon API returns.
//!
//! Responses are kept as loosely-typed JSON objects so they can be echoed
//! back verbatim in JSON mode. The accessors in this module read fields
//! defensively: an absent or wrong-typed field yields a default instead of
//! an error, so a partial record from the API still renders.

use crate::text;
use serde::Serialize;
use serde_json::{Map, Value};

/// A single JSON object from an API response.
pub type Record = Map<String, Value>;

/// A decoded API response, tagged by the shape each command returns.
///
/// A `null` element in a list is kept as `None`; it is echoed back as
/// `null` and displayed as a record with every field defaulted.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    /// Status records, returned for `home` and `user-tweets`.
    Statuses(Vec<Option<Record>>),

    /// Notification records, returned for `mentions`.
    Notifications(Vec<Option<Record>>),

    /// A search result object holding a `statuses` array.
    Search(Record),
}

/// Returns the string stored under `key`, or `default` if the record is
/// missing, the key is absent, or the value is not a string.
///
/// # Examples
///
/// ```
/// use mastodon_scout::thing::{Record, string_field};
/// use serde_json::json;
///
/// let record: Record = serde_json::from_value(json!({"username": "ferris", "id": 7})).unwrap();
/// assert_eq!(string_field(Some(&record), "username", ""), "ferris");
/// assert_eq!(string_field(Some(&record), "id", "none"), "none");
/// assert_eq!(string_field(None, "username", ""), "");
/// ```
pub fn string_field<'a>(record: Option<&'a Record>, key: &str, default: &'a str) -> &'a str {
    record
        .and_then(|record| record.get(key))
        .and_then(Value::as_str)
        .unwrap_or(default)
}

/// Returns the number stored under `key`, or `default` if the record is
/// missing, the key is absent, or the value is not a number.
pub fn number_field(record: Option<&Record>, key: &str, default: f64) -> f64 {
    record
        .and_then(|record| record.get(key))
        .and_then(Value::as_f64)
        .unwrap_or(default)
}

/// Returns the nested object stored under `key`, if there is one.
pub fn record_field<'a>(record: Option<&'a Record>, key: &str) -> Option<&'a Record> {
    record
        .and_then(|record| record.get(key))
        .and_then(Value::as_object)
}

/// A status reduced to what gets displayed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DisplayPost {
    pub author_username: String,
    pub author_display_name: String,
    pub created_at: String,
    /// Content with markup stripped.
    pub content: String,
    pub reply_count: i64,
    pub reblog_count: i64,
    pub favorite_count: i64,
    pub url: String,
    /// Username of the account that boosted the post, if it is a boost.
    pub boosted_by: Option<String>,
}

impl DisplayPost {
    /// Projects a status record into a displayable post.
    ///
    /// A status with a `reblog` object is a boost: everything but the
    /// booster's name is read from the boosted status.
    pub fn from_status(status: &Record) -> Self {
        let reblog = record_field(Some(status), "reblog");
        let boosted_by = reblog.map(|_| {
            let booster = record_field(Some(status), "account");
            string_field(booster, "username", "").to_string()
        });

        let post = Some(reblog.unwrap_or(status));
        let account = record_field(post, "account");

        Self {
            author_username: string_field(account, "username", "").to_string(),
            author_display_name: string_field(account, "display_name", "").to_string(),
            created_at: string_field(post, "created_at", "").to_string(),
            content: text::strip_html(string_field(post, "content", "")),
            reply_count: number_field(post, "replies_count", 0.0) as i64,
            reblog_count: number_field(post, "reblogs_count", 0.0) as i64,
            favorite_count: number_field(post, "favourites_count", 0.0) as i64,
            url: string_field(post, "url", "").to_string(),
            boosted_by,
        }
    }
}

/// A mention notification reduced to what gets displayed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DisplayMention {
    pub username: String,
    pub display_name: String,
    /// When the notification was created, not the mentioning status.
    pub created_at: String,
    /// Content of the mentioning status, with markup stripped.
    pub content: String,
}

impl DisplayMention {
    /// Projects a notification record into a displayable mention.
    pub fn from_notification(notification: &Record) -> Self {
        let account = record_field(Some(notification), "account");
        let status = record_field(Some(notification), "status");

        Self {
            username: string_field(account, "username", "").to_string(),
            display_name: string_field(account, "display_name", "").to_string(),
            created_at: string_field(Some(notification), "created_at", "").to_string(),
            content: text::strip_html(string_field(status, "content", "")),
        }
    }
}
