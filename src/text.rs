// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Helpful utilities for working with text.

/// Markup that separates lines or paragraphs, and the text it becomes.
const BREAKS: [(&str, &str); 4] = [
    ("<br />", "\n"),
    ("<br/>", "\n"),
    ("<br>", "\n"),
    ("</p><p>", "\n\n"),
];

/// Character entities decoded after tags are removed, in decoding order.
const ENTITIES: [(&str, &str); 5] = [
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&amp;", "&"),
    ("&quot;", "\""),
    ("&#39;", "'"),
];

/// Converts HTML post content into plain text.
///
/// Line breaks and paragraph boundaries become newlines, every tag is
/// removed, and the common character entities are decoded into their
/// literal characters.
///
/// This is a scan, not a parser. Everything from a `<` up to the next `>`
/// is dropped, so a `<` that is never closed swallows the rest of the
/// string. Entities are decoded only after tags are gone, so an escaped
/// `&lt;b&gt;` survives as the literal text `<b>`.
///
/// # Examples
///
/// ```
/// use mastodon_scout::text::strip_html;
/// let html = "<p>Hello &amp; welcome</p><p>World</p>";
/// assert_eq!(strip_html(html), "Hello & welcome\n\nWorld");
/// ```
///
/// ```
/// use mastodon_scout::text::strip_html;
/// let html = "first line<br />second line";
/// assert_eq!(strip_html(html), "first line\nsecond line");
/// ```
///
/// ```
/// use mastodon_scout::text::strip_html;
/// let raw = "A plaintext post";
/// assert_eq!(strip_html(raw), raw);
/// ```
pub fn strip_html(html: &str) -> String {
    let html = BREAKS
        .iter()
        .fold(html.to_string(), |html, (tag, newline)| html.replace(tag, newline));

    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => text.push(ch),
            _ => {}
        }
    }

    ENTITIES
        .iter()
        .fold(text, |text, (entity, literal)| text.replace(entity, literal))
}
