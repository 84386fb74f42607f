//! Text formatting for post bodies.
//!
//! Post content arrives as plain text. It is turned into markup by escaping
//! everything, wrapping bare URLs in links and turning newlines into `<br>`.

use std::borrow::Cow;
use std::sync::LazyLock;

use chrono::{DateTime, Local, NaiveDateTime};
use maud::{html, Markup, PreEscaped, Render};
use regex::Regex;

use crate::constants::{DISPLAY_TIME_FORMAT, ELLIPSIS};

static URL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://\S+").expect("Invalid URL pattern"));

/// Placeholder shown for posts without text.
pub const NO_TEXT: &str = "No text";

/// Convert raw post text into link-aware, line-broken markup.
///
/// URLs are matched on the raw text and never span a newline, so the
/// newline pass only ever sees plain text segments.
#[must_use]
pub fn format_content(content: Option<&str>) -> Markup {
    let Some(text) = content.filter(|t| !t.is_empty()) else {
        return html! { em { (NO_TEXT) } };
    };

    let mut out = String::with_capacity(text.len() + text.len() / 4);
    let mut last = 0;

    for url in URL_PATTERN.find_iter(text) {
        push_text(&mut out, &text[last..url.start()]);
        html! {
            a href=(url.as_str()) target="_blank" class="post-link" { (url.as_str()) }
        }
        .render_to(&mut out);
        last = url.end();
    }
    push_text(&mut out, &text[last..]);

    PreEscaped(out)
}

/// Escape a plain text segment, replacing newlines with line breaks.
fn push_text(out: &mut String, text: &str) {
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            out.push_str("<br>");
        }
        line.render_to(out);
    }
}

/// The visible part of a post body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Excerpt<'a> {
    pub text: Cow<'a, str>,
    pub truncated: bool,
}

/// Cut content longer than `max_chars` characters, appending an ellipsis.
///
/// No word-boundary adjustment is made.
#[must_use]
pub fn truncate_content(content: &str, max_chars: usize) -> Excerpt<'_> {
    match content.char_indices().nth(max_chars) {
        Some((cut, _)) => {
            let mut text = String::with_capacity(cut + ELLIPSIS.len());
            text.push_str(&content[..cut]);
            text.push_str(ELLIPSIS);
            Excerpt {
                text: Cow::Owned(text),
                truncated: true,
            }
        }
        None => Excerpt {
            text: Cow::Borrowed(content),
            truncated: false,
        },
    }
}

/// Quote a string as a single-quoted JavaScript literal.
#[must_use]
pub fn js_string_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('\'');
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

/// Render an upstream timestamp for display.
///
/// Accepts RFC 3339 and the offset-less ISO form the upstream emits; anything
/// else is shown unchanged.
#[must_use]
pub fn display_timestamp(raw: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.with_timezone(&Local).format(DISPLAY_TIME_FORMAT).to_string();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return dt.format(DISPLAY_TIME_FORMAT).to_string();
    }
    raw.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_content_is_placeholder() {
        assert_eq!(format_content(Some("")).into_string(), "<em>No text</em>");
        assert_eq!(format_content(None).into_string(), "<em>No text</em>");
    }

    #[test]
    fn test_newlines_become_breaks() {
        assert_eq!(format_content(Some("a\nb")).into_string(), "a<br>b");
        assert_eq!(format_content(Some("a\n\nb")).into_string(), "a<br><br>b");
    }

    #[test]
    fn test_url_is_wrapped() {
        assert_eq!(
            format_content(Some("see http://x.test now")).into_string(),
            r#"see <a href="http://x.test" target="_blank" class="post-link">http://x.test</a> now"#
        );
    }

    #[test]
    fn test_url_followed_by_newline() {
        let html = format_content(Some("https://a.test/x\nnext")).into_string();
        assert_eq!(
            html,
            r#"<a href="https://a.test/x" target="_blank" class="post-link">https://a.test/x</a><br>next"#
        );
    }

    #[test]
    fn test_text_is_escaped() {
        let html = format_content(Some("<script>alert('x')</script> & more")).into_string();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("&amp; more"));
    }

    #[test]
    fn test_url_with_quote_is_escaped_in_href() {
        let html = format_content(Some(r#"http://x.test/"onmouseover="#)).into_string();
        assert!(html.contains("href=\"http://x.test/&quot;onmouseover=\""));
    }

    #[test]
    fn test_truncate_short_content() {
        let excerpt = truncate_content("short", 300);
        assert!(!excerpt.truncated);
        assert_eq!(excerpt.text, "short");

        let exact = "x".repeat(300);
        assert!(!truncate_content(&exact, 300).truncated);
    }

    #[test]
    fn test_truncate_long_content() {
        let long = "y".repeat(301);
        let excerpt = truncate_content(&long, 300);
        assert!(excerpt.truncated);
        assert_eq!(excerpt.text, format!("{}...", "y".repeat(300)));
    }

    #[test]
    fn test_truncate_counts_characters_not_bytes() {
        let cyrillic = "ж".repeat(300);
        assert!(!truncate_content(&cyrillic, 300).truncated);

        let longer = "ж".repeat(305);
        let excerpt = truncate_content(&longer, 300);
        assert!(excerpt.truncated);
        assert_eq!(excerpt.text.chars().count(), 303);
    }

    #[test]
    fn test_js_string_literal() {
        assert_eq!(js_string_literal("it's"), r"'it\'s'");
        assert_eq!(js_string_literal("a\nb"), r"'a\nb'");
        assert_eq!(js_string_literal(r"c:\dir"), r"'c:\\dir'");
    }

    #[test]
    fn test_display_timestamp() {
        assert_eq!(
            display_timestamp("2024-01-02T03:04:05.123456"),
            "02.01.2024, 03:04:05"
        );
        assert_eq!(display_timestamp("yesterday"), "yesterday");
    }
}
