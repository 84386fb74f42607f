//! Post card component.

use maud::{html, Markup, Render};

use crate::constants::{CARD_REVEAL_STEP_SECS, TRUNCATE_CHARS};
use crate::feed::{Post, PostKind};
use crate::render::format::{format_content, js_string_literal, truncate_content};
use crate::view::CardState;

/// How a post type is presented in the card header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostPresentation {
    pub icon: &'static str,
    pub class: &'static str,
    pub label: &'static str,
}

impl PostPresentation {
    #[must_use]
    pub const fn for_kind(kind: PostKind) -> Self {
        match kind {
            PostKind::Photo => Self {
                icon: "fas fa-image",
                class: "type-media",
                label: "Photo",
            },
            PostKind::Video => Self {
                icon: "fas fa-video",
                class: "type-media",
                label: "Video",
            },
            PostKind::Document => Self {
                icon: "fas fa-file",
                class: "type-text",
                label: "Document",
            },
            PostKind::Text | PostKind::Unknown => Self {
                icon: "fas fa-font",
                class: "type-text",
                label: "Text",
            },
        }
    }
}

/// A card rendering one post.
///
/// # Example
///
/// ```ignore
/// use crate::render::card::PostCard;
///
/// let card = PostCard::new(&post, 0, "https://t.me/channel")
///     .with_state(registry.get(&post.id).unwrap_or_default());
/// ```
#[derive(Debug, Clone)]
pub struct PostCard<'a> {
    pub post: &'a Post,
    pub index: usize,
    pub channel_url: &'a str,
    pub state: CardState,
}

impl<'a> PostCard<'a> {
    #[must_use]
    pub fn new(post: &'a Post, index: usize, channel_url: &'a str) -> Self {
        Self {
            post,
            index,
            channel_url,
            state: CardState::default(),
        }
    }

    #[must_use]
    pub fn with_state(mut self, state: CardState) -> Self {
        self.state = state;
        self
    }

    /// DOM id of the card element.
    #[must_use]
    pub fn dom_id(&self) -> String {
        format!("post-{}", self.post.id)
    }

    fn reveal_delay(&self) -> String {
        format!("animation-delay: {:.1}s", self.index as f64 * CARD_REVEAL_STEP_SECS)
    }
}

impl Render for PostCard<'_> {
    fn render(&self) -> Markup {
        let post = self.post;
        let presentation = PostPresentation::for_kind(post.kind);
        let excerpt = truncate_content(&post.content, TRUNCATE_CHARS);
        let link = post.link(self.channel_url);
        let control = self.state.control();

        let copy_js = format!(
            "copyToClipboard({}, {})",
            js_string_literal(&post.id.to_string()),
            js_string_literal(&post.content)
        );
        let toggle_js = format!(
            "toggleFullContent({})",
            js_string_literal(&post.id.to_string())
        );

        html! {
            article class="post-card" id=(self.dom_id()) data-post-id=(post.id.to_string()) style=(self.reveal_delay()) {
                div class="post-header" {
                    div class="post-date" {
                        i class="far fa-clock" {}
                        " " (post.date)
                    }
                    span class=(format!("post-type {}", presentation.class)) {
                        i class=(presentation.icon) {}
                        " " (presentation.label)
                    }
                }
                div class="post-content" {
                    (format_content(Some(&excerpt.text)))
                    @if excerpt.truncated {
                        div class="full-content" hidden[!self.state.expanded] {
                            (format_content(Some(&post.content)))
                        }
                    }
                }
                div class="post-actions" {
                    a href=(link) target="_blank" rel="noopener noreferrer" class="telegram-btn" title="Opens the original post in Telegram" {
                        i class="fab fa-telegram" {}
                        " Open in Telegram"
                    }
                    @if excerpt.truncated {
                        button type="button" class="read-more-btn toggle-btn" onclick=(toggle_js) {
                            i class=(control.icon) {}
                            " " (control.label)
                        }
                    }
                    button type="button" class="read-more-btn copy-btn" onclick=(copy_js) {
                        i class="far fa-copy" {}
                        " Copy"
                    }
                }
                div class="post-footer" {
                    div class="post-id" { "ID: #" (post.id.to_string()) }
                    div class="post-stats" {
                        span { i class="far fa-eye" {} " 0" }
                        span { i class="far fa-heart" {} " 0" }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::PostId;

    const CHANNEL: &str = "https://t.me/testchannel";

    fn post(kind: PostKind, content: &str) -> Post {
        Post {
            id: PostId::Int(42),
            date: "01.01.2024 12:00".to_string(),
            content: content.to_string(),
            kind,
            telegram_link: None,
            timestamp: None,
            channel: None,
        }
    }

    #[test]
    fn test_presentation_mapping() {
        assert_eq!(PostPresentation::for_kind(PostKind::Photo).label, "Photo");
        assert_eq!(PostPresentation::for_kind(PostKind::Photo).class, "type-media");
        assert_eq!(PostPresentation::for_kind(PostKind::Video).icon, "fas fa-video");
        assert_eq!(PostPresentation::for_kind(PostKind::Document).class, "type-text");
        assert_eq!(PostPresentation::for_kind(PostKind::Document).label, "Document");
        assert_eq!(PostPresentation::for_kind(PostKind::Unknown).label, "Text");
        assert_eq!(PostPresentation::for_kind(PostKind::Text).icon, "fas fa-font");
    }

    #[test]
    fn test_short_post_has_no_read_more() {
        let post = post(PostKind::Text, "hello");
        let html = PostCard::new(&post, 0, CHANNEL).render().into_string();

        assert!(!html.contains("Read more"));
        assert!(!html.contains("full-content"));
        assert!(html.contains("hello"));
        assert!(html.contains("Copy"));
    }

    #[test]
    fn test_long_post_is_truncated() {
        let content = format!("{}{}", "a".repeat(300), "b".repeat(50));
        let post = post(PostKind::Text, &content);
        let html = PostCard::new(&post, 0, CHANNEL).render().into_string();

        assert_eq!(html.matches("Read more").count(), 1);
        assert!(html.contains(&format!("{}...", "a".repeat(300))));
        assert!(html.contains(r#"<div class="full-content" hidden>"#));
    }

    #[test]
    fn test_expanded_state_shows_full_text() {
        let post = post(PostKind::Text, &"z".repeat(400));
        let state = CardState {
            truncated: true,
            expanded: true,
        };
        let html = PostCard::new(&post, 0, CHANNEL)
            .with_state(state)
            .render()
            .into_string();

        assert!(html.contains(r#"<div class="full-content">"#));
        assert!(html.contains("Show less"));
        assert!(!html.contains("Read more"));
    }

    #[test]
    fn test_link_falls_back_to_channel() {
        let post = post(PostKind::Photo, "pic");
        let html = PostCard::new(&post, 0, CHANNEL).render().into_string();
        assert!(html.contains(r#"href="https://t.me/testchannel/42""#));
        assert!(html.contains("Photo"));
    }

    #[test]
    fn test_footer_and_delay() {
        let post = post(PostKind::Text, "x");
        let html = PostCard::new(&post, 3, CHANNEL).render().into_string();
        assert!(html.contains("ID: #42"));
        assert!(html.contains("animation-delay: 0.3s"));
        assert_eq!(html.matches(" 0</span>").count(), 2);
    }

    #[test]
    fn test_copy_handler_escapes_quotes() {
        let post = post(PostKind::Text, r#"it's "quoted""#);
        let html = PostCard::new(&post, 0, CHANNEL).render().into_string();
        assert!(html.contains(r"copyToClipboard('42', 'it\'s &quot;quoted&quot;')"));
    }
}
