use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a channel post. The upstream emits either integers or strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PostId {
    Int(i64),
    Str(String),
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(id) => write!(f, "{id}"),
            Self::Str(id) => f.write_str(id),
        }
    }
}

impl From<i64> for PostId {
    fn from(id: i64) -> Self {
        Self::Int(id)
    }
}

impl From<&str> for PostId {
    fn from(id: &str) -> Self {
        id.parse().map_or_else(|_| Self::Str(id.to_string()), Self::Int)
    }
}

/// Kind of message a post was mirrored from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostKind {
    #[default]
    Text,
    Photo,
    Video,
    Document,
    #[serde(other)]
    Unknown,
}

/// A channel message mirrored by the upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub date: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub content: String,
    #[serde(rename = "type", default)]
    pub kind: PostKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telegram_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
}

impl Post {
    /// Link to the original message, derived from the channel root when absent.
    #[must_use]
    pub fn link(&self, channel_root: &str) -> String {
        self.telegram_link
            .as_deref()
            .filter(|l| !l.is_empty())
            .map_or_else(
                || format!("{}/{}", channel_root.trim_end_matches('/'), self.id),
                ToString::to_string,
            )
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Envelope returned by `GET /api/posts`.
///
/// `posts` and `count` are only meaningful when `status` is `"success"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostListResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub posts: Vec<Post>,
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub last_update: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PostListResponse {
    pub const SUCCESS: &'static str = "success";

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == Self::SUCCESS
    }

    /// Success envelope for an accepted post list.
    #[must_use]
    pub fn success(list: &PostList) -> Self {
        Self {
            status: Self::SUCCESS.to_string(),
            posts: list.posts.clone(),
            count: list.count,
            last_update: list.last_update.clone(),
            error: None,
        }
    }
}

/// A successfully fetched post list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostList {
    pub posts: Vec<Post>,
    pub count: u64,
    pub last_update: Option<String>,
}
