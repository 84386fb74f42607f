//! Upstream posts endpoint: data model and HTTP client.

pub mod client;
pub mod model;

pub use client::{parse_envelope, FeedClient, FetchError};
pub use model::{Post, PostId, PostKind, PostList, PostListResponse};
