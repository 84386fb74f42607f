//! Channel Feed Mirror library.
//!
//! A local dashboard that mirrors the posts of a public channel as served by
//! a feed backend, refreshing on a fixed countdown.

// Allow raw string hashes for safety - they're harmless and prevent issues if content changes
#![allow(clippy::needless_raw_string_hashes)]

pub mod clipboard;
pub mod config;
pub mod constants;
pub mod feed;
pub mod poller;
pub mod render;
pub mod view;
pub mod web;
