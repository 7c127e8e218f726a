//! Hivefront Library
//!
//! Server-side rendering of Hive community posts, articles, and profiles
//! on top of a TTL cache and a retrying upstream fetcher.

pub mod cache;
pub mod cli;
pub mod data;
pub mod render;
pub mod retry;
pub mod web;
