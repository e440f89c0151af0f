//! Article Shelf library.
//!
//! Serves a public article listing with tag filters and sorting, plus a
//! password-gated editor that publishes the collection as a JSON file in a
//! GitHub repository.

// Allow raw string hashes for safety - they're harmless and prevent issues if content changes
#![allow(clippy::needless_raw_string_hashes)]

pub mod articles;
pub mod auth;
pub mod components;
pub mod config;
pub mod constants;
pub mod publish;
pub mod session;
pub mod web;
