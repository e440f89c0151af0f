//! Maud-based page templates for the web UI.
//!
//! Each page module exports a render function that produces the complete HTML.

pub mod admin;
pub mod auth;
pub mod home;

pub use admin::{render_admin_page, AdminPageParams};
pub use auth::render_login_page;
pub use home::{listing_href, render_home_page, ArticleCard};
