//! Base layout components for the web UI.
//!
//! This module provides the page skeleton shared by the public listing and
//! the admin pages.

use maud::{html, Markup, PreEscaped, DOCTYPE};

/// Critical styles, inlined so the pages render without a static directory.
const BASE_STYLE: &str = r"
body { font-family: system-ui, sans-serif; max-width: 60rem; margin: 0 auto; padding: 1rem; }
nav ul { display: flex; gap: 1rem; list-style: none; padding: 0; }
.article-card { border: 1px solid #ddd; border-radius: 6px; margin: 0.75rem 0; padding: 0.5rem 1rem; }
.article-card summary { cursor: pointer; display: flex; justify-content: space-between; gap: 1rem; }
.meta-info { color: #666; font-size: 0.9em; }
.badge { display: inline-block; padding: 0.1em 0.5em; border-radius: 999px; color: #fff; font-size: 0.8em; margin-right: 0.25em; }
.tag-chip { text-decoration: none; opacity: 0.6; }
.tag-chip.active { opacity: 1; outline: 2px solid #222; }
.article-summary { font-style: italic; margin-bottom: 0.5rem; }
.status-line.success { color: #2e7d32; }
.status-line.error { color: #c62828; }
.status-line.info { color: #8a6d00; }
.admin-grid { display: grid; grid-template-columns: 1fr 2fr; gap: 2rem; }
.article-list-item { display: block; width: 100%; text-align: left; }
";

/// Base page layout builder.
///
/// # Example
///
/// ```ignore
/// use maud::html;
/// use crate::components::layout::BaseLayout;
///
/// let content = html! { h1 { "Hello World" } };
/// let page = BaseLayout::new("My Page", "Articles").render(content);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct BaseLayout<'a> {
    title: &'a str,
    site_title: &'a str,
    admin: bool,
}

impl<'a> BaseLayout<'a> {
    #[must_use]
    pub fn new(title: &'a str, site_title: &'a str) -> Self {
        Self {
            title,
            site_title,
            admin: false,
        }
    }

    /// Show the admin navigation (logout button).
    #[must_use]
    pub fn with_admin_nav(mut self) -> Self {
        self.admin = true;
        self
    }

    /// Render the complete HTML page with the given content.
    #[must_use]
    pub fn render(self, content: Markup) -> Markup {
        html! {
            (DOCTYPE)
            html lang="en" {
                head {
                    meta charset="UTF-8";
                    meta name="viewport" content="width=device-width, initial-scale=1.0";
                    title { (self.title) " - " (self.site_title) }
                    style { (PreEscaped(BASE_STYLE)) }
                }
                body {
                    (self.render_header())
                    main { (content) }
                }
            }
        }
    }

    fn render_header(&self) -> Markup {
        html! {
            header {
                nav {
                    ul {
                        li { a href="/" { strong { (self.site_title) } } }
                        @if self.admin {
                            li { a href="/admin" { "Editor" } }
                            li {
                                form action="/admin/logout" method="post" {
                                    button type="submit" { "Log out" }
                                }
                            }
                        } @else {
                            li { a href="/admin/login" { "Admin" } }
                        }
                    }
                }
            }
        }
    }
}
