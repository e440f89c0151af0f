//! Badge components for article tags and tag filter chips.

use maud::{html, Markup, Render};

use crate::articles::{Badge, TagChip};

/// Colors accepted verbatim in an inline style. Anything else falls back to
/// the stylesheet color.
fn safe_color(color: &str) -> Option<&str> {
    let color = color.trim();
    let ok = !color.is_empty()
        && color.len() <= 32
        && color
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '#' | '(' | ')' | ',' | '.' | '%' | ' '));
    ok.then_some(color)
}

fn background_style(color: &str) -> Option<String> {
    safe_color(color).map(|c| format!("background-color: {c}"))
}

/// A colored badge attached to an article.
#[derive(Debug, Clone, Copy)]
pub struct BadgeLabel<'a> {
    pub badge: &'a Badge,
}

impl<'a> BadgeLabel<'a> {
    #[must_use]
    pub const fn new(badge: &'a Badge) -> Self {
        Self { badge }
    }
}

impl Render for BadgeLabel<'_> {
    fn render(&self) -> Markup {
        html! {
            span class="badge" style=[background_style(&self.badge.color)] {
                (self.badge.text)
            }
        }
    }
}

/// A clickable filter chip. `href` points at the listing with the filter
/// this click would produce.
#[derive(Debug, Clone)]
pub struct TagChipLink<'a> {
    pub chip: &'a TagChip,
    pub href: String,
}

impl<'a> TagChipLink<'a> {
    #[must_use]
    pub fn new(chip: &'a TagChip, href: String) -> Self {
        Self { chip, href }
    }
}

impl Render for TagChipLink<'_> {
    fn render(&self) -> Markup {
        let class = if self.chip.active {
            "badge tag-chip active"
        } else {
            "badge tag-chip"
        };

        html! {
            a class=(class)
                href=(self.href)
                style=[background_style(&self.chip.color)]
                aria-pressed=(if self.chip.active { "true" } else { "false" })
            {
                (self.chip.text)
            }
        }
    }
}
