//! Public article listing.

use maud::{html, Markup, PreEscaped, Render};
use urlencoding::encode;

use crate::articles::{Article, SortMode};
use crate::components::{BadgeLabel, BaseLayout, Select, TagChipLink};
use crate::session::PublicView;

/// Listing URL for a sort mode and tag filter.
#[must_use]
pub fn listing_href(sort: Option<SortMode>, tag: Option<&str>) -> String {
    let mut params = Vec::new();
    if let Some(mode) = sort {
        params.push(format!("sort={}", mode.as_str()));
    }
    if let Some(tag) = tag {
        params.push(format!("tag={}", encode(tag)));
    }

    if params.is_empty() {
        "/".to_string()
    } else {
        format!("/?{}", params.join("&"))
    }
}

/// One collapsible article card.
#[derive(Debug, Clone, Copy)]
pub struct ArticleCard<'a> {
    pub article: &'a Article,
}

impl Render for ArticleCard<'_> {
    fn render(&self) -> Markup {
        let article = self.article;
        html! {
            div class="article-card" data-id=(article.id) {
                details open {
                    summary {
                        span { (article.title) }
                        span class="meta-info" {
                            @for badge in &article.badges {
                                (BadgeLabel::new(badge))
                            }
                            " " (article.date)
                        }
                    }
                    div class="article-content" {
                        div class="article-summary" { (article.summary) }
                        // Content is authored markup and rendered as-is.
                        div { (PreEscaped(&article.content)) }
                    }
                }
            }
        }
    }
}

fn render_sort_form(view: &PublicView) -> Markup {
    let options = vec![
        ("", "Document order"),
        (SortMode::DateDesc.as_str(), SortMode::DateDesc.label()),
        (SortMode::DateAsc.as_str(), SortMode::DateAsc.label()),
        (SortMode::Tag.as_str(), SortMode::Tag.label()),
    ];
    let selected = view.sort_mode().map_or("", |m| m.as_str());

    html! {
        form action="/" method="get" class="sort-form" {
            label for="sort" { "Sort: " }
            (Select::new("sort", options).selected(Some(selected)).auto_submit())
            @if let Some(tag) = view.current_filter() {
                input type="hidden" name="tag" value=(tag);
            }
            noscript { button type="submit" { "Apply" } }
        }
    }
}

fn render_chips(view: &PublicView) -> Markup {
    let chips = view.chips();
    html! {
        @if !chips.is_empty() {
            div class="tag-chips" {
                @for chip in &chips {
                    @let next = view.filter_after_click(&chip.text);
                    (TagChipLink::new(chip, listing_href(view.sort_mode(), next.as_deref())))
                }
            }
        }
    }
}

/// Render the public listing page.
#[must_use]
pub fn render_home_page(view: &PublicView, site_title: &str) -> Markup {
    let visible = view.visible();

    let content = html! {
        h1 { (site_title) }
        (render_sort_form(view))
        (render_chips(view))
        div id="articles-container" {
            @if visible.is_empty() {
                p class="empty-state" {
                    @if view.total() == 0 {
                        "No articles yet."
                    } @else {
                        "No article matches this tag."
                    }
                }
            }
            @for article in &visible {
                (ArticleCard { article })
            }
        }
    };

    BaseLayout::new("Home", site_title).render(content)
}
