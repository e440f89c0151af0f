//! Admin editor page.

use maud::{html, Markup, Render};

use crate::articles::SortMode;
use crate::components::{
    Alert, BadgeLabel, BaseLayout, Field, Input, PublishStatusLine, Select, TextArea,
};
use crate::constants::DEFAULT_BADGE_COLOR;
use crate::publish::Credentials;
use crate::session::AdminSession;

/// Parameters for rendering the admin page.
#[derive(Debug, Clone, Copy)]
pub struct AdminPageParams<'a> {
    pub site_title: &'a str,
    pub session: &'a AdminSession,
    pub credentials: &'a Credentials,
    /// One-off notice, e.g. "Saved".
    pub message: Option<&'a str>,
}

fn render_article_list(session: &AdminSession) -> Markup {
    let sort_options = SortMode::ALL
        .iter()
        .map(|m| (m.as_str(), m.label()))
        .collect();

    html! {
        section {
            h2 { "Articles (" (session.articles().len()) ")" }
            form action="/admin/new" method="post" {
                button type="submit" { "New article" }
            }
            form action="/admin/sort" method="post" {
                label for="mode" { "Reorder: " }
                (Select::new("mode", sort_options))
                button type="submit" { "Apply" }
            }
            div id="existing-articles" {
                @for article in session.articles() {
                    form action={ "/admin/articles/" (article.id) "/edit" } method="post" {
                        button type="submit" class="article-list-item" {
                            (article.date) " - " (article.title)
                        }
                    }
                }
            }
            form action="/admin/reload" method="post" {
                button type="submit" { "Reload published file" }
            }
        }
    }
}

fn render_editor(session: &AdminSession) -> Markup {
    let draft = session.draft();
    let fields = &draft.fields;
    let heading = match draft.editing_id {
        Some(_) => format!("Editing: {}", fields.title),
        None => "New article".to_string(),
    };

    html! {
        section {
            h2 id="form-title" { (heading) }
            form id="editor-form" action="/admin/draft" method="post" {
                (Field::new("Title", "title", Input::text("title").value(&fields.title).render()))
                (Field::new(
                    "Date",
                    "date",
                    Input::text("date").value(&fields.date).placeholder("YYYY-MM-DD").render(),
                ))
                (Field::new("Summary", "summary", TextArea::new("summary", &fields.summary).rows(3).render()))
                (Field::new("Content", "content", TextArea::new("content", &fields.content).rows(12).render()))

                fieldset {
                    legend { "Badges" }
                    ul id="badge-list" {
                        @for (index, badge) in session.badges().badges().iter().enumerate() {
                            li {
                                (BadgeLabel::new(badge))
                                button type="submit" name="action" value={ "remove-badge:" (index) } { "Remove" }
                            }
                        }
                    }
                    (Input::text("badge_text").placeholder("Label").render())
                    (Input::new("badge_color", "color").value(DEFAULT_BADGE_COLOR).render())
                    button type="submit" name="action" value="add-badge" { "Add badge" }
                }

                button type="submit" name="action" value="save" { "Save to collection" }
                " "
                button type="submit" name="action" value="cancel" formnovalidate { "Cancel" }
            }
        }
    }
}

fn render_publish(params: &AdminPageParams<'_>) -> Markup {
    let creds = params.credentials;
    let token_hint = if creds.token.is_empty() {
        "Access token"
    } else {
        "Saved (leave blank to keep)"
    };

    html! {
        section {
            h2 { "Publish" }
            form action="/admin/credentials" method="post" {
                (Field::new("Account", "account", Input::text("account").value(&creds.account).render()))
                (Field::new("Repository", "repository", Input::text("repository").value(&creds.repository).render()))
                (Field::new(
                    "Token",
                    "token",
                    Input::password("token").placeholder(token_hint).autocomplete("off").render(),
                ))
                button type="submit" { "Save settings" }
            }
            form action="/admin/publish" method="post" {
                button type="submit" { "Publish collection" }
            }
            div id="status-msg" {
                (PublishStatusLine::new(params.session.status()))
            }
        }
    }
}

/// Render the admin editor page.
#[must_use]
pub fn render_admin_page(params: &AdminPageParams<'_>) -> Markup {
    let content = html! {
        h1 { "Editor" }
        @if let Some(msg) = params.message {
            (Alert::success(msg).render())
        }
        div class="admin-grid" {
            (render_article_list(params.session))
            div {
                (render_editor(params.session))
                (render_publish(params))
            }
        }
    };

    BaseLayout::new("Editor", params.site_title)
        .with_admin_nav()
        .render(content)
}
