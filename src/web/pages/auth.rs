//! Admin login page.

use maud::{html, Markup, Render};

use crate::components::{Alert, BaseLayout, Field, Input};

/// Render the admin login page.
///
/// # Example
///
/// ```ignore
/// let page = render_login_page("Articles", None);
/// let page = render_login_page("Articles", Some("Session expired"));
/// ```
#[must_use]
pub fn render_login_page(site_title: &str, message: Option<&str>) -> Markup {
    let content = html! {
        h1 { "Admin" }
        @if let Some(msg) = message {
            (Alert::info(msg).render())
        }
        form action="/admin/login" method="post" {
            (Field::new(
                "Password",
                "password",
                Input::password("password").required().autocomplete("current-password").render(),
            ))
            button type="submit" { "Enter" }
        }
    };

    BaseLayout::new("Admin login", site_title).render(content)
}
