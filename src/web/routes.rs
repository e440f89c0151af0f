use axum::extract::{Query, State};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use serde::Deserialize;

use super::admin;
use super::pages;
use super::AppState;
use crate::articles::SortMode;
use crate::session::PublicView;

/// Create the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/healthz", get(health))
        // Admin
        .route("/admin", get(admin::editor))
        .route("/admin/login", get(admin::login_form).post(admin::login))
        .route("/admin/logout", post(admin::logout))
        .route("/admin/new", post(admin::new_article))
        .route("/admin/articles/:id/edit", post(admin::edit_article))
        .route("/admin/draft", post(admin::draft))
        .route("/admin/sort", post(admin::sort))
        .route("/admin/credentials", post(admin::save_credentials))
        .route("/admin/reload", post(admin::reload))
        .route("/admin/publish", post(admin::publish))
}

#[derive(Debug, Deserialize)]
pub struct ListingParams {
    sort: Option<String>,
    tag: Option<String>,
}

/// Public listing. `sort` reorders, `tag` selects the filter.
async fn home(State(state): State<AppState>, Query(params): Query<ListingParams>) -> Response {
    let store = state.public.read().await.clone();
    let mut view = PublicView::new(store);

    if let Some(sort) = params.sort.as_deref().filter(|s| !s.is_empty()) {
        match sort.parse::<SortMode>() {
            Ok(mode) => view.set_sort(mode),
            Err(e) => tracing::debug!("Ignoring sort parameter: {e}"),
        }
    }

    if let Some(tag) = params.tag.as_deref().filter(|t| !t.is_empty()) {
        view.toggle_filter(tag);
    }

    Html(pages::render_home_page(&view, &state.config.site_title).into_string()).into_response()
}

async fn health() -> &'static str {
    "ok"
}
