//! Admin editor handlers.
//!
//! Every mutating handler redirects back to `/admin` (post/redirect/get).

use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use serde::Deserialize;
use tracing::{error, info, warn};

use super::pages::{self, AdminPageParams};
use super::{fetch_editor_collection, AppState};
use crate::articles::{DraftFields, SortMode};
use crate::auth::{session_token, RequireAdmin, SESSION_TTL_SECS};
use crate::constants::ADMIN_COOKIE;
use crate::publish::{Credentials, PublishError, PublishStatus};
use crate::session::SessionError;

/// Fixed notices shown once after a redirect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Notice {
    Saved,
    Settings,
    Reloaded,
    NotFound,
}

impl Notice {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Saved => "saved",
            Self::Settings => "settings",
            Self::Reloaded => "reloaded",
            Self::NotFound => "not-found",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "saved" => Some(Self::Saved),
            "settings" => Some(Self::Settings),
            "reloaded" => Some(Self::Reloaded),
            "not-found" => Some(Self::NotFound),
            _ => None,
        }
    }

    const fn message(self) -> &'static str {
        match self {
            Self::Saved => "Saved to the collection. Publish to push it to the site.",
            Self::Settings => "Settings saved.",
            Self::Reloaded => "Reloaded the published file.",
            Self::NotFound => "That article no longer exists.",
        }
    }
}

/// Saved credentials, or empty ones if the file cannot be read.
async fn saved_credentials(state: &AppState) -> Credentials {
    state.credentials.load().await.unwrap_or_else(|e| {
        warn!("Failed to load saved credentials: {e:#}");
        Credentials::default()
    })
}

fn back_to_editor(notice: Option<Notice>) -> Response {
    match notice {
        Some(n) => Redirect::to(&format!("/admin?notice={}", n.as_str())).into_response(),
        None => Redirect::to("/admin").into_response(),
    }
}

// ========== Login ==========

/// GET /admin/login
pub async fn login_form(State(state): State<AppState>) -> Response {
    Html(pages::render_login_page(&state.config.site_title, None).into_string()).into_response()
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    password: String,
}

/// POST /admin/login - A wrong password leaves the admin area.
pub async fn login(State(state): State<AppState>, Form(form): Form<LoginForm>) -> Response {
    let Some(token) = state.gate.login(&form.password) else {
        return Redirect::to("/").into_response();
    };

    let cookie =
        format!("{ADMIN_COOKIE}={token}; HttpOnly; SameSite=Lax; Path=/; Max-Age={SESSION_TTL_SECS}");
    ([(header::SET_COOKIE, cookie)], Redirect::to("/admin")).into_response()
}

/// POST /admin/logout
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(token) = session_token(&headers) {
        state.gate.logout(token);
    }

    let cookie = format!("{ADMIN_COOKIE}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0");
    ([(header::SET_COOKIE, cookie)], Redirect::to("/")).into_response()
}

// ========== Editor ==========

#[derive(Debug, Deserialize)]
pub struct EditorParams {
    notice: Option<String>,
}

/// GET /admin
pub async fn editor(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<EditorParams>,
) -> Response {
    let credentials = saved_credentials(&state).await;
    let notice = params.notice.as_deref().and_then(Notice::parse);
    let session = state.admin.lock().await;

    let html = pages::render_admin_page(&AdminPageParams {
        site_title: &state.config.site_title,
        session: &session,
        credentials: &credentials,
        message: notice.map(Notice::message),
    });
    Html(html.into_string()).into_response()
}

/// POST /admin/new
pub async fn new_article(_admin: RequireAdmin, State(state): State<AppState>) -> Response {
    state.admin.lock().await.begin_new();
    back_to_editor(None)
}

/// POST /admin/articles/:id/edit
pub async fn edit_article(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Response {
    match state.admin.lock().await.begin_edit(id) {
        Ok(()) => back_to_editor(None),
        Err(SessionError::NotFound(_)) => back_to_editor(Some(Notice::NotFound)),
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DraftForm {
    title: String,
    date: String,
    summary: String,
    content: String,
    badge_text: String,
    badge_color: String,
    action: String,
}

/// What a submit button on the editor form asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DraftAction {
    Save,
    Cancel,
    AddBadge,
    RemoveBadge(usize),
}

impl DraftAction {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "save" => Some(Self::Save),
            "cancel" => Some(Self::Cancel),
            "add-badge" => Some(Self::AddBadge),
            _ => s
                .strip_prefix("remove-badge:")
                .and_then(|i| i.parse().ok())
                .map(Self::RemoveBadge),
        }
    }
}

/// POST /admin/draft
///
/// The whole form is posted on every button, so typed text survives badge
/// edits.
pub async fn draft(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Form(form): Form<DraftForm>,
) -> Response {
    let Some(action) = DraftAction::parse(&form.action) else {
        return (StatusCode::BAD_REQUEST, "Unknown editor action").into_response();
    };

    let mut session = state.admin.lock().await;
    session.update_draft(DraftFields {
        title: form.title,
        date: form.date,
        summary: form.summary,
        content: form.content,
    });

    match action {
        DraftAction::Cancel => {
            session.cancel();
            back_to_editor(None)
        }
        DraftAction::AddBadge => {
            session.add_badge(&form.badge_text, &form.badge_color);
            back_to_editor(None)
        }
        DraftAction::RemoveBadge(index) => {
            session.remove_badge(index);
            back_to_editor(None)
        }
        DraftAction::Save => {
            let id = session.save_draft();
            info!(id, "Article saved to collection");
            back_to_editor(Some(Notice::Saved))
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SortForm {
    mode: String,
}

/// POST /admin/sort - Reorders the collection that will be published.
pub async fn sort(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Form(form): Form<SortForm>,
) -> Response {
    match form.mode.parse::<SortMode>() {
        Ok(mode) => {
            state.admin.lock().await.set_sort(mode);
            back_to_editor(None)
        }
        Err(e) => (StatusCode::BAD_REQUEST, e).into_response(),
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CredentialsForm {
    account: String,
    repository: String,
    token: String,
}

/// POST /admin/credentials - A blank token keeps the saved one.
///
/// If the editor has no known revision and no unsaved edits, it is reseeded
/// through the authenticated API so the next publish can detect conflicts.
pub async fn save_credentials(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Form(form): Form<CredentialsForm>,
) -> Response {
    let saved = saved_credentials(&state).await;
    let token = if form.token.trim().is_empty() {
        saved.token
    } else {
        form.token.trim().to_string()
    };
    let credentials = Credentials::new(form.account.trim(), form.repository.trim(), token);

    if let Err(e) = state.credentials.save(&credentials).await {
        error!("Failed to save credentials: {e:#}");
        return (StatusCode::INTERNAL_SERVER_ERROR, "Failed to save settings").into_response();
    }

    if credentials.is_complete() {
        let session = state.admin.lock().await;
        let needs_seed = session.base_revision().is_none() && !session.is_modified();
        drop(session);
        if needs_seed {
            let (articles, revision) =
                fetch_editor_collection(state.source.as_ref(), &credentials).await;
            let mut session = state.admin.lock().await;
            // Edits may have landed while the lock was released.
            if revision.is_some() && session.base_revision().is_none() && !session.is_modified() {
                session.replace_articles(articles, revision);
            }
        } else if state.admin.lock().await.base_revision().is_none() {
            warn!("Editor has unsaved edits from the public file; reload to enable conflict checks");
        }
    }

    back_to_editor(Some(Notice::Settings))
}

/// POST /admin/reload - Replace the editor collection with the published one.
///
/// With complete credentials the authenticated API is used, which also
/// records the revision that later publishes must match.
pub async fn reload(_admin: RequireAdmin, State(state): State<AppState>) -> Response {
    let credentials = saved_credentials(&state).await;
    let (articles, revision) = fetch_editor_collection(state.source.as_ref(), &credentials).await;
    state
        .admin
        .lock()
        .await
        .replace_articles(articles, revision);

    back_to_editor(Some(Notice::Reloaded))
}

/// POST /admin/publish
///
/// The session lock is released while the network calls run; the snapshot
/// taken here is what gets written.
pub async fn publish(_admin: RequireAdmin, State(state): State<AppState>) -> Response {
    let credentials = saved_credentials(&state).await;

    let (articles, expected) = {
        let mut session = state.admin.lock().await;
        session.set_status(PublishStatus::InProgress);
        session.snapshot()
    };

    let result = state
        .publisher
        .publish(&credentials, &articles, expected.as_ref())
        .await;

    match result {
        Ok(receipt) => {
            {
                let mut session = state.admin.lock().await;
                session.set_base_revision(Some(receipt.revision.clone()));
                session.set_status(PublishStatus::Succeeded {
                    revision: receipt.revision,
                });
            }
            state.public.write().await.replace(articles);
            state.refresh.skip_next();
        }
        // A newer publish took over and owns the status line.
        Err(PublishError::Cancelled) => {}
        Err(e) => {
            state.admin.lock().await.set_status(PublishStatus::Failed {
                message: e.user_message().to_string(),
            });
        }
    }

    back_to_editor(None)
}
