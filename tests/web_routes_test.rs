//! Integration tests for web routes.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use article_shelf::config::Config;
use article_shelf::publish::{
    ContentStore, CredentialStore, Credentials, PublishError, RemoteDocument, RevisionToken,
};
use article_shelf::web::{create_app, refresh_tick, AppState};
use tempfile::TempDir;
use tower::ServiceExt;

const DOCUMENT: &str = r##"[
  {"id": 1, "title": "Borrow checker notes", "date": "2024-03-01",
   "badges": [{"text": "Rust", "color": "#b7410e"}], "summary": "Ownership", "content": "<p>Moves</p>"},
  {"id": 2, "title": "Goroutines", "date": "2023-06-15", "tags": ["Go"]},
  {"id": 3, "title": "Undated musings", "date": "someday", "badges": []}
]"##;

/// In-memory remote document with a revision counter.
struct FakeRemote {
    document: Mutex<String>,
    revision: Mutex<u32>,
}

impl FakeRemote {
    fn new(document: &str) -> Self {
        Self {
            document: Mutex::new(document.to_string()),
            revision: Mutex::new(1),
        }
    }

    fn document(&self) -> String {
        self.document.lock().unwrap().clone()
    }

    fn revision(&self) -> RevisionToken {
        RevisionToken::new(format!("rev{}", self.revision.lock().unwrap()))
    }
}

#[async_trait]
impl ContentStore for FakeRemote {
    async fn fetch_raw(&self) -> Result<String, PublishError> {
        Ok(self.document())
    }

    async fn fetch_remote(&self, _credentials: &Credentials) -> Result<RemoteDocument, PublishError> {
        Ok(RemoteDocument {
            revision: self.revision(),
            content: self.document(),
        })
    }

    async fn write(
        &self,
        _credentials: &Credentials,
        content: &str,
        revision: &RevisionToken,
        _message: &str,
    ) -> Result<RevisionToken, PublishError> {
        if *revision != self.revision() {
            return Err(PublishError::Conflict {
                expected: revision.to_string(),
                found: self.revision().to_string(),
            });
        }
        *self.document.lock().unwrap() = content.to_string();
        *self.revision.lock().unwrap() += 1;
        Ok(self.revision())
    }
}

struct TestApp {
    router: Router,
    state: AppState,
    remote: Arc<FakeRemote>,
    _dir: TempDir,
}

impl TestApp {
    async fn new() -> Self {
        Self::build(None).await
    }

    /// Start with credentials already saved on disk.
    async fn with_saved_credentials() -> Self {
        Self::build(Some(Credentials::new("me", "site", "secret"))).await
    }

    async fn build(saved: Option<Credentials>) -> Self {
        let dir = TempDir::new().unwrap();
        let mut config = Config::for_testing();
        config.credentials_path = dir.path().join("credentials.json");
        config.site_title = "Test Shelf".to_string();

        if let Some(credentials) = saved {
            CredentialStore::new(config.credentials_path.clone())
                .save(&credentials)
                .await
                .unwrap();
        }

        let remote = Arc::new(FakeRemote::new(DOCUMENT));
        let state = AppState::new(config, remote.clone()).await.unwrap();

        Self {
            router: create_app(state.clone()),
            state,
            remote,
            _dir: dir,
        }
    }

    /// Another writer replaces the remote document.
    async fn external_write(&self, document: &str) {
        let current = self.remote.revision();
        self.remote
            .write(&Credentials::new("them", "site", "x"), document, &current, "theirs")
            .await
            .unwrap();
    }

    async fn get(&self, uri: &str, cookie: Option<&str>) -> Response {
        let mut request = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }
        self.router
            .clone()
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn post_form(&self, uri: &str, body: &str, cookie: Option<&str>) -> Response {
        let mut request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }
        self.router
            .clone()
            .oneshot(request.body(Body::from(body.to_string())).unwrap())
            .await
            .unwrap()
    }

    /// Log in and return the cookie pair to send back.
    async fn login(&self) -> String {
        let response = self
            .post_form("/admin/login", "password=test-password", None)
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .expect("session cookie")
            .to_str()
            .unwrap();
        set_cookie.split(';').next().unwrap().to_string()
    }
}

async fn body_string(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .expect("redirect location")
        .to_str()
        .unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = TestApp::new().await;
    let response = app.get("/healthz", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "ok");
}

#[tokio::test]
async fn test_home_lists_all_articles_in_document_order() {
    let app = TestApp::new().await;
    let response = app.get("/", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_string(response).await;
    assert!(html.contains("Test Shelf"));
    let first = html.find("Borrow checker notes").unwrap();
    let second = html.find("Goroutines").unwrap();
    let third = html.find("Undated musings").unwrap();
    assert!(first < second && second < third);
    // Legacy tag was migrated into a badge.
    assert!(html.contains(">Go<"));
}

#[tokio::test]
async fn test_home_tag_filter() {
    let app = TestApp::new().await;
    let html = body_string(app.get("/?tag=Go", None).await).await;

    assert!(html.contains("Goroutines"));
    assert!(!html.contains("Borrow checker notes"));
    assert!(!html.contains("Undated musings"));
}

#[tokio::test]
async fn test_home_unknown_tag_shows_empty_state() {
    let app = TestApp::new().await;
    let html = body_string(app.get("/?tag=Haskell", None).await).await;
    assert!(html.contains("No article matches this tag."));
}

#[tokio::test]
async fn test_home_sort_oldest_first_puts_undated_last() {
    let app = TestApp::new().await;
    let html = body_string(app.get("/?sort=date-asc", None).await).await;

    let go = html.find("Goroutines").unwrap();
    let rust = html.find("Borrow checker notes").unwrap();
    let undated = html.find("Undated musings").unwrap();
    assert!(go < rust && rust < undated);
}

#[tokio::test]
async fn test_home_ignores_unknown_sort() {
    let app = TestApp::new().await;
    let response = app.get("/?sort=sideways", None).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_admin_requires_login() {
    let app = TestApp::new().await;
    let response = app.get("/admin", None).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/admin/login");

    let response = app.post_form("/admin/publish", "", None).await;
    assert_eq!(location(&response), "/admin/login");
}

#[tokio::test]
async fn test_wrong_password_leaves_admin() {
    let app = TestApp::new().await;
    let response = app.post_form("/admin/login", "password=nope", None).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
    assert!(response.headers().get(header::SET_COOKIE).is_none());
}

#[tokio::test]
async fn test_login_then_editor_then_logout() {
    let app = TestApp::new().await;
    let cookie = app.login().await;

    let response = app.get("/admin", Some(cookie.as_str())).await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(html.contains("Editor"));
    assert!(html.contains("/admin/articles/2/edit"));

    let response = app.post_form("/admin/logout", "", Some(cookie.as_str())).await;
    assert_eq!(location(&response), "/");

    let response = app.get("/admin", Some(cookie.as_str())).await;
    assert_eq!(location(&response), "/admin/login");
}

#[tokio::test]
async fn test_edit_unknown_article_redirects_with_notice() {
    let app = TestApp::new().await;
    let cookie = app.login().await;

    let response = app
        .post_form("/admin/articles/999/edit", "", Some(cookie.as_str()))
        .await;
    assert_eq!(location(&response), "/admin?notice=not-found");

    let html = body_string(app.get("/admin?notice=not-found", Some(cookie.as_str())).await).await;
    assert!(html.contains("That article no longer exists."));
}

#[tokio::test]
async fn test_draft_badges_survive_between_actions() {
    let app = TestApp::new().await;
    let cookie = app.login().await;

    app.post_form("/admin/new", "", Some(cookie.as_str())).await;
    app.post_form(
        "/admin/draft",
        "title=Half+written&date=2024-07-01&summary=&content=&badge_text=Notes&badge_color=%23ff0000&action=add-badge",
        Some(cookie.as_str()),
    )
    .await;

    let html = body_string(app.get("/admin", Some(cookie.as_str())).await).await;
    assert!(html.contains("value=\"Half written\""));
    assert!(html.contains("Notes"));
    assert!(html.contains("remove-badge:0"));

    app.post_form(
        "/admin/draft",
        "title=Half+written&date=2024-07-01&summary=&content=&badge_text=&badge_color=%23000000&action=remove-badge%3A0",
        Some(cookie.as_str()),
    )
    .await;
    let html = body_string(app.get("/admin", Some(cookie.as_str())).await).await;
    assert!(!html.contains("remove-badge:0"));
}

#[tokio::test]
async fn test_unknown_draft_action_is_rejected() {
    let app = TestApp::new().await;
    let cookie = app.login().await;
    let response = app
        .post_form("/admin/draft", "title=x&action=explode", Some(cookie.as_str()))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_publish_without_credentials_reports_error() {
    let app = TestApp::new().await;
    let cookie = app.login().await;

    let response = app.post_form("/admin/publish", "", Some(cookie.as_str())).await;
    assert_eq!(location(&response), "/admin");

    let html = body_string(app.get("/admin", Some(cookie.as_str())).await).await;
    assert!(html.contains("GitHub account, repository and token are required."));
    assert_eq!(app.remote.document(), DOCUMENT);
}

#[tokio::test]
async fn test_save_edit_and_publish() {
    let app = TestApp::new().await;
    let cookie = app.login().await;

    let response = app
        .post_form(
            "/admin/credentials",
            "account=me&repository=site&token=secret",
            Some(cookie.as_str()),
        )
        .await;
    assert_eq!(location(&response), "/admin?notice=settings");

    // The saved token is never echoed back.
    let html = body_string(app.get("/admin", Some(cookie.as_str())).await).await;
    assert!(!html.contains("secret"));
    assert!(html.contains("value=\"me\""));

    app.post_form("/admin/articles/2/edit", "", Some(cookie.as_str()))
        .await;
    let response = app
        .post_form(
            "/admin/draft",
            "title=Channels&date=2023-06-15&summary=Updated&content=%3Cp%3EHi%3C%2Fp%3E&badge_text=&badge_color=&action=save",
            Some(cookie.as_str()),
        )
        .await;
    assert_eq!(location(&response), "/admin?notice=saved");

    // Not public until published.
    let html = body_string(app.get("/", None).await).await;
    assert!(html.contains("Goroutines"));

    app.post_form("/admin/publish", "", Some(cookie.as_str())).await;

    let written = app.remote.document();
    let articles = article_shelf::articles::parse_collection(&written).unwrap();
    assert_eq!(articles.len(), 3);
    let edited = articles.iter().find(|a| a.id == 2).unwrap();
    assert_eq!(edited.title, "Channels");
    // Legacy tags are written back as badges.
    assert!(written.contains("\"badges\""));
    assert!(!written.contains("\"tags\""));

    let html = body_string(app.get("/", None).await).await;
    assert!(html.contains("Channels"));
    assert!(!html.contains("Goroutines"));

    let html = body_string(app.get("/admin", Some(cookie.as_str())).await).await;
    assert!(html.contains("Published."));
}

#[tokio::test]
async fn test_blank_token_keeps_saved_one() {
    let app = TestApp::new().await;
    let cookie = app.login().await;

    app.post_form(
        "/admin/credentials",
        "account=me&repository=site&token=secret",
        Some(cookie.as_str()),
    )
    .await;
    app.post_form(
        "/admin/credentials",
        "account=me&repository=other&token=",
        Some(cookie.as_str()),
    )
    .await;

    // Publishing still works, so the token survived.
    app.post_form("/admin/publish", "", Some(cookie.as_str())).await;
    let html = body_string(app.get("/admin", Some(cookie.as_str())).await).await;
    assert!(html.contains("Published."));
}

#[tokio::test]
async fn test_reload_then_remote_change_conflicts() {
    let app = TestApp::new().await;
    let cookie = app.login().await;

    app.post_form(
        "/admin/credentials",
        "account=me&repository=site&token=secret",
        Some(cookie.as_str()),
    )
    .await;

    let response = app.post_form("/admin/reload", "", Some(cookie.as_str())).await;
    assert_eq!(location(&response), "/admin?notice=reloaded");

    // Someone else publishes in the meantime.
    app.remote
        .write(
            &Credentials::new("me", "site", "secret"),
            "[]",
            &RevisionToken::new("rev1"),
            "other",
        )
        .await
        .unwrap();

    app.post_form("/admin/publish", "", Some(cookie.as_str())).await;

    let html = body_string(app.get("/admin", Some(cookie.as_str())).await).await;
    assert!(html.contains("The published file changed since it was loaded."));
    assert_eq!(app.remote.document(), "[]");
}

#[tokio::test]
async fn test_admin_sort_reorders_collection() {
    let app = TestApp::new().await;
    let cookie = app.login().await;

    let response = app
        .post_form("/admin/sort", "mode=date-asc", Some(cookie.as_str()))
        .await;
    assert_eq!(location(&response), "/admin");

    let html = body_string(app.get("/admin", Some(cookie.as_str())).await).await;
    let go = html.find("2023-06-15 - Goroutines").unwrap();
    let rust = html.find("2024-03-01 - Borrow checker notes").unwrap();
    assert!(go < rust);

    let response = app.post_form("/admin/sort", "mode=bogus", Some(cookie.as_str())).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

const THEIRS: &str = r#"[{"id":99,"title":"Theirs","date":"2024-09-01","badges":[]}]"#;

#[tokio::test]
async fn test_saving_credentials_guards_next_publish() {
    let app = TestApp::new().await;
    let cookie = app.login().await;

    app.post_form(
        "/admin/credentials",
        "account=me&repository=site&token=secret",
        Some(cookie.as_str()),
    )
    .await;
    assert_eq!(
        app.state.admin.lock().await.base_revision(),
        Some(&RevisionToken::new("rev1"))
    );

    app.post_form("/admin/new", "", Some(cookie.as_str())).await;
    app.post_form(
        "/admin/draft",
        "title=Mine&date=2024-08-01&summary=&content=&badge_text=&badge_color=&action=save",
        Some(cookie.as_str()),
    )
    .await;

    app.external_write(THEIRS).await;
    app.post_form("/admin/publish", "", Some(cookie.as_str())).await;

    let html = body_string(app.get("/admin", Some(cookie.as_str())).await).await;
    assert!(html.contains("The published file changed since it was loaded."));
    assert_eq!(app.remote.document(), THEIRS);
}

#[tokio::test]
async fn test_startup_with_saved_credentials_guards_publish() {
    let app = TestApp::with_saved_credentials().await;
    assert_eq!(
        app.state.admin.lock().await.base_revision(),
        Some(&RevisionToken::new("rev1"))
    );

    let cookie = app.login().await;
    app.post_form("/admin/sort", "mode=date-desc", Some(cookie.as_str()))
        .await;
    app.external_write(THEIRS).await;
    app.post_form("/admin/publish", "", Some(cookie.as_str())).await;

    let html = body_string(app.get("/admin", Some(cookie.as_str())).await).await;
    assert!(html.contains("The published file changed since it was loaded."));
    assert_eq!(app.remote.document(), THEIRS);
}

#[tokio::test]
async fn test_saving_credentials_keeps_unsaved_edits() {
    let app = TestApp::new().await;
    let cookie = app.login().await;

    app.post_form("/admin/new", "", Some(cookie.as_str())).await;
    app.post_form(
        "/admin/draft",
        "title=Local+only&date=2024-08-01&summary=&content=&badge_text=&badge_color=&action=save",
        Some(cookie.as_str()),
    )
    .await;
    app.post_form(
        "/admin/credentials",
        "account=me&repository=site&token=secret",
        Some(cookie.as_str()),
    )
    .await;

    let session = app.state.admin.lock().await;
    assert!(session.articles().iter().any(|a| a.title == "Local only"));
    assert!(session.base_revision().is_none());
}

#[tokio::test]
async fn test_publish_skips_next_refresh() {
    let app = TestApp::with_saved_credentials().await;
    let cookie = app.login().await;

    app.post_form("/admin/articles/3/edit", "", Some(cookie.as_str()))
        .await;
    app.post_form(
        "/admin/draft",
        "title=Dated+musings&date=2024-01-02&summary=&content=&badge_text=&badge_color=&action=save",
        Some(cookie.as_str()),
    )
    .await;
    app.post_form("/admin/publish", "", Some(cookie.as_str())).await;
    assert!(app.state.refresh.is_skipping());

    let state = &app.state;
    let first = refresh_tick(state.source.as_ref(), &state.public, &state.refresh)
        .await
        .unwrap();
    assert_eq!(first, None);
    assert_eq!(
        state.public.read().await.find_by_id(3).unwrap().title,
        "Dated musings"
    );

    let second = refresh_tick(state.source.as_ref(), &state.public, &state.refresh)
        .await
        .unwrap();
    assert_eq!(second, Some(3));
}

#[tokio::test]
async fn test_unreadable_credentials_file_still_renders_editor() {
    let app = TestApp::new().await;
    tokio::fs::write(app._dir.path().join("credentials.json"), "not json")
        .await
        .unwrap();
    let cookie = app.login().await;

    let response = app.get("/admin", Some(cookie.as_str())).await;
    assert_eq!(response.status(), StatusCode::OK);

    app.post_form("/admin/publish", "", Some(cookie.as_str())).await;
    assert_eq!(app.remote.document(), DOCUMENT);
}
