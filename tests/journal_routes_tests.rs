use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response, StatusCode, header},
};
use chrono::Utc;
use journal::{
    Config,
    db::EntriesStorage,
    render::components::SHARE_BUTTON,
    router::{JournalState, journal_router},
    service::auth::hash_password,
};
use tower::ServiceExt;

struct TestApp {
    router: Router,
    storage: EntriesStorage,
}

impl TestApp {
    async fn spawn() -> Self {
        let cfg = Config {
            database_url: "sqlite::memory:".to_string(),
            admin_username: "admin".to_string(),
            admin_password_hash: hash_password("secret").expect("failed to hash password"),
            insecure_cookie: true,
            ..Config::default()
        };
        let storage = journal::db::connect(&cfg)
            .await
            .expect("failed to open in-memory database");
        let router = journal_router(JournalState::new(storage.clone(), cfg));
        Self { router, storage }
    }

    async fn send(&self, req: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(req)
            .await
            .expect("request failed")
    }

    async fn get(&self, uri: &str, cookie: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(c) = cookie {
            builder = builder.header(header::COOKIE, c);
        }
        self.send(builder.body(Body::empty()).expect("failed to build request"))
            .await
    }

    async fn get_json(&self, uri: &str, cookie: &str) -> Response<Body> {
        let req = Request::builder()
            .method("GET")
            .uri(uri)
            .header(header::COOKIE, cookie)
            .header(header::ACCEPT, "application/json, text/javascript, */*")
            .body(Body::empty())
            .expect("failed to build request");
        self.send(req).await
    }

    async fn post_form(
        &self,
        uri: &str,
        body: &str,
        cookie: Option<&str>,
        json: bool,
    ) -> Response<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(c) = cookie {
            builder = builder.header(header::COOKIE, c);
        }
        if json {
            builder = builder.header(header::ACCEPT, "application/json, text/javascript, */*");
        }
        self.send(
            builder
                .body(Body::from(body.to_string()))
                .expect("failed to build request"),
        )
        .await
    }

    async fn login(&self, username: &str, password: &str) -> Response<Body> {
        self.post_form(
            "/login",
            &format!("username={username}&password={password}"),
            None,
            false,
        )
        .await
    }

    /// Log in as the admin and return the `Cookie` header value.
    async fn admin_cookie(&self) -> String {
        let resp = self.login("admin", "secret").await;
        assert_eq!(resp.status(), StatusCode::FOUND);
        session_cookie(&resp).expect("login did not set a session cookie")
    }

    async fn add_entry(&self, title: &str, text: &str) -> i64 {
        self.storage
            .insert_entry(Some(title), Some(text), Utc::now())
            .await
            .expect("failed to insert entry")
            .id
    }
}

fn session_cookie(resp: &Response<Body>) -> Option<String> {
    resp.headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("journal_session="))
        .and_then(|v| v.split(';').next())
        .map(str::to_string)
}

fn location(resp: &Response<Body>) -> &str {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .expect("missing location header")
}

async fn body_string(resp: Response<Body>) -> String {
    let body = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    String::from_utf8(body.to_vec()).expect("response body was not utf-8")
}

#[tokio::test]
async fn empty_listing() {
    let app = TestApp::spawn().await;
    let resp = app.get("/", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_string(resp).await.contains("No entries here so far"));
}

#[tokio::test]
async fn listing_shows_entries() {
    let app = TestApp::spawn().await;
    app.add_entry("Test Title", "Test Text").await;

    let resp = app.get("/", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_string(resp).await;
    assert!(body.contains("Test Title"));
    assert!(body.contains("<p>Test Text</p>"));
    assert!(!body.contains("No entries here so far"));
}

#[tokio::test]
async fn detail_listing() {
    let app = TestApp::spawn().await;
    let id = app.add_entry("Test Title", "Test Text").await;

    let resp = app.get(&format!("/detail/{id}"), None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_string(resp).await;
    assert!(body.contains("Test Title"));
    assert!(body.contains("Test Text"));
}

#[tokio::test]
async fn detail_for_missing_entry_is_404() {
    let app = TestApp::spawn().await;
    let resp = app.get("/detail/404", None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_route_is_404() {
    let app = TestApp::spawn().await;
    let resp = app.get("/nowhere", None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn markdown_renders_on_detail() {
    let app = TestApp::spawn().await;
    let id = app
        .add_entry(
            "Test Markdown Title",
            "# Test Text\n\n## Test H2\n\n* list item\n* list item 2",
        )
        .await;
    let body = body_string(app.get(&format!("/detail/{id}"), None).await).await;
    assert!(body.contains("<h1>Test Text</h1>"));
    assert!(body.contains("<li>list item 2</li>"));
}

#[tokio::test]
async fn code_block_is_highlighted_on_detail() {
    let app = TestApp::spawn().await;
    let id = app
        .add_entry("Test Color Syntax Title", "```python\n   print test\n```")
        .await;
    let body = body_string(app.get(&format!("/detail/{id}"), None).await).await;
    assert!(body.contains(r#"class="codehilite""#));
    assert!(body.contains(r#"<div class="codehilite"><pre>"#));
    assert!(body.contains("<span class="));
}

#[tokio::test]
async fn heading_without_space_renders_on_detail() {
    let app = TestApp::spawn().await;
    let id = app
        .add_entry(
            "Test Markdown Title",
            "#Test Text\n##Test H2\n*list item\n*list item 2",
        )
        .await;
    let body = body_string(app.get(&format!("/detail/{id}"), None).await).await;
    assert!(body.contains("<h1>Test Text</h1>"));
    assert!(body.contains("<h2>Test H2</h2>"));
}

#[tokio::test]
async fn post_to_new_unauthorized() {
    let app = TestApp::spawn().await;
    let resp = app
        .post_form("/new", "title=Hello+there&text=This+is+a+post", None, false)
        .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert_eq!(app.storage.count_entries().await.unwrap(), 0);
}

#[tokio::test]
async fn post_to_edit_unauthorized_after_failed_login() {
    let app = TestApp::spawn().await;
    let id = app.add_entry("Test Title", "Test Text").await;

    let resp = app.login("admin", "wrong").await;
    assert!(session_cookie(&resp).is_none());

    let resp = app
        .post_form(
            &format!("/edit/{id}"),
            "title=Hello+there&text=This+is+a+post",
            None,
            false,
        )
        .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let row = app.storage.get_entry(id).await.unwrap().expect("entry");
    assert_eq!(row.title, "Test Title");
    assert_eq!(row.text, "Test Text");
}

#[tokio::test]
async fn forged_session_cookie_is_rejected() {
    let app = TestApp::spawn().await;
    let now = Utc::now().timestamp();
    let forged = format!("journal_session=admin:{now}");
    let resp = app
        .post_form("/new", "title=a&text=b", Some(&forged), false)
        .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert_eq!(app.storage.count_entries().await.unwrap(), 0);
}

#[tokio::test]
async fn start_as_anonymous() {
    let app = TestApp::spawn().await;
    let resp = app.get("/", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(!body_string(resp).await.contains(SHARE_BUTTON));
}

#[tokio::test]
async fn login_success() {
    let app = TestApp::spawn().await;
    let resp = app.login("admin", "secret").await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/");
    let cookie = session_cookie(&resp).expect("session cookie");

    let resp = app.get("/", Some(&cookie)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_string(resp).await.contains(SHARE_BUTTON));
}

#[tokio::test]
async fn login_fails() {
    let app = TestApp::spawn().await;
    let resp = app.login("admin", "wrong").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_string(resp).await;
    assert!(body.contains("Login Failed"));
    assert!(!body.contains(SHARE_BUTTON));
}

#[tokio::test]
async fn login_with_missing_parameter_is_rejected() {
    let app = TestApp::spawn().await;
    let resp = app.post_form("/login", "username=admin", None, false).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let resp = app.post_form("/login", "password=secret", None, false).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn logout_clears_session() {
    let app = TestApp::spawn().await;
    let cookie = app.admin_cookie().await;

    let resp = app.get("/logout", Some(&cookie)).await;
    assert!(resp.status().is_redirection());
    assert_eq!(location(&resp), "/");
    let removal = resp
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("journal_session="))
        .expect("logout did not clear the session cookie")
        .to_string();
    assert!(removal.contains("Max-Age=0"));

    let resp = app.get("/", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(!body_string(resp).await.contains(SHARE_BUTTON));
}

#[tokio::test]
async fn post_to_new_view() {
    let app = TestApp::spawn().await;
    let cookie = app.admin_cookie().await;

    let resp = app
        .post_form(
            "/new",
            "title=Hello+there&text=This+is+a+post",
            Some(&cookie),
            false,
        )
        .await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/");

    let body = body_string(app.get("/", Some(&cookie)).await).await;
    assert!(body.contains("Hello there"));
    assert!(body.contains("This is a post"));
}

#[tokio::test]
async fn post_to_new_as_json() {
    let app = TestApp::spawn().await;
    let cookie = app.admin_cookie().await;

    let resp = app
        .post_form(
            "/new",
            "title=Hello+there&text=This+is+a+post",
            Some(&cookie),
            true,
        )
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let value: serde_json::Value =
        serde_json::from_str(&body_string(resp).await).expect("json body");
    assert_eq!(value["title"], "Hello there");
    assert_eq!(value["text"], "<p>This is a post</p>");
    assert!(value["id"].is_i64());
    assert!(value["created"].is_string());
}

#[tokio::test]
async fn post_to_new_without_text_fails() {
    let app = TestApp::spawn().await;
    let cookie = app.admin_cookie().await;

    let resp = app
        .post_form("/new", "title=Hello+there", Some(&cookie), false)
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(app.storage.count_entries().await.unwrap(), 0);
}

#[tokio::test]
async fn post_to_edit_view() {
    let app = TestApp::spawn().await;
    let id = app.add_entry("Test Title", "Test Text").await;
    let cookie = app.admin_cookie().await;

    let resp = app
        .post_form(
            &format!("/edit/{id}"),
            "title=Hello+there&text=This+is+a+post",
            Some(&cookie),
            false,
        )
        .await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), format!("/detail/{id}"));

    let resp = app.get(&format!("/detail/{id}"), None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_string(resp).await;
    assert!(body.contains("Hello there"));
    assert!(body.contains("This is a post"));
    assert_eq!(app.storage.count_entries().await.unwrap(), 1);
}

#[tokio::test]
async fn edit_with_id_in_form_as_json() {
    let app = TestApp::spawn().await;
    let id = app.add_entry("Test Title", "Test Text").await;
    let cookie = app.admin_cookie().await;

    let resp = app
        .post_form(
            "/edit",
            &format!("title=New+Title&text=New+Text&id={id}"),
            Some(&cookie),
            true,
        )
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let value: serde_json::Value =
        serde_json::from_str(&body_string(resp).await).expect("json body");
    assert_eq!(value["id"], id);
    assert_eq!(value["title"], "New Title");
    assert_eq!(value["text"], "<p>New Text</p>");
}

#[tokio::test]
async fn edit_unknown_entry_is_404() {
    let app = TestApp::spawn().await;
    let cookie = app.admin_cookie().await;
    let resp = app
        .post_form("/edit/77", "title=a&text=b", Some(&cookie), false)
        .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn edit_form_serves_markdown_source() {
    let app = TestApp::spawn().await;
    let id = app.add_entry("Test Title", "# Raw").await;
    let cookie = app.admin_cookie().await;

    let resp = app.get(&format!("/edit/{id}"), Some(&cookie)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_string(resp).await;
    assert!(body.contains("# Raw</textarea>"));
    assert!(body.contains(SHARE_BUTTON));

    let resp = app.get(&format!("/edit/{id}"), None).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn edit_source_by_query_id() {
    let app = TestApp::spawn().await;
    let id = app.add_entry("Test Title", "# Raw").await;
    let cookie = app.admin_cookie().await;

    let resp = app.get_json(&format!("/edit?id={id}"), &cookie).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let value: serde_json::Value =
        serde_json::from_str(&body_string(resp).await).expect("json body");
    assert_eq!(value["id"], id);
    assert_eq!(value["title"], "Test Title");
    assert_eq!(value["text"], "# Raw");

    let resp = app.get(&format!("/edit?id={id}"), Some(&cookie)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_string(resp).await.contains("# Raw</textarea>"));
}

#[tokio::test]
async fn edit_source_by_query_requires_login_and_id() {
    let app = TestApp::spawn().await;
    let id = app.add_entry("Test Title", "# Raw").await;

    let resp = app.get(&format!("/edit?id={id}"), None).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let cookie = app.admin_cookie().await;
    let resp = app.get("/edit", Some(&cookie)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = app.get_json("/edit?id=9999", &cookie).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
