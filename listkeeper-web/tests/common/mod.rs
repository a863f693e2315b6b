#![allow(dead_code)]

/// Common test utilities for integration tests
///
/// This module provides shared infrastructure for integration tests:
/// - A migrated SQLite database in a temporary directory
/// - The fully layered router
/// - A cookie-keeping [`Browser`] that drives the router in-process

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use listkeeper_shared::db::{migrations, pool};
use listkeeper_web::{
    app::{build_router, AppState},
    config::{Config, DatabaseConfig, ServerConfig, SessionConfig},
};
use sqlx::SqlitePool;
use tempfile::TempDir;
use tower::ServiceExt;

pub const TEST_SECRET: &str = "test-secret-key-at-least-32-bytes-long";

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: SqlitePool,
    pub app: Router,
    pub config: Config,
    _dir: TempDir,
}

impl TestContext {
    /// Creates a new test context with a fresh database
    pub async fn new() -> anyhow::Result<Self> {
        let dir = TempDir::new()?;

        let config = Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            database: DatabaseConfig {
                url: format!("sqlite://{}", dir.path().join("web.sqlite3").display()),
                max_connections: 5,
            },
            session: SessionConfig {
                secret: Some(TEST_SECRET.to_string()),
                secure_cookies: false,
            },
        };

        migrations::ensure_database_exists(&config.database.url).await?;
        let db = pool::create_pool(config.pool_config()).await?;
        migrations::run_migrations(&db).await?;

        let app = build_router(AppState::new(db.clone(), config.clone()));

        Ok(TestContext {
            db,
            app,
            config,
            _dir: dir,
        })
    }

    /// A visitor with no cookies yet
    pub fn browser(&self) -> Browser {
        Browser {
            app: self.app.clone(),
            cookie: None,
        }
    }

    pub async fn count(&self, table: &str) -> i64 {
        let (count,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&self.db)
            .await
            .unwrap();
        count
    }
}

/// A collected response
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub headers: axum::http::HeaderMap,
    pub body: String,
}

impl TestResponse {
    /// Asserts a See Other redirect to `target`
    pub fn assert_redirect(&self, target: &str) {
        assert_eq!(self.status, StatusCode::SEE_OTHER, "body: {}", self.body);
        assert_eq!(self.location.as_deref(), Some(target));
    }
}

/// Keeps the session cookie between requests, like a browser would
pub struct Browser {
    app: Router,
    pub cookie: Option<String>,
}

impl Browser {
    /// A second tab sharing this browser's current session cookie
    pub fn fork(&self) -> Browser {
        Browser {
            app: self.app.clone(),
            cookie: self.cookie.clone(),
        }
    }

    async fn send(&mut self, mut request: Request<Body>) -> TestResponse {
        if let Some(cookie) = &self.cookie {
            request
                .headers_mut()
                .insert(header::COOKIE, cookie.parse().unwrap());
        }

        let response = self.app.clone().oneshot(request).await.unwrap();

        if let Some(session) = response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find(|v| v.starts_with("session="))
        {
            let pair = session.split(';').next().unwrap_or_default();
            self.cookie = Some(pair.to_string());
        }

        let status = response.status();
        let headers = response.headers().clone();
        let location = headers
            .get(header::LOCATION)
            .map(|v| v.to_str().unwrap().to_string());
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        TestResponse {
            status,
            location,
            headers,
            body: String::from_utf8_lossy(&body).into_owned(),
        }
    }

    pub async fn get(&mut self, uri: &str) -> TestResponse {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        self.send(request).await
    }

    pub async fn post_form(&mut self, uri: &str, fields: &[(&str, &str)]) -> TestResponse {
        let body = fields
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    /// Loads a page and returns the CSRF token embedded in its form
    pub async fn csrf_token(&mut self, uri: &str) -> String {
        let page = self.get(uri).await;
        extract_csrf(&page.body)
            .unwrap_or_else(|| panic!("No CSRF token on {}: {}", uri, page.body))
    }

    pub async fn register(&mut self, username: &str, password: &str) -> TestResponse {
        let csrf = self.csrf_token("/register").await;
        self.post_form(
            "/register",
            &[
                ("username", username),
                ("password", password),
                ("password2", password),
                ("csrf_token", csrf.as_str()),
            ],
        )
        .await
    }

    pub async fn login(&mut self, username: &str, password: &str) -> TestResponse {
        let csrf = self.csrf_token("/login").await;
        self.post_form(
            "/login",
            &[
                ("username", username),
                ("password", password),
                ("csrf_token", csrf.as_str()),
            ],
        )
        .await
    }

    /// Registers and logs in, asserting both succeed
    pub async fn sign_up(&mut self, username: &str, password: &str) {
        self.register(username, password).await.assert_redirect("/login");
        self.login(username, password).await.assert_redirect("/view/");
    }

    pub async fn create_list(&mut self, name: &str) -> TestResponse {
        let csrf = self.csrf_token("/create/").await;
        self.post_form("/create/", &[("name", name), ("csrf_token", csrf.as_str())])
            .await
    }

    pub async fn add_item(&mut self, list_id: i64, text: &str) -> TestResponse {
        let uri = format!("/index/{}", list_id);
        let csrf = self.csrf_token(&uri).await;
        self.post_form(
            &uri,
            &[("newItem", "newItem"), ("new", text), ("csrf_token", csrf.as_str())],
        )
        .await
    }

    /// Saves the list with exactly `checked` ticked
    pub async fn save_items(&mut self, list_id: i64, checked: &[i64]) -> TestResponse {
        let uri = format!("/index/{}", list_id);
        let csrf = self.csrf_token(&uri).await;

        let names: Vec<String> = checked.iter().map(|id| format!("c{}", id)).collect();
        let mut fields: Vec<(&str, &str)> = vec![("save", "save"), ("csrf_token", csrf.as_str())];
        fields.extend(names.iter().map(|name| (name.as_str(), "clicked")));

        self.post_form(&uri, &fields).await
    }
}

pub fn extract_csrf(html: &str) -> Option<String> {
    let marker = r#"name="csrf_token" value=""#;
    let start = html.find(marker)? + marker.len();
    let end = html[start..].find('"')?;
    Some(html[start..start + end].to_string())
}
