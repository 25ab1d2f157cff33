#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, Response, StatusCode, header},
};
use filmlist::config::Config;
use filmlist::db::Store;
use filmlist::state::SharedState;
use http_body_util::BodyExt;
use std::sync::Arc;
use tower::ServiceExt;

pub const PASSWORD: &str = "correct horse battery";

pub struct TestApp {
    pub router: Router,
    pub store: Store,
    pub config: Config,
}

/// Fresh app over its own temp-file database, with cheap password hashing.
pub async fn spawn_app() -> TestApp {
    let mut config = Config::default();
    let db_path = std::env::temp_dir().join(format!("filmlist-test-{}.db", uuid::Uuid::new_v4()));
    config.general.database_path = format!("sqlite:{}", db_path.display());
    config.server.secure_cookies = false;
    config.security.argon2_memory_cost_kib = 1024;
    config.security.argon2_time_cost = 1;
    config.observability.metrics_enabled = false;

    let store = Store::new(&config.general.database_path)
        .await
        .expect("Failed to open test database");
    let shared = Arc::new(SharedState::with_store(config.clone(), store.clone()));
    let state =
        filmlist::web::create_app_state(shared, None).expect("Failed to create app state");

    TestApp {
        router: filmlist::web::router(state),
        store,
        config,
    }
}

impl TestApp {
    pub async fn create_user(&self, username: &str) {
        self.store
            .create_user(username, PASSWORD, &self.config.security)
            .await
            .expect("create user")
            .expect("username should be free");
    }

    /// Logs in and returns the `Cookie` header value for the session.
    pub async fn login(&self, username: &str) -> String {
        let response = self
            .send(form_request(
                "POST",
                "/login/",
                &format!("username={username}&password={}", encode(PASSWORD)),
                None,
            ))
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .expect("login should set a session cookie")
            .to_str()
            .unwrap();
        set_cookie.split(';').next().unwrap().to_string()
    }

    pub async fn user_with_session(&self, username: &str) -> String {
        self.create_user(username).await;
        self.login(username).await
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn add_film(&self, cookie: &str, name: &str) -> Response<Body> {
        self.send(form_request(
            "POST",
            "/add-film/",
            &format!("filmname={}", encode(name)),
            Some(cookie),
        ))
        .await
    }

    pub async fn user_id(&self, username: &str) -> filmlist::domain::UserId {
        self.store
            .get_user_by_username(username)
            .await
            .unwrap()
            .expect("user exists")
            .id
    }
}

pub fn form_request(method: &str, uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .header("HX-Request", "true");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn get_request(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn encode(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}
