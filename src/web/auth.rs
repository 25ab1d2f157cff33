use axum::{
    Form,
    extract::{FromRequestParts, Query, Request, State},
    http::{HeaderValue, StatusCode, request::Parts},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tera::Context;
use tower_sessions::Session;

use super::observability::RequestUser;
use super::validation::safe_next;
use super::{AppState, WebError};
use crate::domain::UserId;
use crate::services::{AuthError, Registration};

const SESSION_USER_KEY: &str = "user";
const LOGIN_PATH: &str = "/login/";
const DEFAULT_LOGIN_REDIRECT: &str = "/films/";

/// The logged-in user, stored in the session and handed to protected handlers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: UserId,
    pub username: String,
}

impl CurrentUser {
    pub async fn from_session(session: &Session) -> Result<Option<Self>, WebError> {
        Ok(session.get::<Self>(SESSION_USER_KEY).await?)
    }
}

impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
    type Rejection = WebError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Self>()
            .cloned()
            .ok_or_else(|| WebError::Unauthorized("Login required".to_string()))
    }
}

// ============================================================================
// Request Types
// ============================================================================

#[derive(Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    pub next: Option<String>,
}

#[derive(Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password1: String,
    #[serde(default)]
    pub password2: String,
}

#[derive(Deserialize)]
pub struct CheckUsernameForm {
    #[serde(default)]
    pub username: String,
}

// ============================================================================
// Middleware
// ============================================================================

/// Lets the request through only with a logged-in session whose user still
/// exists.
///
/// Browsers are redirected to the login page with a `next` parameter; htmx
/// requests get a 401 carrying `HX-Redirect` so the client navigates itself.
pub async fn require_login(
    State(state): State<Arc<AppState>>,
    session: Session,
    mut request: Request,
    next: Next,
) -> Result<Response, WebError> {
    let Some(user) = CurrentUser::from_session(&session).await? else {
        return Ok(login_redirect(&request));
    };

    match state.auth().get_user(user.id).await {
        Ok(_) => {}
        Err(AuthError::UserNotFound) => {
            tracing::warn!(user_id = %user.id, "Session refers to a missing user");
            session.flush().await?;
            return Ok(login_redirect(&request));
        }
        Err(e) => return Err(e.into()),
    }

    let user_id = user.id;
    request.extensions_mut().insert(user);

    let mut response = next.run(request).await;
    response.extensions_mut().insert(RequestUser(user_id));
    Ok(response)
}

fn login_redirect(request: &Request) -> Response {
    let is_htmx = request
        .headers()
        .get("hx-request")
        .is_some_and(|v| v.as_bytes() == b"true");

    if is_htmx {
        let mut response = StatusCode::UNAUTHORIZED.into_response();
        response
            .headers_mut()
            .insert("hx-redirect", HeaderValue::from_static(LOGIN_PATH));
        return response;
    }

    let target = request
        .uri()
        .path_and_query()
        .map_or_else(|| request.uri().path().to_string(), ToString::to_string);
    let encoded: String = url::form_urlencoded::byte_serialize(target.as_bytes()).collect();

    Redirect::to(&format!("{LOGIN_PATH}?next={encoded}")).into_response()
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /login/
pub async fn login_page(
    State(state): State<Arc<AppState>>,
    Query(query): Query<NextQuery>,
) -> Result<Response, WebError> {
    render_login(&state, "", query.next.as_deref(), None)
}

/// POST /login/
pub async fn login(
    State(state): State<Arc<AppState>>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, WebError> {
    let user = match state.auth().login(&form.username, &form.password).await {
        Ok(user) => user,
        Err(AuthError::InvalidCredentials) => {
            tracing::info!(username = %form.username, "Failed login attempt");
            return render_login(
                &state,
                &form.username,
                form.next.as_deref(),
                Some("Please enter a correct username and password."),
            );
        }
        Err(e) => return Err(e.into()),
    };

    session.cycle_id().await?;
    session
        .insert(
            SESSION_USER_KEY,
            CurrentUser {
                id: user.id,
                username: user.username.clone(),
            },
        )
        .await?;

    tracing::info!(user_id = %user.id, "User logged in: {}", user.username);

    let target = safe_next(form.next.as_deref()).unwrap_or(DEFAULT_LOGIN_REDIRECT);
    Ok(Redirect::to(target).into_response())
}

/// GET|POST /logout/
pub async fn logout(session: Session) -> Result<Redirect, WebError> {
    session.flush().await?;
    Ok(Redirect::to("/index/"))
}

/// GET /register/
pub async fn register_page(State(state): State<Arc<AppState>>) -> Result<Response, WebError> {
    render_register(&state, "", &[])
}

/// POST /register/
pub async fn register(
    State(state): State<Arc<AppState>>,
    Form(form): Form<RegisterForm>,
) -> Result<Response, WebError> {
    let registration = Registration {
        username: form.username,
        password: form.password1,
        password_confirmation: form.password2,
    };

    match state.auth().register(&registration).await {
        Ok(_) => Ok(Redirect::to(LOGIN_PATH).into_response()),
        Err(AuthError::Validation(errors)) => {
            render_register(&state, &registration.username, &errors)
        }
        Err(e @ AuthError::UsernameTaken) => {
            render_register(&state, &registration.username, &[e.to_string()])
        }
        Err(e) => Err(e.into()),
    }
}

/// POST /check-username/
pub async fn check_username(
    State(state): State<Arc<AppState>>,
    Form(form): Form<CheckUsernameForm>,
) -> Result<Response, WebError> {
    let taken = state.auth().username_exists(&form.username).await?;

    let mut ctx = Context::new();
    ctx.insert("taken", &taken);
    Ok(state
        .templates
        .render("partials/username-check.html", &ctx)?
        .into_response())
}

fn render_login(
    state: &AppState,
    username: &str,
    next: Option<&str>,
    error: Option<&str>,
) -> Result<Response, WebError> {
    let mut ctx = Context::new();
    ctx.insert("current_user", &None::<CurrentUser>);
    ctx.insert("username", username);
    ctx.insert("next", safe_next(next).unwrap_or(""));
    ctx.insert("error", &error);
    Ok(state.templates.render("login.html", &ctx)?.into_response())
}

fn render_register(
    state: &AppState,
    username: &str,
    errors: &[String],
) -> Result<Response, WebError> {
    let mut ctx = Context::new();
    ctx.insert("current_user", &None::<CurrentUser>);
    ctx.insert("username", username);
    ctx.insert("errors", errors);
    Ok(state.templates.render("register.html", &ctx)?.into_response())
}
