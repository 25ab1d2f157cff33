use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;
use tera::Context;
use tower_sessions::Session;

use super::auth::CurrentUser;
use super::{AppState, WebError};

/// GET /
pub async fn root() -> Redirect {
    Redirect::to("/index/")
}

/// GET /index/
pub async fn index(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Response, WebError> {
    let current_user = CurrentUser::from_session(&session).await?;

    let mut ctx = Context::new();
    ctx.insert("current_user", &current_user);
    Ok(state.templates.render("index.html", &ctx)?.into_response())
}

/// Any method on /clear/. The notification element swaps itself for this
/// empty body.
pub async fn clear() -> &'static str {
    ""
}
