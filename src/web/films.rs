use axum::{
    Form,
    body::Bytes,
    extract::{Path, State},
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;
use std::sync::Arc;
use tera::Context;

use super::auth::CurrentUser;
use super::validation::{parse_film_order, validate_membership_id};
use super::{AppState, WebError};
use crate::models::film::AddOutcome;

#[derive(Deserialize)]
pub struct AddFilmForm {
    #[serde(default)]
    pub filmname: String,
}

#[derive(Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub search: String,
}

/// GET /films/
pub async fn list_films(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
) -> Result<Response, WebError> {
    let films = state.films().list_films(user.id).await?;

    let mut ctx = Context::new();
    ctx.insert("current_user", &Some(&user));
    ctx.insert("films", &films);
    ctx.insert("message", &None::<String>);
    Ok(state.templates.render("films.html", &ctx)?.into_response())
}

/// POST /add-film/
pub async fn add_film(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Form(form): Form<AddFilmForm>,
) -> Result<Html<String>, WebError> {
    let name = form.filmname.trim();
    let outcome = state.films().add_film(user.id, name).await?;

    if let AddOutcome::Added { created_film: true } = outcome {
        metrics::counter!("films_created_total").increment(1);
    }

    render_list(&state, &user, Some(format!("Added {name} to list of films"))).await
}

/// DELETE /delete-film/{id}/
pub async fn delete_film(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<Html<String>, WebError> {
    let id = validate_membership_id(&id)?;
    state.films().remove_film(user.id, id).await?;
    render_list(&state, &user, None).await
}

/// POST /search-film/
pub async fn search_film(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Form(form): Form<SearchForm>,
) -> Result<Html<String>, WebError> {
    let results = state.films().search_films(user.id, &form.search).await?;

    let mut ctx = Context::new();
    ctx.insert("results", &results);
    ctx.insert("search", &form.search);
    state.templates.render("partials/search-results.html", &ctx)
}

/// POST /sort/
///
/// Takes the raw body because `film_order` repeats once per list entry.
pub async fn sort(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    body: Bytes,
) -> Result<Html<String>, WebError> {
    let ids = parse_film_order(&body)?;
    state.films().sort_films(user.id, &ids).await?;
    render_list(&state, &user, None).await
}

async fn render_list(
    state: &AppState,
    user: &CurrentUser,
    message: Option<String>,
) -> Result<Html<String>, WebError> {
    let films = state.films().list_films(user.id).await?;

    let mut ctx = Context::new();
    ctx.insert("films", &films);
    ctx.insert("message", &message);
    state.templates.render("partials/film-list.html", &ctx)
}
