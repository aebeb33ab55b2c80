use axum::{
    Extension, Form,
    extract::{Path, State, rejection::PathRejection},
    response::{Html, Redirect},
};
use serde::Deserialize;
use std::sync::Arc;
use tower_sessions::Session;
use tracing::{debug, info};

use super::auth::CurrentUser;
use super::validation::{INVALID_INPUT, validate_movie};
use super::views::{EditPage, IndexPage, PageContext, render};
use super::{AppError, AppState, flash};
use crate::db::User;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MovieForm {
    pub title: String,
    pub year: String,
}

/// Ids that are not integers are routed like any other unknown page.
fn movie_id(path: Result<Path<i32>, PathRejection>) -> Result<i32, AppError> {
    path.map(|Path(id)| id)
        .map_err(|e| AppError::NotFound(format!("Invalid movie id: {e}")))
}

/// GET /
pub async fn index(
    State(state): State<Arc<AppState>>,
    session: Session,
    current: CurrentUser,
) -> Result<Html<String>, AppError> {
    let page = PageContext::build(&state, &session, current.is_authenticated()).await?;
    let movies = state.store.list_movies().await?;
    render(&IndexPage { page, movies })
}

/// POST /
pub async fn create_movie(
    State(state): State<Arc<AppState>>,
    session: Session,
    current: CurrentUser,
    Form(form): Form<MovieForm>,
) -> Result<Redirect, AppError> {
    // Anonymous submissions are dropped without a message
    if !current.is_authenticated() {
        return Ok(Redirect::to("/"));
    }

    if let Err(e) = validate_movie(&form.title, &form.year) {
        debug!("Rejected new movie: {e}");
        flash::push(&session, INVALID_INPUT).await?;
        return Ok(Redirect::to("/"));
    }

    let movie = state.store.add_movie(&form.title, &form.year).await?;
    info!(movie_id = movie.id, "Created movie: {}", movie.title);
    flash::push(&session, "Item created.").await?;
    Ok(Redirect::to("/"))
}

/// GET /movie/edit/{id}
pub async fn edit_page(
    State(state): State<Arc<AppState>>,
    session: Session,
    path: Result<Path<i32>, PathRejection>,
) -> Result<Html<String>, AppError> {
    let id = movie_id(path)?;
    let movie = state
        .store
        .get_movie(id)
        .await?
        .ok_or_else(|| AppError::movie_not_found(id))?;

    let page = PageContext::build(&state, &session, true).await?;
    render(&EditPage { page, movie })
}

/// POST /movie/edit/{id}
pub async fn update_movie(
    State(state): State<Arc<AppState>>,
    session: Session,
    path: Result<Path<i32>, PathRejection>,
    Form(form): Form<MovieForm>,
) -> Result<Redirect, AppError> {
    let id = movie_id(path)?;
    if state.store.get_movie(id).await?.is_none() {
        return Err(AppError::movie_not_found(id));
    }

    if let Err(e) = validate_movie(&form.title, &form.year) {
        debug!(movie_id = id, "Rejected movie update: {e}");
        flash::push(&session, INVALID_INPUT).await?;
        return Ok(Redirect::to(&format!("/movie/edit/{id}")));
    }

    if !state.store.update_movie(id, &form.title, &form.year).await? {
        // Deleted between the lookup and the write
        return Err(AppError::movie_not_found(id));
    }

    info!(movie_id = id, "Updated movie");
    flash::push(&session, "Item updated.").await?;
    Ok(Redirect::to("/"))
}

/// POST /movie/delete/{id}
pub async fn delete_movie(
    State(state): State<Arc<AppState>>,
    session: Session,
    Extension(user): Extension<User>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<Redirect, AppError> {
    let id = movie_id(path)?;
    if !state.store.remove_movie(id).await? {
        return Err(AppError::movie_not_found(id));
    }

    info!(movie_id = id, user_id = user.id, "Deleted movie");
    flash::push(&session, "Item deleted.").await?;
    Ok(Redirect::to("/"))
}
