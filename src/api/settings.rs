use axum::{
    Extension, Form,
    extract::State,
    response::{Html, Redirect},
};
use serde::Deserialize;
use std::sync::Arc;
use tower_sessions::Session;
use tracing::{debug, info};

use super::validation::{INVALID_INPUT, validate_name};
use super::views::{PageContext, SettingsPage, render};
use super::{AppError, AppState, flash};
use crate::db::User;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SettingsForm {
    pub name: String,
}

/// GET /settings
pub async fn settings_page(
    State(state): State<Arc<AppState>>,
    session: Session,
    Extension(user): Extension<User>,
) -> Result<Html<String>, AppError> {
    let page = PageContext::build(&state, &session, true).await?;
    render(&SettingsPage {
        page,
        name: user.name,
    })
}

/// POST /settings
pub async fn update_settings(
    State(state): State<Arc<AppState>>,
    session: Session,
    Extension(user): Extension<User>,
    Form(form): Form<SettingsForm>,
) -> Result<Redirect, AppError> {
    if let Err(e) = validate_name(&form.name) {
        debug!(user_id = user.id, "Rejected settings: {e}");
        flash::push(&session, INVALID_INPUT).await?;
        return Ok(Redirect::to("/settings"));
    }

    state.auth.update_name(user.id, &form.name).await?;
    info!(user_id = user.id, "Display name updated");
    flash::push(&session, "Settings updated.").await?;
    Ok(Redirect::to("/"))
}
