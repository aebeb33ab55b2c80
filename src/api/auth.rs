use axum::{
    Extension, Form,
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use std::sync::Arc;
use tower_sessions::Session;
use tracing::{debug, info, warn};

use super::validation::{INVALID_INPUT, validate_login};
use super::views::{LoginPage, PageContext, render};
use super::{AppError, AppState, flash};
use crate::db::User;
use crate::services::AuthError;

/// Session key holding the authenticated user's id.
pub const USER_ID_KEY: &str = "user_id";

pub const LOGIN_REQUIRED_MESSAGE: &str = "Please log in to access this page.";

// ============================================================================
// Request Types
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

// ============================================================================
// Session Manager
// ============================================================================

/// Bind the session to `user`. The session id is rotated first so a token
/// planted before login cannot be reused afterwards.
pub async fn login_user(session: &Session, user: &User) -> Result<(), AppError> {
    session.cycle_id().await?;
    session.insert(USER_ID_KEY, user.id).await?;
    Ok(())
}

/// Drop the user binding but keep the rest of the session, so the
/// goodbye message still reaches the next page.
pub async fn logout_user(session: &Session) -> Result<(), AppError> {
    session.remove::<i32>(USER_ID_KEY).await?;
    session.cycle_id().await?;
    Ok(())
}

/// Resolve the session to a user. A missing key, an unreadable value or a
/// user row that no longer exists all mean anonymous.
pub async fn current_user(state: &AppState, session: &Session) -> Result<Option<User>, AppError> {
    let user_id = match session.get::<i32>(USER_ID_KEY).await {
        Ok(Some(id)) => id,
        Ok(None) => return Ok(None),
        Err(e) => {
            debug!("Ignoring unreadable session: {e}");
            return Ok(None);
        }
    };

    Ok(state.auth.load_user(user_id).await?)
}

/// Extractor for handlers that serve both anonymous and logged-in callers.
pub struct CurrentUser(pub Option<User>);

impl CurrentUser {
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.0.is_some()
    }
}

impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        // Already resolved by `require_authenticated`
        if let Some(user) = parts.extensions.get::<User>() {
            return Ok(Self(Some(user.clone())));
        }

        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|(_, msg)| AppError::internal(msg))?;

        Ok(Self(current_user(state, &session).await?))
    }
}

// ============================================================================
// Middleware
// ============================================================================

/// Gate for protected routes. Anonymous callers are sent to the login page;
/// otherwise the resolved `User` is placed in request extensions.
pub async fn require_authenticated(
    State(state): State<Arc<AppState>>,
    session: Session,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(user) = current_user(&state, &session).await? else {
        flash::push(&session, LOGIN_REQUIRED_MESSAGE).await?;
        return Ok(Redirect::to("/login").into_response());
    };

    tracing::Span::current().record("user_id", user.id);
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /login
pub async fn login_page(
    State(state): State<Arc<AppState>>,
    session: Session,
    current: CurrentUser,
) -> Result<Html<String>, AppError> {
    let page = PageContext::build(&state, &session, current.is_authenticated()).await?;
    render(&LoginPage { page })
}

/// POST /login
pub async fn login(
    State(state): State<Arc<AppState>>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Redirect, AppError> {
    if let Err(e) = validate_login(&form.username, &form.password) {
        debug!("Rejected login form: {e}");
        flash::push(&session, INVALID_INPUT).await?;
        return Ok(Redirect::to("/login"));
    }

    match state.auth.login(&form.username, &form.password).await {
        Ok(user) => {
            login_user(&session, &user).await?;
            info!(user_id = user.id, "Login succeeded");
            flash::push(&session, "Login success.").await?;
            Ok(Redirect::to("/"))
        }
        Err(AuthError::InvalidCredentials) => {
            warn!("Failed login attempt for username: {}", form.username);
            flash::push(&session, AuthError::InvalidCredentials.to_string()).await?;
            Ok(Redirect::to("/login"))
        }
        Err(e) => Err(e.into()),
    }
}

/// GET /logout
pub async fn logout(
    session: Session,
    Extension(user): Extension<User>,
) -> Result<Redirect, AppError> {
    logout_user(&session).await?;
    info!(user_id = user.id, "Logged out");
    flash::push(&session, "Goodbye.").await?;
    Ok(Redirect::to("/"))
}
