use askama::Template;
use axum::{
    Extension,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{Html, IntoResponse, Response},
};
use std::fmt;
use std::sync::Arc;
use tower_sessions::Session;

use super::AppState;
use super::auth::current_user;
use super::views::{ErrorPage, NotFoundPage, PageContext};
use crate::services::AuthError;

/// Set on 404 responses so `render_not_found` can re-render them with the
/// owner's name and the navigation state.
#[derive(Debug, Clone, Copy)]
pub struct NotFoundMarker;

#[derive(Debug)]
pub enum AppError {
    NotFound(String),

    ValidationError(String),

    DatabaseError(String),

    InternalError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            AppError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let page = PageContext::default();

        let (status, body) = match &self {
            AppError::NotFound(msg) => {
                tracing::debug!("Not found: {}", msg);
                (StatusCode::NOT_FOUND, NotFoundPage { page }.render())
            }
            AppError::ValidationError(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorPage {
                    page,
                    heading: "Bad Request - 400",
                    detail: msg.clone(),
                }
                .render(),
            ),
            AppError::DatabaseError(msg) => {
                tracing::error!("Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorPage {
                        page,
                        heading: "Internal Server Error - 500",
                        detail: "A database error occurred".to_string(),
                    }
                    .render(),
                )
            }
            AppError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorPage {
                        page,
                        heading: "Internal Server Error - 500",
                        detail: "An internal error occurred".to_string(),
                    }
                    .render(),
                )
            }
        };

        let not_found = matches!(self, AppError::NotFound(_));
        match body {
            Ok(html) if not_found => {
                (status, Extension(NotFoundMarker), Html(html)).into_response()
            }
            Ok(html) => (status, Html(html)).into_response(),
            Err(e) => {
                tracing::error!("Failed to render error page: {e}");
                (status, status.to_string()).into_response()
            }
        }
    }
}

/// Re-renders 404 pages with the owner header and navigation, which
/// `IntoResponse` cannot reach without the application state.
pub async fn render_not_found(
    State(state): State<Arc<AppState>>,
    session: Session,
    req: Request,
    next: Next,
) -> Response {
    let response = next.run(req).await;
    if response.extensions().get::<NotFoundMarker>().is_none() {
        return response;
    }

    let authenticated = matches!(current_user(&state, &session).await, Ok(Some(_)));
    let page = match PageContext::build(&state, &session, authenticated).await {
        Ok(page) => page,
        Err(e) => {
            tracing::warn!("Falling back to plain 404 page: {e}");
            return response;
        }
    };

    match (NotFoundPage { page }).render() {
        Ok(html) => (StatusCode::NOT_FOUND, Html(html)).into_response(),
        Err(e) => {
            tracing::error!("Failed to render 404 page: {e}");
            response
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalError(format!("{err:#}"))
    }
}

impl From<tower_sessions::session::Error> for AppError {
    fn from(err: tower_sessions::session::Error) -> Self {
        AppError::InternalError(format!("Session error: {err}"))
    }
}

impl From<askama::Error> for AppError {
    fn from(err: askama::Error) -> Self {
        AppError::InternalError(format!("Template error: {err}"))
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => AppError::validation("Invalid username or password."),
            AuthError::UserNotFound => AppError::not_found("User", "for session"),
            AuthError::Validation(msg) => AppError::ValidationError(msg),
            AuthError::Database(msg) => AppError::DatabaseError(msg),
            AuthError::Internal(msg) => AppError::InternalError(msg),
        }
    }
}

impl AppError {
    pub fn not_found(resource: &str, id: impl fmt::Display) -> Self {
        AppError::NotFound(format!("{} {} not found", resource, id))
    }

    pub fn movie_not_found(id: impl fmt::Display) -> Self {
        AppError::NotFound(format!("Movie {} not found", id))
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::ValidationError(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::InternalError(msg.into())
    }
}
