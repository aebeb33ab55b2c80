//! Typed view models, one per template. Each handler assembles its own
//! `PageContext` so nothing reaches a template implicitly.

use askama::Template;
use axum::response::Html;
use tower_sessions::Session;

use super::{AppError, AppState, flash};
use crate::db::Movie;

/// Data every page shares through `base.html`.
#[derive(Debug, Clone, Default)]
pub struct PageContext {
    /// Display name of the watchlist owner, if one exists yet.
    pub owner_name: Option<String>,

    pub authenticated: bool,

    pub flashes: Vec<String>,
}

impl PageContext {
    /// Resolve the owner name and drain pending flash messages.
    pub async fn build(
        state: &AppState,
        session: &Session,
        authenticated: bool,
    ) -> Result<Self, AppError> {
        let owner_name = state.auth.owner().await?.map(|u| u.name);
        let flashes = flash::take(session).await?;

        Ok(Self {
            owner_name,
            authenticated,
            flashes,
        })
    }
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexPage {
    pub page: PageContext,
    pub movies: Vec<Movie>,
}

#[derive(Template)]
#[template(path = "edit.html")]
pub struct EditPage {
    pub page: PageContext,
    pub movie: Movie,
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginPage {
    pub page: PageContext,
}

#[derive(Template)]
#[template(path = "settings.html")]
pub struct SettingsPage {
    pub page: PageContext,
    pub name: String,
}

#[derive(Template)]
#[template(path = "404.html")]
pub struct NotFoundPage {
    pub page: PageContext,
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorPage {
    pub page: PageContext,
    pub heading: &'static str,
    pub detail: String,
}

pub fn render<T: Template>(template: &T) -> Result<Html<String>, AppError> {
    Ok(Html(template.render()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(title: &str) -> Movie {
        Movie {
            id: 7,
            title: title.to_string(),
            year: "2019".to_string(),
        }
    }

    #[test]
    fn test_index_hides_affordances_when_anonymous() {
        let html = IndexPage {
            page: PageContext {
                owner_name: Some("Test".to_string()),
                authenticated: false,
                flashes: vec![],
            },
            movies: vec![movie("Test Movie Title")],
        }
        .render()
        .unwrap();

        assert!(html.contains("Test's Watchlist"));
        assert!(html.contains("Test Movie Title"));
        assert!(html.contains("1 Titles"));
        assert!(!html.contains("<form method=\"post\">"));
        assert!(!html.contains("Edit"));
        assert!(!html.contains("Delete"));
        assert!(!html.contains("Settings"));
        assert!(!html.contains("Logout"));
    }

    #[test]
    fn test_index_shows_affordances_when_authenticated() {
        let html = IndexPage {
            page: PageContext {
                owner_name: Some("Test".to_string()),
                authenticated: true,
                flashes: vec!["Login success.".to_string()],
            },
            movies: vec![movie("Test Movie Title")],
        }
        .render()
        .unwrap();

        assert!(html.contains("Login success."));
        assert!(html.contains("<form method=\"post\">"));
        assert!(html.contains("/movie/edit/7"));
        assert!(html.contains("/movie/delete/7"));
        assert!(html.contains("Settings"));
        assert!(html.contains("Logout"));
    }

    #[test]
    fn test_titles_are_escaped() {
        let html = IndexPage {
            page: PageContext::default(),
            movies: vec![movie("<script>alert(1)</script>")],
        }
        .render()
        .unwrap();

        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&#60;script&#62;alert(1)&#60;/script&#62;"));
    }

    #[test]
    fn test_not_found_page() {
        let html = NotFoundPage {
            page: PageContext::default(),
        }
        .render()
        .unwrap();

        assert!(html.contains("Page Not Found - 404"));
        assert!(html.contains("Go Back to Index"));
    }
}
