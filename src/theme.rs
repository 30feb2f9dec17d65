//! The light/dark theme preference and the endpoint that toggles it.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::Form;
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    db::{get_value, set_value},
    endpoints,
};

const THEME_KEY: &str = "theme";

/// The colour scheme used to render pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }
}

/// Get the stored theme.
///
/// Returns `None` if the user has never chosen a theme, or if the stored value
/// is not recognised, in which case pages follow the browser's preference.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn load_theme(connection: &Connection) -> Result<Option<Theme>, Error> {
    let value = get_value(THEME_KEY, connection)?;

    Ok(value.as_deref().and_then(|value| {
        let theme = Theme::parse(value);
        if theme.is_none() {
            tracing::warn!("ignoring unrecognised theme {value:?}");
        }
        theme
    }))
}

/// Persist the theme preference.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn save_theme(theme: Theme, connection: &Connection) -> Result<(), Error> {
    set_value(THEME_KEY, theme.as_str(), connection)
}

/// The state needed to toggle the theme.
#[derive(Debug, Clone)]
pub struct ThemeState {
    /// The database connection for the key-value store.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ThemeState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ToggleThemeForm {
    /// Where to send the user afterwards, defaults to the dashboard.
    #[serde(default)]
    pub redirect_url: Option<String>,
    /// The scheme the page was showing, "light" or "dark".
    ///
    /// Takes precedence over the saved theme.
    #[serde(default)]
    pub displayed_theme: Option<String>,
}

/// A route handler that switches between the light and dark theme.
pub async fn toggle_theme_endpoint(
    State(state): State<ThemeState>,
    Form(form): Form<ToggleThemeForm>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let displayed = form.displayed_theme.as_deref().and_then(Theme::parse);
    let current = match displayed {
        Some(theme) => theme,
        None => load_theme(&connection)?.unwrap_or(Theme::Light),
    };
    save_theme(current.toggled(), &connection)
        .inspect_err(|error| tracing::error!("could not save theme: {error}"))?;

    let redirect_url = form
        .redirect_url
        .filter(|url| url.starts_with('/') && !url.starts_with("//"))
        .unwrap_or_else(|| endpoints::DASHBOARD_VIEW.to_owned());

    Ok(Redirect::to(&redirect_url).into_response())
}
