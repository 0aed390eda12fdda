//! Route table: the home screen, one screen per game, and a catch-all.

#[cfg(test)]
#[path = "routes_test.rs"]
mod routes_test;

use serde::Serialize;

/// Page title shared by the home and game screens.
pub const APP_TITLE: &str = "Сова";

/// A resolved location in the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "name", rename_all = "kebab-case")]
pub enum Route {
    Home,
    Game { id: u32 },
    #[serde(rename = "404")]
    NotFound,
}

impl Route {
    /// Resolve a URL path. Unknown paths and malformed game ids are `NotFound`.
    #[must_use]
    pub fn parse(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        if trimmed.is_empty() {
            return Self::Home;
        }
        match trimmed.strip_prefix("/game/") {
            Some(id) => id.parse().map_or(Self::NotFound, |id| Self::Game { id }),
            None => Self::NotFound,
        }
    }

    /// Route name as used by navigation.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Game { .. } => "game",
            Self::NotFound => "404",
        }
    }

    /// Canonical path; the catch-all has none.
    #[must_use]
    pub fn path(self) -> Option<String> {
        match self {
            Self::Home => Some("/".to_owned()),
            Self::Game { id } => Some(format!("/game/{id}")),
            Self::NotFound => None,
        }
    }

    #[must_use]
    pub fn title(self) -> Option<&'static str> {
        match self {
            Self::Home | Self::Game { .. } => Some(APP_TITLE),
            Self::NotFound => None,
        }
    }
}
