//! The game catalog: one entry per playable board theme.

#[cfg(test)]
#[path = "games_test.rs"]
mod games_test;

use serde::{Deserialize, Serialize};

/// A playable game: its copy, its palette, and the word length it asks for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameEntry {
    pub id: u32,
    pub name: String,
    pub description: String,
    /// Cell fill.
    pub color: String,
    /// Letters and selection strokes.
    pub contrast: String,
    pub background: String,
    /// Length, in characters, of every hidden word.
    pub words_length: usize,
}

/// Read-only list of games.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    games: Vec<GameEntry>,
}

impl Catalog {
    #[must_use]
    pub fn new(games: Vec<GameEntry>) -> Self {
        Self { games }
    }

    /// The five games shipped with the app.
    #[must_use]
    pub fn builtin() -> Self {
        let entry = |id, color: &str, contrast: &str, background: &str, words_length| GameEntry {
            id,
            name: "Для начала".to_owned(),
            description: "Найдите всего 5 слов".to_owned(),
            color: color.to_owned(),
            contrast: contrast.to_owned(),
            background: background.to_owned(),
            words_length,
        };
        Self::new(vec![
            entry(1, "#18686b", "#D78095", "#121529", 3),
            entry(2, "#763D14", "#A2C62A", "#070F0C", 4),
            entry(3, "#2D7779", "#EBF6FA", "#041112", 5),
            entry(4, "#45595F", "#98AD9E", "#0D0607", 6),
            entry(5, "#7E4C12", "#FAC119", "#110C07", 7),
        ])
    }

    /// Parse a catalog from a JSON array of entries.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error for malformed input.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[must_use]
    pub fn list(&self) -> &[GameEntry] {
        &self.games
    }

    #[must_use]
    pub fn get(&self, id: u32) -> Option<&GameEntry> {
        self.games.iter().find(|game| game.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.games.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}
