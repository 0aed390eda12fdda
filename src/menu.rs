//! Site menu: a fixed list of localized links plus a visibility flag.

#[cfg(test)]
#[path = "menu_test.rs"]
mod menu_test;

use serde::Serialize;

use crate::locale::Locale;

/// `(label key, route name, extend)` for every entry, in display order.
const ENTRIES: [(&str, &str, bool); 7] = [
    ("core.home", "home", false),
    ("core.contacts", "contacts-list", false),
    ("core.schedules", "schedules-list", false),
    ("core.services", "services-list", true),
    ("core.articles", "articles-list", true),
    ("core.products", "products-list", true),
    ("core.albums", "albums-list", true),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuItem {
    pub label: String,
    pub route: &'static str,
    /// Shown only in the expanded menu.
    pub extend: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Menu {
    items: Vec<MenuItem>,
    is_visible: bool,
}

impl Menu {
    /// Build the menu labelled for `locale`. It starts hidden.
    #[must_use]
    pub fn new(locale: &Locale) -> Self {
        let mut menu = Self { items: Vec::new(), is_visible: false };
        menu.relabel(locale);
        menu
    }

    /// Rebuild the entries after a language change. Visibility is kept.
    pub fn relabel(&mut self, locale: &Locale) {
        self.items = ENTRIES
            .iter()
            .map(|&(key, route, extend)| MenuItem { label: locale.get(key).to_owned(), route, extend })
            .collect();
    }

    #[must_use]
    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn show(&mut self) {
        self.is_visible = true;
    }

    pub fn hide(&mut self) {
        self.is_visible = false;
    }

    pub fn toggle(&mut self) {
        if self.is_visible {
            self.hide();
        } else {
            self.show();
        }
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.is_visible
    }
}
