//! UI strings in Russian, English and Bulgarian.
//!
//! Lookups never fail: a key without a translation comes back as itself, so
//! a missing string shows up on screen as `core.albums` instead of vanishing.

#[cfg(test)]
#[path = "locale_test.rs"]
mod locale_test;

use serde::{Deserialize, Serialize};

/// Supported interface languages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    #[default]
    Ru,
    En,
    Bg,
}

impl Lang {
    pub const ALL: [Lang; 3] = [Self::Ru, Self::En, Self::Bg];

    /// Parse a language tag such as `en`, `EN` or `bg-BG`. Only the primary
    /// subtag is considered.
    #[must_use]
    pub fn parse(tag: &str) -> Option<Self> {
        let primary = tag.split(['-', '_']).next().unwrap_or_default().trim();
        Self::ALL.into_iter().find(|lang| lang.tag().eq_ignore_ascii_case(primary))
    }

    /// Like [`Lang::parse`], falling back to the default language.
    #[must_use]
    pub fn parse_or_default(tag: &str) -> Self {
        Self::parse(tag).unwrap_or_default()
    }

    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::Ru => "ru",
            Self::En => "en",
            Self::Bg => "bg",
        }
    }

    fn table(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::Ru => RU,
            Self::En => EN,
            Self::Bg => BG,
        }
    }
}

const RU: &[(&str, &str)] = &[
    ("core.home", "Главная"),
    ("core.contacts", "Контакты"),
    ("core.schedules", "Расписание"),
    ("core.services", "Услуги"),
    ("core.articles", "Статьи"),
    ("core.products", "Товары"),
    ("core.albums", "Альбомы"),
    ("game.found", "Найдено"),
    ("game.complete", "Все слова найдены!"),
    ("errors.not-found", "Страница не найдена"),
];

const EN: &[(&str, &str)] = &[
    ("core.home", "Home"),
    ("core.contacts", "Contacts"),
    ("core.schedules", "Schedule"),
    ("core.services", "Services"),
    ("core.articles", "Articles"),
    ("core.products", "Products"),
    ("core.albums", "Albums"),
    ("game.found", "Found"),
    ("game.complete", "All words found!"),
    ("errors.not-found", "Page not found"),
];

const BG: &[(&str, &str)] = &[
    ("core.home", "Начало"),
    ("core.contacts", "Контакти"),
    ("core.schedules", "График"),
    ("core.services", "Услуги"),
    ("core.articles", "Статии"),
    ("core.products", "Продукти"),
    ("core.albums", "Албуми"),
    ("game.found", "Намерени"),
    ("game.complete", "Всички думи са намерени!"),
    ("errors.not-found", "Страницата не е намерена"),
];

/// String lookup for the active language.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Locale {
    lang: Lang,
}

impl Locale {
    #[must_use]
    pub fn new(lang: Lang) -> Self {
        Self { lang }
    }

    #[must_use]
    pub fn lang(&self) -> Lang {
        self.lang
    }

    pub fn set_lang(&mut self, lang: Lang) {
        self.lang = lang;
    }

    /// Translation for `key`, or `key` itself when there is none.
    #[must_use]
    pub fn get<'a>(&self, key: &'a str) -> &'a str {
        self.lookup(key).unwrap_or(key)
    }

    /// Translation for `key`, if the active language has one.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<&'static str> {
        self.lang.table().iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
    }
}
