//! Random word picks and grid selection.
//!
//! Every pick returns `None` when no word qualifies. Lengths count
//! characters, so Cyrillic words measure the way players read them.

#[cfg(test)]
#[path = "words_test.rs"]
mod words_test;

use rand::Rng;
use rand::seq::IndexedRandom;

use crate::grid::Grid;

/// Built-in dictionary, used when the host supplies no words. Twelve or
/// more words for each length from 3 to 7.
pub const DICTIONARY: &[&str] = &[
    "кот", "дом", "лес", "сад", "мир", "сок", "сыр", "мак", "лук", "жук", "нос", "сон", "чай", "сова", "луна", "река",
    "рыба", "гора", "роза", "небо", "снег", "волк", "лиса", "мост", "хлеб", "книга", "птица", "ветер", "озеро", "берег",
    "город", "карта", "лампа", "песок", "сосна", "трава", "школа", "солнце", "дерево", "облако", "яблоко", "машина",
    "звезда", "корова", "ворона", "улитка", "неделя", "собака", "ракета", "подарок", "ромашка", "бабочка", "медведь",
    "капуста", "морковь", "самолёт", "картина", "черника", "лисичка", "дельфин", "колокол", "ласточка", "одуванчик",
];

fn text<S: AsRef<str>>(word: &S) -> &str {
    word.as_ref()
}

/// Whether two words spell the same letters, ignoring case.
fn same_letters<S: AsRef<str>>(a: &S, b: &S) -> bool {
    text(a).chars().flat_map(char::to_lowercase).eq(text(b).chars().flat_map(char::to_lowercase))
}

fn char_len<S: AsRef<str>>(word: &S) -> usize {
    text(word).chars().count()
}

fn pick<'a, S, R, P>(words: &'a [S], rng: &mut R, keep: P) -> Option<&'a S>
where
    S: AsRef<str>,
    R: Rng + ?Sized,
    P: Fn(usize) -> bool,
{
    let matching: Vec<&S> = words.iter().filter(|word| keep(char_len(*word))).collect();
    matching.choose(rng).copied()
}

/// Any word.
pub fn random_word<'a, S: AsRef<str>, R: Rng + ?Sized>(words: &'a [S], rng: &mut R) -> Option<&'a S> {
    words.choose(rng)
}

/// A word strictly shorter than `size`.
pub fn random_word_shorter<'a, S: AsRef<str>, R: Rng + ?Sized>(words: &'a [S], size: usize, rng: &mut R) -> Option<&'a S> {
    pick(words, rng, |len| len < size)
}

/// A word of exactly `length` characters.
pub fn random_word_equal<'a, S: AsRef<str>, R: Rng + ?Sized>(words: &'a [S], length: usize, rng: &mut R) -> Option<&'a S> {
    pick(words, rng, |len| len == length)
}

/// A word strictly longer than `size`.
pub fn random_word_longer<'a, S: AsRef<str>, R: Rng + ?Sized>(words: &'a [S], size: usize, rng: &mut R) -> Option<&'a S> {
    pick(words, rng, |len| len > size)
}

/// A word with `min <= length <= max`.
pub fn random_word_between<'a, S: AsRef<str>, R: Rng + ?Sized>(
    words: &'a [S],
    min: usize,
    max: usize,
    rng: &mut R,
) -> Option<&'a S> {
    pick(words, rng, |len| (min..=max).contains(&len))
}

/// Up to `count` entries of exactly `length` characters, in random order.
/// Entries differing only in case count once.
pub fn sample_words_equal<'a, S: AsRef<str>, R: Rng + ?Sized>(
    words: &'a [S],
    length: usize,
    count: usize,
    rng: &mut R,
) -> Vec<&'a S> {
    let mut matching: Vec<&S> = Vec::new();
    for word in words.iter().filter(|word| char_len(*word) == length) {
        if !matching.iter().any(|seen| same_letters(*seen, word)) {
            matching.push(word);
        }
    }
    matching.choose_multiple(rng, count).copied().collect()
}

/// The grid hiding the most words; the earliest wins a tie.
#[must_use]
pub fn grid_with_most_words(grids: &[Grid]) -> Option<&Grid> {
    grids.iter().fold(None, |best: Option<&Grid>, grid| match best {
        Some(best) if best.words().len() >= grid.words().len() => Some(best),
        _ => Some(grid),
    })
}

/// The first grid hiding exactly `count` words.
#[must_use]
pub fn grid_with_word_count(grids: &[Grid], count: usize) -> Option<&Grid> {
    grids.iter().find(|grid| grid.words().len() == count)
}
