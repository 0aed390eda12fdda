//! Letter grids: hiding words in a square of letters and reading them back.
//!
//! A grid is `size × size` uppercase letters. Words are laid along four
//! forward directions (east, south, south-east, north-east); a player may
//! select them from either end, so reads run in any of the eight directions.

#[cfg(test)]
#[path = "grid_test.rs"]
mod grid_test;

use std::cmp::Ordering;

use rand::Rng;
use serde::Serialize;

/// Fill for cells no word occupies.
const FILLER: &[char] = &[
    'А', 'Б', 'В', 'Г', 'Д', 'Е', 'Ж', 'З', 'И', 'К', 'Л', 'М', 'Н', 'О', 'П', 'Р', 'С', 'Т', 'У', 'Ф', 'Х', 'Ц', 'Ч', 'Ш',
    'Э', 'Ю', 'Я',
];

/// Random spans tried per word before it is left out.
const PLACEMENT_ATTEMPTS: usize = 200;

/// Column/row address of a grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Cell {
    pub col: usize,
    pub row: usize,
}

impl Cell {
    #[must_use]
    pub fn new(col: usize, row: usize) -> Self {
        Self { col, row }
    }
}

/// Directions words are laid in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    East,
    South,
    SouthEast,
    NorthEast,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Self::East, Self::South, Self::SouthEast, Self::NorthEast];

    /// A random `(start, end)` span of `span + 1` cells that fits a grid of
    /// `size`. Requires `span < size`.
    fn random_span<R: Rng + ?Sized>(self, span: usize, size: usize, rng: &mut R) -> (Cell, Cell) {
        let free = size - span;
        match self {
            Self::East => {
                let start = Cell::new(rng.random_range(0..free), rng.random_range(0..size));
                (start, Cell::new(start.col + span, start.row))
            }
            Self::South => {
                let start = Cell::new(rng.random_range(0..size), rng.random_range(0..free));
                (start, Cell::new(start.col, start.row + span))
            }
            Self::SouthEast => {
                let start = Cell::new(rng.random_range(0..free), rng.random_range(0..free));
                (start, Cell::new(start.col + span, start.row + span))
            }
            Self::NorthEast => {
                let start = Cell::new(rng.random_range(0..free), rng.random_range(span..size));
                (start, Cell::new(start.col + span, start.row - span))
            }
        }
    }
}

/// Cells on the straight line from `from` to `to`, both included.
///
/// `None` unless the two cells share a row, a column, or a diagonal.
#[must_use]
pub fn line(from: Cell, to: Cell) -> Option<Vec<Cell>> {
    let cols = from.col.abs_diff(to.col);
    let rows = from.row.abs_diff(to.row);
    if cols != 0 && rows != 0 && cols != rows {
        return None;
    }
    let steps = cols.max(rows);
    Some((0..=steps).map(|i| Cell::new(toward(from.col, to.col, i), toward(from.row, to.row, i))).collect())
}

fn toward(from: usize, to: usize, step: usize) -> usize {
    match from.cmp(&to) {
        Ordering::Less => from + step,
        Ordering::Greater => from - step,
        Ordering::Equal => from,
    }
}

fn uppercase(word: &str) -> Vec<char> {
    word.chars().flat_map(char::to_uppercase).collect()
}

/// A word hidden in the grid, from its first letter to its last.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Placement {
    pub word: String,
    pub start: Cell,
    pub end: Cell,
}

impl Placement {
    #[must_use]
    pub fn cells(&self) -> Vec<Cell> {
        line(self.start, self.end).unwrap_or_default()
    }

    /// Whether a selection from `a` to `b` covers exactly this word, read
    /// either way.
    #[must_use]
    pub fn spans(&self, a: Cell, b: Cell) -> bool {
        (self.start, self.end) == (a, b) || (self.start, self.end) == (b, a)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Grid {
    size: usize,
    letters: Vec<char>,
    words: Vec<Placement>,
}

impl Grid {
    /// Hide as many of `words` as fit, then fill the rest with random
    /// letters. Words longer than the grid, empty words and repeats
    /// (ignoring case) are skipped; a word that finds no free span is left out.
    pub fn generate<S, R>(size: usize, words: &[S], rng: &mut R) -> Self
    where
        S: AsRef<str>,
        R: Rng + ?Sized,
    {
        let mut slots: Vec<Option<char>> = vec![None; size * size];
        let mut placed: Vec<Placement> = Vec::new();

        for word in words {
            let word = word.as_ref();
            let letters = uppercase(word);
            if letters.is_empty() || letters.len() > size || placed.iter().any(|p| uppercase(&p.word) == letters) {
                log::debug!("grid: skipping {word:?}");
                continue;
            }
            let span = letters.len() - 1;
            for _ in 0..PLACEMENT_ATTEMPTS {
                let direction = Direction::ALL[rng.random_range(0..Direction::ALL.len())];
                let (start, end) = direction.random_span(span, size, rng);
                let cells = line(start, end).unwrap_or_default();
                let fits = cells.iter().zip(&letters).all(|(cell, letter)| {
                    slots[cell.row * size + cell.col].is_none_or(|taken| taken == *letter)
                });
                if fits {
                    for (cell, letter) in cells.iter().zip(&letters) {
                        slots[cell.row * size + cell.col] = Some(*letter);
                    }
                    placed.push(Placement { word: word.to_owned(), start, end });
                    break;
                }
            }
        }

        let letters = slots.into_iter().map(|slot| slot.unwrap_or_else(|| FILLER[rng.random_range(0..FILLER.len())])).collect();
        Self { size, letters, words: placed }
    }

    /// Build a grid from fixed rows and locate `words` in it.
    ///
    /// `None` if the rows are not square or a word cannot be found.
    #[must_use]
    pub fn from_rows(rows: &[&str], words: &[&str]) -> Option<Self> {
        let size = rows.len();
        let mut letters = Vec::with_capacity(size * size);
        for row in rows {
            let row = uppercase(row);
            if row.len() != size {
                return None;
            }
            letters.extend(row);
        }
        let mut grid = Self { size, letters, words: Vec::new() };
        for word in words {
            let placement = grid.locate(word)?;
            grid.words.push(placement);
        }
        Some(grid)
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    #[must_use]
    pub fn words(&self) -> &[Placement] {
        &self.words
    }

    #[must_use]
    pub fn letter(&self, cell: Cell) -> Option<char> {
        if cell.col >= self.size || cell.row >= self.size {
            return None;
        }
        self.letters.get(cell.row * self.size + cell.col).copied()
    }

    /// Every cell, row by row.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.size).flat_map(move |row| (0..self.size).map(move |col| Cell::new(col, row)))
    }

    /// Letters along the straight line from `from` to `to`.
    #[must_use]
    pub fn word_between(&self, from: Cell, to: Cell) -> Option<String> {
        line(from, to)?.into_iter().map(|cell| self.letter(cell)).collect()
    }

    /// Index of the hidden word covered by a selection from `from` to `to`.
    #[must_use]
    pub fn placement_between(&self, from: Cell, to: Cell) -> Option<usize> {
        self.words.iter().position(|placement| placement.spans(from, to))
    }

    /// First occurrence of `word` in any of the eight directions.
    #[must_use]
    pub fn locate(&self, word: &str) -> Option<Placement> {
        let target = uppercase(word);
        if target.is_empty() || target.len() > self.size {
            return None;
        }
        let span = target.len() - 1;
        let target: String = target.into_iter().collect();
        for start in self.cells() {
            for end in self.ends(start, span) {
                if self.word_between(start, end).is_some_and(|read| read == target) {
                    return Some(Placement { word: word.to_owned(), start, end });
                }
            }
        }
        None
    }

    /// In-bounds cells `span` steps away from `start` along each direction.
    fn ends(&self, start: Cell, span: usize) -> Vec<Cell> {
        let size = self.size;
        let axis = |at: usize| [at.checked_sub(span), Some(at), Some(at + span).filter(|v| *v < size)];
        let mut ends = Vec::with_capacity(9);
        for col in axis(start.col).into_iter().flatten() {
            for row in axis(start.row).into_iter().flatten() {
                let end = Cell::new(col, row);
                if (end != start || span == 0) && !ends.contains(&end) {
                    ends.push(end);
                }
            }
        }
        ends
    }
}
