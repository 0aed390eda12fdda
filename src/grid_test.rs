use rand::SeedableRng;
use rand::rngs::SmallRng;

use super::*;

fn rng() -> SmallRng {
    SmallRng::seed_from_u64(7)
}

/// ```text
///   0 1 2 3
/// 0 К О Т Ы
/// 1 Д О М А
/// 2 Л Е С Ы
/// 3 С О Н Я
/// ```
fn fixed() -> Grid {
    Grid::from_rows(&["коты", "дома", "лесы", "соня"], &["кот", "дом", "сон"]).unwrap()
}

// =============================================================
// line
// =============================================================

#[test]
fn line_horizontal_vertical_diagonal() {
    assert_eq!(line(Cell::new(0, 0), Cell::new(2, 0)).unwrap(), vec![Cell::new(0, 0), Cell::new(1, 0), Cell::new(2, 0)]);
    assert_eq!(line(Cell::new(1, 2), Cell::new(1, 0)).unwrap(), vec![Cell::new(1, 2), Cell::new(1, 1), Cell::new(1, 0)]);
    assert_eq!(line(Cell::new(0, 2), Cell::new(2, 0)).unwrap(), vec![Cell::new(0, 2), Cell::new(1, 1), Cell::new(2, 0)]);
}

#[test]
fn line_single_cell() {
    assert_eq!(line(Cell::new(3, 3), Cell::new(3, 3)).unwrap(), vec![Cell::new(3, 3)]);
}

#[test]
fn line_rejects_knight_moves() {
    assert!(line(Cell::new(0, 0), Cell::new(2, 1)).is_none());
    assert!(line(Cell::new(0, 0), Cell::new(1, 3)).is_none());
}

// =============================================================
// Fixed grids
// =============================================================

#[test]
fn from_rows_requires_a_square() {
    assert!(Grid::from_rows(&["аб", "в"], &[]).is_none());
    assert!(Grid::from_rows(&["абв", "где"], &[]).is_none());
}

#[test]
fn from_rows_locates_words() {
    let grid = fixed();
    assert_eq!(grid.size(), 4);
    assert_eq!(grid.words().len(), 3);
    assert_eq!(grid.words()[0].start, Cell::new(0, 0));
    assert_eq!(grid.words()[0].end, Cell::new(2, 0));
    assert_eq!(grid.words()[1].start, Cell::new(0, 1));
    assert_eq!(grid.words()[1].end, Cell::new(2, 1));
}

#[test]
fn from_rows_fails_on_missing_word() {
    assert!(Grid::from_rows(&["коты", "дома", "лесы", "соня"], &["сова"]).is_none());
}

#[test]
fn locate_reads_backwards_and_diagonally() {
    let grid = fixed();
    // Row 0 backwards.
    let tok = grid.locate("ток").unwrap();
    assert_eq!((tok.start, tok.end), (Cell::new(2, 0), Cell::new(0, 0)));
    // Main diagonal: К О С Я.
    let diagonal = grid.locate("кося").unwrap();
    assert_eq!((diagonal.start, diagonal.end), (Cell::new(0, 0), Cell::new(3, 3)));
}

#[test]
fn locate_rejects_too_long_and_empty() {
    let grid = fixed();
    assert!(grid.locate("котятки").is_none());
    assert!(grid.locate("").is_none());
}

#[test]
fn word_between_reads_letters() {
    let grid = fixed();
    assert_eq!(grid.word_between(Cell::new(0, 3), Cell::new(3, 3)).as_deref(), Some("СОНЯ"));
    assert_eq!(grid.word_between(Cell::new(0, 3), Cell::new(0, 0)).as_deref(), Some("СЛДК"));
    assert_eq!(grid.word_between(Cell::new(0, 0), Cell::new(1, 2)), None);
    assert_eq!(grid.word_between(Cell::new(0, 0), Cell::new(4, 0)), None);
}

#[test]
fn placement_between_matches_either_end() {
    let grid = fixed();
    assert_eq!(grid.placement_between(Cell::new(0, 3), Cell::new(2, 3)), Some(2));
    assert_eq!(grid.placement_between(Cell::new(2, 3), Cell::new(0, 3)), Some(2));
    assert_eq!(grid.placement_between(Cell::new(0, 3), Cell::new(3, 3)), None);
}

#[test]
fn letter_out_of_bounds_is_none() {
    let grid = fixed();
    assert_eq!(grid.letter(Cell::new(3, 0)), Some('Ы'));
    assert_eq!(grid.letter(Cell::new(4, 0)), None);
    assert_eq!(grid.letter(Cell::new(0, 4)), None);
}

#[test]
fn placement_cells_follow_the_line() {
    let grid = fixed();
    let cells = grid.words()[2].cells();
    assert_eq!(cells, vec![Cell::new(0, 3), Cell::new(1, 3), Cell::new(2, 3)]);
}

// =============================================================
// Generation
// =============================================================

#[test]
fn generate_fills_every_cell() {
    let grid = Grid::generate(6, &["кот", "лес"], &mut rng());
    assert_eq!(grid.cells().count(), 36);
    assert!(grid.cells().all(|cell| grid.letter(cell).is_some()));
}

#[test]
fn generated_words_read_back_from_their_span() {
    let words = ["сова", "луна", "река", "рыба", "гора"];
    let grid = Grid::generate(8, &words, &mut rng());
    assert!(!grid.words().is_empty());
    for placement in grid.words() {
        let read = grid.word_between(placement.start, placement.end).unwrap();
        assert_eq!(read, placement.word.to_uppercase());
        assert!(words.contains(&placement.word.as_str()));
    }
}

#[test]
fn generate_skips_words_that_cannot_fit() {
    let grid = Grid::generate(3, &["ромашка", "", "кот"], &mut rng());
    assert_eq!(grid.words().len(), 1);
    assert_eq!(grid.words()[0].word, "кот");
}

#[test]
fn generate_skips_repeats() {
    let grid = Grid::generate(6, &["кот", "кот"], &mut rng());
    assert_eq!(grid.words().len(), 1);
}

#[test]
fn generate_skips_repeats_that_differ_only_in_case() {
    for seed in 0..50 {
        let grid = Grid::generate(3, &["кот", "Кот", "КОТ"], &mut SmallRng::seed_from_u64(seed));
        assert_eq!(grid.words().len(), 1, "seed {seed}");
        assert_eq!(grid.words()[0].word, "кот");
    }
}

#[test]
fn generate_is_reproducible_for_a_seed() {
    let a = Grid::generate(7, &["сова", "луна"], &mut rng());
    let b = Grid::generate(7, &["сова", "луна"], &mut rng());
    assert_eq!(a, b);
}
