//! JavaScript entry point: configuration, logging, and one running game.
//!
//! The host page calls `WordSearch.start("board", JSON.stringify(config))`
//! and keeps the returned handle. Dropping the handle (or calling
//! `shutdown`) stops the frame loop and detaches input.

#[cfg(test)]
#[path = "app_test.rs"]
mod app_test;

use std::cell::RefCell;
use std::rc::Rc;

use canvas::engine::Engine;
use canvas::surface::{FrameScheduler, Surface};
use canvas::web::{BrowserEngine, HtmlSurface, browser_engine};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::HtmlCanvasElement;

use crate::board::{Board, Theme, attach};
use crate::config::AppConfig;
use crate::error::AppError;
use crate::games::Catalog;
use crate::grid::Grid;
use crate::locale::{Lang, Locale};
use crate::menu::Menu;
use crate::routes::Route;
use crate::words::{DICTIONARY, grid_with_most_words, grid_with_word_count, random_word_equal, sample_words_equal};

/// Build the board for `config.game_id`.
///
/// Generates `config.candidates` grids and plays the first one that hides
/// exactly `words_per_grid` words, else the fullest.
///
/// # Errors
///
/// - [`AppError::UnknownGame`] if the catalog has no such game.
/// - [`AppError::InvalidConfig`] if the game's words cannot fit the grid.
/// - [`AppError::NoWords`] if the word list has nothing of the game's length.
pub fn new_board<R: Rng + ?Sized>(config: &AppConfig, catalog: &Catalog, rng: &mut R) -> Result<Board, AppError> {
    let game = catalog.get(config.game_id).ok_or(AppError::UnknownGame(config.game_id))?;
    let length = game.words_length;
    if length > config.grid_size {
        return Err(AppError::InvalidConfig(format!(
            "gridSize {} is smaller than game {} word length {length}",
            config.grid_size, game.id
        )));
    }

    let words: Vec<&str> =
        if config.words.is_empty() { DICTIONARY.to_vec() } else { config.words.iter().map(String::as_str).collect() };
    if random_word_equal(&words, length, rng).is_none() {
        return Err(AppError::NoWords(length));
    }

    let grids: Vec<Grid> = (0..config.candidates)
        .map(|_| {
            let picks = sample_words_equal(&words, length, config.words_per_grid, rng);
            Grid::generate(config.grid_size, &picks, rng)
        })
        .collect();
    let grid = grid_with_word_count(&grids, config.words_per_grid)
        .or_else(|| grid_with_most_words(&grids))
        .cloned()
        .ok_or(AppError::NoWords(length))?;

    log::debug!("app: game {} hides {} of {} words", game.id, grid.words().len(), config.words_per_grid);
    Ok(Board::new(grid, Theme::from(game)))
}

/// Bind `engine` to `surface` and wire `board` to it.
///
/// The board is attached after the engine is running, so a failed bind
/// leaves nothing subscribed; it is laid out for the current size by hand
/// since the first `resize` has already gone by. `initialize` has already
/// requested the first frame, but the platform only runs it after `mount`
/// returns, so the board sees every tick.
///
/// # Errors
///
/// Whatever [`Engine::initialize`] reports.
pub fn mount<S: Surface, F: FrameScheduler>(
    engine: &Engine<S, F>,
    surface: S,
    board: Board,
) -> Result<Rc<RefCell<Board>>, AppError> {
    engine.initialize(surface)?;
    let board = Rc::new(RefCell::new(board));
    board.borrow_mut().resize(engine.size());
    attach(engine, &board);
    Ok(board)
}

fn init_logging(config: &AppConfig) -> Result<(), AppError> {
    console_error_panic_hook::set_once();
    let level = config.log_level()?;
    if let Err(err) = console_log::init_with_level(level) {
        log::debug!("app: logger already installed: {err}");
    }
    log::set_max_level(level.to_level_filter());
    Ok(())
}

fn find_canvas(id: &str) -> Result<HtmlCanvasElement, AppError> {
    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| AppError::Dom("no document".to_owned()))?;
    let element = document.get_element_by_id(id).ok_or_else(|| AppError::Dom(format!("no element #{id}")))?;
    element.dyn_into::<HtmlCanvasElement>().map_err(|_| AppError::Dom(format!("#{id} is not a canvas")))
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|err| js_sys::Error::new(&err.to_string()).into())
}

/// A running game, owned by the host page.
#[wasm_bindgen]
pub struct WordSearch {
    engine: BrowserEngine,
    board: Rc<RefCell<Board>>,
    locale: Locale,
    menu: Menu,
}

#[wasm_bindgen]
impl WordSearch {
    /// Start a game on the `<canvas>` whose id is `canvas_id`. `config` is
    /// an `AppConfig` as JSON; blank means defaults.
    ///
    /// # Errors
    ///
    /// A JS `Error` describing the [`AppError`].
    pub fn start(canvas_id: &str, config: &str) -> Result<WordSearch, JsValue> {
        let config = AppConfig::from_json(config)?;
        init_logging(&config)?;

        let canvas = find_canvas(canvas_id)?;
        let mut rng = SmallRng::seed_from_u64(js_sys::Date::now().to_bits());
        let board = new_board(&config, &Catalog::builtin(), &mut rng)?;
        let engine = browser_engine();
        let board = mount(&engine, HtmlSurface::new(canvas), board)?;

        let locale = Locale::new(config.lang);
        log::info!("app: game {} started on #{canvas_id} ({})", config.game_id, config.lang.tag());
        Ok(Self { engine, board, menu: Menu::new(&locale), locale })
    }

    /// Re-measure the canvas, e.g. from a window `resize` listener.
    ///
    /// # Errors
    ///
    /// A JS `Error` if the engine is not running.
    pub fn resize(&self) -> Result<(), JsValue> {
        self.engine.resize().map_err(AppError::from)?;
        Ok(())
    }

    #[wasm_bindgen(js_name = foundWords)]
    pub fn found_words(&self) -> Vec<String> {
        self.board.borrow().found_words().into_iter().map(str::to_owned).collect()
    }

    #[wasm_bindgen(js_name = isComplete)]
    pub fn is_complete(&self) -> bool {
        self.board.borrow().is_complete()
    }

    /// Switch language; unknown tags fall back to Russian.
    #[wasm_bindgen(js_name = setLang)]
    pub fn set_lang(&mut self, tag: &str) {
        self.locale.set_lang(Lang::parse_or_default(tag));
        self.menu.relabel(&self.locale);
    }

    pub fn translate(&self, key: &str) -> String {
        self.locale.get(key).to_owned()
    }

    /// The menu entries and visibility as JSON.
    ///
    /// # Errors
    ///
    /// A JS `Error` if serialization fails.
    #[wasm_bindgen(js_name = menuJson)]
    pub fn menu_json(&self) -> Result<String, JsValue> {
        to_json(&self.menu)
    }

    /// Flip menu visibility and return the new state.
    #[wasm_bindgen(js_name = toggleMenu)]
    pub fn toggle_menu(&mut self) -> bool {
        self.menu.toggle();
        self.menu.is_visible()
    }

    /// Stop the frame loop and detach input. The handle stays usable for
    /// reading results.
    pub fn shutdown(&self) {
        self.engine.shutdown();
    }
}

impl Drop for WordSearch {
    fn drop(&mut self) {
        self.engine.shutdown();
    }
}

/// The built-in game catalog as JSON.
///
/// # Errors
///
/// A JS `Error` if serialization fails.
#[wasm_bindgen(js_name = gameCatalog)]
pub fn game_catalog() -> Result<String, JsValue> {
    to_json(&Catalog::builtin())
}

/// Resolve a URL path to a route, as JSON (`{"name":"game","id":3}`).
///
/// # Errors
///
/// A JS `Error` if serialization fails.
#[wasm_bindgen(js_name = resolveRoute)]
pub fn resolve_route(path: &str) -> Result<String, JsValue> {
    to_json(&Route::parse(path))
}
