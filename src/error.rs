//! Errors surfaced to the JavaScript host.

use canvas::error::EngineError;
use wasm_bindgen::JsValue;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Engine(#[from] EngineError),
    /// The configuration JSON did not parse.
    #[error("invalid config: {0}")]
    Config(#[from] serde_json::Error),
    /// The configuration parsed but a value is out of range.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("unknown game {0}")]
    UnknownGame(u32),
    #[error("no words of length {0}")]
    NoWords(usize),
    /// A DOM lookup or cast failed.
    #[error("dom: {0}")]
    Dom(String),
}

impl From<AppError> for JsValue {
    fn from(err: AppError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}
