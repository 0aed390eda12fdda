//! Error types for the engine and its drawing primitives.

use wasm_bindgen::JsValue;

/// Failures of the engine lifecycle and its platform bindings.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The surface could not provide a 2D drawing context.
    #[error("failed to derive 2d drawing context: {0}")]
    Context(String),
    /// `initialize` was called on an engine that is already running.
    #[error("engine is already initialized")]
    AlreadyInitialized,
    /// An operation that needs a bound surface ran before `initialize`.
    #[error("engine is not initialized")]
    NotInitialized,
    /// The engine was shut down and cannot be bound again.
    #[error("engine has been shut down")]
    Stopped,
    /// Registering an input listener on the surface failed.
    #[error("failed to attach input listener: {0}")]
    Listener(String),
    /// The platform refused to schedule the next frame.
    #[error("failed to schedule next frame: {0}")]
    Schedule(String),
    /// A drawing primitive failed.
    #[error(transparent)]
    Draw(#[from] DrawError),
}

/// A drawing call rejected by the underlying context.
#[derive(Debug, thiserror::Error)]
#[error("draw call failed: {0}")]
pub struct DrawError(pub String);

/// Render a JS exception as text for error messages.
#[must_use]
pub fn describe_js(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

impl From<JsValue> for DrawError {
    fn from(value: JsValue) -> Self {
        Self(describe_js(&value))
    }
}
