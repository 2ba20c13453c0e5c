//! Failures at the wasm boundary: mounting into the page and parsing options.
//!
//! Gameplay rejections (sealing into an occupied slot, running out of energy)
//! are not errors in this sense; see [`crate::placement::Rejection`].

use thiserror::Error;
use wasm_bindgen::{JsError, JsValue};

#[derive(Debug, Error)]
pub enum Error {
    #[error("no window")]
    NoWindow,
    #[error("no document")]
    NoDocument,
    #[error("no element with id '{0}'")]
    MissingRoot(String),
    #[error("dom operation failed: {0}")]
    Dom(String),
    #[error("invalid options: {0}")]
    InvalidConfig(String),
    #[cfg(feature = "serde_json")]
    #[error("malformed options json: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<JsValue> for Error {
    fn from(value: JsValue) -> Self {
        Error::Dom(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

pub(crate) fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsError::new(&err.to_string()).into()
}
