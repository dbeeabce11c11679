//! DOMバインディング

mod host;
mod identify;
mod listener;

pub use host::ShellHost;
pub use identify::IdentifyBinding;

use soil_search_common::{Error, Result};
use wasm_bindgen::JsCast;
use web_sys::Document;

/// IDで要素を引き、期待する型にキャストする
pub(crate) fn by_id<T: JsCast>(document: &Document, id: &str) -> Result<T> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| Error::Config(format!("#{} not found", id)))?
        .dyn_into::<T>()
        .map_err(|_| Error::Config(format!("#{} has an unexpected element type", id)))
}

pub(crate) fn document() -> Result<Document> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| Error::Config("document is not available".into()))
}
