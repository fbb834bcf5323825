//! Progressive enhancement of plain text inputs into a vendor place-autocomplete widget.
//!
//! The adapter logic is written against the [`Dom`] trait so it runs (and is tested)
//! natively; the `web` module supplies the browser implementation for wasm32 builds.

mod adapter;
mod dom;
mod error;
mod options;
mod place;
mod ready;

#[cfg(test)]
mod testing;

#[cfg(target_arch = "wasm32")]
mod web;

pub use adapter::{apply_selection, submit_on_enter, sync_text, Adapter, Enhanced, PageContext};
pub use dom::{Dom, MARKED_INPUT_SELECTOR, SELECTED_EVENT};
pub use error::AdapterError;
pub use options::WidgetOptions;
pub use place::{LatLng, Place, SelectionPayload};
pub use ready::{wait_until_ready, ReadyPolicy, MIN_POLL_INTERVAL};
