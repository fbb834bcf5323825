use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum AdapterError {
    #[error("places library unavailable after {0:?}")]
    LibraryUnavailable(Duration),

    #[error("could not create autocomplete widget: {0}")]
    Widget(String),

    #[error("no document to enhance")]
    NoDocument,
}
