use std::fmt::Debug;

use crate::error::AdapterError;
use crate::options::WidgetOptions;
use crate::place::SelectionPayload;

/// Inputs the adapter picks up.
pub const MARKED_INPUT_SELECTOR: &str = r#"input[data-places="1"], input.js-places"#;

pub const ENHANCED_ATTR: &str = "data-places-enhanced";
pub const TYPES_ATTR: &str = "data-types";
pub const COUNTRY_ATTR: &str = "data-country";
pub const PLACEHOLDER_ATTR: &str = "data-placeholder";

pub const TARGET_PLACE_ID_ATTR: &str = "data-target-place-id";
pub const TARGET_LAT_ATTR: &str = "data-target-lat";
pub const TARGET_LNG_ATTR: &str = "data-target-lng";
pub const TARGET_NAME_ATTR: &str = "data-target-name";

pub const SELECTED_EVENT: &str = "places:selected";

/// The slice of the document the adapter touches.
///
/// Writes are infallible from the adapter's point of view: an implementation
/// that cannot perform one (detached node, read-only attribute) skips it.
pub trait Dom {
    type Element: Clone + PartialEq + Debug;

    /// Inputs matching [`MARKED_INPUT_SELECTOR`], in document order.
    fn marked_inputs(&self) -> Vec<Self::Element>;

    fn attribute(&self, element: &Self::Element, name: &str) -> Option<String>;

    fn set_attribute(&self, element: &Self::Element, name: &str, value: &str);

    fn set_value(&self, element: &Self::Element, value: &str);

    /// Constructs a detached vendor widget configured with `options`.
    fn create_widget(&self, options: &WidgetOptions) -> Result<Self::Element, AdapterError>;

    fn insert_before(&self, node: &Self::Element, reference: &Self::Element);

    fn hide(&self, element: &Self::Element);

    /// First element matching a CSS selector. Invalid selectors match nothing.
    fn query_selector(&self, selector: &str) -> Option<Self::Element>;

    fn enclosing_form(&self, element: &Self::Element) -> Option<Self::Element>;

    /// Installs a keydown listener on `form` that routes Enter presses from
    /// inside a widget to [`crate::submit_on_enter`].
    fn listen_for_enter(&self, form: &Self::Element);

    fn dispatch_selected(&self, element: &Self::Element, payload: &SelectionPayload);

    /// Fires a bubbling `change` event.
    fn dispatch_change(&self, element: &Self::Element);

    fn request_submit(&self, form: &Self::Element);
}
