use serde::Serialize;

use crate::dom::{COUNTRY_ATTR, PLACEHOLDER_ATTR, TYPES_ATTR};

/// Constructor options for the vendor widget, serialized in its camelCase shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetOptions {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub included_primary_types: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub included_region_codes: Vec<String>,
    /// Applied as an attribute on the widget, not passed to the constructor.
    #[serde(skip)]
    pub placeholder: Option<String>,
}

impl WidgetOptions {
    /// Reads the configuration attributes of a marked input.
    pub fn from_attributes<F>(attribute: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let included_primary_types = attribute(TYPES_ATTR)
            .map(|raw| split_list(&raw))
            .unwrap_or_default();

        let included_region_codes = attribute(COUNTRY_ATTR)
            .map(|raw| split_list(&raw.to_lowercase()))
            .unwrap_or_default();

        let placeholder = attribute(PLACEHOLDER_ATTR)
            .or_else(|| attribute("placeholder"))
            .filter(|p| !p.trim().is_empty());

        Self {
            included_primary_types,
            included_region_codes,
            placeholder,
        }
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
