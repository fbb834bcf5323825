use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// Place fields fetched after a selection: `id`, `displayName`,
/// `formattedAddress`, `location`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub location: Option<LatLng>,
}

impl Place {
    /// Text written back into the original input.
    pub fn display_text(&self) -> &str {
        self.formatted_address
            .as_deref()
            .or(self.display_name.as_deref())
            .unwrap_or_default()
    }
}

/// Detail of the `places:selected` event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionPayload {
    pub place: Place,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

impl From<Place> for SelectionPayload {
    fn from(place: Place) -> Self {
        let (lat, lng) = match place.location {
            Some(LatLng { lat, lng }) => (Some(lat), Some(lng)),
            None => (None, None),
        };
        Self { place, lat, lng }
    }
}
