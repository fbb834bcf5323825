//! Browser bindings: `WebDom` over `web-sys`, and the module entry point that
//! waits for the vendor library and enhances the page.

use std::time::Duration;

use js_sys::{Array, Function, Object, Promise, Reflect, JSON};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{
    console, CustomEvent, CustomEventInit, Document, Element, Event, EventInit, HtmlElement,
    HtmlFormElement, HtmlInputElement, KeyboardEvent,
};

use crate::adapter::{apply_selection, submit_on_enter, sync_text, Adapter, Enhanced};
use crate::dom::{Dom, MARKED_INPUT_SELECTOR, SELECTED_EVENT};
use crate::error::AdapterError;
use crate::options::WidgetOptions;
use crate::place::{Place, SelectionPayload};
use crate::ready::{wait_until_ready, ReadyPolicy};

const WIDGET_TAG: &str = "GMP-PLACE-AUTOCOMPLETE";
const PLACE_FIELDS: [&str; 4] = ["id", "displayName", "formattedAddress", "location"];

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    spawn_local(async {
        if let Err(e) = run().await {
            console::warn_1(&format!("places autocomplete disabled: {e}").into());
        }
    });
    Ok(())
}

async fn run() -> Result<(), AdapterError> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or(AdapterError::NoDocument)?;

    wait_until_ready(|| widget_constructor().is_some(), sleep, ReadyPolicy::default()).await?;

    let dom = WebDom::new(document);
    let mut adapter = Adapter::new(dom.clone());
    let (enhanced, failures) = adapter.enhance_all();
    for e in failures {
        console::warn_1(&format!("places autocomplete: {e}").into());
    }
    for pair in enhanced {
        wire_widget(&dom, pair);
    }
    Ok(())
}

/// `google.maps.places.PlaceAutocompleteElement`, once the loader has defined it.
fn widget_constructor() -> Option<Function> {
    let mut current: JsValue = js_sys::global().into();
    for key in ["google", "maps", "places", "PlaceAutocompleteElement"] {
        current = Reflect::get(&current, &JsValue::from_str(key)).ok()?;
        if current.is_undefined() || current.is_null() {
            return None;
        }
    }
    current.dyn_into::<Function>().ok()
}

async fn sleep(duration: Duration) {
    let millis = i32::try_from(duration.as_millis()).unwrap_or(i32::MAX);
    let promise = Promise::new(&mut |resolve, _| {
        if let Some(window) = web_sys::window() {
            let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, millis);
        }
    });
    let _ = JsFuture::from(promise).await;
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    let json = serde_json::to_string(value).map_err(|e| JsValue::from_str(&e.to_string()))?;
    JSON::parse(&json)
}

fn wire_widget(dom: &WebDom, pair: Enhanced<Element>) {
    let Enhanced { original, widget } = pair;

    for event_name in ["input", "change"] {
        let dom = dom.clone();
        let original = original.clone();
        let on_text = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            // Text events come from the input inside the widget's shadow root.
            let text = event
                .composed_path()
                .get(0)
                .dyn_into::<HtmlInputElement>()
                .map(|input| input.value());
            if let Ok(text) = text {
                sync_text(&dom, &original, &text);
            }
        });
        let _ = widget.add_event_listener_with_callback(event_name, on_text.as_ref().unchecked_ref());
        on_text.forget();
    }

    let dom = dom.clone();
    let on_select = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
        let dom = dom.clone();
        let original = original.clone();
        spawn_local(async move {
            match fetch_place(&event).await {
                Ok(place) => {
                    apply_selection(&dom, &original, place);
                }
                Err(e) => console::warn_1(&e),
            }
        });
    });
    let _ = widget.add_event_listener_with_callback("gmp-select", on_select.as_ref().unchecked_ref());
    on_select.forget();
}

/// Resolves the event's prediction into a place with the mirrored fields loaded.
async fn fetch_place(event: &Event) -> Result<Place, JsValue> {
    let prediction = Reflect::get(event, &"placePrediction".into())?;
    let to_place: Function = Reflect::get(&prediction, &"toPlace".into())?.dyn_into()?;
    let place = to_place.call0(&prediction)?;

    let request = Object::new();
    let fields: Array = PLACE_FIELDS.iter().map(|f| JsValue::from_str(f)).collect();
    Reflect::set(&request, &"fields".into(), &fields)?;
    let fetch_fields: Function = Reflect::get(&place, &"fetchFields".into())?.dyn_into()?;
    let pending: Promise = fetch_fields.call1(&place, &request)?.dyn_into()?;
    JsFuture::from(pending).await?;

    let json = String::from(JSON::stringify(&place)?);
    serde_json::from_str(&json).map_err(|e| JsValue::from_str(&e.to_string()))
}

#[derive(Clone)]
pub struct WebDom {
    document: Document,
}

impl WebDom {
    pub fn new(document: Document) -> Self {
        Self { document }
    }
}

impl Dom for WebDom {
    type Element = Element;

    fn marked_inputs(&self) -> Vec<Element> {
        let Ok(list) = self.document.query_selector_all(MARKED_INPUT_SELECTOR) else {
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    fn attribute(&self, element: &Element, name: &str) -> Option<String> {
        element.get_attribute(name)
    }

    fn set_attribute(&self, element: &Element, name: &str, value: &str) {
        let _ = element.set_attribute(name, value);
    }

    fn set_value(&self, element: &Element, value: &str) {
        match element.dyn_ref::<HtmlInputElement>() {
            Some(input) => input.set_value(value),
            None => self.set_attribute(element, "value", value),
        }
    }

    fn create_widget(&self, options: &WidgetOptions) -> Result<Element, AdapterError> {
        let constructor = widget_constructor()
            .ok_or_else(|| AdapterError::Widget("constructor not loaded".to_string()))?;
        let args = to_js(options)
            .map(|options| Array::of1(&options))
            .map_err(|e| AdapterError::Widget(format!("{e:?}")))?;
        Reflect::construct(&constructor, &args)
            .and_then(|widget| widget.dyn_into::<Element>())
            .map_err(|e| AdapterError::Widget(format!("{e:?}")))
    }

    fn insert_before(&self, node: &Element, reference: &Element) {
        if let Some(parent) = reference.parent_node() {
            let _ = parent.insert_before(node, Some(reference));
        }
    }

    fn hide(&self, element: &Element) {
        if let Some(element) = element.dyn_ref::<HtmlElement>() {
            let _ = element.style().set_property("display", "none");
        }
    }

    fn query_selector(&self, selector: &str) -> Option<Element> {
        self.document.query_selector(selector).ok().flatten()
    }

    fn enclosing_form(&self, element: &Element) -> Option<Element> {
        element.closest("form").ok().flatten()
    }

    fn listen_for_enter(&self, form: &Element) {
        let dom = self.clone();
        let target = form.clone();
        let on_keydown = Closure::<dyn FnMut(KeyboardEvent)>::new(move |event: KeyboardEvent| {
            let inside_widget = event
                .composed_path()
                .iter()
                .filter_map(|node| node.dyn_into::<Element>().ok())
                .any(|element| element.tag_name() == WIDGET_TAG);
            if submit_on_enter(&dom, &target, &event.key(), inside_widget) {
                event.prevent_default();
            }
        });
        let _ = form.add_event_listener_with_callback("keydown", on_keydown.as_ref().unchecked_ref());
        on_keydown.forget();
    }

    fn dispatch_selected(&self, element: &Element, payload: &SelectionPayload) {
        let Ok(detail) = to_js(payload) else {
            return;
        };
        let init = CustomEventInit::new();
        init.set_bubbles(true);
        init.set_detail(&detail);
        if let Ok(event) = CustomEvent::new_with_event_init_dict(SELECTED_EVENT, &init) {
            let _ = element.dispatch_event(&event);
        }
    }

    fn dispatch_change(&self, element: &Element) {
        let init = EventInit::new();
        init.set_bubbles(true);
        if let Ok(event) = Event::new_with_event_init_dict("change", &init) {
            let _ = element.dispatch_event(&event);
        }
    }

    fn request_submit(&self, form: &Element) {
        if let Some(form) = form.dyn_ref::<HtmlFormElement>() {
            let _ = form.request_submit();
        }
    }
}
