use crate::dom::{
    Dom, ENHANCED_ATTR, TARGET_LAT_ATTR, TARGET_LNG_ATTR, TARGET_NAME_ATTR, TARGET_PLACE_ID_ATTR,
};
use crate::error::AdapterError;
use crate::options::WidgetOptions;
use crate::place::{Place, SelectionPayload};

/// Page-wide adapter state: which forms already carry the Enter listener.
#[derive(Debug)]
pub struct PageContext<E> {
    enter_forms: Vec<E>,
}

impl<E> Default for PageContext<E> {
    fn default() -> Self {
        Self {
            enter_forms: Vec::new(),
        }
    }
}

impl<E: PartialEq> PageContext<E> {
    /// Records `form`; false if it was already registered.
    pub fn register_form(&mut self, form: E) -> bool {
        if self.enter_forms.contains(&form) {
            return false;
        }
        self.enter_forms.push(form);
        true
    }

    pub fn registered_forms(&self) -> usize {
        self.enter_forms.len()
    }
}

/// An original input paired with the widget now standing in for it.
#[derive(Debug, Clone, PartialEq)]
pub struct Enhanced<E> {
    pub original: E,
    pub widget: E,
}

pub struct Adapter<D: Dom> {
    dom: D,
    context: PageContext<D::Element>,
}

impl<D: Dom> Adapter<D> {
    pub fn new(dom: D) -> Self {
        Self {
            dom,
            context: PageContext::default(),
        }
    }

    pub fn dom(&self) -> &D {
        &self.dom
    }

    pub fn context(&self) -> &PageContext<D::Element> {
        &self.context
    }

    /// Enhances every marked input on the page. Inputs that fail are left
    /// untouched and reported alongside the successes.
    pub fn enhance_all(&mut self) -> (Vec<Enhanced<D::Element>>, Vec<AdapterError>) {
        let mut enhanced = Vec::new();
        let mut failures = Vec::new();

        for input in self.dom.marked_inputs() {
            match self.enhance(&input) {
                Ok(Some(done)) => enhanced.push(done),
                Ok(None) => {}
                Err(e) => failures.push(e),
            }
        }

        (enhanced, failures)
    }

    /// Replaces one input with a widget. Returns `None` if it was already enhanced.
    pub fn enhance(
        &mut self,
        input: &D::Element,
    ) -> Result<Option<Enhanced<D::Element>>, AdapterError> {
        if self.dom.attribute(input, ENHANCED_ATTR).is_some() {
            return Ok(None);
        }

        let options = WidgetOptions::from_attributes(|name| self.dom.attribute(input, name));
        let widget = self.dom.create_widget(&options)?;

        if let Some(placeholder) = &options.placeholder {
            self.dom.set_attribute(&widget, "placeholder", placeholder);
        }
        if let Some(class) = self.dom.attribute(input, "class") {
            self.dom.set_attribute(&widget, "class", &class);
        }
        if let Some(id) = self.dom.attribute(input, "id").filter(|id| !id.is_empty()) {
            self.dom
                .set_attribute(&widget, "id", &format!("{id}-autocomplete"));
        }

        self.dom.insert_before(&widget, input);
        self.dom.hide(input);
        self.dom.set_attribute(input, ENHANCED_ATTR, "1");

        if let Some(form) = self.dom.enclosing_form(input) {
            if self.context.register_form(form.clone()) {
                self.dom.listen_for_enter(&form);
            }
        }

        Ok(Some(Enhanced {
            original: input.clone(),
            widget,
        }))
    }
}

/// Mirrors text typed into the widget back into the hidden original.
pub fn sync_text<D: Dom>(dom: &D, original: &D::Element, text: &str) {
    dom.set_value(original, text);
}

/// Writes a selected place into the original input and its mirror targets,
/// then announces it with `places:selected` and a synthetic `change`.
pub fn apply_selection<D: Dom>(dom: &D, original: &D::Element, place: Place) -> SelectionPayload {
    dom.set_value(original, place.display_text());

    let payload = SelectionPayload::from(place);
    let mirrors = [
        (TARGET_PLACE_ID_ATTR, payload.place.id.clone()),
        (TARGET_LAT_ATTR, payload.lat.map(|v| v.to_string())),
        (TARGET_LNG_ATTR, payload.lng.map(|v| v.to_string())),
        (TARGET_NAME_ATTR, payload.place.display_name.clone()),
    ];

    for (attr, value) in mirrors {
        let Some(selector) = dom.attribute(original, attr) else {
            continue;
        };
        if let Some(target) = resolve_target(dom, &selector) {
            dom.set_value(&target, value.as_deref().unwrap_or_default());
        }
    }

    dom.dispatch_selected(original, &payload);
    dom.dispatch_change(original);
    payload
}

/// Submits `form` for an Enter press that originated inside a widget.
/// Returns whether a submission was requested.
pub fn submit_on_enter<D: Dom>(dom: &D, form: &D::Element, key: &str, inside_widget: bool) -> bool {
    if key != "Enter" || !inside_widget {
        return false;
    }
    dom.request_submit(form);
    true
}

/// A target reference is tried as a CSS selector first, then as a `name`.
fn resolve_target<D: Dom>(dom: &D, reference: &str) -> Option<D::Element> {
    let reference = reference.trim();
    if reference.is_empty() {
        return None;
    }
    dom.query_selector(reference).or_else(|| {
        let escaped = reference.replace('\\', "\\\\").replace('"', "\\\"");
        dom.query_selector(&format!("[name=\"{escaped}\"]"))
    })
}
