//! In-memory document used by the adapter tests.

use std::cell::RefCell;
use std::collections::BTreeMap;

use crate::adapter::submit_on_enter;
use crate::dom::{Dom, SELECTED_EVENT};
use crate::error::AdapterError;
use crate::options::WidgetOptions;
use crate::place::SelectionPayload;

#[derive(Debug, Default)]
struct Node {
    tag: &'static str,
    attrs: BTreeMap<String, String>,
    value: String,
    hidden: bool,
    form: Option<usize>,
    inserted_before: Option<usize>,
    widget_options: Option<WidgetOptions>,
    events: Vec<String>,
    selected_detail: Option<SelectionPayload>,
    enter_listeners: usize,
    submissions: usize,
}

#[derive(Debug, Default)]
pub struct FakeDom {
    nodes: RefCell<Vec<Node>>,
    fail_widgets: bool,
}

impl FakeDom {
    pub fn failing_widgets() -> Self {
        Self {
            fail_widgets: true,
            ..Self::default()
        }
    }

    fn push(&self, node: Node) -> usize {
        let mut nodes = self.nodes.borrow_mut();
        nodes.push(node);
        nodes.len() - 1
    }

    pub fn form(&self) -> usize {
        self.push(Node {
            tag: "form",
            ..Node::default()
        })
    }

    pub fn input(&self, form: Option<usize>, attrs: &[(&str, &str)]) -> usize {
        self.push(Node {
            tag: "input",
            attrs: attrs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            form,
            ..Node::default()
        })
    }

    pub fn attr(&self, id: usize, name: &str) -> Option<String> {
        self.nodes.borrow()[id].attrs.get(name).cloned()
    }

    pub fn value(&self, id: usize) -> String {
        self.nodes.borrow()[id].value.clone()
    }

    pub fn is_hidden(&self, id: usize) -> bool {
        self.nodes.borrow()[id].hidden
    }

    pub fn form_of(&self, id: usize) -> Option<usize> {
        self.nodes.borrow()[id].form
    }

    pub fn inserted_before(&self, id: usize) -> Option<usize> {
        self.nodes.borrow()[id].inserted_before
    }

    pub fn widget_options(&self, id: usize) -> WidgetOptions {
        self.nodes.borrow()[id]
            .widget_options
            .clone()
            .unwrap_or_default()
    }

    pub fn widget_count(&self) -> usize {
        self.nodes
            .borrow()
            .iter()
            .filter(|n| n.widget_options.is_some())
            .count()
    }

    pub fn events(&self, id: usize) -> Vec<String> {
        self.nodes.borrow()[id].events.clone()
    }

    pub fn selected_detail(&self, id: usize) -> Option<SelectionPayload> {
        self.nodes.borrow()[id].selected_detail.clone()
    }

    pub fn submissions(&self, form: usize) -> usize {
        self.nodes.borrow()[form].submissions
    }

    /// Delivers a keydown to every listener installed on `form`.
    pub fn press_key(&self, form: usize, key: &str, inside_widget: bool) {
        let listeners = self.nodes.borrow()[form].enter_listeners;
        for _ in 0..listeners {
            submit_on_enter(self, &form, key, inside_widget);
        }
    }

    fn find(&self, predicate: impl Fn(&Node) -> bool) -> Option<usize> {
        self.nodes.borrow().iter().position(predicate)
    }
}

impl Dom for FakeDom {
    type Element = usize;

    fn marked_inputs(&self) -> Vec<usize> {
        self.nodes
            .borrow()
            .iter()
            .enumerate()
            .filter(|(_, n)| n.tag == "input")
            .filter(|(_, n)| {
                n.attrs.get("data-places").map(String::as_str) == Some("1")
                    || n.attrs
                        .get("class")
                        .is_some_and(|c| c.split_whitespace().any(|c| c == "js-places"))
            })
            .map(|(id, _)| id)
            .collect()
    }

    fn attribute(&self, element: &usize, name: &str) -> Option<String> {
        self.attr(*element, name)
    }

    fn set_attribute(&self, element: &usize, name: &str, value: &str) {
        self.nodes.borrow_mut()[*element]
            .attrs
            .insert(name.to_string(), value.to_string());
    }

    fn set_value(&self, element: &usize, value: &str) {
        self.nodes.borrow_mut()[*element].value = value.to_string();
    }

    fn create_widget(&self, options: &WidgetOptions) -> Result<usize, AdapterError> {
        if self.fail_widgets {
            return Err(AdapterError::Widget("constructor missing".to_string()));
        }
        Ok(self.push(Node {
            tag: "gmp-place-autocomplete",
            widget_options: Some(options.clone()),
            ..Node::default()
        }))
    }

    fn insert_before(&self, node: &usize, reference: &usize) {
        let mut nodes = self.nodes.borrow_mut();
        let form = nodes[*reference].form;
        nodes[*node].inserted_before = Some(*reference);
        nodes[*node].form = form;
    }

    fn hide(&self, element: &usize) {
        self.nodes.borrow_mut()[*element].hidden = true;
    }

    fn query_selector(&self, selector: &str) -> Option<usize> {
        if let Some(id) = selector.strip_prefix('#') {
            return self.find(|n| n.attrs.get("id").map(String::as_str) == Some(id));
        }
        let name = selector
            .strip_prefix("[name=\"")
            .and_then(|rest| rest.strip_suffix("\"]"))?;
        self.find(|n| n.attrs.get("name").map(String::as_str) == Some(name))
    }

    fn enclosing_form(&self, element: &usize) -> Option<usize> {
        self.form_of(*element)
    }

    fn listen_for_enter(&self, form: &usize) {
        self.nodes.borrow_mut()[*form].enter_listeners += 1;
    }

    fn dispatch_selected(&self, element: &usize, payload: &SelectionPayload) {
        let mut nodes = self.nodes.borrow_mut();
        nodes[*element].events.push(SELECTED_EVENT.to_string());
        nodes[*element].selected_detail = Some(payload.clone());
    }

    fn dispatch_change(&self, element: &usize) {
        self.nodes.borrow_mut()[*element]
            .events
            .push("change".to_string());
    }

    fn request_submit(&self, form: &usize) {
        self.nodes.borrow_mut()[*form].submissions += 1;
    }
}
