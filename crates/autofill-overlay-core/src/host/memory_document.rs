//! Arena-backed DOM for one frame.

use std::collections::{BTreeMap, HashMap, HashSet};

use autofill_overlay_protocols::{
    Document, DomError, ElementId, EventKind, EventTarget, MutationRecord, ReadyState, Rect,
    StyleMap, VisibilityState, WindowId,
};
use parking_lot::Mutex;

#[derive(Debug, Default)]
struct Node {
    tag_name: String,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    attributes: Vec<(String, String)>,
    style: StyleMap,
    computed_style: HashMap<String, String>,
    text: String,
    value: String,
    rect: Option<Rect>,
    content_window: Option<WindowId>,
}

#[derive(Debug)]
struct DocumentState {
    nodes: BTreeMap<ElementId, Node>,
    next_id: u64,
    body: ElementId,
    ready_state: ReadyState,
    visibility_state: VisibilityState,
    has_focus: bool,
    active_element: Option<ElementId>,
    meta: HashMap<String, String>,
    tab_order: Option<Vec<ElementId>>,
    listeners: HashMap<(EventTarget, EventKind), usize>,
    observed: HashSet<ElementId>,
    pending_records: Vec<MutationRecord>,
    focus_calls: Vec<ElementId>,
    blur_calls: Vec<ElementId>,
}

impl DocumentState {
    fn alloc(&mut self, tag_name: &str) -> ElementId {
        let id = ElementId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(
            id,
            Node {
                tag_name: tag_name.to_ascii_lowercase(),
                ..Default::default()
            },
        );
        id
    }

    fn is_connected(&self, element: ElementId) -> bool {
        let mut current = Some(element);
        while let Some(id) = current {
            if id == self.body {
                return true;
            }
            current = self.nodes.get(&id).and_then(|node| node.parent);
        }
        false
    }

    fn detach(&mut self, element: ElementId) {
        let parent = self.nodes.get_mut(&element).and_then(|node| node.parent.take());
        if let Some(parent) = parent.and_then(|id| self.nodes.get_mut(&id)) {
            parent.children.retain(|child| *child != element);
        }
    }

    fn record(&mut self, target: ElementId, attribute_name: &str, old_value: Option<String>) {
        if self.observed.contains(&target) {
            self.pending_records.push(MutationRecord {
                target,
                attribute_name: attribute_name.to_string(),
                old_value,
            });
        }
    }
}

fn serialize_style(style: &StyleMap) -> String {
    style
        .iter()
        .map(|(property, value)| format!("{}: {};", property, value))
        .collect::<Vec<_>>()
        .join(" ")
}

fn parse_style(text: &str) -> StyleMap {
    text.split(';')
        .filter_map(|declaration| {
            let (property, value) = declaration.split_once(':')?;
            let property = property.trim();
            (!property.is_empty()).then(|| (property.to_string(), value.trim().to_string()))
        })
        .collect()
}

/// A single document with a `body` root. Elements outside the body's subtree
/// are detached.
#[derive(Debug)]
pub struct MemoryDocument {
    state: Mutex<DocumentState>,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocument {
    pub fn new() -> Self {
        let mut state = DocumentState {
            nodes: BTreeMap::new(),
            next_id: 1,
            body: ElementId(0),
            ready_state: ReadyState::Complete,
            visibility_state: VisibilityState::Visible,
            has_focus: true,
            active_element: None,
            meta: HashMap::new(),
            tab_order: None,
            listeners: HashMap::new(),
            observed: HashSet::new(),
            pending_records: Vec::new(),
            focus_calls: Vec::new(),
            blur_calls: Vec::new(),
        };
        state.body = state.alloc("body");
        Self {
            state: Mutex::new(state),
        }
    }

    pub fn body(&self) -> ElementId {
        self.state.lock().body
    }

    /// Create an element and append it to `parent`.
    pub fn insert_element(&self, parent: ElementId, tag_name: &str) -> ElementId {
        let mut state = self.state.lock();
        let id = state.alloc(tag_name);
        if let Some(node) = state.nodes.get_mut(&id) {
            node.parent = Some(parent);
        }
        if let Some(parent) = state.nodes.get_mut(&parent) {
            parent.children.push(id);
        }
        id
    }

    /// Append an `<input type=...>` holding `value` to the body.
    pub fn insert_input(&self, input_type: &str, value: &str) -> ElementId {
        let input = self.insert_element(self.body(), "input");
        self.set_attribute(input, "type", input_type);
        self.set_value(input, value);
        input
    }

    /// Append an `<iframe src=...>` hosting `window` to the body.
    pub fn insert_iframe(&self, src: &str, rect: Rect, window: WindowId) -> ElementId {
        let iframe = self.insert_element(self.body(), "iframe");
        self.set_attribute(iframe, "src", src);
        self.set_rect(iframe, rect);
        self.set_content_window(iframe, window);
        iframe
    }

    pub fn set_value(&self, element: ElementId, value: &str) {
        if let Some(node) = self.state.lock().nodes.get_mut(&element) {
            node.value = value.to_string();
        }
    }

    pub fn set_rect(&self, element: ElementId, rect: Rect) {
        if let Some(node) = self.state.lock().nodes.get_mut(&element) {
            node.rect = Some(rect);
        }
    }

    pub fn set_computed_style(&self, element: ElementId, property: &str, value: &str) {
        if let Some(node) = self.state.lock().nodes.get_mut(&element) {
            node.computed_style
                .insert(property.to_string(), value.to_string());
        }
    }

    pub fn set_content_window(&self, iframe: ElementId, window: WindowId) {
        if let Some(node) = self.state.lock().nodes.get_mut(&iframe) {
            node.content_window = Some(window);
        }
    }

    /// Override the tab order. Defaults to connected form controls in creation order.
    pub fn set_tab_order(&self, order: Vec<ElementId>) {
        self.state.lock().tab_order = Some(order);
    }

    pub fn set_meta(&self, name: &str, content: &str) {
        self.state
            .lock()
            .meta
            .insert(name.to_string(), content.to_string());
    }

    pub fn set_ready_state(&self, ready_state: ReadyState) {
        self.state.lock().ready_state = ready_state;
    }

    pub fn set_visibility_state(&self, visibility_state: VisibilityState) {
        self.state.lock().visibility_state = visibility_state;
    }

    pub fn set_has_focus(&self, has_focus: bool) {
        self.state.lock().has_focus = has_focus;
    }

    /// Move focus without recording a `focus()` call.
    pub fn set_active_element(&self, element: Option<ElementId>) {
        self.state.lock().active_element = element;
    }

    pub fn text_content(&self, element: ElementId) -> Option<String> {
        self.state
            .lock()
            .nodes
            .get(&element)
            .map(|node| node.text.clone())
    }

    pub fn children(&self, element: ElementId) -> Vec<ElementId> {
        self.state
            .lock()
            .nodes
            .get(&element)
            .map(|node| node.children.clone())
            .unwrap_or_default()
    }

    /// Drain the attribute mutation records queued for observed elements.
    pub fn take_mutation_records(&self) -> Vec<MutationRecord> {
        std::mem::take(&mut self.state.lock().pending_records)
    }

    pub fn is_observed(&self, element: ElementId) -> bool {
        self.state.lock().observed.contains(&element)
    }

    /// Listeners currently attached to `target`, across all event kinds.
    pub fn listener_count(&self, target: EventTarget) -> usize {
        self.state
            .lock()
            .listeners
            .iter()
            .filter(|((listener_target, _), _)| *listener_target == target)
            .map(|(_, count)| *count)
            .sum()
    }

    pub fn has_listener(&self, target: EventTarget, kind: EventKind) -> bool {
        self.state
            .lock()
            .listeners
            .get(&(target, kind))
            .is_some_and(|count| *count > 0)
    }

    pub fn total_listener_count(&self) -> usize {
        self.state.lock().listeners.values().sum()
    }

    pub fn focus_calls(&self) -> Vec<ElementId> {
        self.state.lock().focus_calls.clone()
    }

    pub fn blur_calls(&self) -> Vec<ElementId> {
        self.state.lock().blur_calls.clone()
    }
}

impl Document for MemoryDocument {
    fn ready_state(&self) -> ReadyState {
        self.state.lock().ready_state
    }

    fn visibility_state(&self) -> VisibilityState {
        self.state.lock().visibility_state
    }

    fn has_focus(&self) -> bool {
        self.state.lock().has_focus
    }

    fn create_element(&self, tag_name: &str) -> ElementId {
        self.state.lock().alloc(tag_name)
    }

    fn append_child(&self, parent: ElementId, child: ElementId) -> Result<(), DomError> {
        let mut state = self.state.lock();
        if !state.nodes.contains_key(&parent) {
            return Err(DomError::ElementNotFound(parent));
        }
        if !state.nodes.contains_key(&child) {
            return Err(DomError::ElementNotFound(child));
        }
        let mut ancestor = Some(parent);
        while let Some(id) = ancestor {
            if id == child {
                return Err(DomError::InvalidParent(parent));
            }
            ancestor = state.nodes.get(&id).and_then(|node| node.parent);
        }

        state.detach(child);
        if let Some(node) = state.nodes.get_mut(&child) {
            node.parent = Some(parent);
        }
        if let Some(node) = state.nodes.get_mut(&parent) {
            node.children.push(child);
        }
        Ok(())
    }

    fn remove_element(&self, element: ElementId) {
        self.state.lock().detach(element);
    }

    fn is_connected(&self, element: ElementId) -> bool {
        self.state.lock().is_connected(element)
    }

    fn tag_name(&self, element: ElementId) -> Option<String> {
        self.state
            .lock()
            .nodes
            .get(&element)
            .map(|node| node.tag_name.clone())
    }

    fn attributes(&self, element: ElementId) -> Vec<(String, String)> {
        let state = self.state.lock();
        let Some(node) = state.nodes.get(&element) else {
            return Vec::new();
        };
        let mut attributes = node.attributes.clone();
        if !node.style.is_empty() {
            attributes.push(("style".to_string(), serialize_style(&node.style)));
        }
        attributes
    }

    fn get_attribute(&self, element: ElementId, name: &str) -> Option<String> {
        let state = self.state.lock();
        let node = state.nodes.get(&element)?;
        if name == "style" {
            return (!node.style.is_empty()).then(|| serialize_style(&node.style));
        }
        node.attributes
            .iter()
            .find(|(attribute, _)| attribute == name)
            .map(|(_, value)| value.clone())
    }

    fn set_attribute(&self, element: ElementId, name: &str, value: &str) {
        let mut state = self.state.lock();
        let Some(node) = state.nodes.get_mut(&element) else {
            return;
        };
        let old_value = if name == "style" {
            let old = serialize_style(&node.style);
            node.style = parse_style(value);
            Some(old)
        } else {
            match node.attributes.iter_mut().find(|(attribute, _)| attribute == name) {
                Some((_, existing)) => Some(std::mem::replace(existing, value.to_string())),
                None => {
                    node.attributes.push((name.to_string(), value.to_string()));
                    None
                }
            }
        };
        state.record(element, name, old_value);
    }

    fn remove_attribute(&self, element: ElementId, name: &str) {
        let mut state = self.state.lock();
        let Some(node) = state.nodes.get_mut(&element) else {
            return;
        };
        let old_value = if name == "style" {
            if node.style.is_empty() {
                return;
            }
            let old = serialize_style(&node.style);
            node.style.clear();
            old
        } else {
            let Some(index) = node.attributes.iter().position(|(attribute, _)| attribute == name)
            else {
                return;
            };
            node.attributes.remove(index).1
        };
        state.record(element, name, Some(old_value));
    }

    fn set_style_property(&self, element: ElementId, property: &str, value: &str, _important: bool) {
        let mut state = self.state.lock();
        let Some(node) = state.nodes.get_mut(&element) else {
            return;
        };
        let old_value = serialize_style(&node.style);
        node.style.insert(property.to_string(), value.to_string());
        state.record(element, "style", Some(old_value));
    }

    fn inline_style(&self, element: ElementId) -> StyleMap {
        self.state
            .lock()
            .nodes
            .get(&element)
            .map(|node| node.style.clone())
            .unwrap_or_default()
    }

    fn computed_style_property(&self, element: ElementId, property: &str) -> Option<String> {
        let state = self.state.lock();
        let node = state.nodes.get(&element)?;
        node.computed_style
            .get(property)
            .or_else(|| node.style.get(property))
            .cloned()
    }

    fn bounding_client_rect(&self, element: ElementId) -> Option<Rect> {
        let state = self.state.lock();
        if !state.is_connected(element) {
            return None;
        }
        state
            .nodes
            .get(&element)
            .map(|node| node.rect.unwrap_or_default())
    }

    fn set_text_content(&self, element: ElementId, text: &str) {
        if let Some(node) = self.state.lock().nodes.get_mut(&element) {
            node.text = text.to_string();
        }
    }

    fn value(&self, element: ElementId) -> String {
        self.state
            .lock()
            .nodes
            .get(&element)
            .map(|node| node.value.clone())
            .unwrap_or_default()
    }

    fn input_type(&self, element: ElementId) -> Option<String> {
        let state = self.state.lock();
        let node = state.nodes.get(&element)?;
        if node.tag_name != "input" {
            return None;
        }
        let input_type = node
            .attributes
            .iter()
            .find(|(attribute, _)| attribute == "type")
            .map(|(_, value)| value.to_ascii_lowercase())
            .unwrap_or_else(|| "text".to_string());
        Some(input_type)
    }

    fn is_active_element(&self, element: ElementId) -> bool {
        self.state.lock().active_element == Some(element)
    }

    fn focus(&self, element: ElementId) {
        let mut state = self.state.lock();
        if !state.is_connected(element) {
            return;
        }
        state.focus_calls.push(element);
        state.active_element = Some(element);
    }

    fn blur(&self, element: ElementId) {
        let mut state = self.state.lock();
        state.blur_calls.push(element);
        if state.active_element == Some(element) {
            state.active_element = None;
        }
    }

    fn iframes(&self) -> Vec<ElementId> {
        let state = self.state.lock();
        state
            .nodes
            .iter()
            .filter(|(id, node)| node.tag_name == "iframe" && state.is_connected(**id))
            .map(|(id, _)| *id)
            .collect()
    }

    fn content_window(&self, iframe: ElementId) -> Option<WindowId> {
        self.state
            .lock()
            .nodes
            .get(&iframe)
            .and_then(|node| node.content_window)
    }

    fn meta_content(&self, name: &str) -> Option<String> {
        self.state.lock().meta.get(name).cloned()
    }

    fn tabbable_elements(&self) -> Vec<ElementId> {
        let state = self.state.lock();
        if let Some(order) = &state.tab_order {
            return order
                .iter()
                .copied()
                .filter(|id| state.is_connected(*id))
                .collect();
        }
        state
            .nodes
            .iter()
            .filter(|(id, node)| {
                matches!(
                    node.tag_name.as_str(),
                    "input" | "select" | "textarea" | "button" | "a"
                ) && state.is_connected(**id)
            })
            .map(|(id, _)| *id)
            .collect()
    }

    fn add_event_listener(&self, target: EventTarget, kind: EventKind) {
        *self.state.lock().listeners.entry((target, kind)).or_default() += 1;
    }

    fn remove_event_listener(&self, target: EventTarget, kind: EventKind) {
        let mut state = self.state.lock();
        if let Some(count) = state.listeners.get_mut(&(target, kind)) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                state.listeners.remove(&(target, kind));
            }
        }
    }

    fn observe_attributes(&self, element: ElementId) {
        self.state.lock().observed.insert(element);
    }

    fn disconnect_observer(&self, element: ElementId) {
        let mut state = self.state.lock();
        state.observed.remove(&element);
        state
            .pending_records
            .retain(|record| record.target != element);
    }
}

#[cfg(test)]
#[path = "memory_document_tests.rs"]
mod tests;
