//! DOM handles, events and mutation records.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque handle to an element owned by a host document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(pub u64);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "element#{}", self.0)
    }
}

/// Opaque handle to a browsing context (the `contentWindow` of an iframe).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WindowId(pub u64);

/// Something a listener can be attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventTarget {
    Element(ElementId),
    Document,
    Window,
}

/// DOM events the overlay listens for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventKind {
    Focus,
    Blur,
    Input,
    Click,
    Keyup,
    FocusOut,
    Scroll,
    Resize,
    VisibilityChange,
    DomContentLoaded,
    Message,
    Load,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Focus => "focus",
            EventKind::Blur => "blur",
            EventKind::Input => "input",
            EventKind::Click => "click",
            EventKind::Keyup => "keyup",
            EventKind::FocusOut => "focusout",
            EventKind::Scroll => "scroll",
            EventKind::Resize => "resize",
            EventKind::VisibilityChange => "visibilitychange",
            EventKind::DomContentLoaded => "DOMContentLoaded",
            EventKind::Message => "message",
            EventKind::Load => "load",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `KeyboardEvent.code` values the field keyup handler reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyCode {
    Escape,
    Enter,
    ArrowDown,
    Other(String),
}

impl From<&str> for KeyCode {
    fn from(code: &str) -> Self {
        match code {
            "Escape" => KeyCode::Escape,
            "Enter" => KeyCode::Enter,
            "ArrowDown" => KeyCode::ArrowDown,
            other => KeyCode::Other(other.to_string()),
        }
    }
}

/// A single attribute mutation observed on a watched element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationRecord {
    pub target: ElementId,
    pub attribute_name: String,
    pub old_value: Option<String>,
}

impl MutationRecord {
    pub fn attribute(target: ElementId, attribute_name: impl Into<String>) -> Self {
        Self {
            target,
            attribute_name: attribute_name.into(),
            old_value: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyState {
    Loading,
    Interactive,
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityState {
    Visible,
    Hidden,
}
