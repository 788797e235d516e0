//! Host traits.
//!
//! The overlay engine never touches a browser directly. Every side effect goes
//! through one of these traits, implemented by the embedding runtime (or by the
//! in-memory hosts in the core crate).

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{ChannelError, DomError};
use crate::message::ExtensionMessage;
use crate::types::{
    AutofillField, ElementId, EventKind, EventTarget, ReadyState, Rect, StyleMap,
    VisibilityState, WindowId,
};

/// DOM access for the document of one frame.
///
/// Methods addressing a removed element are no-ops (or return `None`); only
/// tree insertion reports failure.
pub trait Document: Send + Sync {
    fn ready_state(&self) -> ReadyState;

    fn visibility_state(&self) -> VisibilityState;

    /// `document.hasFocus()`.
    fn has_focus(&self) -> bool;

    fn create_element(&self, tag_name: &str) -> ElementId;

    fn append_child(&self, parent: ElementId, child: ElementId) -> Result<(), DomError>;

    /// Detach the element from its parent. It may be re-appended later.
    fn remove_element(&self, element: ElementId);

    fn is_connected(&self, element: ElementId) -> bool;

    /// Lowercase tag name, `None` for unknown handles.
    fn tag_name(&self, element: ElementId) -> Option<String>;

    /// Attributes in document order, excluding nothing (`style` included).
    fn attributes(&self, element: ElementId) -> Vec<(String, String)>;

    fn get_attribute(&self, element: ElementId, name: &str) -> Option<String>;

    fn set_attribute(&self, element: ElementId, name: &str, value: &str);

    fn remove_attribute(&self, element: ElementId, name: &str);

    fn set_style_property(&self, element: ElementId, property: &str, value: &str, important: bool);

    /// Current inline declarations.
    fn inline_style(&self, element: ElementId) -> StyleMap;

    /// `getComputedStyle(element).getPropertyValue(property)`.
    fn computed_style_property(&self, element: ElementId, property: &str) -> Option<String>;

    fn bounding_client_rect(&self, element: ElementId) -> Option<Rect>;

    fn set_text_content(&self, element: ElementId, text: &str);

    /// Form control value (`""` for non-controls).
    fn value(&self, element: ElementId) -> String;

    /// `type` of an input element.
    fn input_type(&self, element: ElementId) -> Option<String>;

    fn is_active_element(&self, element: ElementId) -> bool;

    fn focus(&self, element: ElementId);

    fn blur(&self, element: ElementId);

    /// Every `iframe` element of this document.
    fn iframes(&self) -> Vec<ElementId>;

    /// Browsing context of an iframe element.
    fn content_window(&self, iframe: ElementId) -> Option<WindowId>;

    /// `content` of `meta[name=<name>]`.
    fn meta_content(&self, name: &str) -> Option<String>;

    /// Keyboard-focusable elements in tab order.
    fn tabbable_elements(&self) -> Vec<ElementId>;

    fn add_event_listener(&self, target: EventTarget, kind: EventKind);

    fn remove_event_listener(&self, target: EventTarget, kind: EventKind);

    /// Start delivering attribute mutation records for `element`.
    fn observe_attributes(&self, element: ElementId);

    /// Stop observing `element`, discarding undelivered records.
    fn disconnect_observer(&self, element: ElementId);
}

/// Window-level facilities of one frame.
pub trait Window: Send + Sync {
    /// `window.top === window.self`.
    fn is_top_frame(&self) -> bool;

    fn location_href(&self) -> String;

    fn hostname(&self) -> String;

    /// `(scrollX, scrollY)`.
    fn scroll_offset(&self) -> (f64, f64);

    /// `matchMedia("(prefers-color-scheme: dark)").matches`.
    fn prefers_dark_color_scheme(&self) -> bool;

    /// `chrome.runtime.getURL(path)`.
    fn extension_url(&self, path: &str) -> String;

    /// `window.parent.postMessage(message, "*")`.
    fn post_to_parent(&self, message: Value);

    /// `iframe.contentWindow.postMessage(message, "*")`.
    fn post_to_frame(&self, iframe: ElementId, message: Value);
}

/// Runtime messaging to the background process.
#[async_trait]
pub trait ExtensionMessenger: Send + Sync {
    /// Fire-and-forget.
    fn send(&self, message: ExtensionMessage) -> Result<(), ChannelError>;

    /// Request/response. The background answers with arbitrary JSON.
    async fn request(&self, message: ExtensionMessage) -> Result<Value, ChannelError>;
}

/// A connected named port.
pub trait Port: Send + Sync {
    fn name(&self) -> &str;

    fn post_message(&self, message: Value) -> Result<(), ChannelError>;

    fn disconnect(&self);
}

/// `chrome.runtime.connect`.
pub trait PortConnector: Send + Sync {
    fn connect(&self, name: &str) -> Result<Arc<dyn Port>, ChannelError>;
}

/// Field-detection heuristics live outside the overlay engine.
pub trait FieldQualifier: Send + Sync {
    /// Whether the inline menu must never attach to this field.
    fn is_ignored(&self, field: &AutofillField) -> bool;
}
