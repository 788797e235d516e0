//! Window facilities of one frame, with recorded outbound messages.

use autofill_overlay_protocols::{ElementId, Window, WindowId};
use parking_lot::Mutex;
use serde_json::Value;

#[derive(Debug, Default)]
struct Outbox {
    to_parent: Vec<Value>,
    to_frames: Vec<(ElementId, Value)>,
}

#[derive(Debug)]
pub struct MemoryWindow {
    id: WindowId,
    is_top: bool,
    href: String,
    hostname: String,
    scroll: Mutex<(f64, f64)>,
    prefers_dark: Mutex<bool>,
    extension_base: String,
    outbox: Mutex<Outbox>,
}

impl MemoryWindow {
    /// Window of the top frame of a tab.
    pub fn top(id: WindowId, href: &str) -> Self {
        Self::new(id, href, true)
    }

    /// Window of a nested frame.
    pub fn nested(id: WindowId, href: &str) -> Self {
        Self::new(id, href, false)
    }

    fn new(id: WindowId, href: &str, is_top: bool) -> Self {
        let hostname = href
            .split("://")
            .nth(1)
            .and_then(|rest| rest.split(['/', ':', '?', '#']).next())
            .unwrap_or_default()
            .to_string();
        Self {
            id,
            is_top,
            href: href.to_string(),
            hostname,
            scroll: Mutex::new((0.0, 0.0)),
            prefers_dark: Mutex::new(false),
            extension_base: "chrome-extension://autofill-overlay/".to_string(),
            outbox: Mutex::new(Outbox::default()),
        }
    }

    pub fn id(&self) -> WindowId {
        self.id
    }

    pub fn set_scroll(&self, x: f64, y: f64) {
        *self.scroll.lock() = (x, y);
    }

    pub fn set_prefers_dark(&self, prefers_dark: bool) {
        *self.prefers_dark.lock() = prefers_dark;
    }

    /// Drain messages posted to `window.parent`.
    pub fn take_parent_messages(&self) -> Vec<Value> {
        std::mem::take(&mut self.outbox.lock().to_parent)
    }

    /// Drain messages posted into child iframes.
    pub fn take_frame_messages(&self) -> Vec<(ElementId, Value)> {
        std::mem::take(&mut self.outbox.lock().to_frames)
    }
}

impl Window for MemoryWindow {
    fn is_top_frame(&self) -> bool {
        self.is_top
    }

    fn location_href(&self) -> String {
        self.href.clone()
    }

    fn hostname(&self) -> String {
        self.hostname.clone()
    }

    fn scroll_offset(&self) -> (f64, f64) {
        *self.scroll.lock()
    }

    fn prefers_dark_color_scheme(&self) -> bool {
        *self.prefers_dark.lock()
    }

    fn extension_url(&self, path: &str) -> String {
        format!("{}{}", self.extension_base, path.trim_start_matches('/'))
    }

    fn post_to_parent(&self, message: Value) {
        if self.is_top {
            return;
        }
        self.outbox.lock().to_parent.push(message);
    }

    fn post_to_frame(&self, iframe: ElementId, message: Value) {
        self.outbox.lock().to_frames.push((iframe, message));
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_hostname_from_href() {
        let window = MemoryWindow::top(WindowId(1), "https://login.example.com:8443/signin?next=/");
        assert_eq!(window.hostname(), "login.example.com");
        assert!(window.is_top_frame());
    }

    #[test]
    fn test_extension_url() {
        let window = MemoryWindow::top(WindowId(1), "https://example.com/");
        assert_eq!(
            window.extension_url("overlay/menu.html"),
            "chrome-extension://autofill-overlay/overlay/menu.html"
        );
    }

    #[test]
    fn test_parent_messages_from_nested_frame() {
        let window = MemoryWindow::nested(WindowId(2), "https://child.test/");
        window.post_to_parent(json!({"command": "ping"}));
        assert_eq!(window.take_parent_messages(), vec![json!({"command": "ping"})]);
        assert!(window.take_parent_messages().is_empty());
    }

    #[test]
    fn test_top_frame_has_no_parent() {
        let window = MemoryWindow::top(WindowId(1), "https://example.com/");
        window.post_to_parent(json!({"command": "ping"}));
        assert!(window.take_parent_messages().is_empty());
    }
}
