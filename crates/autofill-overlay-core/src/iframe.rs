//! Frame bridge for one inline menu iframe.
//!
//! Owns the iframe element, the named port to the background (reconnected on
//! every iframe load) and the timers driving fades, delayed closure and the
//! screen-reader announcement. Port commands the bridge understands are
//! handled here; everything else is relayed into the menu document tagged
//! with the shared `portKey`.

use std::sync::{Arc, Weak};

use autofill_overlay_protocols::{
    ElementId, EventKind, EventTarget, ExtensionMessage, MutationRecord, Port, PortCommand,
    PortMessage, StyleMap, Theme, style_map,
};
use parking_lot::Mutex;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::context::FrameContext;
use crate::sentinel::{MutationSentinel, SentinelVerdict};
use crate::style_guard::{StyleGuard, set_element_styles};
use crate::timer::ScheduledTask;

/// Caller-provided parameters of one menu iframe.
#[derive(Debug, Clone, Default)]
pub struct InlineMenuIframeOptions {
    pub port_name: String,
    pub title: String,
    /// Merged over the base iframe style on creation.
    pub init_styles: StyleMap,
    /// Announced to assistive technology every time the menu is shown.
    pub aria_alert: Option<String>,
}

struct IframeState {
    iframe: Option<ElementId>,
    guard: Option<StyleGuard>,
    sentinel: MutationSentinel,
    port: Option<Arc<dyn Port>>,
    port_key: Option<String>,
    aria_element: Option<ElementId>,
    aria_timer: Option<ScheduledTask>,
    delayed_close_timer: Option<ScheduledTask>,
    fade_in_timer: Option<ScheduledTask>,
    /// Bumped whenever a timer slot is cleared or re-armed. A callback that
    /// already woke up before its task was aborted sees a stale generation.
    delayed_close_generation: u64,
    fade_in_generation: u64,
}

impl IframeState {
    fn cancel_fade_in(&mut self) -> u64 {
        self.fade_in_timer = None;
        self.fade_in_generation += 1;
        self.fade_in_generation
    }

    fn cancel_delayed_close(&mut self) -> u64 {
        self.delayed_close_timer = None;
        self.delayed_close_generation += 1;
        self.delayed_close_generation
    }

    fn apply_styles(&mut self, ctx: &FrameContext, target: Option<ElementId>, patch: &StyleMap) {
        if let Some(guard) = self.guard.as_mut() {
            guard.apply_styles(ctx.document.as_ref(), &mut self.sentinel, target, patch);
        }
    }

    fn apply_iframe_styles(&mut self, ctx: &FrameContext, patch: &StyleMap) {
        let iframe = self.iframe;
        self.apply_styles(ctx, iframe, patch);
    }
}

struct IframeShared {
    ctx: FrameContext,
    container: ElementId,
    options: InlineMenuIframeOptions,
    state: Mutex<IframeState>,
}

/// Handle to one menu iframe. Clones share the same iframe.
#[derive(Clone)]
pub struct InlineMenuIframe {
    shared: Arc<IframeShared>,
}

/// Inline style every menu iframe starts from.
pub fn base_iframe_styles(fade_in_transition: &str) -> StyleMap {
    style_map([
        ("all", "initial"),
        ("position", "fixed"),
        ("display", "block"),
        ("z-index", "2147483647"),
        ("line-height", "0"),
        ("overflow", "hidden"),
        ("transition", fade_in_transition),
        ("visibility", "visible"),
        ("clip-path", "none"),
        ("pointer-events", "auto"),
        ("margin", "0"),
        ("padding", "0"),
        ("color-scheme", "normal"),
        ("opacity", "0"),
    ])
}

fn aria_alert_styles() -> StyleMap {
    style_map([
        ("position", "absolute"),
        ("top", "-9999px"),
        ("left", "-9999px"),
        ("width", "1px"),
        ("height", "1px"),
        ("overflow", "hidden"),
        ("opacity", "0"),
        ("pointer-events", "none"),
    ])
}

impl InlineMenuIframe {
    /// `container` is the (shadow) root the iframe is appended to.
    pub fn new(ctx: FrameContext, container: ElementId, options: InlineMenuIframeOptions) -> Self {
        let sentinel = MutationSentinel::new(&ctx.config.sentinel, Vec::new());
        Self {
            shared: Arc::new(IframeShared {
                ctx,
                container,
                options,
                state: Mutex::new(IframeState {
                    iframe: None,
                    guard: None,
                    sentinel,
                    port: None,
                    port_key: None,
                    aria_element: None,
                    aria_timer: None,
                    delayed_close_timer: None,
                    fade_in_timer: None,
                    delayed_close_generation: 0,
                    fade_in_generation: 0,
                }),
            }),
        }
    }

    pub fn port_name(&self) -> &str {
        &self.shared.options.port_name
    }

    pub fn iframe_element(&self) -> Option<ElementId> {
        self.shared.state.lock().iframe
    }

    pub fn aria_element(&self) -> Option<ElementId> {
        self.shared.state.lock().aria_element
    }

    pub fn port_key(&self) -> Option<String> {
        self.shared.state.lock().port_key.clone()
    }

    pub fn is_port_connected(&self) -> bool {
        self.shared.state.lock().port.is_some()
    }

    /// Canonical style the sentinel enforces.
    pub fn expected_style(&self) -> StyleMap {
        self.shared
            .state
            .lock()
            .guard
            .as_ref()
            .map(|guard| guard.expected_style().clone())
            .unwrap_or_default()
    }

    pub fn sentinel_counters(&self) -> crate::sentinel::MutationCounters {
        self.shared.state.lock().sentinel.counters()
    }

    /// Create the iframe, apply its base style and attributes, and attach it
    /// to the container. A second call is ignored.
    pub fn init_menu_iframe(&self) {
        let shared = &self.shared;
        let ctx = &shared.ctx;
        let document = ctx.document.as_ref();
        let mut state = shared.state.lock();
        if state.iframe.is_some() {
            debug!(port = %shared.options.port_name, "Menu iframe already initialized");
            return;
        }

        let default_attributes = vec![
            (
                "src".to_string(),
                ctx.window.extension_url(&ctx.config.iframe.menu_path),
            ),
            ("title".to_string(), shared.options.title.clone()),
            ("allowtransparency".to_string(), "true".to_string()),
            ("tabindex".to_string(), "-1".to_string()),
        ];

        let iframe = document.create_element("iframe");
        for (name, value) in &default_attributes {
            document.set_attribute(iframe, name, value);
        }
        document.add_event_listener(EventTarget::Element(iframe), EventKind::Load);

        if let Some(text) = &shared.options.aria_alert {
            let aria = document.create_element("div");
            document.set_attribute(aria, "role", "alert");
            document.set_attribute(aria, "aria-live", "polite");
            document.set_attribute(aria, "aria-atomic", "true");
            set_element_styles(document, aria, &aria_alert_styles(), true);
            document.set_text_content(aria, text);
            state.aria_element = Some(aria);
        }

        if let Err(e) = document.append_child(shared.container, iframe) {
            warn!(port = %shared.options.port_name, "Failed to attach menu iframe: {}", e);
            return;
        }

        state.iframe = Some(iframe);
        state.guard = Some(StyleGuard::new(iframe));
        state.sentinel = MutationSentinel::new(&ctx.config.sentinel, default_attributes);

        let mut styles = base_iframe_styles(&ctx.config.iframe.fade_in_transition);
        styles.extend(shared.options.init_styles.clone());
        state.apply_iframe_styles(ctx, &styles);
        info!(port = %shared.options.port_name, element = %iframe, "Menu iframe attached");
    }

    /// The iframe finished (re)loading: open a fresh port and announce the menu.
    pub fn handle_load(&self) {
        let shared = &self.shared;
        let port = match shared.ctx.ports.connect(&shared.options.port_name) {
            Ok(port) => port,
            Err(e) => {
                warn!(port = %shared.options.port_name, "Failed to connect menu port: {}", e);
                return;
            }
        };

        let mut state = shared.state.lock();
        if let Some(previous) = state.port.replace(port) {
            previous.disconnect();
        }
        debug!(port = %shared.options.port_name, "Menu port connected");
        self.announce_aria_alert(&mut state);
    }

    /// Remove the live region now and re-insert it after the debounce, so
    /// assistive technology announces it again.
    fn announce_aria_alert(&self, state: &mut IframeState) {
        let Some(aria) = state.aria_element else {
            return;
        };
        let document = &self.shared.ctx.document;
        document.remove_element(aria);

        let weak: Weak<IframeShared> = Arc::downgrade(&self.shared);
        state.aria_timer = Some(ScheduledTask::after(
            "aria-announce",
            self.shared.ctx.config.timing.aria_announce_delay(),
            move || {
                let Some(shared) = weak.upgrade() else {
                    return;
                };
                let document = &shared.ctx.document;
                if !document.is_connected(shared.container) {
                    return;
                }
                if let Err(e) = document.append_child(shared.container, aria) {
                    debug!("Failed to re-insert ARIA alert: {}", e);
                }
            },
        ));
    }

    /// Message received on a background port.
    pub fn handle_port_message(&self, port_name: &str, message: Value) {
        let shared = &self.shared;
        if port_name != shared.options.port_name {
            return;
        }

        let PortMessage { command, mut payload } = PortMessage::from_value(message);
        let ctx = &shared.ctx;
        let mut state = shared.state.lock();
        match command {
            PortCommand::InitButton { port_key } => {
                state.port_key = Some(port_key);
                self.post_to_iframe(&state, payload);
            }
            PortCommand::InitList { port_key, theme } => {
                state.port_key = Some(port_key);
                if let Some(theme) = theme {
                    let theme = self.resolve_theme(theme);
                    if let Some(border_color) = theme.border_color() {
                        state.apply_iframe_styles(ctx, &style_map([("border-color", border_color)]));
                    }
                    payload.insert("theme".to_string(), Value::String(theme.to_string()));
                }
                self.post_to_iframe(&state, payload);
            }
            PortCommand::UpdatePosition { styles } => {
                if !ctx.document.has_focus() {
                    debug!("Skipping menu reposition while the document is unfocused");
                    return;
                }
                state.cancel_fade_in();
                state.apply_iframe_styles(ctx, &styles);
                self.announce_aria_alert(&mut state);
            }
            PortCommand::ToggleHidden { styles } => {
                state.apply_iframe_styles(ctx, &styles);
            }
            PortCommand::UpdateColorScheme => {
                let color_scheme = ctx
                    .document
                    .meta_content("color-scheme")
                    .filter(|content| !content.is_empty())
                    .unwrap_or_else(|| "normal".to_string());
                let mut message = Map::new();
                message.insert(
                    "command".to_string(),
                    Value::String(PortMessage::UPDATE_COLOR_SCHEME.to_string()),
                );
                message.insert("colorScheme".to_string(), Value::String(color_scheme));
                self.post_to_iframe(&state, message);
            }
            PortCommand::TriggerDelayedClosure => self.schedule_delayed_closure(&mut state),
            PortCommand::FadeIn => self.schedule_fade_in(&mut state),
            PortCommand::Relay(command) => {
                debug!(command = %command, "Relaying port message to menu iframe");
                self.post_to_iframe(&state, payload);
            }
        }
    }

    fn resolve_theme(&self, theme: Theme) -> Theme {
        match theme {
            Theme::System if self.shared.ctx.window.prefers_dark_color_scheme() => Theme::Dark,
            Theme::System => Theme::Light,
            other => other,
        }
    }

    fn post_to_iframe(&self, state: &IframeState, payload: Map<String, Value>) {
        let Some(iframe) = state.iframe else {
            return;
        };
        let mut message = Map::new();
        message.insert(
            "portKey".to_string(),
            state
                .port_key
                .clone()
                .map(Value::String)
                .unwrap_or(Value::Null),
        );
        message.extend(payload);
        self.shared
            .ctx
            .window
            .post_to_frame(iframe, Value::Object(message));
    }

    /// Fade out now, force-close after the delay. A repeated request restarts the delay.
    fn schedule_delayed_closure(&self, state: &mut IframeState) {
        let ctx = &self.shared.ctx;
        let generation = state.cancel_delayed_close();
        state.apply_iframe_styles(
            ctx,
            &style_map([
                ("transition", ctx.config.iframe.fade_out_transition.as_str()),
                ("opacity", "0"),
            ]),
        );

        let weak = Arc::downgrade(&self.shared);
        state.delayed_close_timer = Some(ScheduledTask::after(
            "delayed-closure",
            ctx.config.timing.delayed_closure(),
            move || {
                let Some(shared) = weak.upgrade() else {
                    return;
                };
                let ctx = &shared.ctx;
                let mut state = shared.state.lock();
                if state.delayed_close_generation != generation {
                    return;
                }
                state.apply_iframe_styles(
                    ctx,
                    &style_map([("transition", ctx.config.iframe.fade_in_transition.as_str())]),
                );
                drop(state);
                ctx.send(ExtensionMessage::force_close());
            },
        ));
    }

    fn schedule_fade_in(&self, state: &mut IframeState) {
        let generation = state.cancel_fade_in();
        let weak = Arc::downgrade(&self.shared);
        state.fade_in_timer = Some(ScheduledTask::after(
            "fade-in",
            self.shared.ctx.config.timing.fade_in_delay(),
            move || {
                let Some(shared) = weak.upgrade() else {
                    return;
                };
                let mut state = shared.state.lock();
                if state.fade_in_generation != generation {
                    return;
                }
                state.apply_iframe_styles(
                    &shared.ctx,
                    &style_map([("display", "block"), ("opacity", "1")]),
                );
            },
        ));
    }

    /// The background side of the port went away.
    pub fn handle_port_disconnect(&self, port_name: &str) {
        let shared = &self.shared;
        if port_name != shared.options.port_name {
            return;
        }

        let ctx = &shared.ctx;
        let mut state = shared.state.lock();
        state.apply_iframe_styles(ctx, &style_map([("opacity", "0"), ("height", "0px")]));
        if let Some(iframe) = state.iframe {
            state.sentinel.suspend(ctx.document.as_ref(), iframe);
        }
        if let Some(port) = state.port.take() {
            port.disconnect();
        }
        info!(port = %shared.options.port_name, "Menu port disconnected");
    }

    /// Attribute mutations observed on the iframe.
    pub fn handle_mutations(&self, records: &[MutationRecord]) {
        let ctx = &self.shared.ctx;
        let verdict = {
            let mut guard_state = self.shared.state.lock();
            let state = &mut *guard_state;
            let Some(guard) = state.guard.as_mut() else {
                return;
            };
            state
                .sentinel
                .handle_mutations(ctx.document.as_ref(), guard, records)
        };

        if verdict == SentinelVerdict::ForceClose {
            warn!(port = %self.shared.options.port_name, "Menu iframe tampering, force-closing");
            ctx.send(ExtensionMessage::force_close());
        }
    }

    /// Cancel every timer, close the port and remove the injected elements.
    pub fn destroy(&self) {
        let ctx = &self.shared.ctx;
        let document = ctx.document.as_ref();
        let mut state = self.shared.state.lock();
        state.aria_timer = None;
        state.cancel_delayed_close();
        state.cancel_fade_in();

        if let Some(iframe) = state.iframe.take() {
            state.sentinel.shutdown(document, iframe);
            document.remove_event_listener(EventTarget::Element(iframe), EventKind::Load);
            document.remove_element(iframe);
        }
        state.guard = None;
        if let Some(aria) = state.aria_element.take() {
            document.remove_element(aria);
        }
        if let Some(port) = state.port.take() {
            port.disconnect();
        }
        state.port_key = None;
        debug!(port = %self.shared.options.port_name, "Menu iframe destroyed");
    }
}

#[cfg(test)]
#[path = "iframe_tests.rs"]
mod tests;
