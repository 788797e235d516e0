//! Overlay content controller: one [`FrameSession`] per content-script load.
//!
//! The session tracks the form fields of its frame, owns the
//! most-recently-focused field and decides when the inline menu opens,
//! closes or moves. Host events are fed in through [`FrameSession::dispatch`],
//! background messages through [`FrameSession::handle_message`].

mod fields;
mod messages;

use std::collections::BTreeMap;
use std::sync::Arc;

use autofill_overlay_protocols::{
    AuthStatus, AutofillField, ElementId, EventKind, EventTarget, ExtensionMessage,
    InlineMenuVisibility, KeyCode, OverlayElement, ReadyState, VisibilityState, WindowMessage,
    WindowMessageEvent,
};
use parking_lot::Mutex;
use tokio::sync::OnceCell;
use tracing::{debug, info};
use uuid::Uuid;

use crate::context::FrameContext;
use crate::sub_frame::{PositioningOutcome, SubFrameLocator};
use crate::timer::{ScheduledTask, is_pending};

/// A host event delivered to the session.
#[derive(Debug, Clone, PartialEq)]
pub enum DomEvent {
    Focus,
    Blur,
    Input,
    Click,
    Keyup(KeyCode),
    FocusOut,
    Scroll,
    Resize,
    VisibilityChange,
    DomContentLoaded,
    Message(WindowMessageEvent),
}

impl DomEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            DomEvent::Focus => EventKind::Focus,
            DomEvent::Blur => EventKind::Blur,
            DomEvent::Input => EventKind::Input,
            DomEvent::Click => EventKind::Click,
            DomEvent::Keyup(_) => EventKind::Keyup,
            DomEvent::FocusOut => EventKind::FocusOut,
            DomEvent::Scroll => EventKind::Scroll,
            DomEvent::Resize => EventKind::Resize,
            DomEvent::VisibilityChange => EventKind::VisibilityChange,
            DomEvent::DomContentLoaded => EventKind::DomContentLoaded,
            DomEvent::Message(_) => EventKind::Message,
        }
    }
}

/// Listeners installed on every tracked field, in installation order.
const FIELD_EVENTS: [EventKind; 5] = [
    EventKind::Blur,
    EventKind::Keyup,
    EventKind::Input,
    EventKind::Click,
    EventKind::Focus,
];

const GLOBAL_LISTENERS: [(EventTarget, EventKind); 5] = [
    (EventTarget::Document, EventKind::VisibilityChange),
    (EventTarget::Window, EventKind::FocusOut),
    (EventTarget::Window, EventKind::Message),
    (EventTarget::Window, EventKind::Scroll),
    (EventTarget::Window, EventKind::Resize),
];

/// Fields the user typed into, by login role.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UserFilledFields {
    pub username: Option<ElementId>,
    pub password: Option<ElementId>,
}

#[derive(Default)]
struct SessionState {
    global_listeners: Vec<(EventTarget, EventKind)>,
    awaiting_dom_content_loaded: bool,
    field_listeners: BTreeMap<ElementId, Vec<EventKind>>,
    tracked_fields: BTreeMap<ElementId, AutofillField>,
    hidden_fields: BTreeMap<ElementId, AutofillField>,
    most_recently_focused: Option<ElementId>,
    user_filled_fields: UserFilledFields,
    focusable_elements: Vec<ElementId>,
    visibility_override: Option<InlineMenuVisibility>,
    auth_status: Option<AuthStatus>,
    page_details_stale: bool,
    list_focus_timer: Option<ScheduledTask>,
    redirect_close_timer: Option<ScheduledTask>,
}

struct SessionShared {
    id: Uuid,
    ctx: FrameContext,
    locator: SubFrameLocator,
    state: Mutex<SessionState>,
    fetched_visibility: OnceCell<InlineMenuVisibility>,
}

/// Per-frame controller. Clones share the same session.
#[derive(Clone)]
pub struct FrameSession {
    shared: Arc<SessionShared>,
}

impl FrameSession {
    pub fn new(ctx: FrameContext) -> Self {
        let locator = SubFrameLocator::new(ctx.clone());
        Self {
            shared: Arc::new(SessionShared {
                id: Uuid::new_v4(),
                ctx,
                locator,
                state: Mutex::new(SessionState::default()),
                fetched_visibility: OnceCell::new(),
            }),
        }
    }

    pub fn id(&self) -> Uuid {
        self.shared.id
    }

    fn ctx(&self) -> &FrameContext {
        &self.shared.ctx
    }

    pub fn locator(&self) -> &SubFrameLocator {
        &self.shared.locator
    }

    /// Install the frame-wide listeners, deferring to `DOMContentLoaded`
    /// while the document is still loading.
    pub fn init(&self) {
        let document = &self.ctx().document;
        let mut state = self.shared.state.lock();
        if !state.global_listeners.is_empty() || state.awaiting_dom_content_loaded {
            return;
        }
        if document.ready_state() == ReadyState::Loading {
            document.add_event_listener(EventTarget::Document, EventKind::DomContentLoaded);
            state.awaiting_dom_content_loaded = true;
            debug!(session = %self.shared.id, "Deferring listener setup until DOMContentLoaded");
            return;
        }
        self.install_global_listeners(&mut state);
    }

    fn install_global_listeners(&self, state: &mut SessionState) {
        let document = &self.ctx().document;
        for (target, kind) in GLOBAL_LISTENERS {
            document.add_event_listener(target, kind);
            state.global_listeners.push((target, kind));
        }
        info!(session = %self.shared.id, "Frame session listening");
    }

    /// Route a host event. Events for listeners the session never installed are dropped.
    pub async fn dispatch(&self, target: EventTarget, event: DomEvent) {
        let kind = event.kind();
        if !self.is_listening(target, kind) {
            debug!(event = %kind, "Ignoring event without a registered listener");
            return;
        }

        match (target, event) {
            (EventTarget::Element(element), event) => self.handle_field_event(element, event).await,
            (EventTarget::Document, DomEvent::DomContentLoaded) => self.handle_dom_content_loaded(),
            (EventTarget::Document, DomEvent::VisibilityChange) => self.handle_visibility_change(),
            (EventTarget::Window, DomEvent::FocusOut) => self.handle_field_blur(),
            (EventTarget::Window, DomEvent::Scroll | DomEvent::Resize) => {
                self.handle_reposition_event()
            }
            (EventTarget::Window, DomEvent::Message(message)) => {
                self.handle_window_message(message).await
            }
            (target, event) => debug!(?target, ?event, "Unhandled frame event"),
        }
    }

    fn is_listening(&self, target: EventTarget, kind: EventKind) -> bool {
        let state = self.shared.state.lock();
        match target {
            EventTarget::Element(element) => {
                state
                    .field_listeners
                    .get(&element)
                    .is_some_and(|kinds| kinds.contains(&kind))
                    || (kind == EventKind::Focus && state.hidden_fields.contains_key(&element))
            }
            EventTarget::Document if kind == EventKind::DomContentLoaded => {
                state.awaiting_dom_content_loaded
            }
            _ => state.global_listeners.contains(&(target, kind)),
        }
    }

    fn handle_dom_content_loaded(&self) {
        let document = &self.ctx().document;
        let mut state = self.shared.state.lock();
        document.remove_event_listener(EventTarget::Document, EventKind::DomContentLoaded);
        state.awaiting_dom_content_loaded = false;
        if state.global_listeners.is_empty() {
            self.install_global_listeners(&mut state);
        }
    }

    fn handle_visibility_change(&self) {
        if self.ctx().document.visibility_state() == VisibilityState::Visible {
            return;
        }
        if self.shared.state.lock().most_recently_focused.take().is_none() {
            return;
        }
        self.ctx()
            .send(ExtensionMessage::force_close_inline_menu(None));
    }

    fn handle_reposition_event(&self) {
        self.ctx()
            .send(ExtensionMessage::TriggerAutofillOverlayReposition);
    }

    async fn handle_window_message(&self, event: WindowMessageEvent) {
        let Some(WindowMessage::CalculateSubFramePositioning { sub_frame_data }) =
            WindowMessage::from_value(&event.data)
        else {
            return;
        };
        let outcome = self
            .locator()
            .calculate_sub_frame_positioning(event.source, sub_frame_data)
            .await;
        if outcome == PositioningOutcome::DepthExceeded {
            self.destroy();
        }
    }

    /// The page changed enough that the background must re-collect page
    /// details before the menu next opens.
    pub fn mark_page_details_stale(&self) {
        self.shared.state.lock().page_details_stale = true;
    }

    /// Most recently focused field, if it is still attached.
    pub fn most_recently_focused_field(&self) -> Option<ElementId> {
        let field = self.shared.state.lock().most_recently_focused?;
        self.ctx().document.is_connected(field).then_some(field)
    }

    pub fn user_filled_fields(&self) -> UserFilledFields {
        self.shared.state.lock().user_filled_fields
    }

    pub fn is_tracking(&self, field: ElementId) -> bool {
        self.shared.state.lock().tracked_fields.contains_key(&field)
    }

    pub fn is_hidden_field(&self, field: ElementId) -> bool {
        self.shared.state.lock().hidden_fields.contains_key(&field)
    }

    pub fn tracked_field_count(&self) -> usize {
        self.shared.state.lock().tracked_fields.len()
    }

    pub fn auth_status(&self) -> Option<AuthStatus> {
        self.shared.state.lock().auth_status
    }

    /// Active visibility policy: an explicit update wins over the fetched value.
    pub fn inline_menu_visibility(&self) -> InlineMenuVisibility {
        let override_visibility = self.shared.state.lock().visibility_override;
        override_visibility
            .or_else(|| self.shared.fetched_visibility.get().copied())
            .unwrap_or_default()
    }

    pub fn has_pending_list_focus(&self) -> bool {
        is_pending(&self.shared.state.lock().list_focus_timer)
    }

    pub fn has_pending_redirect_close(&self) -> bool {
        is_pending(&self.shared.state.lock().redirect_close_timer)
    }

    /// Remove every listener the session installed and forget all field state.
    pub fn destroy(&self) {
        let document = &self.ctx().document;
        let mut state = self.shared.state.lock();
        state.list_focus_timer = None;
        state.redirect_close_timer = None;

        if state.awaiting_dom_content_loaded {
            document.remove_event_listener(EventTarget::Document, EventKind::DomContentLoaded);
            state.awaiting_dom_content_loaded = false;
        }
        for (target, kind) in std::mem::take(&mut state.global_listeners) {
            document.remove_event_listener(target, kind);
        }
        for (field, kinds) in std::mem::take(&mut state.field_listeners) {
            for kind in kinds {
                document.remove_event_listener(EventTarget::Element(field), kind);
            }
        }
        for field in std::mem::take(&mut state.hidden_fields).into_keys() {
            document.remove_event_listener(EventTarget::Element(field), EventKind::Focus);
        }

        state.tracked_fields.clear();
        state.focusable_elements.clear();
        state.most_recently_focused = None;
        state.user_filled_fields = UserFilledFields::default();
        info!(session = %self.shared.id, "Frame session destroyed");
    }
}

/// Shorthand used by the field handlers.
fn close_list() -> ExtensionMessage {
    ExtensionMessage::force_close_inline_menu(Some(OverlayElement::List))
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
