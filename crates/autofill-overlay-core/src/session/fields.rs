//! Field setup and per-field event handling.

use autofill_overlay_protocols::{
    AuthStatus, AutofillField, ElementId, EventKind, EventTarget, ExtensionMessage,
    FocusedFieldData, FocusedFieldStyles, InlineMenuVisibility, KeyCode, OverlayElement,
};
use tracing::{debug, warn};

use super::{DomEvent, FIELD_EVENTS, FrameSession, SessionState, close_list};
use crate::timer::ScheduledTask;

const PAGE_DETAILS_SENDER: &str = "autofillOverlayContentService";

impl FrameSession {
    /// Start tracking `field`. Ignored and already tracked fields are skipped;
    /// fields that cannot host the menu right now only get a focus listener
    /// that promotes them later.
    pub async fn setup_inline_menu(&self, field: ElementId, data: AutofillField) {
        let ctx = self.ctx();
        {
            let mut state = self.shared.state.lock();
            if state.tracked_fields.contains_key(&field) || ctx.qualifier.is_ignored(&data) {
                return;
            }
            if !data.is_interactable() {
                if !state.hidden_fields.contains_key(&field) {
                    ctx.document
                        .add_event_listener(EventTarget::Element(field), EventKind::Focus);
                    state.hidden_fields.insert(field, data);
                    debug!(field = %field, "Caching hidden field");
                }
                return;
            }
        }

        self.setup_qualified_field(field, data).await;
        if self.ctx().document.is_active_element(field) {
            self.trigger_focused_action(field).await;
        }
    }

    async fn setup_qualified_field(&self, field: ElementId, data: AutofillField) {
        let seed = {
            let mut state = self.shared.state.lock();
            state.tracked_fields.insert(field, data);
            self.focused_field(&state).is_none()
        };
        if seed {
            self.update_most_recently_focused_field(field);
        }

        if self.shared.state.lock().visibility_override.is_none() {
            self.fetch_visibility().await;
        }
        self.install_field_listeners(field);
    }

    async fn fetch_visibility(&self) -> InlineMenuVisibility {
        let ctx = self.ctx();
        *self
            .shared
            .fetched_visibility
            .get_or_init(|| async {
                let visibility: InlineMenuVisibility = ctx
                    .request(ExtensionMessage::GetAutofillInlineMenuVisibility)
                    .await
                    .and_then(|value| serde_json::from_value(value).ok())
                    .unwrap_or_default();
                debug!(?visibility, "Fetched inline menu visibility");
                visibility
            })
            .await
    }

    /// Replace whatever listeners `field` carried with the full field set.
    fn install_field_listeners(&self, field: ElementId) {
        let document = &self.ctx().document;
        let mut state = self.shared.state.lock();
        if let Some(previous) = state.field_listeners.remove(&field) {
            for kind in previous {
                document.remove_event_listener(EventTarget::Element(field), kind);
            }
        }
        for kind in FIELD_EVENTS {
            document.add_event_listener(EventTarget::Element(field), kind);
        }
        state.field_listeners.insert(field, FIELD_EVENTS.to_vec());
    }

    pub(super) fn focused_field(&self, state: &SessionState) -> Option<ElementId> {
        state
            .most_recently_focused
            .filter(|field| self.ctx().document.is_connected(*field))
    }

    pub(super) async fn handle_field_event(&self, field: ElementId, event: DomEvent) {
        if event == DomEvent::Focus && self.is_hidden_field(field) {
            self.promote_hidden_field(field).await;
            return;
        }

        match event {
            DomEvent::Focus => self.trigger_focused_action(field).await,
            DomEvent::Blur => self.handle_field_blur(),
            DomEvent::Input => self.handle_field_input(field).await,
            DomEvent::Click => self.handle_field_click(field).await,
            DomEvent::Keyup(code) => self.handle_field_keyup(code).await,
            other => debug!(field = %field, event = ?other, "Unhandled field event"),
        }
    }

    /// A cached hidden field became focusable: swap its focus listener for the full set.
    async fn promote_hidden_field(&self, field: ElementId) {
        let data = {
            let mut state = self.shared.state.lock();
            let Some(data) = state.hidden_fields.remove(&field) else {
                return;
            };
            data
        };
        self.ctx()
            .document
            .remove_event_listener(EventTarget::Element(field), EventKind::Focus);
        debug!(field = %field, "Promoting hidden field");
        self.setup_qualified_field(field, data).await;
    }

    pub(super) fn handle_field_blur(&self) {
        let ctx = self.ctx();
        ctx.send(ExtensionMessage::UpdateIsFieldCurrentlyFocused {
            is_field_currently_focused: false,
        });
        ctx.send(ExtensionMessage::CheckAutofillInlineMenuFocused);
    }

    async fn handle_field_input(&self, field: ElementId) {
        if !self.is_fillable(field) {
            return;
        }
        self.store_modified_field(field);

        if self.hide_on_filled_field(field).await {
            self.ctx().send(close_list());
            return;
        }
        self.open_inline_menu(false, false, None).await;
    }

    fn store_modified_field(&self, field: ElementId) {
        let is_current = self.focused_field(&self.shared.state.lock()) == Some(field);
        if !is_current {
            self.update_most_recently_focused_field(field);
        }

        let is_password = self.ctx().document.input_type(field).as_deref() == Some("password");
        let mut state = self.shared.state.lock();
        if is_password {
            state.user_filled_fields.password = Some(field);
        } else {
            state.user_filled_fields.username = Some(field);
        }
    }

    async fn handle_field_click(&self, field: ElementId) {
        let ctx = self.ctx();
        if ctx
            .check(ExtensionMessage::CheckIsAutofillInlineMenuButtonVisible)
            .await
            || ctx
                .check(ExtensionMessage::CheckIsAutofillInlineMenuListVisible)
                .await
        {
            return;
        }
        self.trigger_focused_action(field).await;
    }

    async fn handle_field_keyup(&self, code: KeyCode) {
        let ctx = self.ctx();
        match code {
            KeyCode::Escape => ctx.send(ExtensionMessage::force_close_inline_menu(None)),
            KeyCode::Enter => {
                if !ctx.check(ExtensionMessage::CheckIsFieldCurrentlyFilling).await {
                    self.handle_reposition_event();
                }
            }
            KeyCode::ArrowDown => self.focus_inline_menu_list().await,
            KeyCode::Other(_) => {}
        }
    }

    async fn focus_inline_menu_list(&self) {
        let ctx = self.ctx();
        let field = self.focused_field(&self.shared.state.lock());
        let Some(field) = field else {
            ctx.send(ExtensionMessage::FocusAutofillInlineMenuList);
            return;
        };
        if ctx
            .check(ExtensionMessage::CheckIsAutofillInlineMenuListVisible)
            .await
        {
            ctx.send(ExtensionMessage::FocusAutofillInlineMenuList);
            return;
        }

        self.shared.state.lock().list_focus_timer = None;
        self.update_most_recently_focused_field(field);
        self.open_inline_menu(false, true, None).await;

        let weak = std::sync::Arc::downgrade(&self.shared);
        self.shared.state.lock().list_focus_timer = Some(ScheduledTask::after(
            "list-focus",
            ctx.config.timing.list_focus_delay(),
            move || {
                if let Some(shared) = weak.upgrade() {
                    shared.ctx.send(ExtensionMessage::FocusAutofillInlineMenuList);
                }
            },
        ));
    }

    /// Focus handling shared by `focus`, `click` and setup of an already focused field.
    pub(super) async fn trigger_focused_action(&self, field: ElementId) {
        let ctx = self.ctx();
        if ctx.check(ExtensionMessage::CheckIsFieldCurrentlyFilling).await {
            return;
        }
        if ctx.document.tag_name(field).as_deref() == Some("select") {
            ctx.send(ExtensionMessage::force_close_inline_menu(None));
            return;
        }

        ctx.send(ExtensionMessage::UpdateIsFieldCurrentlyFocused {
            is_field_currently_focused: true,
        });
        let initially_focused = self.focused_field(&self.shared.state.lock());
        self.update_most_recently_focused_field(field);
        let newly_focused = initially_focused != Some(field);

        let hide_on_filled = self.hide_on_filled_field(field).await;
        if self.inline_menu_visibility() == InlineMenuVisibility::OnButtonClick
            || (newly_focused && hide_on_filled)
        {
            ctx.send(close_list());
        }

        if hide_on_filled {
            ctx.send(ExtensionMessage::update_position(OverlayElement::Button));
            return;
        }
        ctx.send(ExtensionMessage::open());
    }

    /// A filled field keeps the list closed when the list already has
    /// ciphers or the user cannot use it anyway.
    async fn hide_on_filled_field(&self, field: ElementId) -> bool {
        if self.ctx().document.value(field).is_empty() {
            return false;
        }
        !self.is_user_authed()
            || self
                .ctx()
                .check(ExtensionMessage::CheckIsInlineMenuCiphersPopulated)
                .await
    }

    fn is_user_authed(&self) -> bool {
        self.auth_status() == Some(AuthStatus::Unlocked)
    }

    fn is_fillable(&self, field: ElementId) -> bool {
        self.ctx()
            .document
            .tag_name(field)
            .is_some_and(|tag| tag != "span")
    }

    /// Record `field` as most recently focused and report its geometry.
    pub(super) fn update_most_recently_focused_field(&self, field: ElementId) {
        if !self.is_fillable(field) {
            return;
        }
        let document = &self.ctx().document;
        self.shared.state.lock().most_recently_focused = Some(field);

        let padding = |property: &str| {
            document
                .computed_style_property(field, property)
                .unwrap_or_default()
        };
        let Some(rect) = document.bounding_client_rect(field) else {
            warn!(field = %field, "Focused field has no layout box");
            return;
        };
        self.ctx().send(ExtensionMessage::UpdateFocusedFieldData {
            focused_field_data: FocusedFieldData {
                focused_field_styles: FocusedFieldStyles {
                    padding_right: padding("padding-right"),
                    padding_left: padding("padding-left"),
                },
                focused_field_rects: rect,
            },
        });
    }

    /// Position the menu for the focused field.
    pub async fn open_inline_menu(
        &self,
        is_focusing_field_element: bool,
        is_opening_full_inline_menu: bool,
        auth_status: Option<AuthStatus>,
    ) {
        let ctx = self.ctx();
        let (field, collect_page_details) = {
            let mut state = self.shared.state.lock();
            let Some(field) = self.focused_field(&state) else {
                return;
            };
            let stale = std::mem::take(&mut state.page_details_stale);
            if let Some(auth_status) = auth_status {
                state.auth_status = Some(auth_status);
            }
            (field, stale)
        };

        if collect_page_details {
            ctx.send(ExtensionMessage::BgCollectPageDetails {
                sender: PAGE_DETAILS_SENDER.to_string(),
            });
        }
        if is_focusing_field_element && !ctx.document.is_active_element(field) {
            ctx.document.focus(field);
        }

        ctx.send(ExtensionMessage::update_position(OverlayElement::Button));
        if self.inline_menu_visibility() == InlineMenuVisibility::OnButtonClick
            && !is_opening_full_inline_menu
        {
            return;
        }
        ctx.send(ExtensionMessage::update_position(OverlayElement::List));
    }
}
