//! Background-to-content message handling.

use std::sync::Arc;

use autofill_overlay_protocols::{
    ContentMessage, ContentReply, ExtensionMessage, NewVaultLogin, RedirectFocusData,
    RedirectFocusDirection,
};
use tracing::debug;

use super::FrameSession;
use crate::timer::ScheduledTask;

impl FrameSession {
    /// Handle one message from the background, returning the reply for request-style commands.
    pub async fn handle_message(&self, message: ContentMessage) -> ContentReply {
        let ctx = self.ctx();
        match message {
            ContentMessage::OpenAutofillInlineMenu {
                is_focusing_field_element,
                is_opening_full_inline_menu,
                auth_status,
            } => {
                self.open_inline_menu(
                    is_focusing_field_element.unwrap_or(false),
                    is_opening_full_inline_menu.unwrap_or(false),
                    auth_status,
                )
                .await;
            }
            ContentMessage::AddNewVaultItemFromOverlay => self.add_new_vault_item().await,
            ContentMessage::BlurMostRecentlyFocusedField => self.blur_most_recently_focused_field(),
            ContentMessage::UnsetMostRecentlyFocusedField => {
                self.shared.state.lock().most_recently_focused = None;
            }
            ContentMessage::BgUnlockPopoutOpened | ContentMessage::BgVaultItemRepromptPopoutOpened => {
                self.blur_most_recently_focused_field();
                ctx.send(ExtensionMessage::close());
            }
            ContentMessage::RedirectAutofillInlineMenuFocusOut { data } => {
                self.redirect_focus_out(data).await;
            }
            ContentMessage::UpdateAutofillInlineMenuVisibility { data } => {
                self.shared.state.lock().visibility_override = Some(data.inline_menu_visibility);
            }
            ContentMessage::GetSubFrameOffsets {
                sub_frame_url,
                sub_frame_id,
            } => {
                return ContentReply::SubFrameOffsets(
                    self.locator()
                        .get_sub_frame_offsets(&sub_frame_url, sub_frame_id),
                );
            }
            ContentMessage::GetSubFrameOffsetsFromWindowMessage { sub_frame_id } => {
                self.locator().post_to_parent(sub_frame_id);
            }
            ContentMessage::CheckMostRecentlyFocusedFieldHasValue => {
                let has_value = self
                    .most_recently_focused_field()
                    .is_some_and(|field| !ctx.document.value(field).is_empty());
                return ContentReply::HasValue(has_value);
            }
            ContentMessage::DestroyAutofillInlineMenuListeners => self.destroy(),
        }
        ContentReply::None
    }

    fn blur_most_recently_focused_field(&self) {
        if let Some(field) = self.most_recently_focused_field() {
            self.ctx().document.blur(field);
        }
    }

    async fn add_new_vault_item(&self) {
        let ctx = self.ctx();
        if !ctx
            .check(ExtensionMessage::CheckIsAutofillInlineMenuListVisible)
            .await
        {
            return;
        }

        let filled = self.user_filled_fields();
        let value_of = |field: Option<_>| {
            field
                .map(|field| ctx.document.value(field))
                .unwrap_or_default()
        };
        ctx.send(ExtensionMessage::AutofillOverlayAddNewVaultItem {
            login: NewVaultLogin {
                username: value_of(filled.username),
                password: value_of(filled.password),
                uri: ctx.window.location_href(),
                hostname: ctx.window.hostname(),
            },
        });
    }

    async fn redirect_focus_out(&self, data: Option<RedirectFocusData>) {
        let ctx = self.ctx();
        let Some(direction) = data.and_then(|data| data.direction) else {
            return;
        };
        let Some(field) = self.most_recently_focused_field() else {
            return;
        };
        if !ctx
            .check(ExtensionMessage::CheckIsAutofillInlineMenuListVisible)
            .await
        {
            return;
        }

        let step: isize = match direction {
            RedirectFocusDirection::Current => {
                ctx.document.focus(field);
                let weak = Arc::downgrade(&self.shared);
                self.shared.state.lock().redirect_close_timer = Some(ScheduledTask::after(
                    "redirect-close",
                    ctx.config.timing.redirect_focus_close_delay(),
                    move || {
                        if let Some(shared) = weak.upgrade() {
                            shared.ctx.send(ExtensionMessage::close());
                        }
                    },
                ));
                return;
            }
            RedirectFocusDirection::Previous => -1,
            RedirectFocusDirection::Next => 1,
        };

        let target = {
            let mut state = self.shared.state.lock();
            if state.focusable_elements.is_empty() {
                state.focusable_elements = ctx.document.tabbable_elements();
            }
            state
                .focusable_elements
                .iter()
                .position(|element| *element == field)
                .and_then(|index| index.checked_add_signed(step))
                .and_then(|index| state.focusable_elements.get(index).copied())
        };
        match target {
            Some(target) => ctx.document.focus(target),
            None => debug!(field = %field, ?direction, "No focusable element to redirect to"),
        }
    }
}
