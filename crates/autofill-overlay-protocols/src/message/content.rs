//! Messages sent from the background process to a content script.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::{
    AuthStatus, FrameId, InlineMenuVisibility, RedirectFocusDirection, SubFrameOffsets,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ContentMessage {
    OpenAutofillInlineMenu {
        #[serde(default)]
        is_focusing_field_element: Option<bool>,
        #[serde(default)]
        is_opening_full_inline_menu: Option<bool>,
        #[serde(default)]
        auth_status: Option<AuthStatus>,
    },
    AddNewVaultItemFromOverlay,
    BlurMostRecentlyFocusedField,
    UnsetMostRecentlyFocusedField,
    BgUnlockPopoutOpened,
    BgVaultItemRepromptPopoutOpened,
    RedirectAutofillInlineMenuFocusOut {
        #[serde(default)]
        data: Option<RedirectFocusData>,
    },
    UpdateAutofillInlineMenuVisibility {
        data: VisibilityData,
    },
    GetSubFrameOffsets {
        sub_frame_url: String,
        #[serde(default)]
        sub_frame_id: Option<FrameId>,
    },
    GetSubFrameOffsetsFromWindowMessage {
        sub_frame_id: FrameId,
    },
    CheckMostRecentlyFocusedFieldHasValue,
    DestroyAutofillInlineMenuListeners,
}

impl ContentMessage {
    pub fn open(is_focusing_field_element: bool, is_opening_full_inline_menu: bool) -> Self {
        ContentMessage::OpenAutofillInlineMenu {
            is_focusing_field_element: Some(is_focusing_field_element),
            is_opening_full_inline_menu: Some(is_opening_full_inline_menu),
            auth_status: None,
        }
    }

    pub fn redirect_focus_out(direction: RedirectFocusDirection) -> Self {
        ContentMessage::RedirectAutofillInlineMenuFocusOut {
            data: Some(RedirectFocusData {
                direction: Some(direction),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedirectFocusData {
    #[serde(default)]
    pub direction: Option<RedirectFocusDirection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibilityData {
    pub inline_menu_visibility: InlineMenuVisibility,
}

/// Response handed back to the background for request-style messages.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentReply {
    /// Fire-and-forget message, nothing to answer.
    None,
    SubFrameOffsets(Option<SubFrameOffsets>),
    HasValue(bool),
}

impl ContentReply {
    /// JSON handed to `sendResponse`; `None` when the message has no reply.
    pub fn into_response(self) -> Option<Value> {
        match self {
            ContentReply::None => None,
            ContentReply::SubFrameOffsets(offsets) => {
                Some(serde_json::to_value(offsets).unwrap_or(Value::Null))
            }
            ContentReply::HasValue(has_value) => Some(Value::Bool(has_value)),
        }
    }
}
