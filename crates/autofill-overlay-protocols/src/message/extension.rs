//! Messages sent from a content script to the background process.

use serde::{Deserialize, Serialize};

use crate::types::{FocusedFieldData, NewVaultLogin, OverlayElement, SubFrameDescriptor};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ExtensionMessage {
    GetAutofillInlineMenuVisibility,
    UpdateIsFieldCurrentlyFocused {
        is_field_currently_focused: bool,
    },
    CheckAutofillInlineMenuFocused,
    CloseAutofillInlineMenu {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        force_close_inline_menu: Option<bool>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        force_close: Option<bool>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        overlay_element: Option<OverlayElement>,
    },
    OpenAutofillInlineMenu {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        is_focusing_field_element: Option<bool>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        is_opening_full_inline_menu: Option<bool>,
    },
    UpdateAutofillInlineMenuPosition {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        overlay_element: Option<OverlayElement>,
    },
    TriggerAutofillOverlayReposition,
    UpdateFocusedFieldData {
        focused_field_data: FocusedFieldData,
    },
    BgCollectPageDetails {
        sender: String,
    },
    AutofillOverlayAddNewVaultItem {
        login: NewVaultLogin,
    },
    FocusAutofillInlineMenuList,
    CheckIsFieldCurrentlyFilling,
    CheckIsAutofillInlineMenuButtonVisible,
    CheckIsAutofillInlineMenuListVisible,
    CheckIsInlineMenuCiphersPopulated,
    GetCurrentTabFrameId,
    UpdateSubFrameData {
        sub_frame_data: SubFrameDescriptor,
    },
    DestroyAutofillInlineMenuListeners {
        sub_frame_data: SubFrameDescriptor,
    },
}

impl ExtensionMessage {
    /// Plain close request without options.
    pub fn close() -> Self {
        ExtensionMessage::CloseAutofillInlineMenu {
            force_close_inline_menu: None,
            force_close: None,
            overlay_element: None,
        }
    }

    /// Close request issued by field handlers (`forceCloseInlineMenu`).
    pub fn force_close_inline_menu(overlay_element: Option<OverlayElement>) -> Self {
        ExtensionMessage::CloseAutofillInlineMenu {
            force_close_inline_menu: Some(true),
            force_close: None,
            overlay_element,
        }
    }

    /// Escalated close issued by the iframe bridge (`forceClose`).
    pub fn force_close() -> Self {
        ExtensionMessage::CloseAutofillInlineMenu {
            force_close_inline_menu: None,
            force_close: Some(true),
            overlay_element: None,
        }
    }

    pub fn open() -> Self {
        ExtensionMessage::OpenAutofillInlineMenu {
            is_focusing_field_element: None,
            is_opening_full_inline_menu: None,
        }
    }

    pub fn update_position(overlay_element: OverlayElement) -> Self {
        ExtensionMessage::UpdateAutofillInlineMenuPosition {
            overlay_element: Some(overlay_element),
        }
    }

    /// Wire command name.
    pub fn command(&self) -> &'static str {
        match self {
            ExtensionMessage::GetAutofillInlineMenuVisibility => "getAutofillInlineMenuVisibility",
            ExtensionMessage::UpdateIsFieldCurrentlyFocused { .. } => {
                "updateIsFieldCurrentlyFocused"
            }
            ExtensionMessage::CheckAutofillInlineMenuFocused => "checkAutofillInlineMenuFocused",
            ExtensionMessage::CloseAutofillInlineMenu { .. } => "closeAutofillInlineMenu",
            ExtensionMessage::OpenAutofillInlineMenu { .. } => "openAutofillInlineMenu",
            ExtensionMessage::UpdateAutofillInlineMenuPosition { .. } => {
                "updateAutofillInlineMenuPosition"
            }
            ExtensionMessage::TriggerAutofillOverlayReposition => {
                "triggerAutofillOverlayReposition"
            }
            ExtensionMessage::UpdateFocusedFieldData { .. } => "updateFocusedFieldData",
            ExtensionMessage::BgCollectPageDetails { .. } => "bgCollectPageDetails",
            ExtensionMessage::AutofillOverlayAddNewVaultItem { .. } => {
                "autofillOverlayAddNewVaultItem"
            }
            ExtensionMessage::FocusAutofillInlineMenuList => "focusAutofillInlineMenuList",
            ExtensionMessage::CheckIsFieldCurrentlyFilling => "checkIsFieldCurrentlyFilling",
            ExtensionMessage::CheckIsAutofillInlineMenuButtonVisible => {
                "checkIsAutofillInlineMenuButtonVisible"
            }
            ExtensionMessage::CheckIsAutofillInlineMenuListVisible => {
                "checkIsAutofillInlineMenuListVisible"
            }
            ExtensionMessage::CheckIsInlineMenuCiphersPopulated => {
                "checkIsInlineMenuCiphersPopulated"
            }
            ExtensionMessage::GetCurrentTabFrameId => "getCurrentTabFrameId",
            ExtensionMessage::UpdateSubFrameData { .. } => "updateSubFrameData",
            ExtensionMessage::DestroyAutofillInlineMenuListeners { .. } => {
                "destroyAutofillInlineMenuListeners"
            }
        }
    }
}
