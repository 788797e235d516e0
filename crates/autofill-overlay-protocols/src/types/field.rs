//! Form field metadata handed to the overlay by field detection.

use serde::{Deserialize, Serialize};

use super::geometry::Rect;

/// Field data produced by the (external) page-details collector.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutofillField {
    pub opid: String,
    #[serde(default)]
    pub html_id: Option<String>,
    #[serde(default)]
    pub html_name: Option<String>,
    #[serde(default)]
    pub placeholder: Option<String>,
    #[serde(rename = "type", default)]
    pub field_type: Option<String>,
    #[serde(default)]
    pub autocomplete_type: Option<String>,
    #[serde(default = "default_viewable")]
    pub viewable: bool,
    #[serde(default)]
    pub readonly: bool,
    #[serde(default)]
    pub disabled: bool,
}

fn default_viewable() -> bool {
    true
}

impl AutofillField {
    pub fn new(opid: impl Into<String>) -> Self {
        Self {
            opid: opid.into(),
            viewable: true,
            ..Default::default()
        }
    }

    /// Whether the field can host the inline menu right now.
    pub fn is_interactable(&self) -> bool {
        self.viewable && !self.readonly && !self.disabled
    }
}

/// Geometry of the most recently focused field, reported to the background.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusedFieldData {
    pub focused_field_styles: FocusedFieldStyles,
    pub focused_field_rects: Rect,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusedFieldStyles {
    pub padding_right: String,
    pub padding_left: String,
}

/// Login prefill for the "add new item" flow.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewVaultLogin {
    pub username: String,
    pub password: String,
    pub uri: String,
    pub hostname: String,
}
