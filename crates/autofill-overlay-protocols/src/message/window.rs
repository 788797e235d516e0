//! Frame-to-frame window messages.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::{SubFrameDescriptor, WindowId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum WindowMessage {
    CalculateSubFramePositioning { sub_frame_data: SubFrameDescriptor },
}

impl WindowMessage {
    /// Parse a `message` event payload; page-originated payloads yield `None`.
    pub fn from_value(value: &Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }
}

/// A `message` event as seen by the receiving frame.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowMessageEvent {
    /// The posting browsing context, if known.
    pub source: Option<WindowId>,
    pub data: Value,
}
