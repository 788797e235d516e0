//! Frame identity and sub-frame geometry descriptors.

use serde::{Deserialize, Serialize};

use super::geometry::Offset;

/// Browser-assigned frame id (`0` is the top frame of a tab).
pub type FrameId = u32;

/// Accumulating geometry record passed up a chain of nested iframes.
///
/// Every hop toward the top frame adds the local iframe offset, appends the
/// ancestor's frame id to `parent_frame_ids` and increments `sub_frame_depth`
/// by exactly one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubFrameDescriptor {
    pub url: String,
    pub frame_id: FrameId,
    pub left: f64,
    pub top: f64,
    #[serde(default)]
    pub parent_frame_ids: Vec<FrameId>,
    #[serde(default)]
    pub sub_frame_depth: u32,
}

impl SubFrameDescriptor {
    /// Descriptor a frame sends to its parent about itself.
    pub fn seed(url: impl Into<String>, frame_id: FrameId) -> Self {
        Self {
            url: url.into(),
            frame_id,
            left: 0.0,
            top: 0.0,
            parent_frame_ids: Vec::new(),
            sub_frame_depth: 0,
        }
    }

    /// Whether the descriptor may not cross another frame boundary.
    pub fn is_exhausted(&self, max_depth: u32) -> bool {
        self.sub_frame_depth >= max_depth
    }

    /// Record one boundary crossing toward the top frame.
    pub fn cross_boundary(&mut self, offset: Offset, parent_frame_id: Option<FrameId>) {
        self.left += offset.left;
        self.top += offset.top;
        if let Some(frame_id) = parent_frame_id {
            self.parent_frame_ids.push(frame_id);
        }
        self.sub_frame_depth += 1;
    }
}

/// Answer to a `getSubFrameOffsets` request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubFrameOffsets {
    pub frame_id: Option<FrameId>,
    pub left: f64,
    pub top: f64,
    pub url: String,
}
