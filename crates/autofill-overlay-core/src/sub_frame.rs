//! Sub-frame locator.
//!
//! Resolves the offset of a nested iframe relative to the top viewport. Each
//! frame can only measure its own children, so a descriptor travels up the
//! parent chain by `postMessage`, every hop adding the local iframe offset,
//! until the top frame hands the resolved descriptor to the background.

use autofill_overlay_protocols::{
    ElementId, ExtensionMessage, FrameId, Offset, SubFrameDescriptor, SubFrameOffsets, WindowId,
    WindowMessage,
};
use tracing::{debug, info, warn};

use crate::context::FrameContext;

/// How a `calculateSubFramePositioning` message was disposed of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositioningOutcome {
    /// Updated descriptor posted to this frame's parent.
    ForwardedToParent,
    /// This is the top frame; descriptor sent to the background.
    Resolved,
    /// Depth limit reached. The caller must tear down its inline menu state.
    DepthExceeded,
}

#[derive(Clone)]
pub struct SubFrameLocator {
    ctx: FrameContext,
}

fn parse_px(value: Option<String>) -> f64 {
    value
        .as_deref()
        .map(|value| value.trim().trim_end_matches("px"))
        .and_then(|value| value.parse::<f64>().ok())
        .unwrap_or(0.0)
}

impl SubFrameLocator {
    pub fn new(ctx: FrameContext) -> Self {
        Self { ctx }
    }

    /// Offset of `iframe`'s content box within this frame's viewport.
    pub fn iframe_offset(&self, iframe: ElementId) -> Offset {
        let document = &self.ctx.document;
        let Some(rect) = document.bounding_client_rect(iframe) else {
            return Offset::default();
        };
        let style = |property: &str| parse_px(document.computed_style_property(iframe, property));

        Offset::new(
            rect.left + style("border-left-width") + style("padding-left"),
            rect.top + style("border-top-width") + style("padding-top"),
        )
    }

    /// Answer `getSubFrameOffsets`: exactly one iframe must carry `url` as its `src`.
    pub fn get_sub_frame_offsets(
        &self,
        url: &str,
        sub_frame_id: Option<FrameId>,
    ) -> Option<SubFrameOffsets> {
        let document = &self.ctx.document;
        let matches: Vec<ElementId> = document
            .iframes()
            .into_iter()
            .filter(|iframe| document.get_attribute(*iframe, "src").as_deref() == Some(url))
            .collect();

        let iframe = match matches.as_slice() {
            [iframe] => *iframe,
            [] => {
                debug!(url, "No iframe matches sub-frame url");
                return None;
            }
            _ => {
                info!(url, count = matches.len(), "Ambiguous sub-frame url, refusing to guess");
                return None;
            }
        };

        let offset = self.iframe_offset(iframe);
        let (scroll_x, scroll_y) = self.ctx.window.scroll_offset();
        Some(SubFrameOffsets {
            frame_id: sub_frame_id,
            left: offset.left + scroll_x,
            top: offset.top + scroll_y,
            url: url.to_string(),
        })
    }

    /// Start the chain: describe this frame to its parent.
    pub fn post_to_parent(&self, sub_frame_id: FrameId) {
        let descriptor = SubFrameDescriptor::seed(self.ctx.window.location_href(), sub_frame_id);
        self.forward(descriptor);
    }

    fn forward(&self, descriptor: SubFrameDescriptor) {
        let message = WindowMessage::CalculateSubFramePositioning {
            sub_frame_data: descriptor,
        };
        match serde_json::to_value(&message) {
            Ok(value) => self.ctx.window.post_to_parent(value),
            Err(e) => warn!("Failed to encode sub-frame descriptor: {}", e),
        }
    }

    async fn current_frame_id(&self) -> Option<FrameId> {
        self.ctx
            .request(ExtensionMessage::GetCurrentTabFrameId)
            .await
            .and_then(|value| value.as_u64())
            .and_then(|id| FrameId::try_from(id).ok())
    }

    /// Handle one hop of the chain for a descriptor posted by the child window `source`.
    pub async fn calculate_sub_frame_positioning(
        &self,
        source: Option<WindowId>,
        mut descriptor: SubFrameDescriptor,
    ) -> PositioningOutcome {
        let max_depth = self.ctx.config.sub_frame.max_depth;
        if descriptor.is_exhausted(max_depth) {
            warn!(
                url = %descriptor.url,
                depth = descriptor.sub_frame_depth,
                max_depth,
                "Sub-frame depth limit reached, disabling inline menu"
            );
            self.ctx.send(ExtensionMessage::DestroyAutofillInlineMenuListeners {
                sub_frame_data: descriptor,
            });
            return PositioningOutcome::DepthExceeded;
        }

        let document = &self.ctx.document;
        let offset = source
            .and_then(|source| {
                document
                    .iframes()
                    .into_iter()
                    .find(|iframe| document.content_window(*iframe) == Some(source))
            })
            .map(|iframe| self.iframe_offset(iframe))
            .unwrap_or_default();

        let frame_id = self.current_frame_id().await;
        descriptor.cross_boundary(offset, frame_id);
        debug!(
            url = %descriptor.url,
            depth = descriptor.sub_frame_depth,
            frame_id = ?frame_id,
            "Sub-frame descriptor crossed a frame boundary"
        );

        if self.ctx.window.is_top_frame() {
            self.ctx.send(ExtensionMessage::UpdateSubFrameData {
                sub_frame_data: descriptor,
            });
            PositioningOutcome::Resolved
        } else {
            self.forward(descriptor);
            PositioningOutcome::ForwardedToParent
        }
    }
}

#[cfg(test)]
#[path = "sub_frame_tests.rs"]
mod tests;
