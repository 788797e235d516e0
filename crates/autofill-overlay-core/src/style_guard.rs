//! Guarded style writes.
//!
//! All writes to the menu iframe's inline style go through [`StyleGuard`],
//! which brackets them with a sentinel suspend/resume so the sentinel never
//! sees the overlay's own writes, and keeps the canonical style snapshot the
//! sentinel restores after tampering.

use autofill_overlay_protocols::{Document, ElementId, StyleMap};
use tracing::trace;

use crate::sentinel::MutationSentinel;

/// Set each declaration of `styles` on `element`.
pub fn set_element_styles(
    document: &dyn Document,
    element: ElementId,
    styles: &StyleMap,
    important: bool,
) {
    for (property, value) in styles {
        document.set_style_property(element, property, value, important);
    }
}

/// Owner of the managed iframe's expected style.
#[derive(Debug)]
pub struct StyleGuard {
    iframe: ElementId,
    expected_style: StyleMap,
}

impl StyleGuard {
    pub fn new(iframe: ElementId) -> Self {
        Self {
            iframe,
            expected_style: StyleMap::new(),
        }
    }

    pub fn iframe(&self) -> ElementId {
        self.iframe
    }

    /// Canonical style the iframe must carry.
    pub fn expected_style(&self) -> &StyleMap {
        &self.expected_style
    }

    /// Apply `patch` to `target` with `!important`.
    ///
    /// Missing or detached targets are ignored. When the target is the managed
    /// iframe the patch is merged into the expected style.
    pub fn apply_styles(
        &mut self,
        document: &dyn Document,
        sentinel: &mut MutationSentinel,
        target: Option<ElementId>,
        patch: &StyleMap,
    ) {
        let Some(target) = target else {
            return;
        };
        if !document.is_connected(target) {
            trace!(element = %target, "Skipping style update on detached element");
            return;
        }

        sentinel.suspend(document, self.iframe);
        set_element_styles(document, target, patch, true);
        if target == self.iframe {
            self.expected_style
                .extend(patch.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        sentinel.resume(document, self.iframe);
    }

    /// Re-apply the whole expected style to the iframe.
    pub fn restore(&mut self, document: &dyn Document, sentinel: &mut MutationSentinel) {
        let snapshot = self.expected_style.clone();
        self.apply_styles(document, sentinel, Some(self.iframe), &snapshot);
    }
}
