//! One frame's worth of in-memory hosts.

use std::sync::Arc;

use autofill_overlay_config::OverlayConfig;
use autofill_overlay_protocols::WindowId;

use super::{
    ExcludedTypesQualifier, MemoryDocument, MemoryPortConnector, MemoryWindow, RecordingMessenger,
};
use crate::context::FrameContext;

/// Concrete handles behind a [`FrameContext`], kept for inspection.
#[derive(Clone)]
pub struct MemoryFrame {
    pub document: Arc<MemoryDocument>,
    pub window: Arc<MemoryWindow>,
    pub messenger: Arc<RecordingMessenger>,
    pub ports: Arc<MemoryPortConnector>,
    pub config: Arc<OverlayConfig>,
}

impl MemoryFrame {
    pub fn top(id: WindowId, href: &str, config: Arc<OverlayConfig>) -> Self {
        Self::with_window(MemoryWindow::top(id, href), config)
    }

    pub fn nested(id: WindowId, href: &str, config: Arc<OverlayConfig>) -> Self {
        Self::with_window(MemoryWindow::nested(id, href), config)
    }

    fn with_window(window: MemoryWindow, config: Arc<OverlayConfig>) -> Self {
        Self {
            document: Arc::new(MemoryDocument::new()),
            window: Arc::new(window),
            messenger: Arc::new(RecordingMessenger::new()),
            ports: Arc::new(MemoryPortConnector::new()),
            config,
        }
    }

    pub fn context(&self) -> FrameContext {
        FrameContext::new(
            self.document.clone(),
            self.window.clone(),
            self.messenger.clone(),
            self.ports.clone(),
            Arc::new(ExcludedTypesQualifier::default()),
            self.config.clone(),
        )
    }
}
