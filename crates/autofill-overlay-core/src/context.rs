//! Host handles shared by every component of one frame.

use std::sync::Arc;

use autofill_overlay_config::OverlayConfig;
use autofill_overlay_protocols::{
    Document, ExtensionMessage, ExtensionMessenger, FieldQualifier, PortConnector, Window,
};
use serde_json::Value;
use tracing::{debug, warn};

/// Everything a frame's components need to reach the outside world.
#[derive(Clone)]
pub struct FrameContext {
    pub document: Arc<dyn Document>,
    pub window: Arc<dyn Window>,
    pub messenger: Arc<dyn ExtensionMessenger>,
    pub ports: Arc<dyn PortConnector>,
    pub qualifier: Arc<dyn FieldQualifier>,
    pub config: Arc<OverlayConfig>,
}

impl FrameContext {
    pub fn new(
        document: Arc<dyn Document>,
        window: Arc<dyn Window>,
        messenger: Arc<dyn ExtensionMessenger>,
        ports: Arc<dyn PortConnector>,
        qualifier: Arc<dyn FieldQualifier>,
        config: Arc<OverlayConfig>,
    ) -> Self {
        Self {
            document,
            window,
            messenger,
            ports,
            qualifier,
            config,
        }
    }

    /// Fire-and-forget message to the background. Failures are logged, never raised.
    pub fn send(&self, message: ExtensionMessage) {
        let command = message.command();
        debug!(command, "Sending extension message");
        if let Err(e) = self.messenger.send(message) {
            warn!(command, "Failed to send extension message: {}", e);
        }
    }

    /// Request/response round trip. `None` when the background is unreachable.
    pub async fn request(&self, message: ExtensionMessage) -> Option<Value> {
        let command = message.command();
        match self.messenger.request(message).await {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(command, "Extension request failed: {}", e);
                None
            }
        }
    }

    /// Boolean check against the background; anything but `true` reads as `false`.
    pub async fn check(&self, message: ExtensionMessage) -> bool {
        self.request(message)
            .await
            .and_then(|value| value.as_bool())
            .unwrap_or(false)
    }
}
