//! Named ports that record traffic.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use autofill_overlay_protocols::{ChannelError, Port, PortConnector};
use parking_lot::Mutex;
use serde_json::Value;

#[derive(Debug)]
pub struct MemoryPort {
    name: String,
    posted: Mutex<Vec<Value>>,
    disconnected: AtomicBool,
}

impl MemoryPort {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            posted: Mutex::new(Vec::new()),
            disconnected: AtomicBool::new(false),
        }
    }

    pub fn is_disconnected(&self) -> bool {
        self.disconnected.load(Ordering::SeqCst)
    }

    pub fn posted(&self) -> Vec<Value> {
        self.posted.lock().clone()
    }
}

impl Port for MemoryPort {
    fn name(&self) -> &str {
        &self.name
    }

    fn post_message(&self, message: Value) -> Result<(), ChannelError> {
        if self.is_disconnected() {
            return Err(ChannelError::Disconnected);
        }
        self.posted.lock().push(message);
        Ok(())
    }

    fn disconnect(&self) {
        self.disconnected.store(true, Ordering::SeqCst);
    }
}

/// Hands out [`MemoryPort`]s and keeps every one it created.
#[derive(Debug, Default)]
pub struct MemoryPortConnector {
    ports: Mutex<Vec<Arc<MemoryPort>>>,
    refuse: AtomicBool,
}

impl MemoryPortConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent `connect` calls fail.
    pub fn refuse_connections(&self, refuse: bool) {
        self.refuse.store(refuse, Ordering::SeqCst);
    }

    pub fn ports(&self) -> Vec<Arc<MemoryPort>> {
        self.ports.lock().clone()
    }

    pub fn last_port(&self) -> Option<Arc<MemoryPort>> {
        self.ports.lock().last().cloned()
    }
}

impl PortConnector for MemoryPortConnector {
    fn connect(&self, name: &str) -> Result<Arc<dyn Port>, ChannelError> {
        if self.refuse.load(Ordering::SeqCst) {
            return Err(ChannelError::ConnectionFailed(name.to_string()));
        }
        let port = Arc::new(MemoryPort::new(name));
        self.ports.lock().push(port.clone());
        Ok(port)
    }
}
