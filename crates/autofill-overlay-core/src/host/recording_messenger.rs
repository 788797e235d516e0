//! Background messenger double with canned responses.

use std::collections::HashMap;

use async_trait::async_trait;
use autofill_overlay_protocols::{ChannelError, ExtensionMessage, ExtensionMessenger};
use parking_lot::Mutex;
use serde_json::Value;

/// Records every message and answers requests from a per-command table.
/// Unknown requests resolve to `null`.
#[derive(Debug, Default)]
pub struct RecordingMessenger {
    sent: Mutex<Vec<ExtensionMessage>>,
    requests: Mutex<Vec<ExtensionMessage>>,
    responses: Mutex<HashMap<&'static str, Value>>,
    disconnected: Mutex<bool>,
}

impl RecordingMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every request for `command` with `value`.
    pub fn respond(&self, command: &'static str, value: Value) {
        self.responses.lock().insert(command, value);
    }

    /// Simulate a torn-down background: every call fails.
    pub fn set_disconnected(&self, disconnected: bool) {
        *self.disconnected.lock() = disconnected;
    }

    /// Fire-and-forget messages, in order.
    pub fn sent(&self) -> Vec<ExtensionMessage> {
        self.sent.lock().clone()
    }

    pub fn take_sent(&self) -> Vec<ExtensionMessage> {
        std::mem::take(&mut *self.sent.lock())
    }

    pub fn requests(&self) -> Vec<ExtensionMessage> {
        self.requests.lock().clone()
    }

    /// Number of fire-and-forget messages with the given command.
    pub fn sent_count(&self, command: &str) -> usize {
        self.sent
            .lock()
            .iter()
            .filter(|message| message.command() == command)
            .count()
    }

    pub fn request_count(&self, command: &str) -> usize {
        self.requests
            .lock()
            .iter()
            .filter(|message| message.command() == command)
            .count()
    }

    pub fn was_sent(&self, message: &ExtensionMessage) -> bool {
        self.sent.lock().contains(message)
    }
}

#[async_trait]
impl ExtensionMessenger for RecordingMessenger {
    fn send(&self, message: ExtensionMessage) -> Result<(), ChannelError> {
        if *self.disconnected.lock() {
            return Err(ChannelError::Disconnected);
        }
        self.sent.lock().push(message);
        Ok(())
    }

    async fn request(&self, message: ExtensionMessage) -> Result<Value, ChannelError> {
        if *self.disconnected.lock() {
            return Err(ChannelError::Disconnected);
        }
        let response = self
            .responses
            .lock()
            .get(message.command())
            .cloned()
            .unwrap_or(Value::Null);
        self.requests.lock().push(message);
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn test_canned_responses() {
        let messenger = RecordingMessenger::new();
        messenger.respond("getCurrentTabFrameId", json!(4));

        let frame_id = messenger
            .request(ExtensionMessage::GetCurrentTabFrameId)
            .await
            .unwrap();
        let filling = messenger
            .request(ExtensionMessage::CheckIsFieldCurrentlyFilling)
            .await
            .unwrap();

        assert_eq!(frame_id, json!(4));
        assert_eq!(filling, Value::Null);
        assert_eq!(messenger.request_count("getCurrentTabFrameId"), 1);
    }

    #[tokio::test]
    async fn test_disconnected_messenger_fails() {
        let messenger = RecordingMessenger::new();
        messenger.set_disconnected(true);

        assert!(messenger.send(ExtensionMessage::close()).is_err());
        assert!(
            messenger
                .request(ExtensionMessage::GetCurrentTabFrameId)
                .await
                .is_err()
        );
        assert!(messenger.sent().is_empty());
    }

    #[test]
    fn test_sent_bookkeeping() {
        let messenger = RecordingMessenger::new();
        messenger.send(ExtensionMessage::close()).unwrap();
        messenger.send(ExtensionMessage::force_close()).unwrap();

        assert_eq!(messenger.sent_count("closeAutofillInlineMenu"), 2);
        assert!(messenger.was_sent(&ExtensionMessage::force_close()));
        assert_eq!(messenger.take_sent().len(), 2);
        assert!(messenger.sent().is_empty());
    }
}
