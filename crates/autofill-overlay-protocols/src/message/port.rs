//! Messages delivered over the inline menu port to the iframe bridge.

use serde_json::{Map, Value};

use crate::types::{StyleMap, Theme};

/// Commands the bridge handles itself. Anything else is relayed to the menu.
#[derive(Debug, Clone, PartialEq)]
pub enum PortCommand {
    InitButton { port_key: String },
    InitList { port_key: String, theme: Option<Theme> },
    UpdatePosition { styles: StyleMap },
    ToggleHidden { styles: StyleMap },
    UpdateColorScheme,
    TriggerDelayedClosure,
    FadeIn,
    Relay(String),
}

/// A port message: the parsed command plus the raw payload for relaying.
#[derive(Debug, Clone, PartialEq)]
pub struct PortMessage {
    pub command: PortCommand,
    pub payload: Map<String, Value>,
}

impl PortMessage {
    pub const INIT_BUTTON: &'static str = "initAutofillInlineMenuButton";
    pub const INIT_LIST: &'static str = "initAutofillInlineMenuList";
    pub const UPDATE_POSITION: &'static str = "updateAutofillInlineMenuPosition";
    pub const TOGGLE_HIDDEN: &'static str = "toggleAutofillInlineMenuHidden";
    pub const UPDATE_COLOR_SCHEME: &'static str = "updateAutofillInlineMenuColorScheme";
    pub const TRIGGER_DELAYED_CLOSURE: &'static str = "triggerDelayedAutofillInlineMenuClosure";
    pub const FADE_IN: &'static str = "fadeInAutofillInlineMenuIframe";

    /// Parse a raw port payload. Non-object payloads are relayed as an empty command.
    pub fn from_value(value: Value) -> Self {
        let payload = match value {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        let command = Self::parse_command(&payload);
        Self { command, payload }
    }

    fn parse_command(payload: &Map<String, Value>) -> PortCommand {
        let name = payload
            .get("command")
            .and_then(Value::as_str)
            .unwrap_or_default();
        let port_key = || {
            payload
                .get("portKey")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        let styles = || {
            payload
                .get("styles")
                .and_then(|styles| serde_json::from_value::<StyleMap>(styles.clone()).ok())
                .unwrap_or_default()
        };

        match name {
            Self::INIT_BUTTON => PortCommand::InitButton {
                port_key: port_key(),
            },
            Self::INIT_LIST => PortCommand::InitList {
                port_key: port_key(),
                theme: payload
                    .get("theme")
                    .and_then(Value::as_str)
                    .map(|theme| Theme::from(theme.to_string())),
            },
            Self::UPDATE_POSITION => PortCommand::UpdatePosition { styles: styles() },
            Self::TOGGLE_HIDDEN => PortCommand::ToggleHidden { styles: styles() },
            Self::UPDATE_COLOR_SCHEME => PortCommand::UpdateColorScheme,
            Self::TRIGGER_DELAYED_CLOSURE => PortCommand::TriggerDelayedClosure,
            Self::FADE_IN => PortCommand::FadeIn,
            other => PortCommand::Relay(other.to_string()),
        }
    }
}
