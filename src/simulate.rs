//! Scenario replay against the in-memory hosts.
//!
//! A scenario describes a chain of nested frames (top first), the field the
//! user focuses in the deepest frame and a list of foreign mutations to throw
//! at the menu iframe once it is positioned in the top frame.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use tracing::{debug, info};

use autofill_overlay_config::{ConfigError, ConfigValidator, OverlayConfig};
use autofill_overlay_core::host::MemoryFrame;
use autofill_overlay_core::{DomEvent, FrameSession, InlineMenuIframe, InlineMenuIframeOptions};
use autofill_overlay_protocols::{
    AutofillField, ContentMessage, Document, EventTarget, ExtensionMessage, FrameId, Rect,
    StyleMap, SubFrameDescriptor, WindowId, WindowMessageEvent,
};

const MENU_PORT_NAME: &str = "autofill-inline-menu-list";

/// Scenario errors.
#[derive(Debug, Error)]
pub(crate) enum ScenarioError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid scenario: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Scenario must describe at least one frame")]
    EmptyChain,

    #[error("Menu iframe was not injected")]
    MenuNotInjected,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Scenario {
    /// Overrides `sub_frame.max_depth` from the configuration.
    #[serde(default)]
    pub max_depth: Option<u32>,

    pub frames: Vec<FrameSetup>,

    #[serde(default)]
    pub field: FieldSetup,

    #[serde(default)]
    pub mutations: Vec<InjectedMutation>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct FrameSetup {
    pub url: String,
    pub frame_id: FrameId,

    /// Where this frame's iframe sits inside its parent. Unused for the top frame.
    #[serde(default)]
    pub rect: Rect,

    /// Computed styles of this frame's iframe element (borders, paddings).
    #[serde(default)]
    pub styles: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct FieldSetup {
    #[serde(default = "default_input_type", rename = "type")]
    pub input_type: String,

    #[serde(default)]
    pub value: String,

    #[serde(default = "default_focus")]
    pub focus: bool,
}

impl Default for FieldSetup {
    fn default() -> Self {
        Self {
            input_type: default_input_type(),
            value: String::new(),
            focus: default_focus(),
        }
    }
}

fn default_input_type() -> String {
    "text".to_string()
}

fn default_focus() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub(crate) enum InjectedMutation {
    Style { property: String, value: String },
    Attribute { name: String, value: String },
}

#[derive(Debug, Serialize)]
pub(crate) struct FrameReport {
    pub url: String,
    pub frame_id: FrameId,
    pub messages: Vec<ExtensionMessage>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SimulationReport {
    pub frames: Vec<FrameReport>,
    pub resolved: Option<SubFrameDescriptor>,
    pub menu_style: StyleMap,
    pub foreign_mutations: u32,
}

pub(crate) fn load_scenario(path: &Path) -> Result<Scenario, ScenarioError> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Build the frame chain, drive it and collect everything each frame sent.
pub(crate) async fn run(
    scenario: &Scenario,
    mut config: OverlayConfig,
) -> Result<SimulationReport, ScenarioError> {
    if scenario.frames.is_empty() {
        return Err(ScenarioError::EmptyChain);
    }
    if let Some(max_depth) = scenario.max_depth {
        config.sub_frame.max_depth = max_depth;
    }
    ConfigValidator::validate(&config).into_result()?;
    let config = Arc::new(config);

    let frames = build_chain(scenario, &config);
    let sessions: Vec<FrameSession> = frames
        .iter()
        .map(|frame| FrameSession::new(frame.context()))
        .collect();
    for session in &sessions {
        session.init();
    }

    let deepest = frames.len() - 1;
    focus_field(&frames[deepest], &sessions[deepest], &scenario.field).await;

    if deepest > 0 {
        let sub_frame_id = scenario.frames[deepest].frame_id;
        sessions[deepest]
            .handle_message(ContentMessage::GetSubFrameOffsetsFromWindowMessage { sub_frame_id })
            .await;
        for index in (1..=deepest).rev() {
            relay(&frames[index], &sessions[index - 1]).await;
        }
    }

    let top = &frames[0];
    let resolved = top.messenger.sent().into_iter().find_map(|message| match message {
        ExtensionMessage::UpdateSubFrameData { sub_frame_data } => Some(sub_frame_data),
        _ => None,
    });
    match &resolved {
        Some(descriptor) => info!(
            left = descriptor.left,
            top = descriptor.top,
            depth = descriptor.sub_frame_depth,
            "Sub-frame position resolved"
        ),
        None => info!("No sub-frame position reached the top frame"),
    }

    let bridge = position_menu(top, resolved.as_ref());
    let iframe = bridge.iframe_element().ok_or(ScenarioError::MenuNotInjected)?;
    for mutation in &scenario.mutations {
        match mutation {
            InjectedMutation::Style { property, value } => {
                top.document.set_style_property(iframe, property, value, false)
            }
            InjectedMutation::Attribute { name, value } => {
                top.document.set_attribute(iframe, name, value)
            }
        }
    }
    bridge.handle_mutations(&top.document.take_mutation_records());

    let report = SimulationReport {
        frames: frames
            .iter()
            .zip(&scenario.frames)
            .map(|(frame, setup)| FrameReport {
                url: setup.url.clone(),
                frame_id: setup.frame_id,
                messages: frame.messenger.sent(),
            })
            .collect(),
        resolved,
        menu_style: top.document.inline_style(iframe),
        foreign_mutations: bridge.sentinel_counters().foreign_mutations,
    };

    bridge.destroy();
    for session in &sessions {
        session.destroy();
    }
    Ok(report)
}

fn build_chain(scenario: &Scenario, config: &Arc<OverlayConfig>) -> Vec<MemoryFrame> {
    let frames: Vec<MemoryFrame> = scenario
        .frames
        .iter()
        .enumerate()
        .map(|(index, setup)| {
            let id = WindowId(index as u64 + 1);
            if index == 0 {
                MemoryFrame::top(id, &setup.url, config.clone())
            } else {
                MemoryFrame::nested(id, &setup.url, config.clone())
            }
        })
        .collect();

    for (index, setup) in scenario.frames.iter().enumerate() {
        frames[index]
            .messenger
            .respond("getCurrentTabFrameId", json!(setup.frame_id));
        if index == 0 {
            continue;
        }
        let parent = &frames[index - 1].document;
        let iframe = parent.insert_iframe(&setup.url, setup.rect, frames[index].window.id());
        for (property, value) in &setup.styles {
            parent.set_computed_style(iframe, property, value);
        }
    }
    frames
}

async fn focus_field(frame: &MemoryFrame, session: &FrameSession, setup: &FieldSetup) {
    let field = frame.document.insert_input(&setup.input_type, &setup.value);
    session
        .setup_inline_menu(field, AutofillField::new("scenario-field"))
        .await;
    if setup.focus {
        frame.document.set_active_element(Some(field));
        session
            .dispatch(EventTarget::Element(field), DomEvent::Focus)
            .await;
    }
}

/// Deliver everything `from` posted to its parent into `to`'s session.
async fn relay(from: &MemoryFrame, to: &FrameSession) {
    for data in from.window.take_parent_messages() {
        debug!(source = from.window.id().0, "Relaying window message to parent");
        to.dispatch(
            EventTarget::Window,
            DomEvent::Message(WindowMessageEvent {
                source: Some(from.window.id()),
                data,
            }),
        )
        .await;
    }
}

fn position_menu(top: &MemoryFrame, resolved: Option<&SubFrameDescriptor>) -> InlineMenuIframe {
    let container = top.document.insert_element(top.document.body(), "div");
    let bridge = InlineMenuIframe::new(
        top.context(),
        container,
        InlineMenuIframeOptions {
            port_name: MENU_PORT_NAME.to_string(),
            title: "Autofill list".to_string(),
            ..Default::default()
        },
    );
    bridge.init_menu_iframe();
    bridge.handle_load();

    let (left, top_offset) = resolved
        .map(|descriptor| (descriptor.left, descriptor.top))
        .unwrap_or_default();
    bridge.handle_port_message(
        MENU_PORT_NAME,
        json!({
            "command": "updateAutofillInlineMenuPosition",
            "styles": { "left": format!("{left}px"), "top": format!("{top_offset}px") }
        }),
    );
    bridge
}

#[cfg(test)]
#[path = "simulate_tests.rs"]
mod tests;
