//! Inline menu enums shared between the content script and the background.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The two injected menu surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OverlayElement {
    #[serde(rename = "autofill-inline-menu-button")]
    Button,
    #[serde(rename = "autofill-inline-menu-list")]
    List,
}

/// When the inline menu is shown for a focused field.
///
/// On the wire this is the numeric setting (`0` off, `1` on button click,
/// `2` on field focus). The camelCase names are accepted on input as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "VisibilityWire", into = "u8")]
pub enum InlineMenuVisibility {
    Off,
    OnButtonClick,
    #[default]
    OnFieldFocus,
}

impl InlineMenuVisibility {
    pub fn code(self) -> u8 {
        match self {
            InlineMenuVisibility::Off => 0,
            InlineMenuVisibility::OnButtonClick => 1,
            InlineMenuVisibility::OnFieldFocus => 2,
        }
    }
}

impl From<InlineMenuVisibility> for u8 {
    fn from(visibility: InlineMenuVisibility) -> Self {
        visibility.code()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum VisibilityWire {
    Code(u64),
    Name(String),
}

impl TryFrom<VisibilityWire> for InlineMenuVisibility {
    type Error = String;

    fn try_from(wire: VisibilityWire) -> Result<Self, Self::Error> {
        match wire {
            VisibilityWire::Code(0) => Ok(InlineMenuVisibility::Off),
            VisibilityWire::Code(1) => Ok(InlineMenuVisibility::OnButtonClick),
            VisibilityWire::Code(2) => Ok(InlineMenuVisibility::OnFieldFocus),
            VisibilityWire::Code(code) => Err(format!("unknown inline menu visibility {code}")),
            VisibilityWire::Name(name) => match name.as_str() {
                "off" => Ok(InlineMenuVisibility::Off),
                "onButtonClick" => Ok(InlineMenuVisibility::OnButtonClick),
                "onFieldFocus" => Ok(InlineMenuVisibility::OnFieldFocus),
                _ => Err(format!("unknown inline menu visibility {name:?}")),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AuthStatus {
    LoggedOut,
    Locked,
    Unlocked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RedirectFocusDirection {
    Current,
    Previous,
    Next,
}

/// Extension theme as sent in the list bootstrap message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Theme {
    System,
    Light,
    Dark,
    Nord,
    SolarizedDark,
    Other(String),
}

impl Theme {
    pub fn as_str(&self) -> &str {
        match self {
            Theme::System => "system",
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::Nord => "nord",
            Theme::SolarizedDark => "solarizedDark",
            Theme::Other(name) => name,
        }
    }

    /// Border color override for the list iframe, if the theme has one.
    pub fn border_color(&self) -> Option<&'static str> {
        match self {
            Theme::Dark => Some("#4c525f"),
            Theme::Nord => Some("#2E3440"),
            Theme::SolarizedDark => Some("#073642"),
            Theme::System | Theme::Light | Theme::Other(_) => None,
        }
    }
}

impl From<String> for Theme {
    fn from(name: String) -> Self {
        match name.as_str() {
            "system" => Theme::System,
            "light" => Theme::Light,
            "dark" => Theme::Dark,
            "nord" => Theme::Nord,
            "solarizedDark" => Theme::SolarizedDark,
            _ => Theme::Other(name),
        }
    }
}

impl From<Theme> for String {
    fn from(theme: Theme) -> Self {
        theme.as_str().to_string()
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
