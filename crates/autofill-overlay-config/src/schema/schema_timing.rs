//! Animation, debounce and iframe presentation settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Delays of every cancel-and-restart timer in the overlay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingConfig {
    #[serde(default = "default_fade_in_delay_ms")]
    pub fade_in_delay_ms: u64,

    /// Debounce before the live region is re-inserted.
    #[serde(default = "default_aria_announce_delay_ms")]
    pub aria_announce_delay_ms: u64,

    #[serde(default = "default_delayed_closure_ms")]
    pub delayed_closure_ms: u64,

    /// Wait between opening the list via ArrowDown and focusing it.
    #[serde(default = "default_list_focus_delay_ms")]
    pub list_focus_delay_ms: u64,

    #[serde(default = "default_redirect_focus_close_delay_ms")]
    pub redirect_focus_close_delay_ms: u64,
}

impl TimingConfig {
    pub fn fade_in_delay(&self) -> Duration {
        Duration::from_millis(self.fade_in_delay_ms)
    }

    pub fn aria_announce_delay(&self) -> Duration {
        Duration::from_millis(self.aria_announce_delay_ms)
    }

    pub fn delayed_closure(&self) -> Duration {
        Duration::from_millis(self.delayed_closure_ms)
    }

    pub fn list_focus_delay(&self) -> Duration {
        Duration::from_millis(self.list_focus_delay_ms)
    }

    pub fn redirect_focus_close_delay(&self) -> Duration {
        Duration::from_millis(self.redirect_focus_close_delay_ms)
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            fade_in_delay_ms: default_fade_in_delay_ms(),
            aria_announce_delay_ms: default_aria_announce_delay_ms(),
            delayed_closure_ms: default_delayed_closure_ms(),
            list_focus_delay_ms: default_list_focus_delay_ms(),
            redirect_focus_close_delay_ms: default_redirect_focus_close_delay_ms(),
        }
    }
}

fn default_fade_in_delay_ms() -> u64 {
    10
}

fn default_aria_announce_delay_ms() -> u64 {
    2000
}

fn default_delayed_closure_ms() -> u64 {
    100
}

fn default_list_focus_delay_ms() -> u64 {
    150
}

fn default_redirect_focus_close_delay_ms() -> u64 {
    100
}

/// Menu iframe presentation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IframeConfig {
    /// Extension-relative path of the menu document.
    #[serde(default = "default_menu_path")]
    pub menu_path: String,

    #[serde(default = "default_fade_in_transition")]
    pub fade_in_transition: String,

    #[serde(default = "default_fade_out_transition")]
    pub fade_out_transition: String,
}

impl Default for IframeConfig {
    fn default() -> Self {
        Self {
            menu_path: default_menu_path(),
            fade_in_transition: default_fade_in_transition(),
            fade_out_transition: default_fade_out_transition(),
        }
    }
}

fn default_menu_path() -> String {
    "overlay/menu.html".to_string()
}

fn default_fade_in_transition() -> String {
    "opacity 125ms ease-out 0s".to_string()
}

fn default_fade_out_transition() -> String {
    "opacity 65ms ease-out 0s".to_string()
}
