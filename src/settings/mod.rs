mod persistence;

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::surface::VolumeSteps;

pub use persistence::{load_or_create, stylesheet};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoltraySettings {
    pub poll_interval_ms: u64,
    pub scroll_step: u8,
    pub key_step: u8,
    pub pactl_program: String,
    pub start_hidden: bool,
    pub tray_icon_name: String,
}

impl Default for VoltraySettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: 300,
            scroll_step: 5,
            key_step: 10,
            pactl_program: "pactl".to_owned(),
            start_hidden: false,
            tray_icon_name: "audio-volume-high".to_owned(),
        }
    }
}

impl VoltraySettings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn volume_steps(&self) -> VolumeSteps {
        VolumeSteps {
            scroll: self.scroll_step,
            key: self.key_step,
        }
    }
}
