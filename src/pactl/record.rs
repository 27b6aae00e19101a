use std::fmt;

use super::parse::{volume_percent, RawFields};

/// Activity state of a sink as reported by the audio server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkState {
    Running,
    Idle,
    Suspended,
    /// Anything else the server reports, kept as-is
    Other(String),
}

impl SinkState {
    pub fn parse(text: &str) -> Self {
        match text {
            "RUNNING" => Self::Running,
            "IDLE" => Self::Idle,
            "SUSPENDED" => Self::Suspended,
            other => Self::Other(other.to_owned()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Running => "RUNNING",
            Self::Idle => "IDLE",
            Self::Suspended => "SUSPENDED",
            Self::Other(text) => text,
        }
    }
}

impl fmt::Display for SinkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A volume description together with the percentage read from it. The only way to get one is
/// [`Volume::parse`], so the two can't disagree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Volume {
    label: String,
    percent: u8,
}

impl Volume {
    /// Percentages above 100 (software amplification) are clamped to 100.
    pub fn parse(label: &str) -> Option<Self> {
        let percent = volume_percent(label)?.min(100) as u8;
        Some(Self {
            label: label.to_owned(),
            percent,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn percent(&self) -> u8 {
        self.percent
    }
}

/// Snapshot of the default sink, rebuilt on every poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkRecord {
    pub name: String,
    pub state: SinkState,
    pub muted: bool,
    pub volume: Volume,
}

impl SinkRecord {
    /// Builds a record from a parsed block. Returns `None` if any field is missing or the volume
    /// has no readable percentage.
    pub fn from_raw(fields: &RawFields) -> Option<Self> {
        Some(Self {
            name: fields.name.clone()?,
            state: SinkState::parse(fields.state.as_deref()?),
            muted: fields.mute.as_deref()?.eq_ignore_ascii_case("yes"),
            volume: Volume::parse(fields.volume.as_deref()?)?,
        })
    }
}
