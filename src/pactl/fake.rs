//! In-memory audio server for tests.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use super::{AudioServer, PactlError};

/// Trimmed down `pactl list sinks` output with two sinks.
pub const TWO_SINKS: &str = "\
Sink #46
\tState: SUSPENDED
\tName: alsa_output.pci-0000_00_1f.3.analog-stereo
\tDescription: Built-in Audio Analog Stereo
\tDriver: PipeWire
\tMute: no
\tVolume: front-left: 26214 /  40% / -23.88 dB,   front-right: 26214 /  40% / -23.88 dB
\t        balance 0.00
\tBase Volume: 65536 / 100% / 0.00 dB
\tMonitor Source: alsa_output.pci-0000_00_1f.3.analog-stereo.monitor
\tFormats:
\t\tpcm

Sink #71
\tState: RUNNING
\tName: bluez_output.AC_80_0A_12_34_56.1
\tDescription: Headphones
\tDriver: PipeWire
\tMute: yes
\tVolume: front-left: 32112 /  49% / -18.60 dB,   front-right: 32112 /  49% / -18.60 dB
\t        balance 0.00
\tBase Volume: 65536 / 100% / 0.00 dB
\tFormats:
\t\tpcm
";

pub const FIRST_SINK: &str = "alsa_output.pci-0000_00_1f.3.analog-stereo";
pub const SECOND_SINK: &str = "bluez_output.AC_80_0A_12_34_56.1";

#[derive(Debug, Default)]
struct FakeState {
    default_sink: String,
    listing: String,
    volumes: HashMap<String, u8>,
    mutes: HashMap<String, bool>,
    calls: Vec<String>,
    unreachable: bool,
}

/// Cloning shares the underlying state, so a test can keep a handle after moving one into the
/// code under test.
#[derive(Debug, Clone, Default)]
pub struct FakeServer(Arc<Mutex<FakeState>>);

impl FakeServer {
    pub fn new(listing: &str, default_sink: &str) -> Self {
        let server = Self::default();
        {
            let mut state = server.state();
            state.listing = listing.to_owned();
            state.default_sink = default_sink.to_owned();
        }
        server
    }

    fn state(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.0.lock().expect("fake server lock poisoned")
    }

    /// Makes every following call fail as if `pactl` could not be started.
    pub fn set_unreachable(&self, unreachable: bool) {
        self.state().unreachable = unreachable;
    }

    pub fn set_default_sink(&self, name: &str) {
        self.state().default_sink = name.to_owned();
    }

    pub fn set_muted(&self, sink: &str, muted: bool) {
        self.state().mutes.insert(sink.to_owned(), muted);
    }

    pub fn muted(&self, sink: &str) -> bool {
        self.state().mutes.get(sink).copied().unwrap_or(false)
    }

    pub fn volume(&self, sink: &str) -> Option<u8> {
        self.state().volumes.get(sink).copied()
    }

    pub fn calls(&self) -> Vec<String> {
        self.state().calls.clone()
    }

    pub fn count_calls(&self, prefix: &str) -> usize {
        self.state()
            .calls
            .iter()
            .filter(|call| call.starts_with(prefix))
            .count()
    }

    fn record(&self, call: String) -> Result<std::sync::MutexGuard<'_, FakeState>, PactlError> {
        let mut state = self.state();
        state.calls.push(call.clone());
        if state.unreachable {
            return Err(PactlError::Spawn {
                args: call,
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "fake pactl"),
            });
        }
        Ok(state)
    }
}

impl AudioServer for FakeServer {
    fn default_sink_name(&self) -> Result<String, PactlError> {
        Ok(self.record("get-default-sink".to_owned())?.default_sink.clone())
    }

    fn list_sinks(&self) -> Result<String, PactlError> {
        Ok(self.record("list sinks".to_owned())?.listing.clone())
    }

    fn set_sink_volume(&self, sink: &str, percent: u8) -> Result<(), PactlError> {
        self.record(format!("set-sink-volume {sink} {percent}%"))?
            .volumes
            .insert(sink.to_owned(), percent);
        Ok(())
    }

    fn sink_mute(&self, sink: &str) -> Result<bool, PactlError> {
        let state = self.record(format!("get-sink-mute {sink}"))?;
        Ok(state.mutes.get(sink).copied().unwrap_or(false))
    }

    fn set_sink_mute(&self, sink: &str, mute: bool) -> Result<(), PactlError> {
        self.record(format!("set-sink-mute {sink} {mute}"))?
            .mutes
            .insert(sink.to_owned(), mute);
        Ok(())
    }
}
