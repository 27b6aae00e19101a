//! Toolkit-independent state of the volume panel: the cached record, what is shown for it, and the
//! control commands triggered by user input.

use crate::pactl::{AudioServer, PactlError, SinkRecord};

/// Shown on the mute button instead of the percentage while the sink is muted.
pub const MUTED_GLYPH: &str = "X";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    Hidden,
}

/// How far a single scroll notch or arrow key press moves the volume, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VolumeSteps {
    pub scroll: u8,
    pub key: u8,
}

impl Default for VolumeSteps {
    fn default() -> Self {
        Self { scroll: 5, key: 10 }
    }
}

impl VolumeSteps {
    fn shortcut_tip(&self) -> String {
        let Self { scroll, key } = self;
        format!(
            "Shortcuts:\n\
             \tM - mute/unmute\n\
             \tWheel Down/Left Arrow - volume down {scroll}/{key}\n\
             \tWheel Up/Right Arrow - volume up {scroll}/{key}\n\
             \tH - hide window\n\
             \tQ - terminate app"
        )
    }
}

/// Applies a step to a volume and clamps the result to `0..=100`.
pub fn step_volume(current: u8, step: u8, direction: Direction) -> u8 {
    match direction {
        Direction::Up => current.saturating_add(step).min(100),
        Direction::Down => current.saturating_sub(step),
    }
}

/// Everything the panel displays, derived from one record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SurfaceView {
    pub state_text: String,
    pub state_tooltip: String,
    pub volume: u8,
    pub volume_tooltip: String,
    pub muted: bool,
    pub button_text: String,
    pub button_tooltip: String,
}

impl SurfaceView {
    pub fn render(record: &SinkRecord, steps: VolumeSteps) -> Self {
        let volume_text = record.volume.label().replace('\t', " ");
        let state_tooltip = [
            "Default Sink Info:".to_owned(),
            format!("\tName: {}", record.name),
            format!("\tState: {}", record.state),
            format!("\tMuted: {}", if record.muted { "yes" } else { "no" }),
            format!("\tVolume: {volume_text}"),
            steps.shortcut_tip(),
        ]
        .join("\n");

        let (button_text, button_tooltip) = if record.muted {
            (MUTED_GLYPH.to_owned(), "Click to unmute")
        } else {
            (record.volume.percent().to_string(), "Click to mute")
        };

        Self {
            state_text: record.state.to_string(),
            state_tooltip,
            volume: record.volume.percent(),
            volume_tooltip: volume_text.trim().to_owned(),
            muted: record.muted,
            button_text,
            button_tooltip: button_tooltip.to_owned(),
        }
    }

    pub fn fraction(&self) -> f64 {
        f64::from(self.volume) / 100.0
    }
}

/// The panel's model. It keeps the last good record even while hidden, so showing it again needs
/// no query.
pub struct Surface<C> {
    control: C,
    steps: VolumeSteps,
    cached: Option<SinkRecord>,
    view: SurfaceView,
    visibility: Visibility,
}

impl<C: AudioServer> Surface<C> {
    pub fn new(control: C, steps: VolumeSteps) -> Self {
        Self {
            control,
            steps,
            cached: None,
            view: SurfaceView::default(),
            visibility: Visibility::Visible,
        }
    }

    pub fn view(&self) -> &SurfaceView {
        &self.view
    }

    pub fn record(&self) -> Option<&SinkRecord> {
        self.cached.as_ref()
    }

    pub fn is_visible(&self) -> bool {
        self.visibility == Visibility::Visible
    }

    /// Takes a freshly polled record. An empty poll leaves the previous record in place.
    pub fn on_record(&mut self, record: Option<SinkRecord>) {
        let Some(record) = record else {
            return;
        };
        if self.is_visible() {
            self.view = SurfaceView::render(&record, self.steps);
        }
        self.cached = Some(record);
    }

    pub fn show(&mut self) {
        self.visibility = Visibility::Visible;
        if let Some(record) = &self.cached {
            self.view = SurfaceView::render(record, self.steps);
        }
    }

    pub fn hide(&mut self) {
        self.visibility = Visibility::Hidden;
    }

    pub fn toggle_visibility(&mut self) {
        match self.visibility {
            Visibility::Visible => self.hide(),
            Visibility::Hidden => self.show(),
        }
    }

    /// Closing the window only hides it; the poller keeps running.
    pub fn on_close_requested(&mut self) {
        self.hide();
    }

    pub fn on_scroll(&self, direction: Direction) -> Result<(), PactlError> {
        self.adjust_volume(self.steps.scroll, direction)
    }

    pub fn on_volume_step(&self, direction: Direction) -> Result<(), PactlError> {
        self.adjust_volume(self.steps.key, direction)
    }

    /// Sets the volume relative to the cached record. Does nothing while muted or before the
    /// first record arrives. The display catches up on the next poll.
    fn adjust_volume(&self, step: u8, direction: Direction) -> Result<(), PactlError> {
        let Some(record) = self.cached.as_ref().filter(|record| !record.muted) else {
            return Ok(());
        };
        let volume = step_volume(record.volume.percent(), step, direction);
        self.control.set_sink_volume(&record.name, volume)
    }

    /// Reads the current mute state from the server and sets its opposite. Blocks for two
    /// `pactl` runs.
    pub fn on_mute_toggle(&self) -> Result<(), PactlError> {
        let Some(record) = &self.cached else {
            return Ok(());
        };
        let muted = self.control.sink_mute(&record.name)?;
        self.control.set_sink_mute(&record.name, !muted)
    }
}
