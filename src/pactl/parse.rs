//! Scraping of `pactl` text output.
//!
//! `pactl` only offers a human-readable format, so everything here works on line prefixes. The
//! commands are run with `LC_ALL=C`, which keeps the prefixes in English.

use indexmap::IndexMap;

const SINK_HEADER: &str = "Sink #";
const STATE_PREFIX: &str = "State:";
const NAME_PREFIX: &str = "Name:";
const MUTE_PREFIX: &str = "Mute:";
const VOLUME_PREFIX: &str = "Volume:";
const FORMAT_PREFIX: &str = "Format:";

/// The fields of one `Sink #N` block, exactly as `pactl` printed them. Only the first occurrence
/// of each field in a block is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawFields {
    pub state: Option<String>,
    pub name: Option<String>,
    pub mute: Option<String>,
    pub volume: Option<String>,
}

impl RawFields {
    fn fill(&mut self, line: &str) {
        let (slot, value) = if let Some(value) = line.strip_prefix(STATE_PREFIX) {
            (&mut self.state, value)
        } else if let Some(value) = line.strip_prefix(NAME_PREFIX) {
            (&mut self.name, value)
        } else if let Some(value) = line.strip_prefix(MUTE_PREFIX) {
            (&mut self.mute, value)
        } else if let Some(value) = line.strip_prefix(VOLUME_PREFIX) {
            (&mut self.volume, value)
        } else {
            return;
        };
        if slot.is_none() {
            *slot = Some(value.trim().to_owned());
        }
    }
}

/// Parses the output of `pactl list sinks` into the fields of each sink, keyed by the sink index
/// from its `Sink #N` header and kept in output order.
///
/// Lines before the first header, and lines between a `Format:` marker and the next header, are
/// ignored.
pub fn parse_enumeration(text: &str) -> IndexMap<u32, RawFields> {
    let mut sinks: IndexMap<u32, RawFields> = IndexMap::new();
    let mut current: Option<u32> = None;

    for line in text.lines().map(str::trim) {
        if let Some(index) = line.strip_prefix(SINK_HEADER) {
            // A header we can't read still opens a block, just under the next free index
            let index = index
                .trim()
                .parse::<u32>()
                .unwrap_or_else(|_| sinks.keys().max().map_or(0, |max| max.saturating_add(1)));
            sinks.insert(index, RawFields::default());
            current = Some(index);
        } else if line.starts_with(FORMAT_PREFIX) {
            current = None;
        } else if let Some(fields) = current.and_then(|index| sinks.get_mut(&index)) {
            fields.fill(line);
        }
    }

    sinks
}

/// Extracts the percentage from a volume description such as
/// `front-left: 32768 /  50% / -18.06 dB,   front-right: 32768 /  50% / -18.06 dB`.
///
/// The first `/`-separated token that contains a `%` is used.
pub fn volume_percent(label: &str) -> Option<u32> {
    label
        .split('/')
        .find(|token| token.contains('%'))?
        .trim()
        .trim_end_matches('%')
        .trim()
        .parse()
        .ok()
}

/// Parses the output of `pactl get-sink-mute`, which looks like `Mute: yes`.
pub fn parse_mute_reply(text: &str) -> Option<bool> {
    let (_, value) = text.split_once(':')?;
    match value.trim() {
        "yes" => Some(true),
        "no" => Some(false),
        _ => None,
    }
}
