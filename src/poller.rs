use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread::{self, JoinHandle},
    time::Duration,
};

use anyhow::{Context, Result};
use log::{error, info, log, trace, warn, Level};
use tokio::sync::watch;

use crate::pactl::{parse_enumeration, AudioServer, PactlError, SinkRecord};

/// Latest snapshot of the default sink. `None` means the last poll could not produce one.
pub type RecordReceiver = watch::Receiver<Option<SinkRecord>>;

/// Cooperative cancellation for the poll loop. Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct StopToken(Arc<AtomicBool>);

impl StopToken {
    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Finds the default sink in a `pactl list sinks` listing and turns it into a record.
pub fn prepare_record(listing: &str, default_sink: &str) -> Option<SinkRecord> {
    parse_enumeration(listing)
        .values()
        .find(|fields| fields.name.as_deref() == Some(default_sink))
        .and_then(SinkRecord::from_raw)
}

/// Whether the previous poll failed. Only the first failure of an outage is a warning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum PollHealth {
    #[default]
    Working,
    Failing,
}

impl PollHealth {
    /// Level to log a failed poll at.
    fn failure_level(&mut self) -> Level {
        match std::mem::replace(self, PollHealth::Failing) {
            PollHealth::Working => Level::Warn,
            PollHealth::Failing => Level::Debug,
        }
    }

    /// Returns true if the previous poll had failed.
    fn recovered(&mut self) -> bool {
        std::mem::replace(self, PollHealth::Working) == PollHealth::Failing
    }
}

pub struct Poller<S> {
    server: S,
    interval: Duration,
    publisher: watch::Sender<Option<SinkRecord>>,
    stop: StopToken,
}

impl<S: AudioServer> Poller<S> {
    pub fn new(server: S, interval: Duration, stop: StopToken) -> (Self, RecordReceiver) {
        let (publisher, receiver) = watch::channel(None);
        (
            Self {
                server,
                interval,
                publisher,
                stop,
            },
            receiver,
        )
    }

    /// Queries the server once.
    pub fn poll_once(&self) -> Result<Option<SinkRecord>, PactlError> {
        let default_sink = self.server.default_sink_name()?;
        let listing = self.server.list_sinks()?;
        let record = prepare_record(&listing, &default_sink);
        if record.is_none() {
            trace!("No usable entry for default sink {default_sink:?}");
        }
        Ok(record)
    }

    /// Polls and publishes until the stop token is triggered. The token is only checked between
    /// iterations, so stopping can take up to one interval plus however long `pactl` takes.
    pub fn run(self) {
        let mut health = PollHealth::default();
        while !self.stop.is_stopped() {
            let record = match self.poll_once() {
                Ok(record) => {
                    if health.recovered() {
                        info!("Polling the default sink works again");
                    }
                    record
                }
                Err(err) => {
                    log!(health.failure_level(), "Failed to poll default sink: {err}");
                    None
                }
            };
            if let Err(err) = self.publisher.send(record) {
                warn!("Nobody is listening for sink updates: {err}");
            }
            thread::sleep(self.interval);
        }
        trace!("Sink poller stopped");
    }
}

/// Owns the poller thread. Dropping the handle stops the poller and waits for it to finish.
pub struct PollerHandle {
    stop: StopToken,
    thread_handle: Option<JoinHandle<()>>,
}

impl PollerHandle {
    pub fn spawn<S>(server: S, interval: Duration) -> Result<(Self, RecordReceiver)>
    where
        S: AudioServer + Send + 'static,
    {
        let stop = StopToken::default();
        let (poller, receiver) = Poller::new(server, interval, stop.clone());
        let thread_handle = thread::Builder::new()
            .name("sink-poller".to_string())
            .spawn(move || poller.run())
            .context("Failed to spawn sink poller thread")?;
        Ok((
            Self {
                stop,
                thread_handle: Some(thread_handle),
            },
            receiver,
        ))
    }

    pub fn stop(&self) {
        self.stop.stop();
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.stop();
        if let Some(thread_handle) = self.thread_handle.take() {
            if let Err(err) = thread_handle.join() {
                error!("Sink poller thread panicked: {err:?}");
            }
        }
    }
}
