// Streaming mode: decisions against a wall-clock deadline.
//
// Beats arrive one at a time while the track plays. Beat `n` must be decided
// before its own start time (minus `stream.decisionLeadMs`), measured from
// the moment the session clock started. A decision that cannot be made in
// time is replaced by a dark entry and left out of coherence history; the
// feed never blocks on it.
//
// Two layers:
// - `StreamSession`: synchronous, owns one `Engine` and the clock. Useful
//   when the caller already runs its own loop.
// - `start_stream`: moves a session onto a worker thread fed over an `mpsc`
//   channel. The handle submits beats and receives `BeatOutcome`s in order.
//   Dropping the beat sender (via `finish`) ends the worker, which returns
//   its `AssemblyReport` on join.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::assembler::AssemblyReport;
use crate::beat::BeatEvent;
use crate::config::EngineConfig;
use crate::engine::{BeatOutcome, Engine};
use crate::error::{ConfigError, StreamError};

/// One live track: an engine plus the clock its beat times refer to.
pub struct StreamSession {
    engine: Engine,
    clock_start: Instant,
    lead: Duration,
}

impl StreamSession {
    /// Start a session whose clock starts now.
    pub fn new(config: &EngineConfig) -> Result<Self, ConfigError> {
        Self::with_clock_start(config, Instant::now())
    }

    pub fn with_clock_start(config: &EngineConfig, clock_start: Instant) -> Result<Self, ConfigError> {
        Ok(StreamSession {
            engine: Engine::new(config)?,
            clock_start,
            lead: Duration::from_millis(config.stream.decision_lead_ms),
        })
    }

    pub fn clock_start(&self) -> Instant {
        self.clock_start
    }

    /// Latest instant a decision for `beat` may be committed. `None` for
    /// beats whose time is not a valid offset; the engine refuses those
    /// anyway.
    pub fn deadline_for(&self, beat: &BeatEvent) -> Option<Instant> {
        let offset = Duration::try_from_secs_f64(beat.time).ok()?;
        self.clock_start.checked_add(offset.saturating_sub(self.lead))
    }

    pub fn process(&mut self, beat: BeatEvent) -> BeatOutcome {
        let deadline = self.deadline_for(&beat);
        self.engine.process_with_deadline(beat, deadline)
    }
}

/// Control side of a streaming worker.
pub struct StreamHandle {
    beats: Option<Sender<BeatEvent>>,
    outcomes: Receiver<BeatOutcome>,
    clock_start: Instant,
    thread: Option<JoinHandle<AssemblyReport>>,
}

impl StreamHandle {
    pub fn clock_start(&self) -> Instant {
        self.clock_start
    }

    /// Queue a beat for decision.
    pub fn submit(&self, beat: BeatEvent) -> Result<(), StreamError> {
        let tx = self.beats.as_ref().ok_or(StreamError::Closed)?;
        tx.send(beat).map_err(|_| StreamError::Closed)
    }

    /// Wait up to `timeout` for the next outcome.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<Option<BeatOutcome>, StreamError> {
        match self.outcomes.recv_timeout(timeout) {
            Ok(outcome) => Ok(Some(outcome)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(StreamError::Closed),
        }
    }

    /// Close the feed, collect every outcome not yet received and the
    /// worker's report.
    pub fn finish(mut self) -> (Vec<BeatOutcome>, AssemblyReport) {
        self.beats.take();
        let remaining: Vec<BeatOutcome> = self.outcomes.iter().collect();
        let report = self
            .thread
            .take()
            .and_then(|handle| handle.join().ok())
            .unwrap_or_default();
        (remaining, report)
    }
}

/// Start a streaming worker whose clock starts now.
pub fn start_stream(config: &EngineConfig) -> Result<StreamHandle, ConfigError> {
    let mut session = StreamSession::new(config)?;
    let clock_start = session.clock_start();
    let (beat_tx, beat_rx) = mpsc::channel::<BeatEvent>();
    let (outcome_tx, outcome_rx) = mpsc::channel::<BeatOutcome>();

    let thread = thread::spawn(move || {
        let mut report = AssemblyReport::default();
        for beat in beat_rx {
            let outcome = session.process(beat);
            report.observe(&outcome);
            if outcome_tx.send(outcome).is_err() {
                debug!("stream receiver dropped, stopping worker");
                break;
            }
        }
        info!(report = %report, "stream finished");
        report
    });

    Ok(StreamHandle {
        beats: Some(beat_tx),
        outcomes: outcome_rx,
        clock_start,
        thread: Some(thread),
    })
}
