//! Protocol between a transient run and the simulation engine.
//!
//! The engine owns the run loop. It reports through an [`EngineObserver`],
//! sending any number of [`EngineEvent::Progress`] events followed by at most
//! one [`EngineEvent::Finished`]. Each notification returns a [`Control`];
//! once it says [`Control::Stop`] the engine is expected to stop calling back.

use indexmap::IndexMap;
use log::{debug, info};

use crate::netlist::{Netlist, NodeId};
use crate::waveform::{LogicLevel, Waveform};

/// Per-node waveforms from a finished run.
///
/// As JSON this is an object keyed by node name. Each value is
/// `{"xvalues": [...], "yvalues": [...]}` (or `times`/`values`), with levels
/// written `"0"`, `"1"`, `"X"`, `"Z"` or the numbers `0` and `1`.
pub type SimResults = IndexMap<NodeId, Waveform<LogicLevel>>;

/// What a finished run produced.
#[derive(Debug, Clone, PartialEq)]
pub enum RunResults {
    Results(SimResults),
    /// Engine-side error message
    Error(String),
    /// Finished without producing anything
    Empty,
}

/// Event delivered from the engine to the run.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    Progress { percent: f64 },
    Finished { results: RunResults },
}

/// Answer to a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    /// Cancellation requested
    Stop,
}

/// Receiver of engine events.
pub trait EngineObserver {
    fn notify(&mut self, event: EngineEvent) -> Control;
}

impl<F> EngineObserver for F
where
    F: FnMut(EngineEvent) -> Control,
{
    fn notify(&mut self, event: EngineEvent) -> Control {
        self(event)
    }
}

/// A gate-level transient simulator.
pub trait SimulationEngine {
    /// Simulate `netlist` from 0 to `stop_time` seconds, recording at least
    /// the `probes` nodes, and report through `observer`.
    fn run_transient(
        &mut self,
        netlist: &Netlist,
        stop_time: f64,
        probes: &[NodeId],
        observer: &mut dyn EngineObserver,
    );
}

/// Engine that replays recorded results.
///
/// Emits `ticks` evenly spaced progress events, then the recorded outcome
/// with every waveform cut at the stop time. Stops as soon as a progress
/// event is answered with [`Control::Stop`].
#[derive(Debug, Clone)]
pub struct ReplayEngine {
    recorded: RunResults,
    ticks: usize,
}

impl ReplayEngine {
    pub const DEFAULT_TICKS: usize = 10;

    pub fn new(results: SimResults) -> Self {
        Self::from_results(RunResults::Results(results))
    }

    /// Engine whose every run fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self::from_results(RunResults::Error(message.into()))
    }

    pub fn from_results(recorded: RunResults) -> Self {
        Self {
            recorded,
            ticks: Self::DEFAULT_TICKS,
        }
    }

    pub fn with_ticks(mut self, ticks: usize) -> Self {
        self.ticks = ticks;
        self
    }
}

impl SimulationEngine for ReplayEngine {
    fn run_transient(
        &mut self,
        netlist: &Netlist,
        stop_time: f64,
        probes: &[NodeId],
        observer: &mut dyn EngineObserver,
    ) {
        debug!(
            "replaying {} devices to t={} for {} probes",
            netlist.len(),
            stop_time,
            probes.len()
        );

        for tick in 0..self.ticks {
            let percent = 100.0 * tick as f64 / self.ticks as f64;
            if observer.notify(EngineEvent::Progress { percent }) == Control::Stop {
                info!("replay stopped at {:.0}%", percent);
                return;
            }
        }

        let results = match &self.recorded {
            RunResults::Results(recorded) => RunResults::Results(
                recorded
                    .iter()
                    .map(|(node, wave)| (node.clone(), wave.until(stop_time)))
                    .collect(),
            ),
            other => other.clone(),
        };
        observer.notify(EngineEvent::Finished { results });
    }
}
