//! Transient-analysis run orchestration.
//!
//! One [`TransientAnalysis`] drives a run through
//! `Idle -> Configuring -> Validated -> Running -> {Completed, Cancelled, Failed}`.
//! User-level problems (no probes, a bad stop time, an engine error) are
//! reported through [`Diagram::show_message`] and never returned as errors.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{info, trace, warn};

use super::collab::{Diagram, ProgressIndicator};
use super::engine::{Control, EngineEvent, EngineObserver, RunResults, SimulationEngine};
use super::render::{render, Rendering};
use crate::netlist::{find_probes, leaf_types, normalize, probe_nodes, GateLibrary};
use crate::source::parse_number;

/// Module property remembering the last stop time.
pub const STOP_TIME_PROPERTY: &str = "tran_tstop";

/// Configuration for the transient-analysis front end.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Title of the stop-time dialog and prefix of validation messages.
    pub dialog_title: String,
    /// Label of the stop-time field.
    pub stop_time_label: String,
    pub progress_title: String,
    pub results_title: String,
    /// Module property the stop time is remembered in.
    pub stop_time_property: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            dialog_title: "Transient Analysis".to_string(),
            stop_time_label: "Stop Time (seconds)".to_string(),
            progress_title: "Progress".to_string(),
            results_title: "Results of Gate-level simulation".to_string(),
            stop_time_property: STOP_TIME_PROPERTY.to_string(),
        }
    }
}

impl AnalysisConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dialog_title(mut self, title: impl Into<String>) -> Self {
        self.dialog_title = title.into();
        self
    }

    pub fn with_results_title(mut self, title: impl Into<String>) -> Self {
        self.results_title = title.into();
        self
    }

    pub fn with_stop_time_property(mut self, name: impl Into<String>) -> Self {
        self.stop_time_property = name.into();
        self
    }
}

/// Lifecycle of a transient run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RunState {
    #[default]
    Idle,
    Configuring,
    Validated,
    Running,
    Completed,
    Cancelled,
    Failed,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// How a call to [`TransientAnalysis::run`] ended.
#[derive(Debug, Clone, PartialEq)]
pub enum RunReport {
    /// The netlist could not be built
    InvalidNetlist(String),
    /// No voltage probes in the diagram
    NoProbes,
    /// The stop-time dialog was dismissed
    Dismissed,
    /// The engine finished; `series` traces were plotted
    Completed { series: usize, missing_probes: usize },
    /// The engine finished with nothing to plot
    NoResults,
    /// Cancelled by the user and the engine stopped
    Cancelled,
    /// The engine reported an error
    Failed(String),
}

/// Shared cancellation flag, settable from outside the run.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Parse a stop time; only finite positive numbers are accepted.
pub fn parse_stop_time(text: &str) -> Option<f64> {
    parse_number(text).filter(|t| t.is_finite() && *t > 0.0)
}

/// Receives engine events during one run.
struct RunMonitor {
    progress: Option<Box<dyn ProgressIndicator>>,
    cancel: CancelToken,
    cancelled: bool,
    finished: Option<RunResults>,
}

impl RunMonitor {
    fn close_progress(&mut self) {
        if let Some(mut progress) = self.progress.take() {
            progress.close();
        }
    }
}

impl EngineObserver for RunMonitor {
    fn notify(&mut self, event: EngineEvent) -> Control {
        // Nothing after the final result changes the run.
        if self.finished.is_some() {
            return Control::Continue;
        }

        match event {
            EngineEvent::Progress { percent } => {
                trace!("transient analysis at {:.1}%", percent);
                if self.cancelled {
                    return Control::Stop;
                }
                if let Some(progress) = self.progress.as_mut() {
                    progress.update(percent);
                    self.cancelled = progress.stop_requested();
                }
                self.cancelled |= self.cancel.is_cancelled();
                if self.cancelled {
                    info!("cancellation requested at {:.1}%", percent);
                    Control::Stop
                } else {
                    Control::Continue
                }
            }
            EngineEvent::Finished { results } => {
                self.close_progress();
                self.finished = Some(results);
                Control::Continue
            }
        }
    }
}

/// Drives transient analysis for one diagram.
#[derive(Debug, Default)]
pub struct TransientAnalysis {
    config: AnalysisConfig,
    state: RunState,
    cancel: CancelToken,
}

impl TransientAnalysis {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: AnalysisConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Token that cancels the active run when triggered.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    fn transition(&mut self, to: RunState) {
        info!("transient analysis: {} -> {}", self.state, to);
        self.state = to;
    }

    /// Run one transient analysis of `diagram` on `engine`.
    ///
    /// Returns once the engine stops calling back. A run left in `Completed`
    /// or `Cancelled` starts over from `Idle` on the next call.
    pub fn run<D, E, L>(&mut self, diagram: &mut D, engine: &mut E, library: &L) -> RunReport
    where
        D: Diagram + ?Sized,
        E: SimulationEngine + ?Sized,
        L: GateLibrary + ?Sized,
    {
        if self.state != RunState::Idle {
            self.transition(RunState::Idle);
        }
        self.cancel.reset();

        self.transition(RunState::Configuring);
        diagram.clear_annotations();

        let devices = diagram.extract_flattened_devices(&leaf_types(library));
        let netlist = match normalize(&devices, library) {
            Ok(netlist) => netlist,
            Err(e) => {
                warn!("netlist extraction failed: {}", e);
                diagram.show_message(&format!("{}: {}", self.config.dialog_title, e));
                self.transition(RunState::Idle);
                return RunReport::InvalidNetlist(e.to_string());
            }
        };

        let probes = find_probes(&netlist);
        if probes.is_empty() {
            diagram.show_message(&format!(
                "{}: there are no probes in the diagram!",
                self.config.dialog_title
            ));
            self.transition(RunState::Idle);
            return RunReport::NoProbes;
        }

        let Some(stop_time) = self.prompt_stop_time(diagram) else {
            self.transition(RunState::Idle);
            return RunReport::Dismissed;
        };
        self.transition(RunState::Validated);

        let probe_names = probe_nodes(&probes);
        let mut monitor = RunMonitor {
            progress: Some(diagram.open_progress(&self.config.progress_title)),
            cancel: self.cancel.clone(),
            cancelled: false,
            finished: None,
        };

        self.transition(RunState::Running);
        engine.run_transient(&netlist, stop_time, &probe_names, &mut monitor);
        monitor.close_progress();

        let results = match monitor.finished.take() {
            Some(results) => results,
            None if monitor.cancelled => {
                self.transition(RunState::Cancelled);
                return RunReport::Cancelled;
            }
            // Engine went quiet without finishing or being asked to stop.
            None => RunResults::Empty,
        };

        if let RunResults::Error(message) = &results {
            warn!("engine error: {}", message);
        }

        match render(&results, &probes) {
            Rendering::Message(message) => {
                diagram.show_message(&message);
                match results {
                    RunResults::Error(message) => {
                        self.transition(RunState::Failed);
                        self.transition(RunState::Idle);
                        RunReport::Failed(message)
                    }
                    _ => {
                        self.transition(RunState::Completed);
                        RunReport::NoResults
                    }
                }
            }
            Rendering::Plot { series, warnings } => {
                for warning in &warnings {
                    diagram.show_message(warning);
                }
                let count = series.len();
                diagram.open_plot(&self.config.results_title, series);
                self.transition(RunState::Completed);
                RunReport::Completed {
                    series: count,
                    missing_probes: warnings.len(),
                }
            }
        }
    }

    /// Ask for the stop time until it parses or the dialog is dismissed.
    fn prompt_stop_time<D: Diagram + ?Sized>(&self, diagram: &mut D) -> Option<f64> {
        loop {
            let current = diagram.module_property(&self.config.stop_time_property);
            let text = diagram.show_modal_dialog(
                &self.config.dialog_title,
                &self.config.stop_time_label,
                current.as_deref(),
            )?;
            diagram.set_module_property(&self.config.stop_time_property, &text);

            match parse_stop_time(&text) {
                Some(stop_time) => return Some(stop_time),
                None => diagram.show_message(&format!(
                    "{}: \"{}\" is not a valid positive number",
                    self.config.stop_time_label, text
                )),
            }
        }
    }
}
