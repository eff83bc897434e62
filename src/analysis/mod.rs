//! Transient analysis: running the engine and presenting its results.
//!
//! - [`collab`] - interfaces of the diagram, progress window and plot host
//! - [`engine`] - the event protocol spoken by the simulation engine
//! - [`orchestrator`] - the run state machine
//! - [`render`] - mapping results back onto probes

pub mod collab;
pub mod engine;
pub mod orchestrator;
pub mod render;

pub use collab::{Diagram, ProgressIndicator, SilentProgress};
pub use engine::{
    Control, EngineEvent, EngineObserver, ReplayEngine, RunResults, SimResults, SimulationEngine,
};
pub use orchestrator::{
    parse_stop_time, AnalysisConfig, CancelToken, RunReport, RunState, TransientAnalysis,
    STOP_TIME_PROPERTY,
};
pub use render::{render, DisplaySeries, RenderStyle, Rendering};
