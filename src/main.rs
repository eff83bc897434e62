//! Gatelevel - gate-level transient analysis front end
//!
//! # Usage
//!
//! ```bash
//! gatelevel netlist design.json --gates inverter,nand2
//! gatelevel probe recorded.json --node out --time 15n
//! gatelevel run design.json --results recorded.json --gates inverter --tstop 20n
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;

use gatelevel::analysis::{
    AnalysisConfig, Diagram, DisplaySeries, ProgressIndicator, ReplayEngine, SilentProgress,
    SimResults, TransientAnalysis, STOP_TIME_PROPERTY,
};
use gatelevel::error::{GateLevelError, Result};
use gatelevel::netlist::{normalize, RawDevice};
use gatelevel::source::parse_number;

/// Gate-level transient analysis front end
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the normalized netlist of an extracted device list
    Netlist {
        /// JSON list of extracted devices
        #[arg(value_name = "DEVICES_FILE")]
        devices: PathBuf,

        /// Gate-library members
        #[arg(short, long, value_delimiter = ',')]
        gates: Vec<String>,
    },

    /// Print the value on a node at a given time
    Probe {
        /// JSON map of node -> waveform
        #[arg(value_name = "RESULTS_FILE")]
        results: PathBuf,

        #[arg(short, long)]
        node: String,

        /// Time, e.g. 15n
        #[arg(short, long)]
        time: String,
    },

    /// Run a transient analysis against recorded engine output
    Run {
        #[arg(value_name = "DEVICES_FILE")]
        devices: PathBuf,

        /// Recorded engine output to replay
        #[arg(short, long)]
        results: PathBuf,

        #[arg(short, long, value_delimiter = ',')]
        gates: Vec<String>,

        /// Stop time, e.g. 20n
        #[arg(long)]
        tstop: String,

        /// Progress events emitted before the results
        #[arg(long, default_value_t = ReplayEngine::DEFAULT_TICKS)]
        ticks: usize,
    },
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path).map_err(|e| GateLevelError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(serde_json::from_str(&content)?)
}

/// Diagram backed by a device file, talking on stdout/stderr.
struct ConsoleDiagram {
    devices: Vec<RawDevice>,
    stop_time: Option<String>,
    properties: HashMap<String, String>,
    plots: Vec<DisplaySeries>,
}

impl Diagram for ConsoleDiagram {
    fn extract_flattened_devices(&mut self, _leaf_types: &[String]) -> Vec<RawDevice> {
        self.devices.clone()
    }

    fn clear_annotations(&mut self) {}

    fn show_message(&mut self, text: &str) {
        eprintln!("{}", text);
    }

    // The command-line stop time is offered once; a rejected value ends the run.
    fn show_modal_dialog(&mut self, _title: &str, _label: &str, _initial: Option<&str>) -> Option<String> {
        self.stop_time.take()
    }

    fn open_progress(&mut self, _title: &str) -> Box<dyn ProgressIndicator> {
        Box::new(SilentProgress::default())
    }

    fn open_plot(&mut self, _title: &str, series: Vec<DisplaySeries>) {
        self.plots.extend(series);
    }

    fn module_property(&self, name: &str) -> Option<String> {
        self.properties.get(name).cloned()
    }

    fn set_module_property(&mut self, name: &str, value: &str) {
        self.properties.insert(name.to_string(), value.to_string());
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    match args.command {
        Command::Netlist { devices, gates } => {
            let devices: Vec<RawDevice> = read_json(&devices)?;
            let netlist = normalize(&devices, &gates)?;
            println!("{}", serde_json::to_string_pretty(&netlist)?);
        }

        Command::Probe {
            results,
            node,
            time,
        } => {
            let results: SimResults = read_json(&results)?;
            let t = parse_number(&time).ok_or_else(|| GateLevelError::invalid_property("probe", "time", &time))?;
            match results.get(&node).and_then(|wave| wave.value_at(t)) {
                Some(value) => println!("{}", value),
                None => println!("undefined"),
            }
        }

        Command::Run {
            devices,
            results,
            gates,
            tstop,
            ticks,
        } => {
            let mut diagram = ConsoleDiagram {
                devices: read_json(&devices)?,
                stop_time: Some(tstop),
                properties: HashMap::new(),
                plots: Vec::new(),
            };
            let mut engine = ReplayEngine::new(read_json(&results)?).with_ticks(ticks);
            let mut analysis = TransientAnalysis::with_config(
                AnalysisConfig::new().with_stop_time_property(STOP_TIME_PROPERTY),
            );

            let report = analysis.run(&mut diagram, &mut engine, &gates);
            eprintln!("{:?}", report);
            println!("{}", serde_json::to_string_pretty(&diagram.plots)?);
        }
    }

    Ok(())
}
