//! Interfaces of the host application around a transient run.

use super::render::DisplaySeries;
use crate::netlist::RawDevice;

/// The schematic the analysis was started from, plus the UI around it.
pub trait Diagram {
    /// Flatten the design down to the given leaf types.
    fn extract_flattened_devices(&mut self, leaf_types: &[String]) -> Vec<RawDevice>;

    /// Remove result annotations left by an earlier run.
    fn clear_annotations(&mut self);

    /// Show a message to the user.
    fn show_message(&mut self, text: &str);

    /// Modal dialog with a single text field pre-filled with `initial`.
    /// Returns the entered text, or `None` if the dialog was dismissed.
    fn show_modal_dialog(&mut self, title: &str, label: &str, initial: Option<&str>) -> Option<String>;

    /// Open a progress window for a run.
    fn open_progress(&mut self, title: &str) -> Box<dyn ProgressIndicator>;

    /// Open a window plotting the given series.
    fn open_plot(&mut self, title: &str, series: Vec<DisplaySeries>);

    /// Read a property stored on the diagram's module.
    fn module_property(&self, name: &str) -> Option<String>;

    /// Store a property on the diagram's module.
    fn set_module_property(&mut self, name: &str, value: &str);
}

/// A progress window with a stop button.
pub trait ProgressIndicator {
    fn update(&mut self, percent: f64);

    /// Whether the user pressed stop.
    fn stop_requested(&self) -> bool;

    fn close(&mut self);
}

/// Progress indicator for hosts without a UI. Never requests a stop.
#[derive(Debug, Default)]
pub struct SilentProgress {
    pub last_percent: f64,
}

impl ProgressIndicator for SilentProgress {
    fn update(&mut self, percent: f64) {
        self.last_percent = percent;
    }

    fn stop_requested(&self) -> bool {
        false
    }

    fn close(&mut self) {}
}
