//! Results rendering: engine output to plot series.

use log::warn;
use serde::{Deserialize, Serialize};

use super::engine::RunResults;
use crate::netlist::ProbeRecord;
use crate::waveform::LogicLevel;

/// Plot style of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderStyle {
    Digital,
}

/// One plotted trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplaySeries {
    pub x_values: Vec<f64>,
    pub y_values: Vec<LogicLevel>,
    pub label: String,
    pub color: String,
    /// Always seconds
    pub x_units: String,
    pub render_style: RenderStyle,
}

/// What to show for a finished run.
#[derive(Debug, Clone, PartialEq)]
pub enum Rendering {
    /// Series to plot plus one warning per probe on a missing node
    Plot {
        series: Vec<DisplaySeries>,
        warnings: Vec<String>,
    },
    /// Nothing to plot; show this instead
    Message(String),
}

/// Map run results onto the probes.
///
/// Probes are visited last-declared first. A probe whose node is absent from
/// the results yields a warning and is skipped; the x-axis probe is never
/// plotted.
pub fn render(results: &RunResults, probes: &[ProbeRecord]) -> Rendering {
    let results = match results {
        RunResults::Empty => {
            return Rendering::Message(
                "Sorry, no results from transient analysis to plot!".to_string(),
            )
        }
        RunResults::Error(message) => {
            return Rendering::Message(format!("Error during Transient analysis:\n\n{}", message))
        }
        RunResults::Results(results) => results,
    };

    let mut series = Vec::new();
    let mut warnings = Vec::new();

    for probe in probes.iter().rev() {
        let Some(wave) = results.get(&probe.label) else {
            warn!("probe on '{}' has no simulated node", probe.label);
            warnings.push(format!(
                "The {} probe is connected to node \"{}\" which is not an actual circuit node",
                probe.color, probe.label
            ));
            continue;
        };
        if probe.is_x_axis() {
            continue;
        }
        series.push(DisplaySeries {
            x_values: wave.times().to_vec(),
            y_values: wave.values().to_vec(),
            label: probe.label.clone(),
            color: probe.color.clone(),
            x_units: "s".to_string(),
            render_style: RenderStyle::Digital,
        });
    }

    Rendering::Plot { series, warnings }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::engine::SimResults;
    use crate::waveform::Waveform;

    fn wave() -> Waveform<LogicLevel> {
        Waveform::new(vec![0.0, 1e-9], vec![LogicLevel::Low, LogicLevel::High]).unwrap()
    }

    fn results(nodes: &[&str]) -> RunResults {
        let map: SimResults = nodes.iter().map(|n| (n.to_string(), wave())).collect();
        RunResults::Results(map)
    }

    #[test]
    fn test_missing_node_is_not_fatal() {
        let probes = vec![
            ProbeRecord::new("red", "a"),
            ProbeRecord::new("green", "b"),
            ProbeRecord::new("blue", "c"),
        ];
        match render(&results(&["a", "c"]), &probes) {
            Rendering::Plot { series, warnings } => {
                assert_eq!(series.len(), 2);
                assert_eq!(
                    warnings,
                    vec![
                        "The green probe is connected to node \"b\" which is not an actual circuit node"
                    ]
                );
            }
            other => panic!("expected plot, got {:?}", other),
        }
    }

    #[test]
    fn test_reverse_declaration_order() {
        let probes = vec![ProbeRecord::new("red", "a"), ProbeRecord::new("blue", "b")];
        let Rendering::Plot { series, .. } = render(&results(&["a", "b"]), &probes) else {
            panic!("expected plot");
        };
        let labels: Vec<&str> = series.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["b", "a"]);
        assert_eq!(series[0].x_units, "s");
        assert_eq!(series[0].render_style, RenderStyle::Digital);
        assert_eq!(series[0].y_values, vec![LogicLevel::Low, LogicLevel::High]);
    }

    #[test]
    fn test_x_axis_probe_not_plotted() {
        let probes = vec![ProbeRecord::new("x-axis", "clk"), ProbeRecord::new("red", "q")];
        let Rendering::Plot { series, warnings } = render(&results(&["clk", "q"]), &probes) else {
            panic!("expected plot");
        };
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].label, "q");
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_missing_x_axis_node_is_reported() {
        let probes = vec![ProbeRecord::new("x-axis", "clk")];
        let Rendering::Plot { series, warnings } = render(&results(&[]), &probes) else {
            panic!("expected plot");
        };
        assert!(series.is_empty());
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_no_results_and_engine_error() {
        assert_eq!(
            render(&RunResults::Empty, &[]),
            Rendering::Message("Sorry, no results from transient analysis to plot!".into())
        );
        assert_eq!(
            render(&RunResults::Error("singular".into()), &[]),
            Rendering::Message("Error during Transient analysis:\n\nsingular".into())
        );
    }
}
