//! Step waveforms produced by transient analysis.
//!
//! A [`Waveform`] is a right-continuous step function: each value holds from
//! its own time point up to, but not including, the next one.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{GateLevelError, Result};

/// A gate-level logic value.
///
/// Serialized as `"0"`, `"1"`, `"X"` or `"Z"`. Deserialization also takes
/// the numbers `0` and `1`, and the lowercase `"x"` and `"z"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "LevelRepr")]
pub enum LogicLevel {
    #[serde(rename = "0")]
    Low,
    #[serde(rename = "1")]
    High,
    /// Unknown or contended
    #[serde(rename = "X")]
    Unknown,
    /// High impedance
    #[serde(rename = "Z")]
    HighZ,
}

/// Accepted wire forms of a [`LogicLevel`].
#[derive(Deserialize)]
#[serde(untagged)]
enum LevelRepr {
    Number(f64),
    Text(String),
}

impl TryFrom<LevelRepr> for LogicLevel {
    type Error = String;

    fn try_from(repr: LevelRepr) -> std::result::Result<Self, Self::Error> {
        match repr {
            LevelRepr::Number(n) if n == 0.0 => Ok(LogicLevel::Low),
            LevelRepr::Number(n) if n == 1.0 => Ok(LogicLevel::High),
            LevelRepr::Number(n) => Err(format!("invalid logic level {}", n)),
            LevelRepr::Text(text) => match text.as_str() {
                "0" => Ok(LogicLevel::Low),
                "1" => Ok(LogicLevel::High),
                "X" | "x" => Ok(LogicLevel::Unknown),
                "Z" | "z" => Ok(LogicLevel::HighZ),
                _ => Err(format!("invalid logic level '{}'", text)),
            },
        }
    }
}

impl fmt::Display for LogicLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            LogicLevel::Low => '0',
            LogicLevel::High => '1',
            LogicLevel::Unknown => 'X',
            LogicLevel::HighZ => 'Z',
        };
        write!(f, "{}", c)
    }
}

/// Sampled step waveform. `times` is strictly increasing and as long as
/// `values`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "WaveformData<T>",
    bound(deserialize = "T: Deserialize<'de>")
)]
pub struct Waveform<T> {
    #[serde(rename = "xvalues")]
    times: Vec<f64>,
    #[serde(rename = "yvalues")]
    values: Vec<T>,
}

/// Unchecked wire form of a [`Waveform`].
#[derive(Deserialize)]
struct WaveformData<T> {
    #[serde(alias = "times")]
    xvalues: Vec<f64>,
    #[serde(alias = "values")]
    yvalues: Vec<T>,
}

impl<T> TryFrom<WaveformData<T>> for Waveform<T> {
    type Error = GateLevelError;

    fn try_from(data: WaveformData<T>) -> Result<Self> {
        Waveform::new(data.xvalues, data.yvalues)
    }
}

impl<T> Waveform<T> {
    /// Build a waveform, checking lengths and ordering.
    pub fn new(times: Vec<f64>, values: Vec<T>) -> Result<Self> {
        if times.len() != values.len() {
            return Err(GateLevelError::WaveformLength {
                times: times.len(),
                values: values.len(),
            });
        }
        if let Some(index) = times.windows(2).position(|w| w[0] >= w[1]) {
            return Err(GateLevelError::WaveformOrder { index: index + 1 });
        }
        Ok(Self { times, values })
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Value in force at time `t`.
    pub fn value_at(&self, t: f64) -> Option<&T> {
        value_at_time(t, &self.times, Some(self.values.as_slice()))
    }

    pub fn into_parts(self) -> (Vec<f64>, Vec<T>) {
        (self.times, self.values)
    }
}

impl<T: Clone> Waveform<T> {
    /// Copy of the samples taken at or before `end`.
    pub fn until(&self, end: f64) -> Self {
        let n = self.times.partition_point(|&t| t <= end);
        Self {
            times: self.times[..n].to_vec(),
            values: self.values[..n].to_vec(),
        }
    }
}

/// Value in force at time `t` on a step waveform.
///
/// Returns `None` when the node was never recorded (`values` is `None`) or
/// `t` precedes the first sample. From the last sample on, the last value
/// holds. `times` must be strictly increasing; the scan is linear.
pub fn value_at_time<'a, T>(t: f64, times: &[f64], values: Option<&'a [T]>) -> Option<&'a T> {
    let values = values?;
    let i = times
        .iter()
        .position(|&sample| t < sample)
        .unwrap_or(times.len());
    // i == 0: t is before the first sample
    values.get(i.checked_sub(1)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMES: [f64; 3] = [1.0, 2.0, 3.0];
    const VALUES: [char; 3] = ['a', 'b', 'c'];

    #[test]
    fn test_value_before_first_sample() {
        assert_eq!(value_at_time(0.0, &TIMES, Some(&VALUES[..])), None);
    }

    #[test]
    fn test_value_between_samples() {
        assert_eq!(value_at_time(1.5, &TIMES, Some(&VALUES[..])), Some(&'a'));
        assert_eq!(value_at_time(2.999, &TIMES, Some(&VALUES[..])), Some(&'b'));
    }

    #[test]
    fn test_value_on_sample_is_right_continuous() {
        assert_eq!(value_at_time(1.0, &TIMES, Some(&VALUES[..])), Some(&'a'));
        assert_eq!(value_at_time(2.0, &TIMES, Some(&VALUES[..])), Some(&'b'));
    }

    #[test]
    fn test_last_value_holds() {
        assert_eq!(value_at_time(3.0, &TIMES, Some(&VALUES[..])), Some(&'c'));
        assert_eq!(value_at_time(5.0, &TIMES, Some(&VALUES[..])), Some(&'c'));
    }

    #[test]
    fn test_unrecorded_node() {
        assert_eq!(value_at_time::<char>(1.5, &TIMES, None), None);
        assert_eq!(value_at_time::<char>(1.5, &[], Some(&[][..])), None);
    }

    #[test]
    fn test_waveform_validation() {
        assert!(matches!(
            Waveform::new(vec![0.0, 1.0], vec![LogicLevel::Low]),
            Err(GateLevelError::WaveformLength { times: 2, values: 1 })
        ));
        assert!(matches!(
            Waveform::new(vec![0.0, 2.0, 2.0], vec![1, 2, 3]),
            Err(GateLevelError::WaveformOrder { index: 2 })
        ));
    }

    #[test]
    fn test_waveform_value_at() {
        let wave = Waveform::new(
            vec![0.0, 1e-9, 2e-9],
            vec![LogicLevel::Low, LogicLevel::High, LogicLevel::Unknown],
        )
        .unwrap();
        assert_eq!(wave.value_at(1.5e-9), Some(&LogicLevel::High));
        assert_eq!(wave.value_at(-1.0), None);
        assert_eq!(wave.len(), 3);
    }

    #[test]
    fn test_logic_level_serde() {
        let json = serde_json::to_string(&[LogicLevel::Low, LogicLevel::HighZ]).unwrap();
        assert_eq!(json, r#"["0","Z"]"#);
        assert_eq!(LogicLevel::Unknown.to_string(), "X");
    }

    #[test]
    fn test_logic_level_numeric_wire_form() {
        let levels: Vec<LogicLevel> = serde_json::from_str(r#"[0, 1, "x", "Z", 1.0]"#).unwrap();
        assert_eq!(
            levels,
            vec![
                LogicLevel::Low,
                LogicLevel::High,
                LogicLevel::Unknown,
                LogicLevel::HighZ,
                LogicLevel::High
            ]
        );
        assert!(serde_json::from_str::<LogicLevel>("2").is_err());
        assert!(serde_json::from_str::<LogicLevel>(r#""H""#).is_err());

        let wave: Waveform<LogicLevel> =
            serde_json::from_str(r#"{"xvalues": [0, 1e-9], "yvalues": [0, 1]}"#).unwrap();
        assert_eq!(wave.value_at(1e-9), Some(&LogicLevel::High));
    }

    #[test]
    fn test_waveform_deserialize_is_validated() {
        let wave: Waveform<LogicLevel> =
            serde_json::from_str(r#"{"xvalues": [0, 1e-9], "yvalues": ["0", "1"]}"#).unwrap();
        assert_eq!(wave.value_at(2e-9), Some(&LogicLevel::High));

        let bad = serde_json::from_str::<Waveform<LogicLevel>>(
            r#"{"times": [1, 0], "values": ["0", "1"]}"#,
        );
        assert!(bad.is_err());
    }
}
