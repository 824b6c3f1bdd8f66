use crate::prelude::{StageError, StageResult};
use serde::{Deserialize, Serialize};

/// Voltage samples captured from a single analog channel.
///
/// Immutable once built; downstream stages produce new buffers instead of
/// mutating this one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleBuffer {
    samples: Vec<f64>,
    sample_rate_hz: f64,
    duration_seconds: f64,
}

impl SampleBuffer {
    pub fn new(samples: Vec<f64>, sample_rate_hz: f64, duration_seconds: f64) -> StageResult<Self> {
        if !(sample_rate_hz.is_finite() && sample_rate_hz > 0.0) {
            return Err(StageError::InvalidSampleRate);
        }
        if !(duration_seconds.is_finite() && duration_seconds > 0.0) {
            return Err(StageError::InvalidInput(format!(
                "duration must be positive, got {duration_seconds}"
            )));
        }
        if samples.is_empty() {
            return Err(StageError::InsufficientSamples {
                required: 1,
                actual: 0,
            });
        }
        Ok(Self {
            samples,
            sample_rate_hz,
            duration_seconds,
        })
    }

    /// Builds a buffer sharing this buffer's rate and duration.
    pub fn with_samples(&self, samples: Vec<f64>) -> StageResult<Self> {
        Self::new(samples, self.sample_rate_hz, self.duration_seconds)
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn sample_rate_hz(&self) -> f64 {
        self.sample_rate_hz
    }

    pub fn duration_seconds(&self) -> f64 {
        self.duration_seconds
    }

    pub fn time_axis(&self) -> TimeAxis {
        TimeAxis::linspace(self.duration_seconds, self.samples.len())
    }
}

/// Evenly spaced sample instants over `[0, duration]`, both ends included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeAxis {
    values: Vec<f64>,
}

impl TimeAxis {
    pub fn linspace(duration_seconds: f64, points: usize) -> Self {
        let values = match points {
            0 => Vec::new(),
            1 => vec![0.0],
            _ => {
                let step = duration_seconds / (points - 1) as f64;
                (0..points).map(|idx| idx as f64 * step).collect()
            }
        };
        Self { values }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
