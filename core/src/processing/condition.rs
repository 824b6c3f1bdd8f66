use crate::interface::SampleBuffer;
use crate::math::stats::StatsHelper;
use crate::prelude::{
    ProcessingStage, StageConfig, StageError, StageInput, StageMetadata, StageOutput, StageResult,
};
use crate::telemetry::log::LogManager;

/// Subtracts the least-squares line from `samples`, removing DC bias and
/// linear drift in one pass.
pub fn detrend(samples: &[f64]) -> StageResult<Vec<f64>> {
    let fit = StatsHelper::linear_fit(samples).ok_or(StageError::InsufficientSamples {
        required: 2,
        actual: samples.len(),
    })?;

    Ok(samples
        .iter()
        .enumerate()
        .map(|(idx, &value)| value - fit.at(idx))
        .collect())
}

/// Returns a detrended copy of `buffer` with the same rate and duration.
pub fn condition(buffer: &SampleBuffer) -> StageResult<SampleBuffer> {
    buffer.with_samples(detrend(buffer.samples())?)
}

/// Detrending stage applied to every raw capture before display or analysis.
pub struct ConditionStage {
    config: Option<StageConfig>,
    logger: LogManager,
}

impl ConditionStage {
    pub fn new() -> Self {
        Self {
            config: None,
            logger: LogManager::new("condition"),
        }
    }
}

impl Default for ConditionStage {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessingStage for ConditionStage {
    fn initialize(&mut self, config: &StageConfig) -> StageResult<()> {
        if !(config.sample_rate_hz.is_finite() && config.sample_rate_hz > 0.0) {
            return Err(StageError::InvalidSampleRate);
        }
        self.config = Some(config.clone());
        Ok(())
    }

    fn execute(&mut self, input: StageInput) -> StageResult<StageOutput> {
        if self.config.is_none() {
            return Err(StageError::Internal("stage not initialized".into()));
        }

        let fit = StatsHelper::linear_fit(&input.samples).ok_or(
            StageError::InsufficientSamples {
                required: 2,
                actual: input.samples.len(),
            },
        )?;
        let samples = detrend(&input.samples)?;

        let note = format!(
            "removed offset {:.4} V, drift {:.3e} V/sample",
            fit.intercept, fit.slope
        );
        self.logger.record(&note);

        Ok(StageOutput {
            samples,
            metadata: StageMetadata {
                notes: vec![note],
                ..Default::default()
            },
        })
    }

    fn cleanup(&mut self) {
        self.config = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn residual_slope(samples: &[f64]) -> f64 {
        StatsHelper::linear_fit(samples).unwrap().slope
    }

    #[test]
    fn detrend_removes_offset_and_drift() {
        let samples: Vec<f64> = (0..256)
            .map(|i| 1.5 + 0.01 * i as f64 + (i as f64 * 0.3).sin())
            .collect();
        let conditioned = detrend(&samples).unwrap();

        assert_eq!(conditioned.len(), samples.len());
        assert!(residual_slope(&conditioned).abs() < 1e-12);
        assert!(StatsHelper::mean(&conditioned).abs() < 1e-12);
    }

    #[test]
    fn detrend_of_pure_line_is_zero() {
        let samples: Vec<f64> = (0..16).map(|i| -2.0 + 0.25 * i as f64).collect();
        for value in detrend(&samples).unwrap() {
            assert!(value.abs() < 1e-12);
        }
    }

    #[test]
    fn detrend_is_idempotent() {
        let samples: Vec<f64> = (0..64).map(|i| ((i * 7) % 5) as f64 + 0.1 * i as f64).collect();
        let once = detrend(&samples).unwrap();
        let twice = detrend(&once).unwrap();
        for (a, b) in once.iter().zip(&twice) {
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn detrend_rejects_single_sample() {
        assert_eq!(
            detrend(&[1.0]),
            Err(StageError::InsufficientSamples {
                required: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn condition_preserves_buffer_shape() {
        let buffer = SampleBuffer::new(vec![1.0, 2.0, 4.0, 3.0], 4.0, 1.0).unwrap();
        let conditioned = condition(&buffer).unwrap();
        assert_eq!(conditioned.len(), 4);
        assert_eq!(conditioned.sample_rate_hz(), 4.0);
        assert_eq!(conditioned.duration_seconds(), 1.0);
        assert!(residual_slope(conditioned.samples()).abs() < 1e-12);
    }

    #[test]
    fn condition_stage_reports_removed_trend() {
        let mut stage = ConditionStage::new();
        stage
            .initialize(&StageConfig {
                sample_rate_hz: 100.0,
            })
            .unwrap();

        let output = stage
            .execute(StageInput {
                samples: vec![2.0, 2.5, 3.0, 3.5],
                sample_rate_hz: 100.0,
            })
            .unwrap();

        assert!(output.samples.iter().all(|v| v.abs() < 1e-12));
        assert!(output.metadata.notes[0].starts_with("removed offset 2.0000 V"));
        stage.cleanup();
    }

    #[test]
    fn condition_stage_requires_initialization() {
        let mut stage = ConditionStage::new();
        let result = stage.execute(StageInput {
            samples: vec![0.0, 1.0],
            sample_rate_hz: 10.0,
        });
        assert!(matches!(result, Err(StageError::Internal(_))));
    }
}
