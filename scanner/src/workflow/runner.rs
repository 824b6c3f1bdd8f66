use crate::workflow::config::WorkflowConfig;
use anyhow::Context;
use fieldcore::acquisition::{capture_channel, DeviceInventory};
use fieldcore::field::{aggregate, load_log, FieldGrid, ParseSummary};
use fieldcore::interface::{SampleBuffer, TimeAxis};
use fieldcore::prelude::{ProcessingStage, StageConfig, StageInput};
use fieldcore::processing::{ConditionStage, Spectrum, SpectrumStage};
use std::path::Path;

#[derive(Debug)]
pub struct CaptureResult {
    pub raw: SampleBuffer,
    pub conditioned: SampleBuffer,
    pub time_axis: TimeAxis,
    pub notes: Vec<String>,
}

#[derive(Debug)]
pub struct FieldResult {
    pub grid: FieldGrid,
    pub parse_summary: ParseSummary,
}

#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    /// Acquires one capture and detrends it for display.
    pub fn capture<I: DeviceInventory>(
        &self,
        inventory: &mut I,
        sample_rate_hz: u32,
        duration_seconds: u32,
    ) -> anyhow::Result<CaptureResult> {
        let raw = capture_channel(
            inventory,
            &self.config.capture,
            sample_rate_hz,
            duration_seconds,
            &self.config.poll_wait(),
        )
        .context("acquiring samples")?;

        let stage_config = StageConfig {
            sample_rate_hz: raw.sample_rate_hz(),
        };
        let mut condition_stage = ConditionStage::new();
        condition_stage
            .initialize(&stage_config)
            .context("initializing condition stage")?;
        let condition_output = condition_stage
            .execute(StageInput {
                samples: raw.samples().to_vec(),
                sample_rate_hz: raw.sample_rate_hz(),
            })
            .context("executing condition stage")?;
        condition_stage.cleanup();

        let conditioned = raw
            .with_samples(condition_output.samples)
            .context("packaging conditioned samples")?;
        let time_axis = conditioned.time_axis();

        Ok(CaptureResult {
            raw,
            conditioned,
            time_axis,
            notes: condition_output.metadata.notes,
        })
    }

    /// One-sided spectrum of a capture. Detrending is reapplied inside the
    /// stage, so raw and conditioned captures give the same result.
    pub fn spectrum(&self, buffer: &SampleBuffer) -> anyhow::Result<Spectrum> {
        let stage_config = StageConfig {
            sample_rate_hz: buffer.sample_rate_hz(),
        };
        let mut spectrum_stage = SpectrumStage::new();
        spectrum_stage
            .initialize(&stage_config)
            .context("initializing spectrum stage")?;
        let spectrum = spectrum_stage
            .spectrum(StageInput {
                samples: buffer.samples().to_vec(),
                sample_rate_hz: buffer.sample_rate_hz(),
            })
            .context("executing spectrum stage")?;
        spectrum_stage.cleanup();
        Ok(spectrum)
    }

    /// Parses a scan log and aggregates it into a normalized field grid.
    /// An unreadable log is reported and treated as empty.
    pub fn field(&self, log_path: &Path) -> anyhow::Result<FieldResult> {
        let parsed = load_log(log_path);
        let grid = aggregate(&parsed.records())
            .with_context(|| format!("aggregating field from {}", log_path.display()))?;
        Ok(FieldResult {
            grid,
            parse_summary: parsed.summary,
        })
    }
}
