use serde::{Deserialize, Serialize};

/// Shared configuration for each processing stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageConfig {
    pub sample_rate_hz: f64,
}

/// Input payload for a processing stage.
#[derive(Debug, Clone)]
pub struct StageInput {
    pub samples: Vec<f64>,
    pub sample_rate_hz: f64,
}

/// Output produced by each stage.
#[derive(Debug, Clone)]
pub struct StageOutput {
    pub samples: Vec<f64>,
    pub metadata: StageMetadata,
}

/// Metadata used for chaining stages and telemetry.
#[derive(Debug, Clone, Default)]
pub struct StageMetadata {
    /// Frequency axis matching `samples` when the stage works in the frequency domain.
    pub frequencies_hz: Option<Vec<f64>>,
    pub notes: Vec<String>,
}

/// Common error type for stage execution.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum StageError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("at least {required} samples required, got {actual}")]
    InsufficientSamples { required: usize, actual: usize },
    #[error("sample rate must be greater than zero")]
    InvalidSampleRate,
    #[error("internal failure: {0}")]
    Internal(String),
}

pub type StageResult<T> = Result<T, StageError>;

/// Trait describing signal-processing stages run by the capture workflow.
pub trait ProcessingStage {
    fn initialize(&mut self, config: &StageConfig) -> StageResult<()>;
    fn execute(&mut self, input: StageInput) -> StageResult<StageOutput>;
    fn cleanup(&mut self);
}
