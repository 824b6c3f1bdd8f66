use crate::field::FieldGrid;
use crate::interface::sample::{SampleBuffer, TimeAxis};
use crate::processing::Spectrum;
use serde::{Deserialize, Serialize};

/// Fixed colour-scale bounds handed to the renderer with a field grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleBounds {
    pub min: f64,
    pub max: f64,
}

impl ScaleBounds {
    /// `[0.0, 1.0]`, keeping independent runs comparable.
    pub const NORMALIZED: ScaleBounds = ScaleBounds { min: 0.0, max: 1.0 };
}

impl Default for ScaleBounds {
    fn default() -> Self {
        Self::NORMALIZED
    }
}

/// Presentation collaborator. Implementations consume prepared data and
/// never feed anything back into the pipelines.
pub trait Renderer {
    type Error: std::error::Error + Send + Sync + 'static;

    fn render_waveform(&self, axis: &TimeAxis, buffer: &SampleBuffer) -> Result<(), Self::Error>;
    fn render_spectrum(&self, spectrum: &Spectrum) -> Result<(), Self::Error>;
    fn render_field(&self, grid: &FieldGrid, scale: ScaleBounds) -> Result<(), Self::Error>;
}
