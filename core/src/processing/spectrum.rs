use crate::interface::SampleBuffer;
use crate::math::fft::FftHelper;
use crate::prelude::{
    ProcessingStage, StageConfig, StageError, StageInput, StageMetadata, StageOutput, StageResult,
};
use crate::processing::condition::detrend;
use crate::telemetry::log::LogManager;
use serde::{Deserialize, Serialize};

/// One-sided magnitude spectrum of a real capture.
///
/// Holds the first `N / 2` bins; magnitudes are scaled by `2 / N` so a tone
/// of amplitude `A` reads approximately `A` at its bin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spectrum {
    frequencies_hz: Vec<f64>,
    magnitudes: Vec<f64>,
    sample_rate_hz: f64,
    sample_count: usize,
}

impl Spectrum {
    pub fn frequencies_hz(&self) -> &[f64] {
        &self.frequencies_hz
    }

    pub fn magnitudes(&self) -> &[f64] {
        &self.magnitudes
    }

    pub fn sample_rate_hz(&self) -> f64 {
        self.sample_rate_hz
    }

    /// Length of the capture the spectrum was computed from.
    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    pub fn resolution_hz(&self) -> f64 {
        self.sample_rate_hz / self.sample_count as f64
    }

    pub fn len(&self) -> usize {
        self.magnitudes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.magnitudes.is_empty()
    }

    /// Frequency and magnitude of the strongest bin.
    pub fn peak(&self) -> Option<(f64, f64)> {
        self.magnitudes
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(idx, &mag)| (self.frequencies_hz[idx], mag))
    }
}

fn validate_rate(sample_rate_hz: f64) -> StageResult<()> {
    if sample_rate_hz.is_finite() && sample_rate_hz > 0.0 {
        Ok(())
    } else {
        Err(StageError::InvalidSampleRate)
    }
}

fn one_sided(fft: &mut FftHelper, conditioned: &[f64], sample_rate_hz: f64) -> (Vec<f64>, Vec<f64>) {
    let n = conditioned.len();
    let half = n / 2;
    let scale = 2.0 / n as f64;
    let resolution = sample_rate_hz / n as f64;

    let magnitudes = fft
        .forward(conditioned)
        .iter()
        .take(half)
        .map(|c| c.norm() * scale)
        .collect();
    let frequencies = (0..half).map(|k| k as f64 * resolution).collect();

    (frequencies, magnitudes)
}

/// Detrends `buffer` and returns its one-sided amplitude spectrum.
pub fn analyze(buffer: &SampleBuffer, sample_rate_hz: f64) -> StageResult<Spectrum> {
    validate_rate(sample_rate_hz)?;
    let conditioned = detrend(buffer.samples())?;

    let mut fft = FftHelper::new(conditioned.len());
    let (frequencies_hz, magnitudes) = one_sided(&mut fft, &conditioned, sample_rate_hz);

    Ok(Spectrum {
        frequencies_hz,
        magnitudes,
        sample_rate_hz,
        sample_count: conditioned.len(),
    })
}

/// Frequency-domain stage; keeps its FFT plan while successive captures share a length.
pub struct SpectrumStage {
    config: Option<StageConfig>,
    fft: Option<FftHelper>,
    logger: LogManager,
}

impl SpectrumStage {
    pub fn new() -> Self {
        Self {
            config: None,
            fft: None,
            logger: LogManager::new("spectrum"),
        }
    }

    /// Runs the stage and packages its output as a [`Spectrum`].
    pub fn spectrum(&mut self, input: StageInput) -> StageResult<Spectrum> {
        let sample_rate_hz = input.sample_rate_hz;
        let sample_count = input.samples.len();
        let output = self.execute(input)?;
        let frequencies_hz = output
            .metadata
            .frequencies_hz
            .ok_or_else(|| StageError::Internal("frequency axis missing".into()))?;

        Ok(Spectrum {
            frequencies_hz,
            magnitudes: output.samples,
            sample_rate_hz,
            sample_count,
        })
    }
}

impl Default for SpectrumStage {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessingStage for SpectrumStage {
    fn initialize(&mut self, config: &StageConfig) -> StageResult<()> {
        validate_rate(config.sample_rate_hz)?;
        self.config = Some(config.clone());
        Ok(())
    }

    fn execute(&mut self, input: StageInput) -> StageResult<StageOutput> {
        let config = self
            .config
            .as_ref()
            .ok_or_else(|| StageError::Internal("stage not initialized".into()))?;

        if (input.sample_rate_hz - config.sample_rate_hz).abs() > f64::EPSILON {
            return Err(StageError::InvalidInput(format!(
                "sample rate {} Hz does not match configured {} Hz",
                input.sample_rate_hz, config.sample_rate_hz
            )));
        }

        let conditioned = detrend(&input.samples)?;
        let n = conditioned.len();
        let fft = match self.fft.take() {
            Some(fft) if fft.len() == n => self.fft.insert(fft),
            _ => self.fft.insert(FftHelper::new(n)),
        };

        let (frequencies, magnitudes) = one_sided(fft, &conditioned, config.sample_rate_hz);

        let peak = magnitudes
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(idx, &mag)| (frequencies[idx], mag));
        let note = match peak {
            Some((freq, mag)) => format!("peak {:.1} Hz at {:.4} V over {} bins", freq, mag, magnitudes.len()),
            None => "spectrum has no bins".to_string(),
        };
        self.logger.record(&note);

        Ok(StageOutput {
            samples: magnitudes,
            metadata: StageMetadata {
                frequencies_hz: Some(frequencies),
                notes: vec![note],
            },
        })
    }

    fn cleanup(&mut self) {
        self.config = None;
        self.fft = None;
    }
}
