use anyhow::Context;
use fieldcore::acquisition::ScanSettings;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Parameters of the simulated ultrasonic receiver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub tone_hz: f64,
    pub amplitude_v: f64,
    pub dc_offset_v: f64,
    pub drift_v_per_s: f64,
    pub noise_v: f64,
    pub seed: u64,
    /// Status checks that report the scan as still running.
    pub scan_polls: u32,
    /// Whether discovery finds the simulated device at all.
    pub available: bool,
    /// Status check on which the device reports a fault.
    pub fault_on_poll: Option<u32>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tone_hz: 40_000.0,
            amplitude_v: 1.0,
            dc_offset_v: 0.15,
            drift_v_per_s: 0.05,
            noise_v: 0.02,
            seed: 0,
            scan_polls: 3,
            available: true,
            fault_on_poll: None,
        }
    }
}

/// Tone plus offset, drift, and uniform noise, clipped to the scan's input range.
pub fn build_samples(config: &SimulationConfig, settings: &ScanSettings) -> anyhow::Result<Vec<f64>> {
    let count = settings
        .samples_per_channel
        .checked_mul(settings.channel_count())
        .context("overflow computing sample count for simulated scan")?;
    let rate = f64::from(settings.sample_rate_hz);
    let full_scale = settings.range.full_scale();

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut samples = Vec::with_capacity(count);
    for idx in 0..count {
        let t = idx as f64 / rate;
        let jitter = if config.noise_v > 0.0 {
            rng.gen_range(-config.noise_v..config.noise_v)
        } else {
            0.0
        };
        let value = config.dc_offset_v
            + config.drift_v_per_s * t
            + config.amplitude_v * (2.0 * PI * config.tone_hz * t).sin()
            + jitter;
        samples.push(value.clamp(-full_scale, full_scale));
    }

    Ok(samples)
}
