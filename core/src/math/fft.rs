use num_complex::Complex64;
use rustfft::{num_traits::Zero, Fft, FftPlanner};

/// Helper that wraps the `rustfft` planner for reuse across captures of the same length.
pub struct FftHelper {
    fft: std::sync::Arc<dyn Fft<f64>>,
    scratch: Vec<Complex64>,
}

impl FftHelper {
    pub fn new(size: usize) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(size);
        let scratch = vec![Complex64::zero(); fft.get_inplace_scratch_len()];
        Self { fft, scratch }
    }

    pub fn len(&self) -> usize {
        self.fft.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fft.len() == 0
    }

    /// Forward transform of a real sequence. Input shorter than the planned
    /// size is zero-padded, longer input is truncated.
    pub fn forward(&mut self, input: &[f64]) -> Vec<Complex64> {
        let mut buffer: Vec<Complex64> = input
            .iter()
            .take(self.fft.len())
            .map(|&value| Complex64::new(value, 0.0))
            .collect();
        buffer.resize(self.fft.len(), Complex64::zero());

        self.fft.process_with_scratch(&mut buffer, &mut self.scratch);
        buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fft_helper_returns_same_length() {
        let mut helper = FftHelper::new(4);
        let output = helper.forward(&[1.0, 0.0, -1.0, 0.0]);
        assert_eq!(output.len(), 4);
    }

    #[test]
    fn impulse_has_flat_spectrum() {
        let mut helper = FftHelper::new(8);
        let output = helper.forward(&[1.0]);
        assert_eq!(output.len(), 8);
        for bin in output {
            assert!((bin.norm() - 1.0).abs() < 1e-12);
        }
    }
}
