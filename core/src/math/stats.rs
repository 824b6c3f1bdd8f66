/// Least-squares line `value = intercept + slope * index` over sample indices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    pub fn at(&self, index: usize) -> f64 {
        self.intercept + self.slope * index as f64
    }
}

pub struct StatsHelper;

impl StatsHelper {
    pub fn mean(samples: &[f64]) -> f64 {
        if samples.is_empty() {
            return 0.0;
        }
        samples.iter().sum::<f64>() / samples.len() as f64
    }

    /// Fits a line against the sample index. Returns `None` for fewer than two
    /// samples, where the slope is undetermined.
    pub fn linear_fit(samples: &[f64]) -> Option<LinearFit> {
        let n = samples.len();
        if n < 2 {
            return None;
        }

        let index_mean = (n - 1) as f64 / 2.0;
        let value_mean = Self::mean(samples);

        let (covariance, variance) = samples.iter().enumerate().fold(
            (0.0, 0.0),
            |(cov, var), (idx, &value)| {
                let dx = idx as f64 - index_mean;
                (cov + dx * (value - value_mean), var + dx * dx)
            },
        );

        let slope = covariance / variance;
        Some(LinearFit {
            slope,
            intercept: value_mean - slope * index_mean,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_empty_slice_is_zero() {
        assert_eq!(StatsHelper::mean(&[]), 0.0);
        assert_eq!(StatsHelper::mean(&[1.0, 2.0, 6.0]), 3.0);
    }

    #[test]
    fn linear_fit_recovers_exact_line() {
        let samples: Vec<f64> = (0..10).map(|i| 3.0 - 0.5 * i as f64).collect();
        let fit = StatsHelper::linear_fit(&samples).unwrap();
        assert!((fit.slope + 0.5).abs() < 1e-12);
        assert!((fit.intercept - 3.0).abs() < 1e-12);
        assert!((fit.at(4) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn linear_fit_needs_two_points() {
        assert!(StatsHelper::linear_fit(&[]).is_none());
        assert!(StatsHelper::linear_fit(&[1.0]).is_none());
    }
}
