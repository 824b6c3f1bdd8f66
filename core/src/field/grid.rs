use crate::field::records::RecordSet;
use crate::field::FieldError;
use crate::interface::{MeasurementRecord, ScaleBounds};
use crate::telemetry::log::LogManager;
use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};

/// A measurement with its power relative to the strongest point of the scan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedPoint {
    pub x: f64,
    pub y: f64,
    pub vpp: f64,
    pub power: f64,
    pub normalized_power: f64,
}

/// Normalized power arranged by position: rows are distinct `y` values and
/// columns distinct `x` values, both ascending. Positions absent from the
/// scan stay `None`; a measured zero is `Some(0.0)`.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldGrid {
    xs: Vec<f64>,
    ys: Vec<f64>,
    cells: Array2<Option<f64>>,
    points: Vec<NormalizedPoint>,
    max_power: f64,
}

/// Serializable snapshot of a [`FieldGrid`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSummary {
    pub xs_cm: Vec<f64>,
    pub ys_cm: Vec<f64>,
    pub rows: Vec<Vec<Option<f64>>>,
    pub max_power: f64,
    pub peak: Option<NormalizedPoint>,
    pub measured_cells: usize,
    pub scale: ScaleBounds,
}

fn distinct_sorted(values: impl Iterator<Item = f64>) -> Vec<f64> {
    let mut axis: Vec<f64> = values.map(|v| v + 0.0).collect();
    axis.sort_by(|a, b| a.total_cmp(b));
    axis.dedup_by(|a, b| a.total_cmp(b).is_eq());
    axis
}

/// Drops records superseded by a later one at the same position, keeping
/// input order for the rest.
fn latest_per_position(records: &[MeasurementRecord]) -> Vec<MeasurementRecord> {
    let mut seen = RecordSet::new();
    let mut kept: Vec<MeasurementRecord> = records
        .iter()
        .rev()
        .filter(|record| seen.insert(**record).is_none())
        .copied()
        .collect();
    kept.reverse();

    let dropped = records.len() - kept.len();
    if dropped > 0 {
        LogManager::new("field-grid").caution(&format!(
            "{dropped} records superseded by a later measurement at the same position"
        ));
    }
    kept
}

fn axis_index(axis: &[f64], value: f64) -> Option<usize> {
    let value = value + 0.0;
    axis.binary_search_by(|probe| probe.total_cmp(&value)).ok()
}

/// Squares each amplitude, normalizes by the largest power, and lays the
/// results out on a position grid.
///
/// If `records` repeats a position, only the later record is kept, both for
/// the cell and for the peak power.
pub fn aggregate(records: &[MeasurementRecord]) -> Result<FieldGrid, FieldError> {
    if records.is_empty() {
        return Err(FieldError::NoData);
    }
    let records = latest_per_position(records);
    let records = records.as_slice();
    if let Some(bad) = records.iter().find(|r| !r.vpp.is_finite()) {
        return Err(FieldError::NonFiniteAmplitude {
            x: bad.x,
            y: bad.y,
            vpp: bad.vpp,
        });
    }

    let max_power = records
        .iter()
        .map(MeasurementRecord::power)
        .fold(0.0_f64, f64::max);
    if max_power <= 0.0 {
        return Err(FieldError::DegenerateInput {
            records: records.len(),
        });
    }

    let points: Vec<NormalizedPoint> = records
        .iter()
        .map(|record| {
            let power = record.power();
            NormalizedPoint {
                x: record.x,
                y: record.y,
                vpp: record.vpp,
                power,
                normalized_power: power / max_power,
            }
        })
        .collect();

    let xs = distinct_sorted(records.iter().map(|r| r.x));
    let ys = distinct_sorted(records.iter().map(|r| r.y));
    let mut cells = Array2::from_elem((ys.len(), xs.len()), None);
    for point in &points {
        if let (Some(row), Some(col)) = (axis_index(&ys, point.y), axis_index(&xs, point.x)) {
            cells[[row, col]] = Some(point.normalized_power);
        }
    }

    let grid = FieldGrid {
        xs,
        ys,
        cells,
        points,
        max_power,
    };
    LogManager::new("field-grid").record(&format!(
        "{} x {} grid, {} of {} cells measured, peak power {:.4} V^2",
        grid.rows(),
        grid.cols(),
        grid.measured_cells(),
        grid.rows() * grid.cols(),
        max_power
    ));
    Ok(grid)
}

impl FieldGrid {
    /// Distinct x positions (columns), ascending.
    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    /// Distinct y positions (rows), ascending.
    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    pub fn rows(&self) -> usize {
        self.ys.len()
    }

    pub fn cols(&self) -> usize {
        self.xs.len()
    }

    pub fn cells(&self) -> ArrayView2<'_, Option<f64>> {
        self.cells.view()
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<f64> {
        self.cells.get([row, col]).copied().flatten()
    }

    pub fn value_at(&self, x: f64, y: f64) -> Option<f64> {
        let row = axis_index(&self.ys, y)?;
        let col = axis_index(&self.xs, x)?;
        self.cell(row, col)
    }

    /// Normalized points in input order, one per position.
    pub fn points(&self) -> &[NormalizedPoint] {
        &self.points
    }

    pub fn max_power(&self) -> f64 {
        self.max_power
    }

    pub fn measured_cells(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// First point reaching the maximum power.
    pub fn peak(&self) -> Option<&NormalizedPoint> {
        self.points.iter().find(|p| p.power >= self.max_power)
    }

    pub fn summary(&self) -> FieldSummary {
        FieldSummary {
            xs_cm: self.xs.clone(),
            ys_cm: self.ys.clone(),
            rows: self.cells.rows().into_iter().map(|row| row.to_vec()).collect(),
            max_power: self.max_power,
            peak: self.peak().copied(),
            measured_cells: self.measured_cells(),
            scale: ScaleBounds::NORMALIZED,
        }
    }
}

impl FieldSummary {
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(raw: &[(f64, f64, f64)]) -> Vec<MeasurementRecord> {
        raw.iter()
            .map(|&(x, y, vpp)| MeasurementRecord::new(x, y, vpp))
            .collect()
    }

    #[test]
    fn normalizes_power_against_peak() {
        let grid = aggregate(&records(&[(0.0, 0.0, 1.0), (1.0, 0.0, 2.0), (0.0, 1.0, 0.5)])).unwrap();

        let normalized: Vec<f64> = grid.points().iter().map(|p| p.normalized_power).collect();
        assert_eq!(normalized, vec![0.25, 1.0, 0.0625]);
        assert_eq!(grid.max_power(), 4.0);

        assert_eq!(grid.value_at(0.0, 0.0), Some(0.25));
        assert_eq!(grid.value_at(1.0, 0.0), Some(1.0));
        assert_eq!(grid.value_at(0.0, 1.0), Some(0.0625));
        assert_eq!(grid.value_at(1.0, 1.0), None);
        assert_eq!(grid.measured_cells(), 3);
    }

    #[test]
    fn axes_are_ascending_regardless_of_input_order() {
        let grid = aggregate(&records(&[
            (3.0, 2.0, 1.0),
            (1.0, 5.0, 1.0),
            (2.0, 0.0, 1.0),
            (1.0, 2.0, 1.0),
        ]))
        .unwrap();

        assert_eq!(grid.xs(), &[1.0, 2.0, 3.0]);
        assert_eq!(grid.ys(), &[0.0, 2.0, 5.0]);
        assert_eq!(grid.cell(0, 1), Some(1.0));
        assert_eq!(grid.cell(1, 0), Some(1.0));
        assert_eq!(grid.cell(1, 2), Some(1.0));
        assert_eq!(grid.cell(2, 0), Some(1.0));
        assert_eq!(grid.cell(0, 0), None);
    }

    #[test]
    fn measured_zero_differs_from_missing() {
        let grid = aggregate(&records(&[(0.0, 0.0, 0.0), (1.0, 1.0, 3.0)])).unwrap();
        assert_eq!(grid.value_at(0.0, 0.0), Some(0.0));
        assert_eq!(grid.value_at(1.0, 0.0), None);
    }

    #[test]
    fn repeated_position_keeps_later_record_for_peak() {
        let grid = aggregate(&records(&[(0.0, 0.0, 2.0), (0.0, 0.0, 1.0), (1.0, 0.0, 0.5)])).unwrap();

        assert_eq!(grid.max_power(), 1.0);
        assert_eq!(grid.value_at(0.0, 0.0), Some(1.0));
        assert_eq!(grid.value_at(1.0, 0.0), Some(0.25));
        assert_eq!(grid.points().len(), 2);

        let peak = grid.peak().unwrap();
        assert_eq!((peak.x, peak.y, peak.vpp), (0.0, 0.0, 1.0));
        let at_peak = grid.cells().iter().filter(|cell| **cell == Some(1.0)).count();
        assert_eq!(at_peak, 1);
    }

    #[test]
    fn empty_input_is_no_data() {
        assert!(matches!(aggregate(&[]), Err(FieldError::NoData)));
    }

    #[test]
    fn all_zero_amplitudes_are_degenerate() {
        let result = aggregate(&records(&[(0.0, 0.0, 0.0), (1.0, 0.0, 0.0)]));
        assert!(matches!(result, Err(FieldError::DegenerateInput { records: 2 })));
    }

    #[test]
    fn non_finite_amplitude_is_rejected() {
        let result = aggregate(&records(&[(0.0, 0.0, 1.0), (2.0, 0.0, f64::NAN)]));
        assert!(matches!(result, Err(FieldError::NonFiniteAmplitude { .. })));
    }

    #[test]
    fn summary_reports_peak_and_rows() {
        let grid = aggregate(&records(&[(0.0, 0.0, 1.0), (1.0, 0.0, 2.0), (0.0, 1.0, 0.5)])).unwrap();
        let summary = grid.summary();

        assert_eq!(summary.rows, vec![vec![Some(0.25), Some(1.0)], vec![Some(0.0625), None]]);
        let peak = summary.peak.unwrap();
        assert_eq!((peak.x, peak.y), (1.0, 0.0));
        assert_eq!(summary.scale, ScaleBounds::NORMALIZED);

        let json = summary.to_json_pretty().unwrap();
        assert!(json.contains("\"measured_cells\": 3"));
    }
}
