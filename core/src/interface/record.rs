use serde::{Deserialize, Serialize};

/// One scan position (centimetres) and the peak-to-peak voltage measured there.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeasurementRecord {
    pub x: f64,
    pub y: f64,
    pub vpp: f64,
}

impl MeasurementRecord {
    pub fn new(x: f64, y: f64, vpp: f64) -> Self {
        Self { x, y, vpp }
    }

    /// Peak-to-peak voltage squared, used as the field intensity proxy.
    pub fn power(&self) -> f64 {
        self.vpp * self.vpp
    }
}
