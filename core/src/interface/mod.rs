pub mod record;
pub mod render;
pub mod sample;

pub use record::MeasurementRecord;
pub use render::{Renderer, ScaleBounds};
pub use sample::{SampleBuffer, TimeAxis};
