//! Signal-conditioning, spectral analysis, and spatial field aggregation for
//! ultrasonic field measurements.
//!
//! Two independent pipelines live here: a single-point capture path
//! (acquisition → conditioning → spectrum) and a post-scan field path
//! (log parsing → normalized power grid). Hardware and rendering sit behind
//! the traits in [`acquisition`] and [`interface::render`].

pub mod acquisition;
pub mod field;
pub mod interface;
pub mod math;
pub mod prelude;
pub mod processing;
pub mod telemetry;

pub use prelude::{ProcessingStage, StageInput, StageOutput};
