pub mod condition;
pub mod spectrum;

pub use condition::{condition, detrend, ConditionStage};
pub use spectrum::{analyze, Spectrum, SpectrumStage};
