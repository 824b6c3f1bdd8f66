//! Post-scan field mapping: parse the scanner's text log into measurement
//! records, then normalize and arrange them on a position grid.

pub mod grid;
pub mod parser;
pub mod records;

use std::path::PathBuf;

pub use grid::{aggregate, FieldGrid, FieldSummary, NormalizedPoint};
pub use parser::{load_log, parse_lines, read_log, LogLine, ParseSummary, ParsedLog, ParserState};
pub use records::RecordSet;

/// Failures of the field-mapping pipeline.
#[derive(thiserror::Error, Debug)]
pub enum FieldError {
    #[error("log source {} unavailable: {reason}", .path.display())]
    SourceUnavailable { path: PathBuf, reason: String },
    #[error("no measurement records found")]
    NoData,
    #[error("all {records} recorded amplitudes are zero; normalized power is undefined")]
    DegenerateInput { records: usize },
    #[error("non-finite amplitude {vpp} at X: {x} cm, Y: {y} cm")]
    NonFiniteAmplitude { x: f64, y: f64, vpp: f64 },
}
