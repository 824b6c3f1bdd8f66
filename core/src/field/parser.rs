use crate::field::records::RecordSet;
use crate::field::FieldError;
use crate::interface::MeasurementRecord;
use crate::telemetry::log::LogManager;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const COORDINATE_ANCHOR: &str = "Move to X:";
const AMPLITUDE_ANCHOR: &str = "-> Recorded Vpp:";

/// Classification of a single scanner log line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LogLine {
    /// `Move to X: <x> cm, Y: <y> cm`
    Coordinate { x: f64, y: f64 },
    /// `-> Recorded Vpp: <vpp> V`
    Amplitude(f64),
    Other,
}

impl LogLine {
    /// Patterns may appear anywhere in the line. A line carrying both is a
    /// coordinate announcement.
    pub fn classify(line: &str) -> Self {
        if let Some((x, y)) = find_pattern(line, COORDINATE_ANCHOR, coordinate_tail) {
            return LogLine::Coordinate { x, y };
        }
        if let Some(vpp) = find_pattern(line, AMPLITUDE_ANCHOR, amplitude_tail) {
            return LogLine::Amplitude(vpp);
        }
        LogLine::Other
    }
}

/// Minimal forward-only reader over the remainder of a line.
struct Cursor<'a> {
    rest: &'a str,
}

impl<'a> Cursor<'a> {
    fn skip_whitespace(&mut self) {
        self.rest = self.rest.trim_start();
    }

    fn literal(&mut self, expected: &str) -> Option<()> {
        self.rest = self.rest.strip_prefix(expected)?;
        Some(())
    }

    /// Unsigned decimal: one or more digits and dots.
    fn number(&mut self) -> Option<f64> {
        let end = self
            .rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(self.rest.len());
        if end == 0 {
            return None;
        }
        let value = self.rest[..end].parse::<f64>().ok()?;
        self.rest = &self.rest[end..];
        Some(value)
    }
}

fn find_pattern<T>(line: &str, anchor: &str, tail: fn(&mut Cursor) -> Option<T>) -> Option<T> {
    line.match_indices(anchor).find_map(|(idx, _)| {
        let mut cursor = Cursor {
            rest: &line[idx + anchor.len()..],
        };
        tail(&mut cursor)
    })
}

fn coordinate_tail(cursor: &mut Cursor) -> Option<(f64, f64)> {
    cursor.skip_whitespace();
    let x = cursor.number()?;
    cursor.skip_whitespace();
    cursor.literal("cm,")?;
    cursor.skip_whitespace();
    cursor.literal("Y:")?;
    cursor.skip_whitespace();
    let y = cursor.number()?;
    cursor.skip_whitespace();
    cursor.literal("cm")?;
    Some((x, y))
}

fn amplitude_tail(cursor: &mut Cursor) -> Option<f64> {
    cursor.skip_whitespace();
    let vpp = cursor.number()?;
    cursor.skip_whitespace();
    cursor.literal("V")?;
    Some(vpp)
}

/// Line counters gathered while parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseSummary {
    pub lines: usize,
    pub coordinate_lines: usize,
    pub amplitude_lines: usize,
    /// Amplitude lines with no pending coordinate; dropped.
    pub stray_amplitudes: usize,
    /// Coordinates replaced by a later coordinate, or left pending at end of input.
    pub unmatched_coordinates: usize,
    /// Records that replaced an earlier record at the same position.
    pub overwritten_records: usize,
}

/// Result of parsing a scanner log.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedLog {
    pub records: RecordSet,
    pub summary: ParseSummary,
}

impl ParsedLog {
    pub fn records(&self) -> Vec<MeasurementRecord> {
        self.records.to_records()
    }
}

/// Where the parser stands between lines.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ParserState {
    #[default]
    AwaitingCoordinate,
    AwaitingAmplitude { x: f64, y: f64 },
}

impl ParserState {
    /// Consumes one classified line, updating `log` and returning the next state.
    pub fn advance(self, line: LogLine, log: &mut ParsedLog) -> ParserState {
        log.summary.lines += 1;
        match (self, line) {
            (state, LogLine::Coordinate { x, y }) => {
                log.summary.coordinate_lines += 1;
                if let ParserState::AwaitingAmplitude { .. } = state {
                    log.summary.unmatched_coordinates += 1;
                }
                ParserState::AwaitingAmplitude { x, y }
            }
            (ParserState::AwaitingAmplitude { x, y }, LogLine::Amplitude(vpp)) => {
                log.summary.amplitude_lines += 1;
                if log.records.insert(MeasurementRecord::new(x, y, vpp)).is_some() {
                    log.summary.overwritten_records += 1;
                }
                ParserState::AwaitingCoordinate
            }
            (ParserState::AwaitingCoordinate, LogLine::Amplitude(_)) => {
                log.summary.amplitude_lines += 1;
                log.summary.stray_amplitudes += 1;
                ParserState::AwaitingCoordinate
            }
            (state, LogLine::Other) => state,
        }
    }
}

/// Folds scanner log lines into measurement records.
pub fn parse_lines<I, S>(lines: I) -> ParsedLog
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let (state, mut log) = lines.into_iter().fold(
        (ParserState::AwaitingCoordinate, ParsedLog::default()),
        |(state, mut log), line| {
            let next = state.advance(LogLine::classify(line.as_ref()), &mut log);
            (next, log)
        },
    );

    if let ParserState::AwaitingAmplitude { .. } = state {
        log.summary.unmatched_coordinates += 1;
    }
    log
}

/// Reads and parses a whole log file in one pass.
pub fn read_log<P: AsRef<Path>>(path: P) -> Result<ParsedLog, FieldError> {
    let path_ref = path.as_ref();
    let contents = fs::read_to_string(path_ref).map_err(|err| FieldError::SourceUnavailable {
        path: path_ref.to_path_buf(),
        reason: err.to_string(),
    })?;

    let parsed = parse_lines(contents.lines());
    let logger = LogManager::new("field-log");
    logger.record(&format!(
        "{}: {} records from {} lines",
        path_ref.display(),
        parsed.records.len(),
        parsed.summary.lines
    ));
    if parsed.summary.stray_amplitudes > 0 {
        logger.detail(&format!(
            "ignored {} amplitude lines without a preceding position",
            parsed.summary.stray_amplitudes
        ));
    }
    if parsed.summary.unmatched_coordinates > 0 {
        logger.detail(&format!(
            "{} positions had no recorded amplitude",
            parsed.summary.unmatched_coordinates
        ));
    }
    if parsed.summary.overwritten_records > 0 {
        logger.caution(&format!(
            "{} positions were measured more than once; kept the latest value",
            parsed.summary.overwritten_records
        ));
    }
    Ok(parsed)
}

/// Like [`read_log`], but an unreadable source is reported and yields an
/// empty result instead of an error.
pub fn load_log<P: AsRef<Path>>(path: P) -> ParsedLog {
    match read_log(path) {
        Ok(parsed) => parsed,
        Err(err) => {
            log::error!("{err}");
            ParsedLog::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn classifies_scanner_lines() {
        assert_eq!(
            LogLine::classify("Move to X: 1.5 cm, Y: 2.0 cm"),
            LogLine::Coordinate { x: 1.5, y: 2.0 }
        );
        assert_eq!(
            LogLine::classify("[12:00:01] Move to X:3cm,Y:4.25cm ..."),
            LogLine::Coordinate { x: 3.0, y: 4.25 }
        );
        assert_eq!(
            LogLine::classify("  -> Recorded Vpp: 0.734 V"),
            LogLine::Amplitude(0.734)
        );
        assert_eq!(LogLine::classify("Scan started"), LogLine::Other);
        assert_eq!(LogLine::classify("Move to X: -1.0 cm, Y: 2.0 cm"), LogLine::Other);
        assert_eq!(LogLine::classify("-> Recorded Vpp: . V"), LogLine::Other);
    }

    #[test]
    fn coordinate_then_amplitude_yields_one_record() {
        let parsed = parse_lines(["Move to X: 1.0 cm, Y: 2.0 cm", "-> Recorded Vpp: 0.5 V"]);
        assert_eq!(parsed.records(), vec![MeasurementRecord::new(1.0, 2.0, 0.5)]);
    }

    #[test]
    fn stray_amplitude_is_ignored() {
        let parsed = parse_lines(["-> Recorded Vpp: 0.5 V"]);
        assert!(parsed.records.is_empty());
        assert_eq!(parsed.summary.stray_amplitudes, 1);
    }

    #[test]
    fn amplitude_clears_pending_position() {
        let parsed = parse_lines([
            "Move to X: 1.0 cm, Y: 1.0 cm",
            "-> Recorded Vpp: 0.5 V",
            "-> Recorded Vpp: 0.9 V",
        ]);
        assert_eq!(parsed.records(), vec![MeasurementRecord::new(1.0, 1.0, 0.5)]);
        assert_eq!(parsed.summary.stray_amplitudes, 1);
    }

    #[test]
    fn second_coordinate_replaces_first() {
        let parsed = parse_lines([
            "Move to X: 1.0 cm, Y: 1.0 cm",
            "Move to X: 2.0 cm, Y: 3.0 cm",
            "-> Recorded Vpp: 0.7 V",
        ]);
        assert_eq!(parsed.records(), vec![MeasurementRecord::new(2.0, 3.0, 0.7)]);
        assert_eq!(parsed.summary.unmatched_coordinates, 1);
    }

    #[test]
    fn unrelated_lines_do_not_reset_pending_position() {
        let parsed = parse_lines([
            "Move to X: 0.5 cm, Y: 0.5 cm",
            "Settling...",
            "",
            "-> Recorded Vpp: 1.2 V",
        ]);
        assert_eq!(parsed.records(), vec![MeasurementRecord::new(0.5, 0.5, 1.2)]);
    }

    #[test]
    fn repeated_position_keeps_latest_measurement() {
        let parsed = parse_lines([
            "Move to X: 1.0 cm, Y: 1.0 cm",
            "-> Recorded Vpp: 0.2 V",
            "Move to X: 1.0 cm, Y: 1.0 cm",
            "-> Recorded Vpp: 0.4 V",
        ]);
        assert_eq!(parsed.records(), vec![MeasurementRecord::new(1.0, 1.0, 0.4)]);
        assert_eq!(parsed.summary.overwritten_records, 1);
    }

    #[test]
    fn trailing_position_is_counted_as_unmatched() {
        let parsed = parse_lines(["Move to X: 1.0 cm, Y: 1.0 cm"]);
        assert!(parsed.records.is_empty());
        assert_eq!(parsed.summary.unmatched_coordinates, 1);
    }

    #[test]
    fn read_log_parses_file() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(
            b"Scan begin\nMove to X: 0.0 cm, Y: 0.0 cm\n-> Recorded Vpp: 1.0 V\nMove to X: 1.0 cm, Y: 0.0 cm\n-> Recorded Vpp: 2.0 V\n",
        )
        .unwrap();

        let parsed = read_log(temp.path()).unwrap();
        assert_eq!(parsed.records.len(), 2);
        assert_eq!(parsed.records.get(1.0, 0.0), Some(2.0));
        assert_eq!(parsed.summary.lines, 5);
    }

    #[test]
    fn missing_log_is_source_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("Data.txt");

        assert!(matches!(
            read_log(&missing),
            Err(FieldError::SourceUnavailable { .. })
        ));
        assert!(load_log(&missing).records.is_empty());
    }
}
