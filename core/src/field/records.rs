use crate::interface::MeasurementRecord;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Scan position used as a map key. Ordered by `x`, then `y`, with
/// `f64::total_cmp`; negative zero is folded onto zero.
#[derive(Debug, Clone, Copy)]
struct Position {
    x: f64,
    y: f64,
}

impl Position {
    fn new(x: f64, y: f64) -> Self {
        Self { x: x + 0.0, y: y + 0.0 }
    }
}

impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Position {}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        self.x
            .total_cmp(&other.x)
            .then_with(|| self.y.total_cmp(&other.y))
    }
}

/// Measurements keyed by position, at most one per `(x, y)`.
///
/// Inserting at a position that already holds a value overwrites it
/// (last write wins) and hands back the replaced amplitude. Iteration is
/// ascending by `x`, then `y`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordSet {
    entries: BTreeMap<Position, f64>,
}

impl RecordSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, record: MeasurementRecord) -> Option<f64> {
        self.entries
            .insert(Position::new(record.x, record.y), record.vpp)
    }

    pub fn get(&self, x: f64, y: f64) -> Option<f64> {
        self.entries.get(&Position::new(x, y)).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = MeasurementRecord> + '_ {
        self.entries
            .iter()
            .map(|(pos, &vpp)| MeasurementRecord::new(pos.x, pos.y, vpp))
    }

    pub fn to_records(&self) -> Vec<MeasurementRecord> {
        self.iter().collect()
    }
}

impl FromIterator<MeasurementRecord> for RecordSet {
    fn from_iter<T: IntoIterator<Item = MeasurementRecord>>(iter: T) -> Self {
        let mut set = RecordSet::new();
        for record in iter {
            set.insert(record);
        }
        set
    }
}
