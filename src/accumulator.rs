use indexmap::{map::Entry, IndexMap};
use log::debug;

use crate::schema::{AppId, GameRecord};

#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub struct MergeStats {
    pub added: usize,
    pub replaced: usize,
    pub kept: usize,
}

/// Games collected so far, in the order their identifiers were first seen.
///
/// On a collision the stored game is replaced only by a strictly more complete
/// one, and keeps its position.
#[derive(Clone, Default, PartialEq, Debug)]
pub struct RecordAccumulator {
    records: IndexMap<AppId, GameRecord>,
}

impl RecordAccumulator {
    pub fn from_records(records: impl IntoIterator<Item = GameRecord>) -> Self {
        let mut res = Self::default();
        res.merge(records);
        res
    }

    pub fn merge(&mut self, incoming: impl IntoIterator<Item = GameRecord>) -> MergeStats {
        let mut stats = MergeStats::default();
        for record in incoming {
            match self.records.entry(record.identifier().clone()) {
                Entry::Vacant(entry) => {
                    entry.insert(record);
                    stats.added += 1;
                }
                Entry::Occupied(mut entry) => {
                    if record.populated_fields() > entry.get().populated_fields() {
                        debug!("Replacing {} by a more complete record", entry.key());
                        entry.insert(record);
                        stats.replaced += 1;
                    } else {
                        stats.kept += 1;
                    }
                }
            }
        }
        stats
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GameRecord> {
        self.records.values()
    }

    pub fn into_records(self) -> Vec<GameRecord> {
        self.records.into_values().collect()
    }
}

pub fn merge(existing: Vec<GameRecord>, incoming: Vec<GameRecord>) -> Vec<GameRecord> {
    let mut accumulator = RecordAccumulator::from_records(existing);
    accumulator.merge(incoming);
    accumulator.into_records()
}
