use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::error::{JitError, Result};

/// Per-batch inputs for the engine, keyed by 1-based batch index. The index
/// order is the precedence order, so the rows are held sorted.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    rows: BTreeMap<usize, BatchRow>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BatchRow {
    pub duration: i64,
    pub desired_finish: i64,
}

impl Dataset {
    /// Pairs up durations and desired-finish offsets under batch indices
    /// 1..=N. Both inputs must have equal length.
    pub fn build(durations: &[i64], desired_finish_offsets: &[i64]) -> Result<Self> {
        if durations.len() != desired_finish_offsets.len() {
            return Err(JitError::LengthMismatch {
                expected: durations.len(),
                actual: desired_finish_offsets.len(),
            });
        }
        let rows = durations
            .iter()
            .zip(desired_finish_offsets)
            .enumerate()
            .map(|(i, (&duration, &desired_finish))| {
                (
                    i + 1,
                    BatchRow {
                        duration,
                        desired_finish,
                    },
                )
            })
            .collect();
        Ok(Self { rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows in ascending batch-index order.
    pub fn rows(&self) -> impl Iterator<Item = (usize, &BatchRow)> {
        self.rows.iter().map(|(&index, row)| (index, row))
    }
}

/// One scheduled batch: the computed start offset and the signed deviation
/// (actual finish minus desired finish) the penalty was charged against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScheduleEntry {
    pub batch: usize,
    pub start_offset: i64,
    pub delta: i64,
}

/// Rebuilds the ordered schedule from the engine's per-variable value maps.
/// The engine may report values in arbitrary order; entries come back
/// sorted by ascending batch index.
pub fn unbuild(
    start_offsets: &HashMap<usize, i64>,
    deltas: &HashMap<usize, i64>,
) -> Result<Vec<ScheduleEntry>> {
    if start_offsets.len() != deltas.len() {
        return Err(JitError::LengthMismatch {
            expected: start_offsets.len(),
            actual: deltas.len(),
        });
    }
    let mut entries = Vec::with_capacity(start_offsets.len());
    for (&batch, &start_offset) in start_offsets {
        let delta = *deltas.get(&batch).ok_or(JitError::LengthMismatch {
            expected: start_offsets.len(),
            actual: deltas.len(),
        })?;
        entries.push(ScheduleEntry {
            batch,
            start_offset,
            delta,
        });
    }
    entries.sort_by_key(|entry| entry.batch);
    Ok(entries)
}
