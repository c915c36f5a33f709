use std::collections::{HashMap, HashSet};

use crate::models::{
    ChartStats, ColumnDupes, NullCounts, RowDupes, RowSplit, StatValue, StatsTable,
    SummaryPayload,
};

use super::types::{Cell, Table};

pub const METRICS: [&str; 6] = ["count", "mean", "median", "std", "min", "max"];

/// Build the dashboard payload for a parsed table. Pure; deterministic up to
/// floating point.
pub fn build_summary(table: &Table, include_column_dupes: bool) -> SummaryPayload {
    let (unique, duplicates) = row_duplicates(table);
    let numeric = numeric_column_stats(table);

    let stats = ChartStats {
        labels: numeric.iter().map(|(name, _)| name.clone()).collect(),
        values: numeric.iter().map(|(_, stats)| stats.mean).collect(),
    };

    let stats_table = StatsTable {
        columns: numeric.iter().map(|(name, _)| name.clone()).collect(),
        metrics: METRICS.to_vec(),
        values: vec![
            numeric.iter().map(|(_, s)| Some(StatValue::Int(s.count as i64))).collect(),
            numeric.iter().map(|(_, s)| s.mean.map(StatValue::Float)).collect(),
            numeric.iter().map(|(_, s)| s.median.map(StatValue::Float)).collect(),
            numeric.iter().map(|(_, s)| s.std.map(StatValue::Float)).collect(),
            numeric.iter().map(|(_, s)| s.min).collect(),
            numeric.iter().map(|(_, s)| s.max).collect(),
        ],
    };

    SummaryPayload {
        columns: table.columns.clone(),
        rows: table.row_count(),
        nulos: null_counts(table),
        dupes: RowDupes { unique, duplicates },
        dupes_by_column: include_column_dupes.then(|| column_duplicates(table)),
        stats,
        stats_table,
        otras: RowSplit {
            labels: ["Únicas", "Duplicadas"],
            values: [unique, duplicates],
        },
    }
}

fn null_counts(table: &Table) -> NullCounts {
    let values = (0..table.columns.len())
        .map(|idx| table.column_cells(idx).filter(|cell| cell.is_null()).count())
        .collect();
    NullCounts {
        labels: table.columns.clone(),
        values,
    }
}

/// Rows equal to an earlier row in every cell count as duplicates.
fn row_duplicates(table: &Table) -> (usize, usize) {
    let mut seen: HashSet<&[Cell]> = HashSet::new();
    let duplicates = table
        .rows
        .iter()
        .filter(|row| !seen.insert(row.as_slice()))
        .count();
    (table.row_count() - duplicates, duplicates)
}

fn column_duplicates(table: &Table) -> ColumnDupes {
    let mut entries: Vec<(String, (usize, f64))> = Vec::new();
    for (idx, name) in table.columns.iter().enumerate() {
        let mut occurrences: HashMap<&Cell, usize> = HashMap::new();
        for cell in table.column_cells(idx).filter(|cell| !cell.is_null()) {
            *occurrences.entry(cell).or_insert(0) += 1;
        }
        let total: usize = occurrences.values().sum();
        // Every occurrence of a value seen more than once counts.
        let dup_count: usize = occurrences.values().filter(|&&n| n > 1).sum();
        let percent = if total == 0 {
            0.0
        } else {
            round2(dup_count as f64 / total as f64 * 100.0)
        };
        upsert(&mut entries, name, (dup_count, percent));
    }

    ColumnDupes {
        labels: entries.iter().map(|(name, _)| name.clone()).collect(),
        counts: entries.iter().map(|(_, (count, _))| *count).collect(),
        percent: entries.iter().map(|(_, (_, percent))| *percent).collect(),
    }
}

struct ColumnStats {
    count: usize,
    mean: Option<f64>,
    median: Option<f64>,
    std: Option<f64>,
    min: Option<StatValue>,
    max: Option<StatValue>,
}

/// A column is numeric when no cell is textual; all-null columns qualify and
/// report a zero count with null statistics.
fn numeric_column_stats(table: &Table) -> Vec<(String, ColumnStats)> {
    let mut entries: Vec<(String, ColumnStats)> = Vec::new();
    for (idx, name) in table.columns.iter().enumerate() {
        if table.column_cells(idx).any(|cell| cell.is_text()) {
            continue;
        }
        upsert(&mut entries, name, column_stats(table, idx));
    }
    entries
}

fn column_stats(table: &Table, idx: usize) -> ColumnStats {
    let mut values: Vec<f64> = Vec::new();
    let mut integer_only = true;
    for cell in table.column_cells(idx) {
        match cell {
            Cell::Int(value) => values.push(*value as f64),
            Cell::Float(value) => {
                integer_only = false;
                values.push(*value);
            }
            _ => {}
        }
    }

    let count = values.len();
    if count == 0 {
        return ColumnStats {
            count,
            mean: None,
            median: None,
            std: None,
            min: None,
            max: None,
        };
    }

    let mean = values.iter().sum::<f64>() / count as f64;

    values.sort_by(|a, b| a.total_cmp(b));
    let median = if count % 2 == 0 {
        (values[count / 2 - 1] + values[count / 2]) / 2.0
    } else {
        values[count / 2]
    };

    // Sample standard deviation; undefined for a single observation.
    let std = if count > 1 {
        let variance = values
            .iter()
            .map(|value| {
                let diff = value - mean;
                diff * diff
            })
            .sum::<f64>()
            / (count - 1) as f64;
        Some(variance.sqrt())
    } else {
        None
    };

    let (low, high) = (values[0], values[count - 1]);
    let (min, max) = if integer_only {
        (StatValue::Int(low as i64), StatValue::Int(high as i64))
    } else {
        (StatValue::Float(low), StatValue::Float(high))
    };

    ColumnStats {
        count,
        mean: Some(mean),
        median: Some(median),
        std,
        min: Some(min),
        max: Some(max),
    }
}

// Duplicate column names act as one key: the first occurrence keeps its
// position, the value comes from the last occurrence.
fn upsert<T>(entries: &mut Vec<(String, T)>, name: &str, value: T) {
    if let Some(entry) = entries.iter_mut().find(|(existing, _)| existing == name) {
        entry.1 = value;
    } else {
        entries.push((name.to_string(), value));
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
