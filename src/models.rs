use serde::Serialize;

/// A single statistic cell. Integer-typed columns keep integer min/max so the
/// JSON carries `1` rather than `1.0`; everything else is a float.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StatValue {
    Int(i64),
    Float(f64),
}

#[derive(Debug, Serialize)]
pub struct NullCounts {
    pub labels: Vec<String>,
    pub values: Vec<usize>,
}

#[derive(Debug, Serialize)]
pub struct RowDupes {
    pub unique: usize,
    pub duplicates: usize,
}

#[derive(Debug, Serialize)]
pub struct ColumnDupes {
    pub labels: Vec<String>,
    pub counts: Vec<usize>,
    pub percent: Vec<f64>,
}

/// Default chart series: numeric column names against their means.
#[derive(Debug, Serialize)]
pub struct ChartStats {
    pub labels: Vec<String>,
    pub values: Vec<Option<f64>>,
}

/// Matrix of descriptive statistics. `values` has one row per metric, in the
/// order given by `metrics`, each row aligned to `columns`.
#[derive(Debug, Serialize)]
pub struct StatsTable {
    pub columns: Vec<String>,
    pub metrics: Vec<&'static str>,
    pub values: Vec<Vec<Option<StatValue>>>,
}

#[derive(Debug, Serialize)]
pub struct RowSplit {
    pub labels: [&'static str; 2],
    pub values: [usize; 2],
}

#[derive(Debug, Serialize)]
pub struct SummaryPayload {
    pub columns: Vec<String>,
    pub rows: usize,
    pub nulos: NullCounts,
    pub dupes: RowDupes,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dupes_by_column: Option<ColumnDupes>,
    pub stats: ChartStats,
    #[serde(rename = "statsTable")]
    pub stats_table: StatsTable,
    pub otras: RowSplit,
}
