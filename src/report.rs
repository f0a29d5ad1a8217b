use std::collections::BTreeMap;

use anyhow::Result;
use serde_json::Value;

use crate::model::Record;
use crate::parser::chunks::ChunkStats;
use crate::parser::DocumentRun;

/// Aggregate view of one batch run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchSummary {
    pub documents: usize,
    pub failed: usize,
    pub chunks: ChunkStats,
    pub records: usize,
    /// Non-null count per record field, by field name.
    pub completeness: Vec<(String, usize)>,
    pub statuses: BTreeMap<String, usize>,
    pub alcohol_types: BTreeMap<String, usize>,
}

impl BatchSummary {
    pub fn from_runs(runs: &[DocumentRun]) -> Result<Self> {
        let mut summary = BatchSummary {
            documents: runs.len(),
            ..BatchSummary::default()
        };
        let mut fields: Vec<(String, usize)> = Vec::new();

        for run in runs {
            if !run.result.proceed {
                summary.failed += 1;
            }
            summary.chunks += run.stats;
            for record in &run.records {
                summary.records += 1;
                count_fields(record, &mut fields)?;
                let status = record.status.map_or("null", |s| s.as_str());
                *summary.statuses.entry(status.to_string()).or_default() += 1;
                let alcohol = record.alcohol_type.map_or("null", |a| a.as_str());
                *summary.alcohol_types.entry(alcohol.to_string()).or_default() += 1;
            }
        }

        summary.completeness = fields;
        Ok(summary)
    }

    pub fn print(&self) {
        println!("Documents: {} processed, {} failed", self.documents, self.failed);
        println!(
            "Chunks:    {} accepted, {} discarded, {} resplit, {} ambiguous",
            self.chunks.accepted, self.chunks.discarded, self.chunks.resplit, self.chunks.ambiguous
        );
        println!("Records:   {}", self.records);
        if self.records == 0 {
            return;
        }

        println!("\n{:<16} | {:>6} | {:>6}", "Field", "Filled", "%");
        println!("{}", "-".repeat(34));
        for (field, filled) in &self.completeness {
            println!("{:<16} | {:>6} | {:>5.1}%", field, filled, percent(*filled, self.records));
        }

        println!("\nStatus:");
        for (status, n) in &self.statuses {
            println!("  {:<12} {:>5} ({:.1}%)", status, n, percent(*n, self.records));
        }
        println!("\nAlcohol type:");
        for (kind, n) in &self.alcohol_types {
            println!("  {:<26} {:>5} ({:.1}%)", kind, n, percent(*n, self.records));
        }
    }
}

fn count_fields(record: &Record, fields: &mut Vec<(String, usize)>) -> Result<()> {
    let Value::Object(map) = serde_json::to_value(record)? else {
        return Ok(());
    };
    if fields.is_empty() {
        fields.extend(map.keys().map(|k| (k.clone(), 0)));
    }
    for (name, filled) in fields.iter_mut() {
        if map.get(name.as_str()).is_some_and(|v| !v.is_null()) {
            *filled += 1;
        }
    }
    Ok(())
}

fn percent(n: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        n as f64 * 100.0 / total as f64
    }
}
