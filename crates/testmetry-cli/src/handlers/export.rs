use crate::args::MetricFilterArgs;
use anyhow::Result;
use serde_json::Value;
use std::collections::BTreeSet;
use std::path::Path;
use testmetry_sdk::Monitor;
use testmetry_types::Record;

/// Export the selected metrics as CSV, one row per metric, with the
/// owning session's tags and the execution context's fields joined in.
pub fn metrics(monitor: &Monitor, output: &Path, filter: &MetricFilterArgs) -> Result<()> {
    let metrics = super::metrics::select(monitor, filter)?;
    let sessions = monitor.list_sessions_from(&metrics);
    let contexts = monitor.list_contexts_from(&metrics);

    let records = metrics.to_records(Some(&sessions), Some(&contexts), None, None);
    write_csv(output, &records)?;

    println!("Wrote {} rows to {}", records.len(), output.display());
    Ok(())
}

/// Rows can disagree on their keys because tags differ per session, so
/// the header is the sorted union and absent cells stay empty.
fn write_csv(path: &Path, records: &[Record]) -> Result<()> {
    if records.is_empty() {
        std::fs::write(path, "")?;
        return Ok(());
    }

    let mut columns: BTreeSet<&str> = BTreeSet::new();
    for record in records {
        columns.extend(record.keys().map(String::as_str));
    }

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(&columns)?;
    for record in records {
        let row: Vec<String> = columns
            .iter()
            .map(|column| cell_text(record.get(*column)))
            .collect();
        writer.write_record(&row)?;
    }
    writer.flush()?;
    Ok(())
}

fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(Value::Number(number)) => number.to_string(),
        Some(Value::Bool(flag)) => flag.to_string(),
        Some(other) => other.to_string(),
    }
}
