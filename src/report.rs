//! Tabular export of a finished run.
//!
//! Three files are written per run directory:
//! - `data.csv`: one row per generated symbol, no header, no index.
//! - `info.csv`: every occurrence table concatenated, with a global
//!   `text_index`.
//! - `hist.csv`: the population histogram.

use std::borrow::Cow;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use chrono::{NaiveDateTime, TimeDelta};
use tracing::info;

use crate::config::AuditColumns;
use crate::simulation::engine::SimulationEngine;
use crate::types::logical_operation::LogicalOperation;
use crate::types::text_entry::{HistogramRow, TextEntry};

pub const DATA_FILE: &str = "data.csv";
pub const LOCATIONS_FILE: &str = "info.csv";
pub const HISTOGRAM_FILE: &str = "hist.csv";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One exported symbol, columns in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct DataRow {
    pub record_type: String,
    pub session_id: String,
    pub construct_id: String,
    pub timestamp: String,
    pub full_sql_id: usize,
    pub unix_timestamp: String,
    pub access_id: String,
    pub tenant_id: String,
    pub config_id: String,
    pub global_id: String,
    pub full_sql: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LocationRow {
    pub logical_operation: LogicalOperation,
    pub begin_index: usize,
    pub end_index: usize,
    pub text_index: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Report {
    pub data: Vec<DataRow>,
    pub locations: Vec<LocationRow>,
    pub histogram: Vec<HistogramRow>,
}

impl Report {
    /// Flattens text entries into rows. Row `i` of the data table is stamped
    /// `base_time + i` seconds.
    pub fn build(
        entries: &[TextEntry],
        histogram: Vec<HistogramRow>,
        audit: &AuditColumns,
        base_time: NaiveDateTime,
    ) -> Self {
        let symbols = entries.iter().flat_map(|entry| {
            entry
                .text
                .iter()
                .map(move |symbol| (entry.user_id.as_str(), entry.session_id.as_str(), symbol))
        });

        let data = symbols
            .enumerate()
            .map(|(i, (user_id, session_id, symbol))| DataRow {
                record_type: audit.record_type.clone(),
                session_id: session_id.to_string(),
                construct_id: symbol.clone(),
                timestamp: (base_time + TimeDelta::seconds(i as i64))
                    .format(TIMESTAMP_FORMAT)
                    .to_string(),
                full_sql_id: i,
                unix_timestamp: format!("unix_timestamp{}", i),
                access_id: user_id.to_string(),
                tenant_id: audit.tenant_id.clone(),
                config_id: audit.config_id.clone(),
                global_id: audit.global_id.clone(),
                full_sql: audit.full_sql.clone(),
            })
            .collect();

        let locations = entries
            .iter()
            .flat_map(|entry| entry.occurrences.iter())
            .enumerate()
            .map(|(text_index, occ)| LocationRow {
                logical_operation: occ.logical_operation.clone(),
                begin_index: occ.begin_index,
                end_index: occ.end_index,
                text_index,
            })
            .collect();

        Report {
            data,
            locations,
            histogram,
        }
    }

    pub fn from_engine(engine: &SimulationEngine, audit: &AuditColumns, base_time: NaiveDateTime) -> Self {
        Self::build(
            engine.get_text_entries(),
            engine.get_population_histogram(),
            audit,
            base_time,
        )
    }

    pub fn write(&self, dirout: &Path) -> io::Result<()> {
        info!(
            rows = self.data.len(),
            dir = %dirout.display(),
            "writing report"
        );
        fs::create_dir_all(dirout)?;

        let mut data = BufWriter::new(File::create(dirout.join(DATA_FILE))?);
        for row in &self.data {
            let full_sql_id = row.full_sql_id.to_string();
            write_record(
                &mut data,
                &[
                    row.record_type.as_str(),
                    row.session_id.as_str(),
                    row.construct_id.as_str(),
                    row.timestamp.as_str(),
                    full_sql_id.as_str(),
                    row.unix_timestamp.as_str(),
                    row.access_id.as_str(),
                    row.tenant_id.as_str(),
                    row.config_id.as_str(),
                    row.global_id.as_str(),
                    row.full_sql.as_str(),
                ],
            )?;
        }
        data.flush()?;

        let mut locations = BufWriter::new(File::create(dirout.join(LOCATIONS_FILE))?);
        write_record(
            &mut locations,
            &["", "logical_operation", "begin_index", "end_index", "text_index"],
        )?;
        for (index, row) in self.locations.iter().enumerate() {
            write_record(
                &mut locations,
                &[
                    index.to_string().as_str(),
                    row.logical_operation.to_string().as_str(),
                    row.begin_index.to_string().as_str(),
                    row.end_index.to_string().as_str(),
                    row.text_index.to_string().as_str(),
                ],
            )?;
        }
        locations.flush()?;

        let mut hist = BufWriter::new(File::create(dirout.join(HISTOGRAM_FILE))?);
        write_record(&mut hist, &["", "logical_operation", "cnt", "percentage", "user_id"])?;
        for row in &self.histogram {
            write_record(
                &mut hist,
                &[
                    row.first_seen.to_string().as_str(),
                    row.logical_operation.to_string().as_str(),
                    row.cnt.to_string().as_str(),
                    format!("{:?}", row.percentage).as_str(),
                    row.user_id.as_str(),
                ],
            )?;
        }
        hist.flush()
    }
}

fn write_record<W: Write>(writer: &mut W, fields: &[&str]) -> io::Result<()> {
    let line: Vec<Cow<'_, str>> = fields.iter().map(|f| escape_field(f)).collect();
    writeln!(writer, "{}", line.join(","))
}

fn escape_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn base_time() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 2)
            .and_then(|d| d.and_hms_opt(3, 4, 5))
            .unwrap()
    }

    fn populated_engine() -> SimulationEngine {
        let mut engine = SimulationEngine::new(0);
        engine.add_user("u1").unwrap();
        engine
            .add_operation("u1", LogicalOperation::new(["a", "b"]), 1.0)
            .unwrap();
        engine.set_session("u1", "s1").unwrap();
        engine.generate_text("u1", 2).unwrap();
        engine.generate_text("u1", 1).unwrap();
        engine
    }

    #[test]
    fn data_rows_are_stamped_sequentially() {
        let engine = populated_engine();
        let report = Report::from_engine(&engine, &AuditColumns::default(), base_time());

        assert_eq!(report.data.len(), 6);
        let last = &report.data[5];
        assert_eq!(last.full_sql_id, 5);
        assert_eq!(last.unix_timestamp, "unix_timestamp5");
        assert_eq!(last.timestamp, "2024-01-02 03:04:10");
        assert_eq!(last.record_type, "PA");
        assert_eq!(last.access_id, "u1");
        assert_eq!(last.construct_id, "b");
    }

    #[test]
    fn location_rows_are_numbered_globally() {
        let engine = populated_engine();
        let report = Report::from_engine(&engine, &AuditColumns::default(), base_time());

        let rows: Vec<_> = report
            .locations
            .iter()
            .map(|r| (r.begin_index, r.end_index, r.text_index))
            .collect();
        // The third occurrence starts a new text, so its offsets restart.
        assert_eq!(rows, vec![(0, 1, 0), (2, 3, 1), (0, 1, 2)]);
    }

    #[test]
    fn quotes_fields_with_separators() {
        assert_eq!(escape_field("plain"), "plain");
        assert_eq!(escape_field("(a, b)"), "\"(a, b)\"");
        assert_eq!(escape_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }
}
