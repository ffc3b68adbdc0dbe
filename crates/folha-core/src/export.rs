//! Result presentation: table rendering and CSV/JSON export.

use chrono::NaiveDate;
use csv::{QuoteStyle, Terminator, WriterBuilder};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::payroll::{column_labels, PayrollRecord, FIELD_COUNT};

/// CSV field delimiter.
pub const CSV_DELIMITER: u8 = b';';

/// Output format for extracted records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Semicolon-delimited CSV file.
    #[default]
    Csv,
    /// JSON array of records.
    Json,
    /// Plain-text table.
    Table,
}

/// File name of a CSV export made on `date`: `extracao_folha_<YYYY-MM-DD>.csv`.
pub fn export_filename(date: NaiveDate) -> String {
    format!("extracao_folha_{}.csv", date.format("%Y-%m-%d"))
}

/// Serialize records as semicolon-delimited CSV.
///
/// The first line holds the 25 column labels, then one line per record in
/// schema order. Fields are written verbatim: there is no quoting, so a value
/// containing `;` or a line break produces a malformed row.
pub fn to_csv(records: &[PayrollRecord]) -> Result<String> {
    let mut wtr = WriterBuilder::new()
        .delimiter(CSV_DELIMITER)
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(vec![]);

    wtr.write_record(column_labels())?;
    for record in records {
        wtr.write_record(record.values())?;
    }

    let data = wtr
        .into_inner()
        .map_err(|e| std::io::Error::other(e.to_string()))?;

    // Labels and values are always valid UTF-8
    Ok(String::from_utf8_lossy(&data).into_owned())
}

/// Serialize records as a pretty-printed JSON array.
pub fn to_json(records: &[PayrollRecord]) -> Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// Render records as a fixed-column plain-text table.
pub fn render_table(records: &[PayrollRecord]) -> String {
    let labels: Vec<&str> = column_labels().collect();
    let rows: Vec<[&str; FIELD_COUNT]> = records.iter().map(|r| r.values()).collect();

    let mut widths: Vec<usize> = labels.iter().map(|l| l.chars().count()).collect();
    for row in &rows {
        for (width, value) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(value.chars().count());
        }
    }

    let mut output = String::new();
    push_row(&mut output, &labels, &widths);

    let separator: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    output.push_str(&separator.join("-+-"));
    output.push('\n');

    for row in &rows {
        push_row(&mut output, row, &widths);
    }

    output
}

fn push_row(output: &mut String, cells: &[&str], widths: &[usize]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width - cell.chars().count();
            format!("{}{}", cell, " ".repeat(pad))
        })
        .collect();
    output.push_str(padded.join(" | ").trim_end());
    output.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn records() -> Vec<PayrollRecord> {
        vec![
            PayrollRecord {
                id: "1".to_string(),
                nome: "ANA LIMA".to_string(),
                salario: "1.412,00".to_string(),
                base_calc_inss: "1.412,00".to_string(),
                inss_patronal_20: "282,40".to_string(),
                ..Default::default()
            },
            PayrollRecord {
                id: "2".to_string(),
                nome: "BRUNO REIS".to_string(),
                indeniz: "4.500,00".to_string(),
                ..Default::default()
            },
        ]
    }

    #[test]
    fn test_export_filename() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
        assert_eq!(export_filename(date), "extracao_folha_2025-03-07.csv");
    }

    #[test]
    fn test_csv_has_header_plus_one_line_per_record() {
        let csv = to_csv(&records()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 3);
        for line in &lines {
            assert_eq!(line.split(';').count(), FIELD_COUNT);
        }
        assert!(lines[0].starts_with("ID;Nome;SALÁRIO;ARREDON.;"));
        assert!(lines[0].ends_with(";INSS PATRONAL (20%)"));
        assert!(lines[1].starts_with("1;ANA LIMA;1.412,00;-;"));
        assert!(lines[1].ends_with(";1.412,00;-;-;282,40"));
    }

    #[test]
    fn test_csv_of_no_records_is_header_only() {
        let csv = to_csv(&[]).unwrap();
        assert_eq!(csv.lines().count(), 1);
    }

    #[test]
    fn test_csv_does_not_quote() {
        let record = PayrollRecord {
            nome: "SILVA; JOSE".to_string(),
            ..Default::default()
        };
        let csv = to_csv(&[record]).unwrap();
        let row = csv.lines().nth(1).unwrap();
        assert!(row.contains("SILVA; JOSE"));
        assert!(!row.contains('"'));
    }

    #[test]
    fn test_json_round_trips_values() {
        let json = to_json(&records()).unwrap();
        let parsed: Vec<PayrollRecord> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, records());
    }

    #[test]
    fn test_table_has_aligned_columns() {
        let table = render_table(&records());
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("ID | Nome"));
        assert!(lines[1].starts_with("---"));
        assert!(lines[2].starts_with("1  | ANA LIMA"));
        assert!(lines[3].starts_with("2  | BRUNO REIS"));
        assert_eq!(lines[0].matches(" | ").count(), FIELD_COUNT - 1);
    }
}
