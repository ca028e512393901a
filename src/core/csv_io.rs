use crate::domain::model::{InputRow, OutputRecord, OutputSchema};
use crate::utils::error::{EtlError, Result};
use csv::{ReaderBuilder, Terminator, Trim, WriterBuilder};

/// Parses a vendor export into rows keyed by header name.
///
/// A leading UTF-8 BOM is dropped and cells are kept untrimmed. Lines may be
/// shorter or longer than the header: missing trailing cells are left out of
/// the row and cells past the last header column are ignored.
pub fn parse_rows(text: &str) -> Result<Vec<InputRow>> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::None)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    tracing::debug!("CSV header has {} columns", headers.len());

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        if record.len() != headers.len() {
            tracing::debug!(
                "Line {} has {} cells, header has {}",
                record.position().map(|p| p.line()).unwrap_or(0),
                record.len(),
                headers.len()
            );
        }
        rows.push(headers.iter().zip(record.iter()).collect::<InputRow>());
    }

    Ok(rows)
}

/// Serializes records under the full schema header. Columns a record never
/// wrote are emitted empty; the header is written even with no records.
pub fn write_records(schema: &OutputSchema, records: &[OutputRecord]) -> Result<String> {
    let columns = schema.columns();

    let mut writer = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(&columns)?;
    for record in records {
        writer.write_record(columns.iter().map(|column| record.get(column)))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| EtlError::IoError(e.into_error()))?;

    String::from_utf8(bytes).map_err(|e| EtlError::ProcessingError {
        message: format!("CSV output is not valid UTF-8: {}", e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rows_strips_bom_and_keeps_whitespace() {
        let text = "\u{feff}TGL_COD,TipoDim1,Dim1\n 48 ,Torace, 80-85\n";
        let rows = parse_rows(text).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("TGL_COD"), Some(" 48 "));
        assert_eq!(rows[0].get("TipoDim1"), Some("Torace"));
        assert_eq!(rows[0].get("Dim1"), Some(" 80-85"));
    }

    #[test]
    fn test_parse_rows_tolerates_ragged_lines() {
        let text = "A,B,C\n1,2\n1,2,3,4\n\n5,6,7\n";
        let rows = parse_rows(text).unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].get("B"), Some("2"));
        assert_eq!(rows[0].get("C"), None);
        assert_eq!(rows[1].len(), 3);
        assert_eq!(rows[2].get("C"), Some("7"));
    }

    #[test]
    fn test_parse_rows_empty_input() {
        assert!(parse_rows("").unwrap().is_empty());
        assert!(parse_rows("A,B\n").unwrap().is_empty());
    }

    #[test]
    fn test_write_records_fills_missing_fields() {
        let mut schema = OutputSchema::new();
        schema.add_measure("chest");

        let mut record = OutputRecord::new();
        record.set("name", "Giacca, Uomo");
        record.set("chestInitialValue", "80");

        let output = write_records(&schema, &[record]).unwrap();
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("name,gender,ageGroup,"));
        assert!(lines[0].ends_with(",categoryNames,chestInitialValue,chestFinalValue"));
        assert_eq!(lines[1], "\"Giacca, Uomo\",,,,,,,,,,,,,,,,80,");
    }

    #[test]
    fn test_write_records_header_only() {
        let output = write_records(&OutputSchema::new(), &[]).unwrap();
        assert_eq!(output.lines().count(), 1);
        assert!(output.ends_with("categoryNames\n"));
    }
}
