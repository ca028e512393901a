use crate::core::csv_io::{parse_rows, write_records};
use crate::core::filter::RowFilter;
use crate::core::lookup::Lookups;
use crate::core::schema::discover_schema;
use crate::core::transform::RowTransformer;
use crate::domain::model::{ConversionOptions, InputRow, OutputRecord, TransformResult};
use crate::utils::error::Result;

/// Converts a whole vendor export into the flat catalog CSV.
pub fn convert_csv(
    text: &str,
    lookups: &Lookups,
    options: &ConversionOptions,
) -> Result<TransformResult> {
    let rows = parse_rows(text)?;
    convert_rows(rows, lookups, options)
}

/// Filters the rows, discovers the measure columns, then maps every row.
/// All records are buffered so the header can be written first.
pub fn convert_rows(
    rows: Vec<InputRow>,
    lookups: &Lookups,
    options: &ConversionOptions,
) -> Result<TransformResult> {
    let rows_read = rows.len();
    let (rows, rows_skipped) = RowFilter::from_options(options).retain_rows(rows);
    tracing::debug!(
        "Filtered {} of {} rows on {}",
        rows_skipped,
        rows_read,
        options.filter_column
    );

    let schema = discover_schema(&rows, lookups);
    tracing::debug!(
        "Discovered {} measures: {:?}",
        schema.measures().len(),
        schema.measures()
    );

    let transformer = RowTransformer::with_options(lookups, options);
    let records: Vec<OutputRecord> = rows.iter().map(|row| transformer.transform(row)).collect();

    let csv_output = write_records(&schema, &records)?;

    Ok(TransformResult {
        schema,
        records,
        csv_output,
        rows_read,
        rows_skipped,
    })
}
