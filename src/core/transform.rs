//! Second pass: reshape one vendor row into one flat output record.

use crate::core::lookup::Lookups;
use crate::core::normalize::{collapse_whitespace, parse_range_with};
use crate::core::schema::{measure_type_index, measure_value_index};
use crate::domain::model::{
    final_column, initial_column, ConversionOptions, InputRow, MeasureIndex, MeasurePair,
    OutputRecord,
};
use std::collections::BTreeMap;

/// Output columns copied from a source column with whitespace collapsed.
const TEXT_COLUMNS: &[(&str, &str)] = &[
    ("name", "SizeGrid_Code_Category"),
    ("brandName", "SizeGrid_Code"),
    ("sizeName", "TGL_COD"),
    ("ss-EU", "EU_ALS"),
    ("ss-FR", "FRA_ALS"),
    ("ss-IT", "IT_ALS"),
    ("ss-JP", "JP_ALS"),
    ("ss-UK", "UK_ALS"),
    ("ss-US", "US_ALS"),
    ("categoryNames", "SizeGrid_lvl2_cat"),
];

const CONSTANT_COLUMNS: &[(&str, &str)] = &[
    ("type", "product"),
    ("accessories", "FALSE"),
    ("sizeSystem", "EU"),
];

pub struct RowTransformer<'a> {
    lookups: &'a Lookups,
    normalize_numbers: bool,
}

impl<'a> RowTransformer<'a> {
    pub fn new(lookups: &'a Lookups) -> Self {
        Self {
            lookups,
            normalize_numbers: true,
        }
    }

    pub fn with_options(lookups: &'a Lookups, options: &ConversionOptions) -> Self {
        Self {
            lookups,
            normalize_numbers: options.normalize_numbers,
        }
    }

    pub fn transform(&self, row: &InputRow) -> OutputRecord {
        let mut record = OutputRecord::new();
        self.fill_fixed_columns(row, &mut record);
        self.fill_measures(row, &mut record);
        record
    }

    fn fill_fixed_columns(&self, row: &InputRow, record: &mut OutputRecord) {
        let cell = |column: &str| row.get(column).unwrap_or("");

        for &(output, source) in TEXT_COLUMNS {
            record.set(output, collapse_whitespace(cell(source)));
        }
        for &(output, value) in CONSTANT_COLUMNS {
            record.set(output, value);
        }

        record.set("gender", self.lookups.gender(cell("Ge Code")));
        record.set("ageGroup", self.lookups.age_group(cell("Gender")));
        record.set(
            "strongCategoryType",
            self.lookups.category_type(cell("SizeGrid_lvl2_cat")),
        );
    }

    fn fill_measures(&self, row: &InputRow, record: &mut OutputRecord) {
        for (index, pair) in group_measure_pairs(row) {
            let measure = self
                .lookups
                .canonical_measure(pair.kind.as_deref().unwrap_or(""));
            let value = pair.value.as_deref().unwrap_or("");

            if measure.is_empty() || value.is_empty() {
                continue;
            }

            let range = parse_range_with(value, self.normalize_numbers);
            tracing::trace!(
                "Measure {} '{}' -> {}..{}",
                index,
                measure,
                range.initial,
                range.r#final
            );

            record.set_if_empty(&initial_column(&measure), &range.initial);
            record.set_if_empty(&final_column(&measure), &range.r#final);
        }
    }
}

/// Pairs the trimmed "TipoDim N" and "Dim N" cells of a row by the digits of
/// N, lowest index first.
pub fn group_measure_pairs(row: &InputRow) -> BTreeMap<MeasureIndex, MeasurePair> {
    let mut pairs: BTreeMap<MeasureIndex, MeasurePair> = BTreeMap::new();

    for (column, value) in row.iter() {
        if let Some(index) = measure_type_index(column) {
            pairs.entry(index).or_default().kind = Some(value.trim().to_string());
        } else if let Some(index) = measure_value_index(column) {
            pairs.entry(index).or_default().value = Some(value.trim().to_string());
        }
    }

    pairs
}

/// Maps one row with the default conversion options.
pub fn transform_row(row: &InputRow, lookups: &Lookups) -> OutputRecord {
    RowTransformer::new(lookups).transform(row)
}
