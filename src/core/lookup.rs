//! Static lookup tables for measurement names, gender codes, age groups and
//! category types.

use crate::core::normalize::{normalize_key, sanitize_header_name};
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

const MEASURE_NAMES: &[(&str, &str)] = &[
    ("torace", "chest"),
    ("vita", "waist"),
    ("bacino", "hip"),
    ("lunghezza", "insoleLength"),
    ("larghezza", "width"),
    ("circonferenza", "circumference"),
    ("seno", "chest"),
    ("fianchi", "hip"),
    ("altezza", "height"),
    ("petto", "chest"),
    ("gamba", "thigh"),
    ("spalle", "shoulderWidth"),
    ("numero", "bar"),
    ("int. gamba", "insideLeg"),
    ("sottoseno", "underBust"),
    ("waist", "waist"),
    ("hip", "hip"),
];

const GENDER_CODES: &[(&str, &str)] = &[
    ("B", "male"),
    ("G", "female"),
    ("J", "unisex"),
    ("M", "male"),
    ("U", "unisex"),
    ("W", "female"),
];

// Checked in order, so kids codes win over adult codes.
static AGE_GROUP_RULES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    vec![
        (
            Regex::new(r"(^|[^0-9])(93|96|99)([^0-9]|$)").unwrap(),
            "kids",
        ),
        (
            Regex::new(r"(^|[^0-9])(60|30|90)([^0-9]|$)").unwrap(),
            "adult",
        ),
    ]
});

static STANDARD: LazyLock<Lookups> = LazyLock::new(Lookups::build);

/// Read-only mapping tables shared by schema discovery and the row
/// transformer.
#[derive(Debug, Clone)]
pub struct Lookups {
    measures: HashMap<&'static str, &'static str>,
    genders: HashMap<&'static str, &'static str>,
}

impl Lookups {
    /// Process-wide instance, built on first use.
    pub fn standard() -> &'static Lookups {
        &STANDARD
    }

    fn build() -> Self {
        Self {
            measures: MEASURE_NAMES.iter().copied().collect(),
            genders: GENDER_CODES.iter().copied().collect(),
        }
    }

    /// Canonical English name of a measurement label.
    ///
    /// Unknown labels fall back to the label with its whitespace removed, so
    /// the same raw label always yields the same column.
    pub fn canonical_measure(&self, raw: &str) -> String {
        match self.measures.get(normalize_key(raw).as_str()) {
            Some(canonical) => canonical.to_string(),
            None => sanitize_header_name(raw),
        }
    }

    pub fn gender(&self, code: &str) -> &'static str {
        let key = code.trim().to_uppercase();
        self.genders.get(key.as_str()).copied().unwrap_or("")
    }

    pub fn age_group(&self, code: &str) -> &'static str {
        let code = code.trim();
        AGE_GROUP_RULES
            .iter()
            .find(|(rule, _)| rule.is_match(code))
            .map(|(_, group)| *group)
            .unwrap_or("")
    }

    pub fn category_type(&self, category: &str) -> &'static str {
        if category.to_uppercase().contains("SHOES") {
            "shoe"
        } else {
            "clothes"
        }
    }
}
