//! Upload boundary: turns an uploaded file into a downloadable response.
//!
//! Transport-neutral so the Lambda entry point (or any HTTP front end) only
//! has to move bytes in and the response out.

use crate::core::convert::convert_csv;
use crate::core::lookup::Lookups;
use crate::domain::model::{ConversionOptions, DEFAULT_OUTPUT_FILENAME};
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const STATUS_OK: u16 = 200;
pub const STATUS_BAD_REQUEST: u16 = 400;
pub const STATUS_INTERNAL_ERROR: u16 = 500;

pub const MISSING_FILE_MESSAGE: &str = "No file uploaded";
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal error while processing the file";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

#[derive(Serialize)]
struct StoredBody<'a> {
    output: &'a str,
}

impl DeliveryResponse {
    /// CSV attachment, served as `output.csv`.
    pub fn attachment(csv: String) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("Content-Type".to_string(), "text/csv".to_string());
        headers.insert(
            "Content-Disposition".to_string(),
            format!("attachment; filename=\"{}\"", DEFAULT_OUTPUT_FILENAME),
        );
        Self {
            status_code: STATUS_OK,
            headers,
            body: csv,
        }
    }

    pub fn error(status_code: u16, message: &str) -> Self {
        let body = serde_json::to_string(&ErrorBody { error: message })
            .unwrap_or_else(|_| format!("{{\"error\":\"{}\"}}", message));
        Self::json(status_code, body)
    }

    /// Acknowledges a conversion whose result was written to storage.
    pub fn stored(status_code: u16, location: &str) -> Self {
        let body = serde_json::to_string(&StoredBody { output: location })
            .unwrap_or_else(|_| format!("{{\"output\":\"{}\"}}", location));
        Self::json(status_code, body)
    }

    fn json(status_code: u16, body: String) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        Self {
            status_code,
            headers,
            body,
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn is_success(&self) -> bool {
        self.status_code == STATUS_OK
    }
}

/// Converts an uploaded export, or explains why it could not.
pub fn handle_upload(file: Option<&[u8]>, options: &ConversionOptions) -> DeliveryResponse {
    match convert_upload(file, options) {
        Ok(csv) => DeliveryResponse::attachment(csv),
        Err(EtlError::MissingUploadError) => {
            tracing::warn!("⚠️ Conversion requested without a file");
            DeliveryResponse::error(STATUS_BAD_REQUEST, MISSING_FILE_MESSAGE)
        }
        Err(e) => {
            // 只記錄細節，不回傳給呼叫端
            tracing::error!(
                "❌ Conversion failed: {} (Category: {:?})",
                e,
                e.category()
            );
            DeliveryResponse::error(STATUS_INTERNAL_ERROR, INTERNAL_ERROR_MESSAGE)
        }
    }
}

fn convert_upload(file: Option<&[u8]>, options: &ConversionOptions) -> Result<String> {
    let bytes = file.ok_or(EtlError::MissingUploadError)?;
    options.validate()?;
    let text = String::from_utf8_lossy(bytes);

    let result = convert_csv(&text, Lookups::standard(), options)?;
    tracing::info!(
        "✅ Converted upload: {} rows in, {} skipped, {} out",
        result.rows_read,
        result.rows_skipped,
        result.records.len()
    );
    Ok(result.csv_output)
}
