use crate::core::convert::convert_rows;
use crate::core::csv_io::parse_rows;
use crate::core::lookup::Lookups;
use crate::core::{ConfigProvider, InputRow, Pipeline, Storage, TransformResult};
use crate::utils::error::Result;

/// Reads a size-grid export from storage, converts it and writes the flat
/// catalog CSV next to the configured output path.
pub struct SizeGridPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    lookups: &'static Lookups,
}

impl<S: Storage, C: ConfigProvider> SizeGridPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self {
            storage,
            config,
            lookups: Lookups::standard(),
        }
    }

    fn output_key(&self) -> String {
        let dir = self.config.output_path().trim_end_matches('/');
        if dir.is_empty() {
            self.config.output_filename().to_string()
        } else {
            format!("{}/{}", dir, self.config.output_filename())
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for SizeGridPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<InputRow>> {
        tracing::debug!("Reading size grid from: {}", self.config.input_path());
        let bytes = self.storage.read_file(self.config.input_path()).await?;
        tracing::debug!("Read {} bytes", bytes.len());

        let text = String::from_utf8_lossy(&bytes);
        parse_rows(&text)
    }

    async fn transform(&self, rows: Vec<InputRow>) -> Result<TransformResult> {
        convert_rows(rows, self.lookups, self.config.conversion_options())
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        let output_key = self.output_key();

        tracing::debug!(
            "Writing {} records ({} bytes) to {}",
            result.records.len(),
            result.csv_output.len(),
            output_key
        );
        self.storage
            .write_file(&output_key, result.csv_output.as_bytes())
            .await?;

        Ok(output_key)
    }
}
