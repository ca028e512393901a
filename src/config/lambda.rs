use crate::core::{ConfigProvider, Storage};
use crate::domain::model::{ConversionOptions, DEFAULT_OUTPUT_FILENAME};
use crate::utils::error::{EtlError, Result};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use std::env;

#[derive(Debug, Clone)]
pub struct LambdaConfig {
    /// Bucket holding uploaded exports; only needed for S3-triggered runs.
    pub s3_bucket: Option<String>,
    pub s3_prefix: String,
    pub s3_region: String,
    /// Object key of the export being converted by this invocation.
    pub input_key: String,
    pub options: ConversionOptions,
}

impl LambdaConfig {
    pub fn from_env() -> Result<Self> {
        let mut options = ConversionOptions::default();
        if let Ok(value) = env::var("NORMALIZE_NUMBERS") {
            options.normalize_numbers =
                value
                    .parse()
                    .map_err(|_| EtlError::InvalidConfigValueError {
                        field: "NORMALIZE_NUMBERS".to_string(),
                        value: value.clone(),
                        reason: "Expected 'true' or 'false'".to_string(),
                    })?;
        }
        if let Ok(column) = env::var("FILTER_COLUMN") {
            options.filter_column = column;
        }
        if let Ok(token) = env::var("FILTER_CONTAINS") {
            options.filter_token = token;
        }

        Ok(Self {
            s3_bucket: env::var("S3_BUCKET").ok().filter(|b| !b.is_empty()),
            s3_prefix: env::var("S3_PREFIX").unwrap_or_else(|_| "size-grid".to_string()),
            s3_region: env::var("S3_REGION").unwrap_or_else(|_| "ap-southeast-2".to_string()),
            input_key: String::new(),
            options,
        })
    }

    pub fn for_object(&self, key: &str) -> Self {
        Self {
            input_key: key.to_string(),
            ..self.clone()
        }
    }

    pub fn require_bucket(&self) -> Result<&str> {
        crate::utils::validation::validate_required_field("S3_BUCKET", &self.s3_bucket)
            .map(String::as_str)
    }
}

impl ConfigProvider for LambdaConfig {
    fn input_path(&self) -> &str {
        &self.input_key
    }

    fn output_path(&self) -> &str {
        &self.s3_prefix
    }

    fn output_filename(&self) -> &str {
        DEFAULT_OUTPUT_FILENAME
    }

    fn conversion_options(&self) -> &ConversionOptions {
        &self.options
    }
}

impl crate::utils::validation::Validate for LambdaConfig {
    fn validate(&self) -> Result<()> {
        use crate::utils::validation::*;

        if let Some(bucket) = &self.s3_bucket {
            validate_s3_bucket_name("s3_bucket", bucket)?;
        }
        validate_non_empty_string("s3_prefix", &self.s3_prefix)?;
        validate_aws_region("s3_region", &self.s3_region)?;
        self.options.validate()?;

        tracing::info!("✅ Lambda configuration validation passed");
        Ok(())
    }
}

fn validate_s3_bucket_name(field_name: &str, bucket_name: &str) -> Result<()> {
    let invalid = |reason: &str| EtlError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: bucket_name.to_string(),
        reason: reason.to_string(),
    };

    if bucket_name.len() < 3 || bucket_name.len() > 63 {
        return Err(invalid("S3 bucket name must be between 3 and 63 characters"));
    }

    if !bucket_name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '.')
    {
        return Err(invalid(
            "S3 bucket name can only contain lowercase letters, numbers, hyphens, and dots",
        ));
    }

    if bucket_name.starts_with('-') || bucket_name.ends_with('-') {
        return Err(invalid("S3 bucket name cannot start or end with a hyphen"));
    }

    Ok(())
}

fn validate_aws_region(field_name: &str, region: &str) -> Result<()> {
    crate::utils::validation::validate_non_empty_string(field_name, region)?;

    if !region
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: region.to_string(),
            reason: "AWS region can only contain lowercase letters, numbers, and hyphens"
                .to_string(),
        });
    }

    Ok(())
}

#[derive(Debug, Clone)]
pub struct S3Storage {
    client: S3Client,
    bucket: String,
}

impl S3Storage {
    pub fn new(client: S3Client, bucket: String) -> Self {
        Self { client, bucket }
    }
}

impl Storage for S3Storage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let resp = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(path)
            .send()
            .await
            .map_err(|e| EtlError::StorageError {
                message: format!("Failed to read s3://{}/{}: {}", self.bucket, path, e),
            })?;

        let data = resp
            .body
            .collect()
            .await
            .map_err(|e| EtlError::StorageError {
                message: format!("Failed to collect S3 data: {}", e),
            })?;

        Ok(data.into_bytes().to_vec())
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(path)
            .content_type("text/csv")
            .body(ByteStream::from(data.to_vec()))
            .send()
            .await
            .map_err(|e| EtlError::StorageError {
                message: format!("Failed to write s3://{}/{}: {}", self.bucket, path, e),
            })?;

        Ok(())
    }
}
