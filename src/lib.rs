pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::{cli::LocalStorage, CliConfig};

#[cfg(feature = "lambda")]
pub use crate::config::lambda::{LambdaConfig, S3Storage};

pub use crate::core::{
    convert::convert_csv,
    delivery::{handle_upload, DeliveryResponse},
    etl::EtlEngine,
    lookup::Lookups,
    pipeline::SizeGridPipeline,
    schema::discover_schema,
    transform::transform_row,
};
pub use crate::domain::model::{ConversionOptions, InputRow, OutputRecord, OutputSchema, RangeValue};
pub use crate::utils::error::{EtlError, Result};
