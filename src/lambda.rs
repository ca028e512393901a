use aws_config::BehaviorVersion;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::Client as S3Client;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde::Deserialize;
use size_grid_etl::core::delivery::{INTERNAL_ERROR_MESSAGE, STATUS_INTERNAL_ERROR, STATUS_OK};
use size_grid_etl::utils::{logger, validation::Validate};
use size_grid_etl::{
    handle_upload, DeliveryResponse, EtlEngine, LambdaConfig, S3Storage, SizeGridPipeline,
};

/// Either an inline upload (`file` holds the CSV text) or a reference to an
/// export already stored in the configured bucket.
#[derive(Deserialize)]
pub struct Request {
    pub file: Option<String>,
    pub s3_key: Option<String>,
}

async fn function_handler(event: LambdaEvent<Request>) -> Result<DeliveryResponse, Error> {
    let lambda_config = LambdaConfig::from_env()?;
    lambda_config.validate()?;

    let request = event.payload;
    match request.s3_key {
        Some(key) => convert_stored_object(&lambda_config, &key).await,
        None => {
            tracing::info!("Converting inline upload");
            Ok(handle_upload(
                request.file.as_deref().map(str::as_bytes),
                &lambda_config.options,
            ))
        }
    }
}

async fn convert_stored_object(
    lambda_config: &LambdaConfig,
    key: &str,
) -> Result<DeliveryResponse, Error> {
    let bucket = lambda_config.require_bucket()?.to_string();
    tracing::info!("Converting s3://{}/{}", bucket, key);

    // 創建AWS配置和S3客戶端
    let config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let config = aws_sdk_s3::config::Builder::from(&config)
        .region(Region::new(lambda_config.s3_region.clone()))
        .force_path_style(true)
        .build();
    let s3_client = S3Client::from_conf(config);

    // 創建存儲和管道
    let storage = S3Storage::new(s3_client, bucket);
    let pipeline = SizeGridPipeline::new(storage, lambda_config.for_object(key));

    match EtlEngine::new(pipeline).run().await {
        Ok(output_key) => {
            tracing::info!("✅ Stored converted grid at {}", output_key);
            Ok(DeliveryResponse::stored(STATUS_OK, &output_key))
        }
        Err(e) => {
            tracing::error!(
                "❌ Conversion of {} failed: {} (Category: {:?})",
                key,
                e,
                e.category()
            );
            Ok(DeliveryResponse::error(
                STATUS_INTERNAL_ERROR,
                INTERNAL_ERROR_MESSAGE,
            ))
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();
    run(service_fn(function_handler)).await
}
