use crate::core::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("🚀 Starting size grid conversion");

        // Extract
        let rows = self.pipeline.extract().await?;
        tracing::info!("📥 Extracted {} rows", rows.len());
        self.monitor.log_stats("Extract");

        // Transform
        let result = self.pipeline.transform(rows).await?;
        tracing::info!(
            "🔄 Transformed {} rows ({} skipped, {} measures)",
            result.records.len(),
            result.rows_skipped,
            result.schema.measures().len()
        );
        self.monitor.log_stats("Transform");

        // Load
        let output_path = self.pipeline.load(result).await?;
        tracing::info!("💾 Output saved to: {}", output_path);
        self.monitor.log_stats("Load");

        self.monitor.log_final_stats();
        Ok(output_path)
    }
}
