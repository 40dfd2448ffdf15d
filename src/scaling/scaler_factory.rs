// 按类型名构建 scaler，host 只看到 dyn Scaler
use super::generic_api_scaler::GenericApiScaler;
use super::metric_fetcher::MetricFetcher;
use super::scaler::Scaler;
use super::scaling_error::ScalingError;
use std::collections::HashMap;
use std::sync::Arc;

pub const GENERIC_API_SCALER_TYPE: &str = "generic-api";

pub fn build_scaler(
    scaler_type: &str,
    resolved_env: &HashMap<String, String>,
    metadata: &HashMap<String, String>,
    fetcher: Arc<dyn MetricFetcher>,
) -> Result<Arc<dyn Scaler>, ScalingError> {
    match scaler_type.trim().to_ascii_lowercase().as_str() {
        "generic-api" | "genericapi" => {
            let scaler = GenericApiScaler::new(resolved_env, metadata, fetcher)?;
            log::info!(
                "built {} scaler for endpoint {}",
                GENERIC_API_SCALER_TYPE,
                scaler.metadata().endpoint
            );
            Ok(Arc::new(scaler))
        }
        _ => Err(ScalingError::UnknownScalerType(scaler_type.to_string())),
    }
}
