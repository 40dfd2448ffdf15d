//通用 API scaler：从任意 endpoint 读取一个整数指标
use super::metric_fetcher::MetricFetcher;
use super::metric_types::{ExternalMetricValue, LabelSelector, MetricSpec};
use super::scaler::{Scaler, ScalerContext};
use super::scaling_error::ScalingError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

pub const GENERIC_API_METRIC_NAME: &str = "targetMetricValue";
pub const DEFAULT_TARGET_METRIC_VALUE: i64 = 5;
const ENDPOINT_KEY: &str = "endpoint";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericApiMetadata {
    pub endpoint: String,
    pub target_metric_value: i64,
}

/// Resolves raw scaler metadata into a validated config.
///
/// A malformed `targetMetricValue` is logged and the default kept; only a
/// missing or empty `endpoint` fails. `resolved_env` is accepted for parity
/// with other scaler variants and is not read.
pub fn parse_generic_api_metadata(
    metadata: &HashMap<String, String>,
    _resolved_env: &HashMap<String, String>,
) -> Result<GenericApiMetadata, ScalingError> {
    let target_metric_value = parse_or_default(
        metadata,
        GENERIC_API_METRIC_NAME,
        DEFAULT_TARGET_METRIC_VALUE,
    );

    // 原样保存，trim 只用于判空
    let endpoint = match metadata.get(ENDPOINT_KEY) {
        Some(v) if !v.trim().is_empty() => v.clone(),
        _ => return Err(ScalingError::configuration("no endpoint given")),
    };

    Ok(GenericApiMetadata {
        endpoint,
        target_metric_value,
    })
}

// 解析失败只记 warn，不向上抛
fn parse_or_default<T>(metadata: &HashMap<String, String>, key: &str, default: T) -> T
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match metadata.get(key) {
        Some(raw) => match raw.parse() {
            Ok(v) => v,
            Err(e) => {
                log::warn!("Error parsing generic api metadata {}={:?}: {}", key, raw, e);
                default
            }
        },
        None => default,
    }
}

pub struct GenericApiScaler {
    metadata: GenericApiMetadata,
    fetcher: Arc<dyn MetricFetcher>,
}

impl GenericApiScaler {
    pub fn new(
        resolved_env: &HashMap<String, String>,
        metadata: &HashMap<String, String>,
        fetcher: Arc<dyn MetricFetcher>,
    ) -> Result<Self, ScalingError> {
        let metadata = parse_generic_api_metadata(metadata, resolved_env).map_err(|e| {
            ScalingError::configuration(format!("error parsing generic api metadata: {}", e))
        })?;
        Ok(Self { metadata, fetcher })
    }

    pub fn metadata(&self) -> &GenericApiMetadata {
        &self.metadata
    }

    // fetcher 不一定理会 ctx，这里统一按 ctx 截断
    async fn fetch(&self, ctx: &ScalerContext) -> Result<i64, ScalingError> {
        ctx.run(self.fetcher.fetch_metric(ctx, &self.metadata.endpoint))
            .await
    }
}

#[async_trait]
impl Scaler for GenericApiScaler {
    async fn is_active(&self, ctx: &ScalerContext) -> Result<bool, ScalingError> {
        let value = self.fetch(ctx).await.map_err(|e| {
            log::error!("error checking activity of {}: {}", self.metadata.endpoint, e);
            e
        })?;
        log::debug!("generic api {} reading={}", self.metadata.endpoint, value);
        Ok(value > 0)
    }

    fn get_metric_spec_for_scaling(&self) -> Vec<MetricSpec> {
        vec![MetricSpec::external(
            GENERIC_API_METRIC_NAME,
            self.metadata.target_metric_value,
        )]
    }

    // selector 对通用 scaler 无意义，保留参数以符合接口
    async fn get_metrics(
        &self,
        ctx: &ScalerContext,
        metric_name: &str,
        _selector: &LabelSelector,
    ) -> Result<Vec<ExternalMetricValue>, ScalingError> {
        let value = self.fetch(ctx).await.map_err(|e| {
            log::error!("error getting metric value {}", e);
            e
        })?;
        Ok(vec![ExternalMetricValue::now(metric_name, value)])
    }

    async fn close(&self) -> Result<(), ScalingError> {
        Ok(())
    }
}
