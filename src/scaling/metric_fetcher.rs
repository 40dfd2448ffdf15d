//外部指标获取：trait + 默认的 HTTP 实现
use super::scaler::ScalerContext;
use super::scaling_error::ScalingError;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;

/// Fetches a single numeric reading from an external signal source.
///
/// No retry or caching happens here; the host loop calls again next tick.
#[async_trait]
pub trait MetricFetcher: Send + Sync {
    async fn fetch_metric(&self, ctx: &ScalerContext, endpoint: &str) -> Result<i64, ScalingError>;
}

#[derive(Clone)]
pub struct HttpMetricFetcher {
    client: reqwest::Client,
    auth_token: Option<String>,
}

impl HttpMetricFetcher {
    pub fn new(timeout: Duration, auth_token: Option<String>) -> Result<Self, ScalingError> {
        let client = reqwest::ClientBuilder::new()
            .timeout(timeout)
            .build()
            .map_err(|e| ScalingError::configuration(format!("unable to build http client: {}", e)))?;
        Ok(Self { client, auth_token })
    }

    async fn get_reading(&self, ctx: &ScalerContext, endpoint: &str) -> Result<i64, ScalingError> {
        let mut req = self.client.get(endpoint);
        if let Some(token) = &self.auth_token {
            req = req.bearer_auth(token);
        }
        // 请求本身也不超过 ctx 的剩余时间
        if let Some(deadline) = ctx.deadline() {
            req = req.timeout(deadline.saturating_duration_since(tokio::time::Instant::now()));
        }

        let start = std::time::Instant::now();
        let resp = req.send().await.map_err(|e| {
            ScalingError::HttpError(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Request failed: {}", e),
            )
        })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| {
            ScalingError::HttpError(status, format!("Failed to read response: {}", e))
        })?;

        log::debug!(
            "FetchMetric [{}] status={} took: {:.4}s",
            endpoint,
            status,
            start.elapsed().as_secs_f64()
        );

        if !status.is_success() {
            return Err(ScalingError::HttpError(status, body));
        }
        parse_reading(&body)
    }
}

#[async_trait]
impl MetricFetcher for HttpMetricFetcher {
    async fn fetch_metric(&self, ctx: &ScalerContext, endpoint: &str) -> Result<i64, ScalingError> {
        ctx.run(self.get_reading(ctx, endpoint)).await
    }
}

// 响应体可以是纯整数、JSON 整数，或者带 value 字段的 JSON 对象
pub fn parse_reading(body: &str) -> Result<i64, ScalingError> {
    let trimmed = body.trim();
    if let Ok(v) = trimmed.parse::<i64>() {
        return Ok(v);
    }

    let value: Value = serde_json::from_str(trimmed)?;
    let reading = match &value {
        Value::Number(n) => n.as_i64(),
        Value::Object(obj) => obj.get("value").and_then(Value::as_i64),
        _ => None,
    };
    reading.ok_or_else(|| ScalingError::InvalidReading(format!("{} is not an integer reading", trimmed)))
}
