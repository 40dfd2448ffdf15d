//指标结构体，对应 HPA 的 external metrics 类型
use super::scaling_error::ScalingError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Classification of a metric source as seen by the autoscaling formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetricSourceType {
    External,
    Resource,
    Pods,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalMetricSource {
    pub metric_name: String,
    pub target_average_value: i64,
}

// 对应 v2beta1.MetricSpec，只保留 external 分支
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricSpec {
    #[serde(rename = "type")]
    pub metric_type: MetricSourceType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external: Option<ExternalMetricSource>,
}

impl MetricSpec {
    pub fn external(metric_name: &str, target_average_value: i64) -> Self {
        Self {
            metric_type: MetricSourceType::External,
            external: Some(ExternalMetricSource {
                metric_name: metric_name.to_string(),
                target_average_value,
            }),
        }
    }
}

/// One reading of an external metric, stamped with its capture time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalMetricValue {
    pub metric_name: String,
    pub value: i64,
    pub timestamp: DateTime<Utc>,
}

impl ExternalMetricValue {
    pub fn now(metric_name: &str, value: i64) -> Self {
        Self {
            metric_name: metric_name.to_string(),
            value,
            timestamp: Utc::now(),
        }
    }
}

// 标签选择器，格式 k=v,k2=v2；空串表示全部匹配
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelSelector {
    pub match_labels: BTreeMap<String, String>,
}

impl LabelSelector {
    pub fn everything() -> Self {
        Self::default()
    }

    pub fn parse(raw: &str) -> Result<Self, ScalingError> {
        let mut match_labels = BTreeMap::new();
        for pair in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) = pair
                .split_once('=')
                .ok_or_else(|| ScalingError::InvalidSelector(format!("missing '=' in {}", pair)))?;
            let key = key.trim();
            if key.is_empty() {
                return Err(ScalingError::InvalidSelector(format!("empty key in {}", pair)));
            }
            match_labels.insert(key.to_string(), value.trim().to_string());
        }
        Ok(Self { match_labels })
    }
}
