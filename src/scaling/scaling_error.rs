use reqwest::StatusCode;
use serde_json::Error as JsonError;

#[derive(thiserror::Error, Debug)]
pub enum ScalingError {
    // 构造阶段的配置错误，不重试
    #[error("{0}")]
    Configuration(String),

    #[error("HTTP error ({0}): {1}")]
    HttpError(StatusCode, String),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] JsonError),

    #[error("Invalid metric reading: {0}")]
    InvalidReading(String),

    #[error("context canceled")]
    Cancelled,

    #[error("context deadline exceeded")]
    DeadlineExceeded,

    #[error("no scaler found for type: {0}")]
    UnknownScalerType(String),

    #[error("Label selector parse error: {0}")]
    InvalidSelector(String),
}

impl ScalingError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// 只影响当前这一次查询的错误，下一次 tick 重新尝试
    pub fn is_fetch_error(&self) -> bool {
        matches!(
            self,
            ScalingError::HttpError(..)
                | ScalingError::JsonError(_)
                | ScalingError::InvalidReading(_)
                | ScalingError::Cancelled
                | ScalingError::DeadlineExceeded
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_classification() {
        assert!(ScalingError::Cancelled.is_fetch_error());
        assert!(ScalingError::DeadlineExceeded.is_fetch_error());
        assert!(ScalingError::HttpError(StatusCode::BAD_GATEWAY, "down".into()).is_fetch_error());
        assert!(ScalingError::InvalidReading("abc".into()).is_fetch_error());
        assert!(!ScalingError::configuration("no endpoint given").is_fetch_error());
        assert!(!ScalingError::UnknownScalerType("kafka".into()).is_fetch_error());
    }

    #[test]
    fn test_display() {
        let err = ScalingError::HttpError(StatusCode::NOT_FOUND, "missing".into());
        assert_eq!(err.to_string(), "HTTP error (404 Not Found): missing");
        assert_eq!(
            ScalingError::configuration("no endpoint given").to_string(),
            "no endpoint given"
        );
    }
}
