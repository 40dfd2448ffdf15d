// 适配器运行配置，从环境变量读取
use super::scaler_factory::GENERIC_API_SCALER_TYPE;
use super::scaling_error::ScalingError;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::time;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_TICK_TIMEOUT_MS: u64 = 5000;
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 3;

#[derive(Debug, Clone)]
pub struct ScalingConfig {
    pub bind_addr: SocketAddr,
    pub scaler_type: String,
    pub metadata: HashMap<String, String>,
    pub tick_timeout: time::Duration,
    pub fetch_timeout: time::Duration,
    pub auth_token: Option<String>,
}

impl ScalingConfig {
    pub fn from_env() -> Result<Self, ScalingError> {
        let vars: HashMap<String, String> = std::env::vars().collect();
        Self::from_vars(&vars)
    }

    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ScalingError> {
        let bind_raw = vars
            .get("SCALER_BIND_ADDR")
            .map(String::as_str)
            .unwrap_or(DEFAULT_BIND_ADDR);
        let bind_addr = bind_raw.parse::<SocketAddr>().map_err(|e| {
            ScalingError::configuration(format!("invalid SCALER_BIND_ADDR {}: {}", bind_raw, e))
        })?;

        let scaler_type = vars
            .get("SCALER_TYPE")
            .cloned()
            .unwrap_or_else(|| GENERIC_API_SCALER_TYPE.to_string());

        // SCALER_METADATA 是 string->string 的 JSON 对象
        let metadata_raw = vars
            .get("SCALER_METADATA")
            .ok_or_else(|| ScalingError::configuration("SCALER_METADATA is not set"))?;
        let metadata: HashMap<String, String> = serde_json::from_str(metadata_raw).map_err(|e| {
            ScalingError::configuration(format!("invalid SCALER_METADATA: {}", e))
        })?;

        let tick_timeout = time::Duration::from_millis(parse_u64(
            vars,
            "SCALER_TICK_TIMEOUT_MS",
            DEFAULT_TICK_TIMEOUT_MS,
        )?);
        let fetch_timeout = time::Duration::from_secs(parse_u64(
            vars,
            "SCALER_FETCH_TIMEOUT_SECS",
            DEFAULT_FETCH_TIMEOUT_SECS,
        )?);

        let auth_token = vars
            .get("SCALER_AUTH_TOKEN")
            .filter(|t| !t.is_empty())
            .cloned();

        Ok(Self {
            bind_addr,
            scaler_type,
            metadata,
            tick_timeout,
            fetch_timeout,
            auth_token,
        })
    }
}

fn parse_u64(vars: &HashMap<String, String>, key: &str, default: u64) -> Result<u64, ScalingError> {
    match vars.get(key) {
        Some(v) => match v.parse::<u64>() {
            Ok(0) => Err(ScalingError::configuration(format!("{} must be greater than 0", key))),
            Ok(n) => Ok(n),
            Err(e) => Err(ScalingError::configuration(format!("invalid {} {}: {}", key, v, e))),
        },
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let cfg = ScalingConfig::from_vars(&vars(&[(
            "SCALER_METADATA",
            r#"{"endpoint": "http://queue/depth"}"#,
        )]))
        .unwrap();
        assert_eq!(cfg.bind_addr, "0.0.0.0:8080".parse::<SocketAddr>().unwrap());
        assert_eq!(cfg.scaler_type, "generic-api");
        assert_eq!(cfg.metadata["endpoint"], "http://queue/depth");
        assert_eq!(cfg.tick_timeout, time::Duration::from_millis(5000));
        assert_eq!(cfg.fetch_timeout, time::Duration::from_secs(3));
        assert!(cfg.auth_token.is_none());
    }

    #[test]
    fn test_overrides() {
        let cfg = ScalingConfig::from_vars(&vars(&[
            ("SCALER_METADATA", r#"{"endpoint": "http://x", "targetMetricValue": "10"}"#),
            ("SCALER_BIND_ADDR", "127.0.0.1:9090"),
            ("SCALER_TYPE", "genericApi"),
            ("SCALER_TICK_TIMEOUT_MS", "250"),
            ("SCALER_FETCH_TIMEOUT_SECS", "1"),
            ("SCALER_AUTH_TOKEN", "token"),
        ]))
        .unwrap();
        assert_eq!(cfg.bind_addr.port(), 9090);
        assert_eq!(cfg.scaler_type, "genericApi");
        assert_eq!(cfg.metadata["targetMetricValue"], "10");
        assert_eq!(cfg.tick_timeout, time::Duration::from_millis(250));
        assert_eq!(cfg.fetch_timeout, time::Duration::from_secs(1));
        assert_eq!(cfg.auth_token.as_deref(), Some("token"));
    }

    #[test]
    fn test_invalid_values() {
        let cases = [
            vars(&[]),
            vars(&[("SCALER_METADATA", "not json")]),
            vars(&[("SCALER_METADATA", r#"{"targetMetricValue": 10}"#)]),
            vars(&[("SCALER_METADATA", "{}"), ("SCALER_BIND_ADDR", "nowhere")]),
            vars(&[("SCALER_METADATA", "{}"), ("SCALER_TICK_TIMEOUT_MS", "soon")]),
            vars(&[("SCALER_METADATA", "{}"), ("SCALER_FETCH_TIMEOUT_SECS", "0")]),
        ];
        for case in cases.iter() {
            assert!(matches!(
                ScalingConfig::from_vars(case),
                Err(ScalingError::Configuration(_))
            ));
        }
    }
}
