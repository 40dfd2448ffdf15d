//把 scaler 的四个操作暴露成 HTTP 接口，供 host 控制循环轮询
use crate::scaling::metric_types::{ExternalMetricValue, LabelSelector};
use crate::scaling::scaler::{Scaler, ScalerContext};
use crate::scaling::scaling_error::ScalingError;
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct ScalerState {
    pub scaler: Arc<dyn Scaler>,
    pub tick_timeout: Duration,
    root: ScalerContext,
}

impl ScalerState {
    pub fn new(scaler: Arc<dyn Scaler>, tick_timeout: Duration) -> Self {
        Self {
            scaler,
            tick_timeout,
            root: ScalerContext::background(),
        }
    }

    // 每个请求一个子 ctx：跟随 shutdown 取消，并带 tick 截止时间
    fn context(&self) -> ScalerContext {
        self.root.child(Some(self.tick_timeout))
    }

    /// Cancels every in-flight and future query.
    pub fn shutdown(&self) {
        self.root.cancel();
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ActiveResponse {
    pub active: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MetricsResponse {
    pub items: Vec<ExternalMetricValue>,
}

#[derive(Debug, Deserialize)]
pub struct MetricsQuery {
    #[serde(rename = "labelSelector")]
    label_selector: Option<String>,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/scaler/active").route(web::get().to(handle_is_active)))
        .service(web::resource("/scaler/metric-spec").route(web::get().to(handle_metric_spec)))
        .service(
            web::resource("/scaler/metrics/{metric_name}").route(web::get().to(handle_get_metrics)),
        );
}

pub async fn handle_is_active(state: web::Data<ScalerState>) -> HttpResponse {
    match state.scaler.is_active(&state.context()).await {
        Ok(active) => HttpResponse::Ok().json(ActiveResponse { active }),
        Err(e) => error_response(&e),
    }
}

pub async fn handle_metric_spec(state: web::Data<ScalerState>) -> HttpResponse {
    HttpResponse::Ok().json(state.scaler.get_metric_spec_for_scaling())
}

pub async fn handle_get_metrics(
    state: web::Data<ScalerState>,
    metric_name: web::Path<String>,
    query: web::Query<MetricsQuery>,
) -> HttpResponse {
    let selector = match query.label_selector.as_deref() {
        Some(raw) => match LabelSelector::parse(raw) {
            Ok(s) => s,
            Err(e) => return error_response(&e),
        },
        None => LabelSelector::everything(),
    };

    match state
        .scaler
        .get_metrics(&state.context(), &metric_name, &selector)
        .await
    {
        Ok(items) => HttpResponse::Ok().json(MetricsResponse { items }),
        Err(e) => error_response(&e),
    }
}

// 错误一律不返回数据，只返回错误信息
fn error_response(err: &ScalingError) -> HttpResponse {
    let body = serde_json::json!({ "error": err.to_string() });
    match err {
        ScalingError::InvalidSelector(_) => HttpResponse::BadRequest().json(body),
        ScalingError::DeadlineExceeded => HttpResponse::GatewayTimeout().json(body),
        e if e.is_fetch_error() => HttpResponse::BadGateway().json(body),
        _ => HttpResponse::InternalServerError().json(body),
    }
}
