//http服务入口：把配置好的 scaler 暴露给外部控制循环
use actix_web::{web, App, HttpServer};
use metric_scaler::handlers::metrics_handler::{self, ScalerState};
use metric_scaler::scaling::metric_fetcher::HttpMetricFetcher;
use metric_scaler::scaling::scaler_factory::build_scaler;
use metric_scaler::scaling::scaling_config::ScalingConfig;
use std::collections::HashMap;
use std::io;
use std::sync::Arc;

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ScalingConfig::from_env().map_err(to_io)?;
    let fetcher = HttpMetricFetcher::new(config.fetch_timeout, config.auth_token.clone()).map_err(to_io)?;
    let resolved_env: HashMap<String, String> = std::env::vars().collect();
    let scaler = build_scaler(
        &config.scaler_type,
        &resolved_env,
        &config.metadata,
        Arc::new(fetcher),
    )
    .map_err(to_io)?;

    let state = web::Data::new(ScalerState::new(scaler.clone(), config.tick_timeout));
    log::info!("listening on {}", config.bind_addr);

    // 启动 HTTP 服务
    let server_state = state.clone();
    HttpServer::new(move || {
        App::new()
            .app_data(server_state.clone())
            .configure(metrics_handler::configure)
    })
    .bind(config.bind_addr)?//监听地址
    .run()
    .await?;

    state.shutdown();
    if let Err(e) = scaler.close().await {
        log::warn!("error closing scaler: {}", e);
    }
    Ok(())
}

fn to_io(e: metric_scaler::scaling::scaling_error::ScalingError) -> io::Error {
    log::error!("{}", e);
    io::Error::new(io::ErrorKind::Other, e.to_string())
}
