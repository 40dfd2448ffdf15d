pub mod generic_api_scaler;
pub mod metric_fetcher;
pub mod metric_types;
pub mod scaler;
pub mod scaler_factory;
pub mod scaling_config;
pub mod scaling_error;
