mod http_handler;

use lambda_http::{run, service_fn, Error};
use sanca_shared::{AppConfig, AppState};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Error> {
    // CloudWatch adds timestamps and does not render colours
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_ansi(false)
        .without_time()
        .init();

    let sdk_config = aws_config::load_from_env().await;
    let config = AppConfig::from_env();
    tracing::info!(
        "⚙️ Config loaded: table={}, bucket={}, presign_expires={}s",
        config.table_name,
        config.bucket_name,
        config.presign_expires.as_secs()
    );
    let state = Arc::new(AppState::new(&sdk_config, config));

    run(service_fn(move |event| {
        let state = state.clone();
        async move { http_handler::function_handler(event, state).await }
    }))
    .await
}
