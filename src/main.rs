use dotenvy::dotenv;
use signflow::logging::init_tracing;
use signflow::metrics::{init_metrics, metrics_app};
use signflow::router::init_router;
use signflow::signflow_config::ServerConfig;
use signflow::state::init_app_state;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let server_config = ServerConfig::from_env();
    init_tracing(&server_config)?;

    let metrics_handle = init_metrics()?;

    let state = init_app_state().await?;
    sqlx::migrate!("./migrations").run(&state.db).await?;

    let mut app = init_router(state);
    if let Some(handle) = metrics_handle {
        app = app.merge(metrics_app(handle));
    }

    let listener = tokio::net::TcpListener::bind(&server_config.addr).await?;
    info!(addr = %server_config.addr, "Server running");
    info!("Swagger UI available at /swagger-ui");
    axum::serve(listener, app).await?;

    Ok(())
}
