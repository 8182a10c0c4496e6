use signflow_config::{CorsConfig, DatabaseConfig};
use signflow_db::init_db_pool;
use sqlx::PgPool;

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: PgPool,
    pub cors_config: CorsConfig,
}

impl AppState {
    pub fn new(db: PgPool, cors_config: CorsConfig) -> Self {
        Self { db, cors_config }
    }
}

pub async fn init_app_state() -> anyhow::Result<AppState> {
    let database_config = DatabaseConfig::from_env().map_err(anyhow::Error::msg)?;

    Ok(AppState {
        db: init_db_pool(&database_config).await?,
        cors_config: CorsConfig::from_env(),
    })
}
