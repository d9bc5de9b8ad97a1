use codequiz_migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

use crate::config::StoreConfig;

pub async fn init_pool_and_migrate(config: &StoreConfig) -> anyhow::Result<DatabaseConnection> {
    config.validate()?;

    let mut options = ConnectOptions::new(config.database_url.as_str());
    options
        .max_connections(config.max_connections)
        .sqlx_logging(false);

    let db = Database::connect(options).await?;

    if config.run_migrations {
        Migrator::up(&db, None).await?;
        tracing::info!("database migrations applied");
    }

    Ok(db)
}
