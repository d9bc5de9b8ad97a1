use codequiz_server::{QuizStore, StoreConfig, db};
use sea_orm::DatabaseConnection;
use tempfile::TempDir;

pub struct TestStore {
    // Keeps the database file alive for the duration of the test.
    #[allow(dead_code)]
    temp_dir: TempDir,
    #[allow(dead_code)]
    pub db: DatabaseConnection,
    pub store: QuizStore,
}

pub async fn setup_store() -> TestStore {
    let temp_dir = TempDir::with_prefix("codequiz-test").expect("create temp dir");
    let path = temp_dir.path().join("db.sqlite");
    let config = StoreConfig {
        database_url: format!("sqlite://{}?mode=rwc", path.display()),
        max_connections: 1,
        ..StoreConfig::default()
    };

    let db = db::init_pool_and_migrate(&config)
        .await
        .expect("database should migrate");
    let store = QuizStore::new(db.clone());

    TestStore {
        temp_dir,
        db,
        store,
    }
}
