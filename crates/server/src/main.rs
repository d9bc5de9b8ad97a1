use anyhow::Context;
use codequiz_server::{QuizStore, StoreConfig, db, import};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;

    info!("starting codequiz store");
    let config = StoreConfig::load().context("failed to load store config")?;
    info!(
        max_connections = config.max_connections,
        run_migrations = config.run_migrations,
        "store config loaded"
    );

    let db = db::init_pool_and_migrate(&config)
        .await
        .context("failed to initialize database")?;
    let store = QuizStore::new(db);

    match &config.seed_file {
        Some(path) => {
            info!(path = %path, "importing quiz documents");
            let imported = import::import_file(&store, path)
                .await
                .with_context(|| format!("failed to import quiz documents from {path}"))?;
            let questions: usize = imported.iter().map(|tree| tree.questions.len()).sum();
            info!(quizzes = imported.len(), questions, "quiz documents imported");
        }
        None => info!("no seed_file configured, skipping import"),
    }

    let quizzes = store.quizzes.list().await.context("failed to list quizzes")?;
    info!(count = quizzes.len(), "quizzes stored");

    info!("codequiz store ready");
    Ok(())
}

fn init_tracing() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;

    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    Ok(())
}
