//! # YaMDb Binary
//!
//! Opens the configured database, brings its schema up to date and reports
//! what it holds. The storage backend is chosen by compile-time features.

mod settings;

use std::sync::Arc;

use log::info;
use settings::Settings;
use yamdb_core::models::Title;
use yamdb_core::traits::CatalogRepo;
use yamdb_services::CatalogService;

// Feature-gated imports
#[cfg(feature = "db-sqlite")]
use yamdb_db_sqlite::SqliteRepo;

#[cfg(not(feature = "db-sqlite"))]
compile_error!("enable a database backend feature, e.g. `db-sqlite`");

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let settings = Settings::load()?;
    env_logger::init_from_env(env_logger::Env::new().default_filter_or(&settings.log_level));

    // 1. Initialize Database Implementation (applies migrations)
    #[cfg(feature = "db-sqlite")]
    let repo = Arc::new(SqliteRepo::new(&settings.database_url, settings.max_connections).await?);

    info!("database ready at {}", settings.database_url);

    // 2. Optional demo data, written through the validating service layer
    if settings.seed_demo {
        seed_demo(repo.clone()).await?;
    }

    for (table, rows) in repo.table_counts().await? {
        info!("{table:>14}: {rows}");
    }
    Ok(())
}

async fn seed_demo(repo: Arc<dyn CatalogRepo>) -> anyhow::Result<()> {
    if repo.get_category("films").await?.is_some() {
        info!("demo catalog already present");
        return Ok(());
    }

    let catalog = CatalogService::new(repo);
    let films = catalog.create_category("Films", "films").await?;
    let drama = catalog.create_genre("Drama", "drama").await?;
    let scifi = catalog.create_genre("Science fiction", "sci-fi").await?;

    catalog
        .create_title(
            Title::new("Solaris", 1972)
                .with_category(films.id)
                .with_genres([drama.id, scifi.id])
                .with_description("A psychologist is sent to a station orbiting a sentient ocean."),
        )
        .await?;
    catalog
        .create_title(Title::new("Stalker", 1979).with_category(films.id).with_genres([scifi.id]))
        .await?;

    info!("demo catalog seeded");
    Ok(())
}
