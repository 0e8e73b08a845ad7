use std::sync::Arc;

use catalog_common::storage::filesystem::FilesystemImageStore;
use tracing::{Level, info};

use catalog_server::config::AppConfig;
use catalog_server::database::init_db;
use catalog_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let config = AppConfig::load()?;

    let db = init_db(&config.database.url).await?;
    info!("Connected to database");

    let images = FilesystemImageStore::new(
        config.storage.root.clone(),
        config.storage.upload_dir.clone(),
        config.storage.max_image_size,
    )
    .await?;
    info!(
        "Storing images under {}/{}",
        config.storage.root.display(),
        config.storage.upload_dir
    );

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState {
        db,
        images: Arc::new(images),
        config,
    };

    let app = catalog_server::build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server running at http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
