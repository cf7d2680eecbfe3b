//! Process startup: builds the shared clients and wires the worker pool.

use sea_orm::{ConnectOptions, Database, DatabaseConnection};

use migration::{Migrator, MigratorTrait};

use crate::config::Config;
use crate::error::Error;
use crate::esi::EsiClient;
use crate::worker::handler::WorkerJobHandler;
use crate::worker::pool::{WorkerPool, WorkerPoolConfig};
use crate::worker::queue::WorkerQueue;

/// Build and configure the ESI client with the provided credentials
pub fn build_esi_client(config: &Config) -> Result<EsiClient, Error> {
    let mut builder = EsiClient::builder()
        .user_agent(&config.user_agent)
        .client_id(&config.esi_client_id)
        .client_secret(&config.esi_client_secret);

    if let Some(esi_base_url) = &config.esi_base_url {
        builder = builder.esi_url(esi_base_url);
    }

    Ok(builder.build()?)
}

/// Connect to the database and run migrations
pub async fn connect_to_database(config: &Config) -> Result<DatabaseConnection, Error> {
    let mut opt = ConnectOptions::new(&config.database_url);
    opt.sqlx_logging(false);

    let db = Database::connect(opt).await?;

    Migrator::up(&db, None).await?;

    Ok(db)
}

/// Starts the worker pool draining the queue.
///
/// The returned handle must be kept for shutdown, the pool runs until
/// [`WorkerPool::stop`] is called on it.
pub async fn start_workers(
    config: &Config,
    db: DatabaseConnection,
    esi_client: EsiClient,
    queue: WorkerQueue,
) -> WorkerPool {
    let handler = WorkerJobHandler::new(db, esi_client, queue.clone(), config.sync.clone());
    let pool = WorkerPool::new(WorkerPoolConfig::new(config.workers), queue, handler);

    pool.start().await;

    pool
}
