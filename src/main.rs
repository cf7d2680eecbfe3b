mod config;
mod data;
mod error;
mod esi;
mod model;
mod scheduler;
mod service;
mod startup;
mod util;
mod worker;

use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::scheduler::Scheduler;
use crate::worker::queue::WorkerQueue;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let esi_client = startup::build_esi_client(&config).unwrap();
    let db = startup::connect_to_database(&config).await.unwrap();

    let queue = WorkerQueue::new();
    let pool = startup::start_workers(&config, db.clone(), esi_client, queue.clone()).await;

    Scheduler::new(db, queue)
        .await
        .unwrap()
        .start()
        .await
        .unwrap();

    tracing::info!("Brokkr is running, press Ctrl-C to stop");
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {:?}", e);
    }

    pool.stop().await;
}
