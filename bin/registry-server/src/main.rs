//! Registry Server
//!
//! Binds one consumer to every `<prefix>.<entity>.<operation>` request queue
//! and runs them until ctrl-c.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use mongodb::Client as MongoClient;
use registry_config::ConfigLoader;
use registry_core::{
    build_bindings, initialize_indexes, AuthorizationGate, JwtTokenAuthority, RegistryStores, TokenAuthority,
};
use registry_queue::amqp::{AmqpBroker, AmqpConfig};
use registry_queue::{consume, QueueConsumer, QueuePublisher};
use tokio::sync::watch;
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(name = "registry-server")]
#[command(about = "Registry service: entity lifecycle over AMQP request queues")]
struct Args {
    /// Path to the TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Keep entities in memory instead of MongoDB. Nothing survives a restart.
    #[arg(long)]
    memory_store: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    registry_common::logging::init_logging("registry-server");

    info!("Starting registry server");

    let loader = match &args.config {
        Some(path) => ConfigLoader::with_path(path.clone()),
        None => ConfigLoader::new(),
    };
    let config = loader.load()?;

    let stores = if args.memory_store {
        warn!("Using in-memory stores, entities are lost on shutdown");
        RegistryStores::memory()
    } else {
        let mongo_client = MongoClient::with_uri_str(&config.mongodb.uri).await?;
        let db = mongo_client.database(&config.mongodb.database);
        info!(database = %config.mongodb.database, "Connected to MongoDB");
        initialize_indexes(&db).await?;
        RegistryStores::mongo(&db)
    };

    let authority = JwtTokenAuthority::from_config(&config.auth.token_authority)?;
    if authority.is_enabled() {
        info!(algorithm = %config.auth.token_authority.algorithm, "Token authority enabled");
    } else {
        warn!("Token authority is DISABLED: platform owner tokens are accepted without signature verification");
    }
    let gate = Arc::new(AuthorizationGate::new(stores.platforms.clone(), Arc::new(authority)));

    let broker = AmqpBroker::connect(AmqpConfig {
        uri: config.amqp.uri.clone(),
        notification_exchange: config.amqp.notification_exchange.clone(),
        prefetch_count: config.amqp.prefetch_count,
        durable: config.amqp.durable,
    })
    .await?;
    let publisher: Arc<dyn QueuePublisher> = Arc::new(broker.publisher().await?);

    let bindings = build_bindings(&config.amqp.queue_prefix, &stores, gate, publisher);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let mut tasks = Vec::with_capacity(bindings.len());
    for binding in bindings {
        let consumer: Arc<dyn QueueConsumer> = Arc::new(broker.consumer(&binding.queue).await?);
        info!(
            queue = %binding.queue,
            entity = %binding.kind,
            operation = %binding.operation,
            "Consumer bound"
        );
        tasks.push(tokio::spawn(consume(consumer, binding.handler, shutdown_rx.clone())));
    }

    info!(consumers = tasks.len(), "Registry server started");

    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received");

    let _ = shutdown_tx.send(true);
    for task in tasks {
        if let Err(e) = task.await {
            error!(error = %e, "Consumer task failed");
        }
    }
    broker.close().await;

    info!("Registry server stopped");
    Ok(())
}
