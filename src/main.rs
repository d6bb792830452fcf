// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::{Context, Result};
use kube::Client;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use secret_replicator::config::Config;
use secret_replicator::sync::ReplicationManager;
use secret_replicator::watchers::{NamespaceWatcher, SecretWatcher};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing, RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting secret replicator");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    info!(
        "Configuration loaded: namespace_to_watch={}, label_names={:?}, managed_annotation={}",
        config.namespace_to_watch, config.label_names, config.managed_annotation_name
    );

    // Create Kubernetes client
    let client = Client::try_default().await?;
    info!("Connected to Kubernetes cluster");

    // Create the replication manager and get a handle for the watchers
    let (manager, sync_handle) = ReplicationManager::new(client.clone(), &config);

    let secret_watcher = SecretWatcher::new(client.clone(), &config, sync_handle.clone());
    let namespace_watcher = NamespaceWatcher::new(client, &config, sync_handle);

    info!("Starting watchers...");

    // Run the manager and both watchers concurrently; any fatal watcher error stops the process
    tokio::try_join!(manager.run(), secret_watcher.run(), namespace_watcher.run())?;

    // This should never be reached as watchers run forever
    warn!("All watchers stopped unexpectedly");
    Ok(())
}
