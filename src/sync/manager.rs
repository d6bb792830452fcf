// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Central coordinator that owns the watched-secret registry.
//!
//! Both watchers send their events through one queue; the manager handles them one
//! at a time, so a namespace replay never sees a half-applied secret event and two
//! fan-outs never run concurrently.

use crate::config::Config;
use crate::constants::EVENT_QUEUE_CAPACITY;
use crate::sync::policy::OwnershipPolicy;
use crate::sync::registry::{Registry, WatchedSecret};
use crate::sync::replicator::{ReplicationReport, Replicator};
use k8s_openapi::api::core::v1::Secret;
use kube::{Client, ResourceExt};
use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument, warn};

/// Events that watchers send to the ReplicationManager
#[derive(Debug, Clone)]
pub enum ReplicationEvent {
    /// A namespace appeared in the cluster
    NamespaceAdded { name: String },
    /// A secret in the source namespace was listed, created or changed
    SecretApplied { secret: Secret },
    /// A secret was removed from the source namespace
    SecretDeleted { name: String },
}

/// Single consumer of replication events
pub struct ReplicationManager {
    replicator: Replicator,
    namespace: String,
    registry: Registry,
    event_rx: mpsc::Receiver<ReplicationEvent>,
}

/// Handle to send events to the ReplicationManager
#[derive(Clone)]
pub struct ReplicationHandle {
    event_tx: mpsc::Sender<ReplicationEvent>,
}

impl ReplicationHandle {
    pub(crate) fn new(event_tx: mpsc::Sender<ReplicationEvent>) -> Self {
        Self { event_tx }
    }

    pub async fn send(&self, event: ReplicationEvent) {
        if let Err(e) = self.event_tx.send(event).await {
            error!("Failed to send event to ReplicationManager: {}", e);
        }
    }
}

impl ReplicationManager {
    pub fn new(client: Client, config: &Config) -> (Self, ReplicationHandle) {
        let (event_tx, event_rx) = mpsc::channel(EVENT_QUEUE_CAPACITY);

        let manager = Self {
            replicator: Replicator::new(client, OwnershipPolicy::from_config(config)),
            namespace: config.namespace_to_watch.clone(),
            registry: Registry::new(),
            event_rx,
        };

        (manager, ReplicationHandle::new(event_tx))
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub async fn run(mut self) -> anyhow::Result<()> {
        info!("ReplicationManager started, listening for events...");

        while let Some(event) = self.event_rx.recv().await {
            self.handle_event(event).await;
        }

        warn!("All event senders dropped, ReplicationManager stopping");
        Ok(())
    }

    pub(crate) async fn handle_event(&mut self, event: ReplicationEvent) {
        match event {
            ReplicationEvent::NamespaceAdded { name } => {
                self.handle_namespace_added(&name).await;
            }
            ReplicationEvent::SecretApplied { secret } => {
                self.handle_secret_applied(&secret).await;
            }
            ReplicationEvent::SecretDeleted { name } => {
                self.handle_secret_deleted(&name);
            }
        }
    }

    #[instrument(skip(self))]
    async fn handle_namespace_added(&self, namespace: &str) {
        let watched = self.registry.snapshot();
        if watched.is_empty() {
            debug!("No watched secrets to add to new namespace {}", namespace);
            return;
        }

        info!("Adding secrets to new namespace: {}", namespace);
        let targets = [namespace.to_string()];
        for secret in watched.iter().filter(|s| s.targets(namespace)) {
            self.replicate(secret, Some(targets.as_slice())).await;
        }
    }

    #[instrument(skip(self, secret), fields(secret = %secret.name_any()))]
    async fn handle_secret_applied(&mut self, secret: &Secret) {
        let name = secret.name_any();
        let namespace = secret.namespace().unwrap_or_else(|| self.namespace.clone());
        debug!("Secret {}/{} applied", namespace, name);

        if !self.replicator.policy().should_replicate(secret) {
            if self.registry.remove(&name).is_some() {
                info!("Stop watching secret {}/{}", namespace, name);
            } else {
                debug!("Secret {}/{} is not marked for replication, skipping", namespace, name);
            }
            return;
        }

        let watched = WatchedSecret::new(name, namespace);
        if self.registry.put(watched.clone()).is_none() {
            info!("Watching new secret {}/{}", watched.source_namespace, watched.name);
        } else {
            info!(
                "Secret {}/{} changed, replicating latest content",
                watched.source_namespace, watched.name
            );
        }

        self.replicate(&watched, None).await;
    }

    fn handle_secret_deleted(&mut self, name: &str) {
        if let Some(watched) = self.registry.remove(name) {
            info!("Stop watching deleted secret {}/{}", watched.source_namespace, watched.name);
        } else {
            debug!("Deleted secret {} was not watched", name);
        }
    }

    async fn replicate(&self, watched: &WatchedSecret, targets: Option<&[String]>) {
        match self.replicator.replicate_to_namespaces(watched, targets).await {
            Ok(report) => log_report(watched, &report),
            Err(e) if e.is_not_found() => {
                warn!(
                    "Secret {}/{} vanished before it could be replicated: {}",
                    watched.source_namespace, watched.name, e
                );
            }
            Err(e) => {
                error!(
                    "Failed to replicate secret {}/{}: {}",
                    watched.source_namespace, watched.name, e
                );
            }
        }
    }
}

fn log_report(watched: &WatchedSecret, report: &ReplicationReport) {
    if report.is_clean() {
        info!(
            "Replicated secret {}/{}: {} created, {} replaced, {} skipped",
            watched.source_namespace,
            watched.name,
            report.created.len(),
            report.replaced.len(),
            report.skipped.len()
        );
    } else {
        warn!(
            "Replicated secret {}/{} with failures in namespaces {:?}",
            watched.source_namespace, watched.name, report.failed
        );
    }
}
