// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Copies a source secret into target namespaces without touching secrets we do not own.

use crate::error::{is_not_found, ReplicatorError, Result};
use crate::kubernetes::list_namespace_names;
use crate::sync::policy::OwnershipPolicy;
use crate::sync::registry::WatchedSecret;
use k8s_openapi::api::core::v1::Secret;
use kube::{
    api::{ObjectMeta, PostParams},
    Api, Client, ResourceExt,
};
use tracing::{error, info, instrument, warn};

/// What happened to a single target namespace
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetOutcome {
    Created,
    Replaced,
    /// An unmanaged secret with the same name exists and was left alone
    Skipped,
}

/// Per-namespace result of one fan-out
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReplicationReport {
    pub created: Vec<String>,
    pub replaced: Vec<String>,
    pub skipped: Vec<String>,
    pub failed: Vec<String>,
}

impl ReplicationReport {
    fn record(&mut self, namespace: String, outcome: TargetOutcome) {
        match outcome {
            TargetOutcome::Created => self.created.push(namespace),
            TargetOutcome::Replaced => self.replaced.push(namespace),
            TargetOutcome::Skipped => self.skipped.push(namespace),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Performs the create-or-replace-if-managed protocol against target namespaces
#[derive(Clone)]
pub struct Replicator {
    client: Client,
    policy: OwnershipPolicy,
}

impl Replicator {
    pub fn new(client: Client, policy: OwnershipPolicy) -> Self {
        Self { client, policy }
    }

    pub fn policy(&self) -> &OwnershipPolicy {
        &self.policy
    }

    /// Replicate a watched secret to the given namespaces, or to every namespace
    /// in the cluster when `targets` is `None`.
    ///
    /// Fails only when the source cannot be read or the namespace list cannot be
    /// fetched. Failures for individual targets end up in the report.
    #[instrument(
        skip(self, watched, targets),
        fields(secret = %format!("{}/{}", watched.source_namespace, watched.name))
    )]
    pub async fn replicate_to_namespaces(
        &self,
        watched: &WatchedSecret,
        targets: Option<&[String]>,
    ) -> Result<ReplicationReport> {
        let source = self.fetch_source(watched).await?;
        let payload = build_replica(&source, &self.policy);

        let namespaces = match targets {
            Some(explicit) => explicit.to_vec(),
            None => list_namespace_names(&self.client).await?,
        };

        let mut report = ReplicationReport::default();
        for namespace in namespaces.into_iter().filter(|ns| watched.targets(ns)) {
            match self.replicate_to_namespace(watched, &payload, &namespace).await {
                Ok(outcome) => report.record(namespace, outcome),
                Err(e) => {
                    error!(
                        "Failed to replicate secret {}/{} to namespace {}: {}",
                        watched.source_namespace, watched.name, namespace, e
                    );
                    report.failed.push(namespace);
                }
            }
        }

        Ok(report)
    }

    async fn fetch_source(&self, watched: &WatchedSecret) -> Result<Secret> {
        let secrets: Api<Secret> = Api::namespaced(self.client.clone(), &watched.source_namespace);

        match secrets.get(&watched.name).await {
            Ok(secret) => Ok(secret),
            Err(e) if is_not_found(&e) => Err(ReplicatorError::SourceNotFound(format!(
                "{}/{}",
                watched.source_namespace, watched.name
            ))),
            Err(e) => Err(e.into()),
        }
    }

    async fn replicate_to_namespace(
        &self,
        watched: &WatchedSecret,
        payload: &Secret,
        namespace: &str,
    ) -> Result<TargetOutcome> {
        let secrets: Api<Secret> = Api::namespaced(self.client.clone(), namespace);

        let existing = match secrets.get(&watched.name).await {
            Ok(secret) => Some(secret),
            Err(e) if is_not_found(&e) => None,
            Err(e) => return Err(e.into()),
        };

        let mut replica = payload.clone();
        replica.metadata.namespace = Some(namespace.to_string());

        match existing {
            None => {
                info!("Creating secret {}/{}", namespace, watched.name);
                secrets.create(&PostParams::default(), &replica).await?;
                Ok(TargetOutcome::Created)
            }
            Some(existing) if self.policy.is_managed(&existing) => {
                info!("Replacing secret {}/{}", namespace, watched.name);
                replica.metadata.resource_version = existing.resource_version();
                secrets
                    .replace(&watched.name, &PostParams::default(), &replica)
                    .await?;
                Ok(TargetOutcome::Replaced)
            }
            Some(_) => {
                warn!(
                    "Secret {}/{} already exists without {}=true, leaving it alone",
                    namespace,
                    watched.name,
                    self.policy.managed_annotation()
                );
                Ok(TargetOutcome::Skipped)
            }
        }
    }
}

/// Build the replica payload from a source secret.
///
/// Only user-facing metadata is carried over; the resource version and other
/// server-populated fields stay unset so the payload can be created anywhere.
pub fn build_replica(source: &Secret, policy: &OwnershipPolicy) -> Secret {
    let mut metadata = ObjectMeta {
        name: source.metadata.name.clone(),
        labels: source.metadata.labels.clone(),
        annotations: source.metadata.annotations.clone(),
        ..Default::default()
    };
    policy.mark_managed(&mut metadata);

    Secret {
        metadata,
        data: source.data.clone(),
        string_data: source.string_data.clone(),
        type_: source.type_.clone(),
        immutable: source.immutable,
    }
}
