// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Ownership rules: which secrets are replication sources and which replicas we own.

use crate::config::Config;
use k8s_openapi::api::core::v1::Secret;
use kube::api::ObjectMeta;

/// Label and annotation names that decide replication candidacy and ownership
#[derive(Debug, Clone)]
pub struct OwnershipPolicy {
    label_names: Vec<String>,
    managed_annotation: String,
}

impl OwnershipPolicy {
    pub fn new(label_names: Vec<String>, managed_annotation: impl Into<String>) -> Self {
        Self {
            label_names,
            managed_annotation: managed_annotation.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.label_names.clone(),
            config.managed_annotation_name.clone(),
        )
    }

    pub fn managed_annotation(&self) -> &str {
        &self.managed_annotation
    }

    /// Check if a secret is a replication source.
    ///
    /// A secret carrying the managed annotation is itself a replica and is never
    /// replicated again, whatever its labels say.
    pub fn should_replicate(&self, secret: &Secret) -> bool {
        if annotation(secret, &self.managed_annotation).is_some() {
            return false;
        }

        let Some(labels) = secret.metadata.labels.as_ref() else {
            return false;
        };
        self.label_names.iter().any(|name| labels.contains_key(name))
    }

    /// Check if an existing secret was written by the replicator
    pub fn is_managed(&self, secret: &Secret) -> bool {
        annotation(secret, &self.managed_annotation).is_some_and(|v| v == "true")
    }

    /// Set the managed annotation on replica metadata
    pub fn mark_managed(&self, metadata: &mut ObjectMeta) {
        metadata
            .annotations
            .get_or_insert_with(Default::default)
            .insert(self.managed_annotation.clone(), "true".to_string());
    }
}

fn annotation<'a>(secret: &'a Secret, name: &str) -> Option<&'a str> {
    secret
        .metadata
        .annotations
        .as_ref()
        .and_then(|a| a.get(name))
        .map(String::as_str)
}
