// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Namespace watcher - notifies the replication manager about new namespaces.

use crate::config::Config;
use crate::kubernetes::{ObjectEvent, ObjectWatch};
use crate::sync::{ReplicationEvent, ReplicationHandle};
use k8s_openapi::api::core::v1::Namespace;
use kube::{Api, Client, ResourceExt};
use tracing::{debug, info};

pub struct NamespaceWatcher {
    client: Client,
    resume: bool,
    sync_handle: ReplicationHandle,
}

impl NamespaceWatcher {
    pub fn new(client: Client, config: &Config, sync_handle: ReplicationHandle) -> Self {
        Self {
            client,
            resume: config.resume_watches,
            sync_handle,
        }
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let namespaces: Api<Namespace> = Api::all(self.client.clone());
        let mut events = ObjectWatch::new(namespaces, "namespaces", self.resume);

        info!("Watching namespaces");

        loop {
            if let Some(event) = namespace_event(events.next().await?) {
                self.sync_handle.send(event).await;
            }
        }
    }
}

/// Only namespaces that appear after the first listing matter; existing ones
/// are covered when each source secret is first replicated.
fn namespace_event(event: ObjectEvent<Namespace>) -> Option<ReplicationEvent> {
    match event {
        ObjectEvent::Added(ns) => Some(ReplicationEvent::NamespaceAdded {
            name: ns.name_any(),
        }),
        ObjectEvent::Listed(ns) | ObjectEvent::Modified(ns) => {
            debug!("Ignoring known namespace {}", ns.name_any());
            None
        }
        ObjectEvent::Deleted(name) => {
            debug!("Ignoring deleted namespace {}", name);
            None
        }
    }
}
