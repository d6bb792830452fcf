// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Secret watcher - follows secrets in the source namespace.

use crate::config::Config;
use crate::kubernetes::{ObjectEvent, ObjectWatch};
use crate::sync::{ReplicationEvent, ReplicationHandle};
use k8s_openapi::api::core::v1::Secret;
use kube::{Api, Client, ResourceExt};
use tracing::{debug, info};

pub struct SecretWatcher {
    client: Client,
    namespace: String,
    resume: bool,
    sync_handle: ReplicationHandle,
}

impl SecretWatcher {
    pub fn new(client: Client, config: &Config, sync_handle: ReplicationHandle) -> Self {
        Self {
            client,
            namespace: config.namespace_to_watch.clone(),
            resume: config.resume_watches,
            sync_handle,
        }
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let secrets: Api<Secret> = Api::namespaced(self.client.clone(), &self.namespace);
        let mut events = ObjectWatch::new(secrets, "secrets", self.resume);

        info!("Watching secrets in namespace {}", self.namespace);

        loop {
            let event = secret_event(events.next().await?);
            self.sync_handle.send(event).await;
        }
    }
}

fn secret_event(event: ObjectEvent<Secret>) -> ReplicationEvent {
    match event {
        ObjectEvent::Listed(secret) | ObjectEvent::Added(secret) | ObjectEvent::Modified(secret) => {
            debug!("Got apply event for secret {}", secret.name_any());
            ReplicationEvent::SecretApplied { secret }
        }
        ObjectEvent::Deleted(name) => {
            debug!("Got delete event for secret {}", name);
            ReplicationEvent::SecretDeleted { name }
        }
    }
}
