// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Watcher streams that tell newly appeared objects apart from known ones.

use crate::error::{ReplicatorError, Result};
use futures::stream::BoxStream;
use futures::StreamExt;
use k8s_openapi::serde::de::DeserializeOwned;
use kube::runtime::{watcher, WatchStreamExt};
use kube::{Api, Resource, ResourceExt};
use std::collections::{HashSet, VecDeque};
use std::fmt::Debug;
use tracing::{debug, warn};

/// A lifecycle change for a single object
#[derive(Debug, Clone)]
pub enum ObjectEvent<K> {
    /// Present when the watch first listed the resource
    Listed(K),
    /// Appeared after the first listing, including objects a relist found for the first time
    Added(K),
    /// A known object changed or showed up again in a relist
    Modified(K),
    /// Deleted, or missing from a relist
    Deleted(String),
}

/// Names of the objects a watcher has reported, kept in step with relists
#[derive(Debug, Default)]
pub struct ObjectTracker {
    known: HashSet<String>,
    relisting: Option<HashSet<String>>,
    synced: bool,
}

impl ObjectTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_synced(&self) -> bool {
        self.synced
    }

    pub fn track<K: Resource>(&mut self, event: watcher::Event<K>) -> Vec<ObjectEvent<K>> {
        match event {
            watcher::Event::Init => {
                self.relisting = Some(HashSet::new());
                Vec::new()
            }
            watcher::Event::InitApply(obj) => {
                let name = obj.name_any();
                self.relisting
                    .get_or_insert_with(HashSet::new)
                    .insert(name.clone());
                if !self.synced {
                    vec![ObjectEvent::Listed(obj)]
                } else if self.known.contains(&name) {
                    vec![ObjectEvent::Modified(obj)]
                } else {
                    vec![ObjectEvent::Added(obj)]
                }
            }
            watcher::Event::InitDone => {
                let listed = self.relisting.take().unwrap_or_default();
                let mut gone: Vec<String> = self.known.difference(&listed).cloned().collect();
                gone.sort();
                self.known = listed;
                self.synced = true;
                gone.into_iter().map(ObjectEvent::Deleted).collect()
            }
            watcher::Event::Apply(obj) => {
                if self.known.insert(obj.name_any()) {
                    vec![ObjectEvent::Added(obj)]
                } else {
                    vec![ObjectEvent::Modified(obj)]
                }
            }
            watcher::Event::Delete(obj) => {
                let name = obj.name_any();
                self.known.remove(&name);
                vec![ObjectEvent::Deleted(name)]
            }
        }
    }
}

/// A kube watcher over one resource type.
///
/// With `resume` set, watch errors are logged and the watcher retries with the
/// default backoff; otherwise the first error is returned as
/// [`ReplicatorError::WatchFailed`]. An error before the first listing completes
/// is always returned.
pub struct ObjectWatch<K> {
    kind: &'static str,
    resume: bool,
    stream: BoxStream<'static, std::result::Result<watcher::Event<K>, watcher::Error>>,
    tracker: ObjectTracker,
    pending: VecDeque<ObjectEvent<K>>,
}

impl<K> ObjectWatch<K>
where
    K: Resource + Clone + DeserializeOwned + Debug + Send + 'static,
{
    pub fn new(api: Api<K>, kind: &'static str, resume: bool) -> Self {
        let events = watcher(api, watcher::Config::default());
        let stream = if resume {
            events.default_backoff().boxed()
        } else {
            events.boxed()
        };

        Self {
            kind,
            resume,
            stream,
            tracker: ObjectTracker::new(),
            pending: VecDeque::new(),
        }
    }

    /// Wait for the next object change
    pub async fn next(&mut self) -> Result<ObjectEvent<K>> {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Ok(event);
            }

            match self.stream.next().await {
                Some(Ok(event)) => self.pending.extend(self.tracker.track(event)),
                Some(Err(e)) if self.resume && self.tracker.is_synced() => {
                    warn!("{} watch failed, retrying: {}", self.kind, e);
                }
                Some(Err(e)) => {
                    return Err(ReplicatorError::WatchFailed(format!("{} watch: {}", self.kind, e)));
                }
                None => {
                    debug!("{} watch stream ended", self.kind);
                    return Err(ReplicatorError::WatchStreamEnded(self.kind.to_string()));
                }
            }
        }
    }
}
