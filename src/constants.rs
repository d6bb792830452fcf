// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// Default label marking a secret for replication
pub const DEFAULT_LABEL_NAME: &str = "secret-replicator/replicate";

/// Default annotation marking a secret as managed by the replicator
pub const DEFAULT_MANAGED_ANNOTATION: &str = "secret-replicator/managed";

/// Environment variables read at startup
pub mod env {
    pub const LABEL_NAMES: &str = "SECRET_REPLICATOR_LABEL_NAMES";
    pub const MANAGED_ANNOTATION_NAME: &str = "SECRET_REPLICATOR_MANAGED_ANNOTATION_NAME";
    pub const NAMESPACE_TO_WATCH: &str = "SECRET_REPLICATOR_NAMESPACE_TO_WATCH";
    pub const RESUME_WATCHES: &str = "SECRET_REPLICATOR_RESUME_WATCHES";
}

/// Capacity of the event queue between watchers and the replication manager
pub const EVENT_QUEUE_CAPACITY: usize = 256;

