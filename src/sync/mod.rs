// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Ownership policy, watched-secret registry, and the replication engine.

pub mod manager;
pub mod policy;
pub mod registry;
pub mod replicator;

pub use manager::{ReplicationEvent, ReplicationHandle, ReplicationManager};
pub use policy::OwnershipPolicy;
pub use registry::{Registry, WatchedSecret};
pub use replicator::{ReplicationReport, Replicator, TargetOutcome};
