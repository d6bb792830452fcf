// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Watch consumers that feed lifecycle events to the replication manager.

pub mod namespace;
pub mod secret;

pub use namespace::NamespaceWatcher;
pub use secret::SecretWatcher;
