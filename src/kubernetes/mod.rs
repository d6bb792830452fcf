// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes utilities for namespace listing and object watches.

pub mod namespaces;
pub mod watch;

pub use namespaces::list_namespace_names;
pub use watch::{ObjectEvent, ObjectTracker, ObjectWatch};
