// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::{env as vars, DEFAULT_LABEL_NAME, DEFAULT_MANAGED_ANNOTATION};
use crate::error::{ReplicatorError, Result};
use std::env;

/// Operator configuration loaded from environment variables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Namespace whose labeled secrets are replicated
    pub namespace_to_watch: String,
    /// Any of these labels marks a secret for replication
    pub label_names: Vec<String>,
    /// Annotation set to "true" on every replica
    pub managed_annotation_name: String,
    /// Reopen watch streams when the API server closes them
    pub resume_watches: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let namespace_to_watch = lookup(vars::NAMESPACE_TO_WATCH)
            .map(|ns| ns.trim().to_string())
            .filter(|ns| !ns.is_empty())
            .ok_or_else(|| {
                ReplicatorError::ConfigError(format!("{} must be set", vars::NAMESPACE_TO_WATCH))
            })?;

        let label_names = match lookup(vars::LABEL_NAMES) {
            Some(raw) => parse_label_names(&raw)?,
            None => vec![DEFAULT_LABEL_NAME.to_string()],
        };

        let managed_annotation_name = match lookup(vars::MANAGED_ANNOTATION_NAME) {
            Some(raw) if raw.trim().is_empty() => {
                return Err(ReplicatorError::ConfigError(format!(
                    "{} must not be empty",
                    vars::MANAGED_ANNOTATION_NAME
                )))
            }
            Some(raw) => raw.trim().to_string(),
            None => DEFAULT_MANAGED_ANNOTATION.to_string(),
        };

        let resume_watches = match lookup(vars::RESUME_WATCHES) {
            Some(raw) => parse_bool(vars::RESUME_WATCHES, &raw)?,
            None => true,
        };

        Ok(Config {
            namespace_to_watch,
            label_names,
            managed_annotation_name,
            resume_watches,
        })
    }
}

fn parse_label_names(raw: &str) -> Result<Vec<String>> {
    let names: Vec<String> = raw
        .split(';')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect();

    if names.is_empty() {
        return Err(ReplicatorError::ConfigError(format!(
            "{} contains no label names",
            vars::LABEL_NAMES
        )));
    }
    Ok(names)
}

fn parse_bool(key: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(ReplicatorError::ConfigError(format!(
            "{} must be true or false, got '{}'",
            key, other
        ))),
    }
}
