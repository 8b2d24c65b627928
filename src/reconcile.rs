//! Reconciling a [`LevelMap`] against a live [`LoggerRegistry`].
//!
//! Everything here treats a name missing from the map as `Level::UNSET`.
//! The value-level operations that keep explicit UNSET entries live on
//! `LevelMap` itself (`diff`, `apply_diff`).

use crate::domain::{EntityCreationError, Level, LevelMap, ROOT_LOGGER};
use crate::registry::LoggerRegistry;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

/// What `apply` does when the registry refuses to create a logger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CreationPolicy {
    /// Stop at the first rejected name and return its error.
    #[default]
    FailFast,
    /// Keep going and collect every rejection in the report.
    BestEffort,
}

/// Outcome of applying a level map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    /// Existing loggers whose level changed.
    pub updated: usize,
    /// Loggers registered by this apply, in map order.
    pub created: Vec<String>,
    /// Names the registry refused (best-effort only).
    pub rejected: Vec<EntityCreationError>,
}

impl ApplyReport {
    pub fn is_noop(&self) -> bool {
        self.updated == 0 && self.created.is_empty() && self.rejected.is_empty()
    }

    pub fn has_rejections(&self) -> bool {
        !self.rejected.is_empty()
    }
}

/// `root` plus everything the registry currently knows.
fn existing_logger_names<R: LoggerRegistry + ?Sized>(registry: &R) -> BTreeSet<String> {
    let mut names: BTreeSet<String> = registry
        .logger_names()
        .into_iter()
        .filter(|name| !name.is_empty())
        .collect();
    names.insert(ROOT_LOGGER.to_string());
    names
}

impl LevelMap {
    /// Capture every logger the registry knows, UNSET ones included.
    pub fn from_registry<R: LoggerRegistry + ?Sized>(registry: &R) -> Self {
        let levels: BTreeMap<String, Level> = existing_logger_names(registry)
            .into_iter()
            .map(|name| {
                let level = registry.level(&name);
                (name, level)
            })
            .collect();
        Self::from_checked(levels)
    }

    /// Apply with [`CreationPolicy::FailFast`].
    pub fn apply<R: LoggerRegistry + ?Sized>(
        &self,
        registry: &mut R,
    ) -> Result<ApplyReport, EntityCreationError> {
        self.apply_with_policy(registry, CreationPolicy::FailFast)
    }

    /// Make the registry match this map.
    ///
    /// Every logger that already exists is set to its resolved level here, so
    /// loggers the map does not mention are reset to UNSET. Names the map
    /// carries that do not exist yet are created afterwards.
    pub fn apply_with_policy<R: LoggerRegistry + ?Sized>(
        &self,
        registry: &mut R,
        policy: CreationPolicy,
    ) -> Result<ApplyReport, EntityCreationError> {
        let existing = existing_logger_names(registry);
        let mut report = ApplyReport::default();

        for name in &existing {
            let level = self.resolve(name);
            if registry.level(name) != level {
                report.updated += 1;
            }
            registry.set_level(name, level)?;
        }

        for (name, level) in self.iter() {
            if existing.contains(name) {
                continue;
            }

            match registry.set_level(name, level) {
                Ok(()) => {
                    debug!(logger = name, %level, "Created logger");
                    report.created.push(name.to_string());
                }
                Err(e) => match policy {
                    CreationPolicy::FailFast => return Err(e),
                    CreationPolicy::BestEffort => {
                        warn!(logger = name, error = %e, "Skipping logger the registry rejected");
                        report.rejected.push(e);
                    }
                },
            }
        }

        debug!(
            updated = report.updated,
            created = report.created.len(),
            rejected = report.rejected.len(),
            "Applied level map"
        );
        Ok(report)
    }

    /// Whether `apply` would change any level or create any logger.
    pub fn would_make_changes<R: LoggerRegistry + ?Sized>(&self, registry: &R) -> bool {
        let existing = existing_logger_names(registry);

        // Creating a logger counts as a change even at its current level.
        if self.names().any(|name| !existing.contains(name)) {
            return true;
        }

        existing
            .iter()
            .any(|name| registry.level(name) != self.resolve(name))
    }
}
