use super::config::Command;
use crate::codec::LevelMapCodec;
use crate::domain::{ControlError, LevelMap};
use crate::reconcile::CreationPolicy;
use crate::registry::{InMemoryRegistry, LoggerRegistry};
use serde::Serialize;
use std::path::Path;
use tracing::level_filters::LevelFilter;
use tracing::{debug, info};

/// Result of the `reconcile` command.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ReconcileOutcome {
    pub would_change: bool,
    pub updated: usize,
    pub created: Vec<String>,
    pub rejected: Vec<String>,
    /// Registry state afterwards (unchanged on a dry run).
    pub levels: LevelMap,
    /// What changed, relative to the registry before the run.
    pub diff: LevelMap,
}

/// Executes the file-based commands.
#[derive(Debug, Clone)]
pub struct CommandRunner {
    codec: LevelMapCodec,
    policy: CreationPolicy,
    fallback: LevelFilter,
}

impl CommandRunner {
    pub fn new(codec: LevelMapCodec, policy: CreationPolicy, fallback: LevelFilter) -> Self {
        Self {
            codec,
            policy,
            fallback,
        }
    }

    /// Run `command` against files and return what it prints. `loggers` is
    /// the tool's own live registry, used by `levels`.
    pub fn run<R: LoggerRegistry + ?Sized>(
        &self,
        command: &Command,
        loggers: &R,
    ) -> Result<Vec<u8>, ControlError> {
        match command {
            Command::Diff { target, base } => {
                let target = self.read_map(target)?;
                let base = self.read_map(base)?;
                let diff = target.diff(&base);
                info!(entries = diff.len(), "Computed diff");
                Ok(self.codec.encode(&diff)?)
            }
            Command::ApplyDiff { base, diff } => {
                let base = self.read_map(base)?;
                let diff = self.read_map(diff)?;
                Ok(self.codec.encode(&base.apply_diff(&diff))?)
            }
            Command::Reconcile {
                current,
                desired,
                dry_run,
            } => {
                let current = self.read_map(current)?;
                let desired = self.read_map(desired)?;
                let outcome = self.reconcile(&current, &desired, *dry_run)?;
                Ok(to_json(&outcome)?)
            }
            Command::Filter { map } => {
                let levels = self.read_map(map)?;
                let mut directives = levels.to_filter_directives(self.fallback);
                directives.push('\n');
                Ok(directives.into_bytes())
            }
            Command::Levels => Ok(self.codec.encode(&LevelMap::from_registry(loggers))?),
        }
    }

    pub fn reconcile(
        &self,
        current: &LevelMap,
        desired: &LevelMap,
        dry_run: bool,
    ) -> Result<ReconcileOutcome, ControlError> {
        let mut registry = InMemoryRegistry::with_loggers(current.iter());
        let before = LevelMap::from_registry(&registry);
        let would_change = desired.would_make_changes(&registry);

        let mut outcome = ReconcileOutcome {
            would_change,
            updated: 0,
            created: Vec::new(),
            rejected: Vec::new(),
            levels: before.clone(),
            diff: LevelMap::new(),
        };
        if dry_run || !would_change {
            debug!(would_change, dry_run, "Skipping apply");
            return Ok(outcome);
        }

        let report = desired.apply_with_policy(&mut registry, self.policy)?;
        let after = LevelMap::from_registry(&registry);
        info!(
            updated = report.updated,
            created = report.created.len(),
            rejected = report.rejected.len(),
            "Reconciled level map"
        );

        outcome.updated = report.updated;
        outcome.created = report.created;
        outcome.rejected = report.rejected.iter().map(ToString::to_string).collect();
        outcome.diff = after.diff(&before);
        outcome.levels = after;
        Ok(outcome)
    }

    fn read_map(&self, path: &Path) -> Result<LevelMap, ControlError> {
        let bytes = std::fs::read(path)?;
        Ok(self.codec.decode(&bytes)?)
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<Vec<u8>, ControlError> {
    let mut bytes =
        serde_json::to_vec_pretty(value).map_err(|e| ControlError::Codec(e.into()))?;
    bytes.push(b'\n');
    Ok(bytes)
}
