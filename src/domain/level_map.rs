use super::error::LevelMapError;
use super::level::Level;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;
use tracing::level_filters::LevelFilter;

/// The fallback logger every live world has, whether or not it was registered.
pub const ROOT_LOGGER: &str = "root";

/// Sparse mapping from logger name to level.
///
/// A name missing from the map means the same thing as that name at
/// `Level::UNSET` when reconciling against a live registry. As a value,
/// though, the map keeps explicit UNSET entries: they mark a logger as known
/// so that applying the map still creates it. [`LevelMap::explicit`] is the
/// value-level lookup, [`LevelMap::resolve`] the live-world lookup.
///
/// Serialized form is `{"l": {name: level}}`, with the field omitted when
/// the map is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawLevelMap")]
pub struct LevelMap {
    #[serde(rename = "l", default, skip_serializing_if = "BTreeMap::is_empty")]
    levels: BTreeMap<String, Level>,
}

#[derive(Deserialize)]
struct RawLevelMap {
    #[serde(rename = "l", default)]
    levels: BTreeMap<String, Level>,
}

impl TryFrom<RawLevelMap> for LevelMap {
    type Error = LevelMapError;

    fn try_from(raw: RawLevelMap) -> Result<Self, Self::Error> {
        Self::try_from(raw.levels)
    }
}

impl TryFrom<BTreeMap<String, Level>> for LevelMap {
    type Error = LevelMapError;

    fn try_from(levels: BTreeMap<String, Level>) -> Result<Self, Self::Error> {
        if levels.keys().any(|name| name.is_empty()) {
            return Err(LevelMapError::EmptyName);
        }
        Ok(Self { levels })
    }
}

impl LevelMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a map from explicit pairs. Later pairs win on duplicate names.
    pub fn from_pairs<I, K>(pairs: I) -> Result<Self, LevelMapError>
    where
        I: IntoIterator<Item = (K, Level)>,
        K: Into<String>,
    {
        let mut map = Self::new();
        for (name, level) in pairs {
            map.insert(name, level)?;
        }
        Ok(map)
    }

    /// Parse `name=level` pairs separated by commas, e.g. `root=warning,app.db=debug`.
    pub fn parse_directives(input: &str) -> Result<Self, LevelMapError> {
        let mut map = Self::new();

        for directive in input.split(',').map(str::trim).filter(|d| !d.is_empty()) {
            let parts: Vec<&str> = directive.split('=').collect();
            if parts.len() != 2 {
                return Err(LevelMapError::InvalidDirectiveFormat {
                    input: directive.to_string(),
                    expected: "name=level".to_string(),
                });
            }

            let level = Level::from_str(parts[1])?;
            map.insert(parts[0].trim(), level)?;
        }

        Ok(map)
    }

    pub fn insert(
        &mut self,
        name: impl Into<String>,
        level: Level,
    ) -> Result<Option<Level>, LevelMapError> {
        let name = name.into();
        if name.is_empty() {
            return Err(LevelMapError::EmptyName);
        }
        Ok(self.levels.insert(name, level))
    }

    pub fn remove(&mut self, name: &str) -> Option<Level> {
        self.levels.remove(name)
    }

    /// Level recorded for `name`, keeping "known and UNSET" apart from
    /// "never mentioned".
    pub fn explicit(&self, name: &str) -> Option<Level> {
        self.levels.get(name).copied()
    }

    /// Level `name` resolves to when touching a live registry.
    pub fn resolve(&self, name: &str) -> Level {
        self.explicit(name).unwrap_or(Level::UNSET)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.levels.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Entries with `root` first, then the rest by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Level)> + '_ {
        self.levels
            .get_key_value(ROOT_LOGGER)
            .into_iter()
            .chain(
                self.levels
                    .iter()
                    .filter(|(name, _)| name.as_str() != ROOT_LOGGER),
            )
            .map(|(name, level)| (name.as_str(), *level))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.iter().map(|(name, _)| name)
    }

    /// Callers guarantee every name is non-empty.
    pub(crate) fn from_checked(levels: BTreeMap<String, Level>) -> Self {
        debug_assert!(levels.keys().all(|name| !name.is_empty()));
        Self { levels }
    }

    pub(crate) fn levels(&self) -> &BTreeMap<String, Level> {
        &self.levels
    }

    /// Compare by resolved level over the names either map mentions.
    pub fn resolved_eq(&self, other: &LevelMap) -> bool {
        let names: BTreeSet<&str> = self
            .levels
            .keys()
            .chain(other.levels.keys())
            .map(String::as_str)
            .collect();
        names
            .into_iter()
            .all(|name| self.resolve(name) == other.resolve(name))
    }

    /// Entries of `self` whose level differs from what `base` resolves to.
    ///
    /// Equal entries are dropped, including an explicit UNSET against a base
    /// that never mentions the name. `base.apply_diff(&self.diff(&base))`
    /// rebuilds `self` for every name `self` carries.
    pub fn diff(&self, base: &LevelMap) -> LevelMap {
        let levels = self
            .levels
            .iter()
            .filter(|(name, level)| **level != base.resolve(name))
            .map(|(name, level)| (name.clone(), *level))
            .collect();
        LevelMap { levels }
    }

    /// Independent copy of `self` with every entry of `diff` laid over it.
    ///
    /// UNSET entries of `self` are kept as-is so the loggers they name still
    /// get created when the result is applied.
    pub fn apply_diff(&self, diff: &LevelMap) -> LevelMap {
        let mut levels = self.levels.clone();
        levels.extend(diff.levels.iter().map(|(name, level)| (name.clone(), *level)));
        LevelMap { levels }
    }

    /// Render as a `tracing_subscriber::EnvFilter` directive string.
    ///
    /// `root` becomes the default directive, falling back to `fallback` when
    /// UNSET. Dotted names become `::` targets. UNSET entries are left out so
    /// the target inherits from its nearest configured ancestor.
    pub fn to_filter_directives(&self, fallback: LevelFilter) -> String {
        let root = self.resolve(ROOT_LOGGER).to_level_filter().unwrap_or(fallback);

        let mut parts = Vec::with_capacity(self.levels.len());
        parts.push(filter_name(root));

        for (name, level) in self.iter().filter(|(name, _)| *name != ROOT_LOGGER) {
            if let Some(filter) = level.to_level_filter() {
                parts.push(format!("{}={}", name.replace('.', "::"), filter_name(filter)));
            }
        }

        parts.join(",")
    }
}

fn filter_name(filter: LevelFilter) -> String {
    filter.to_string().to_lowercase()
}
