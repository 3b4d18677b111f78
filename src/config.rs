//! Fingerprinting configuration.
//!
//! Every tunable of the primitives in one validated record, loadable from TOML.
//!
//! ```toml
//! [aether]
//! kgram_size = 5
//! window_size = 4
//! simhash_bits = 64
//! rolling_base = 256
//! rolling_modulus = 101
//! digest = "sha256"
//! ```
//!
//! A `pyproject.toml` style `[tool.aether]` table is also accepted, as is a
//! document with the keys at the root. Missing keys take their defaults.
//! Invalid values and unknown keys are errors; nothing is clamped.
//!
//! [`FingerprintConfig::discover`] layers the nearest project file over the
//! per-user file from [`user_config_dir`].

use std::env;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::digest::HashAlgorithm;
use crate::error::{Error, Result};
use crate::rolling::{RollingHash, DEFAULT_BASE, DEFAULT_MODULUS};
use crate::simhash::{SimHash, DEFAULT_NUM_BITS};
use crate::winnow::{Winnower, DEFAULT_K, DEFAULT_W};

/// File names searched by [`find_project_config`], in priority order.
pub const CONFIG_FILE_NAMES: [&str; 2] = ["aether.toml", "pyproject.toml"];

const SECTION: &str = "aether";

/// Tunables for winnowing, SimHash, rolling hash and digests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FingerprintConfig {
    /// Winnowing k-gram size.
    pub kgram_size: usize,
    /// Winnowing window size.
    pub window_size: usize,
    /// SimHash signature width.
    pub simhash_bits: usize,
    /// Rolling hash base.
    pub rolling_base: u64,
    /// Rolling hash modulus.
    pub rolling_modulus: u64,
    /// Digest algorithm for content identity.
    pub digest: HashAlgorithm,
}

impl Default for FingerprintConfig {
    fn default() -> Self {
        Self {
            kgram_size: DEFAULT_K,
            window_size: DEFAULT_W,
            simhash_bits: DEFAULT_NUM_BITS,
            rolling_base: DEFAULT_BASE,
            rolling_modulus: DEFAULT_MODULUS,
            digest: HashAlgorithm::default(),
        }
    }
}

impl FingerprintConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config = Self::from_section(read_section(path)?).map_err(|e| in_file(path, e))?;
        tracing::debug!(path = %path.display(), ?config, "loaded fingerprint config");
        Ok(config)
    }

    /// Parse configuration from TOML text.
    ///
    /// Uses `[tool.aether]` if present, else `[aether]`, else the root table
    /// minus the standard pyproject tables (`tool`, `project`, `build-system`).
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Self::from_section(extract_section(s)?)
    }

    /// Load the user config laid under the project config.
    ///
    /// Keys in `project` win over keys in `user`; keys in neither take their
    /// defaults. Either file may be omitted, but a named file must exist.
    pub fn load_layered(user: Option<&Path>, project: Option<&Path>) -> Result<Self> {
        let mut merged = toml::Table::new();
        for path in [user, project].into_iter().flatten() {
            merge_tables(&mut merged, read_section(path)?);
            tracing::debug!(path = %path.display(), "merged config layer");
        }
        Self::from_section(merged)
    }

    /// Load `$XDG_CONFIG_HOME/aether/aether.toml` (or the platform
    /// equivalent) overlaid by the nearest project config at or above `start`.
    pub fn discover(start: impl AsRef<Path>) -> Result<Self> {
        let user = user_config_path().filter(|p| p.is_file());
        let project = find_project_config(start);
        Self::load_layered(user.as_deref(), project.as_deref())
    }

    /// Write the config to `path` under an `[aether]` table, creating parent
    /// directories as needed.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let contents = self.to_toml_string()?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                Error::Config(format!("failed to create '{}': {}", parent.display(), e))
            })?;
        }
        std::fs::write(path, contents).map_err(|e| {
            Error::Config(format!("failed to write '{}': {}", path.display(), e))
        })?;
        tracing::debug!(path = %path.display(), "saved fingerprint config");
        Ok(())
    }

    fn from_section(section: toml::Table) -> Result<Self> {
        toml::Value::Table(section)
            .try_into()
            .map_err(|e: toml::de::Error| {
                Error::Config(format!("invalid [{SECTION}] section: {e}"))
            })
    }

    /// Serialize under an `[aether]` table.
    pub fn to_toml_string(&self) -> Result<String> {
        let mut root = toml::Table::new();
        let section = toml::Value::try_from(self)
            .map_err(|e| Error::Config(format!("failed to serialize config: {e}")))?;
        root.insert(SECTION.to_string(), section);
        toml::to_string_pretty(&root)
            .map_err(|e| Error::Config(format!("failed to serialize config: {e}")))
    }

    /// Check every value, returning the first violation.
    pub fn validate(&self) -> Result<()> {
        Winnower::new(self.kgram_size, self.window_size)?;
        SimHash::new(self.simhash_bits)?;
        RollingHash::new(self.rolling_base, self.rolling_modulus)?;
        Ok(())
    }

    /// Apply `AETHER_*` environment variable overrides.
    ///
    /// | Variable | Field |
    /// |----------|-------|
    /// | `AETHER_KGRAM_SIZE` | `kgram_size` |
    /// | `AETHER_WINDOW_SIZE` | `window_size` |
    /// | `AETHER_SIMHASH_BITS` | `simhash_bits` |
    /// | `AETHER_ROLLING_BASE` | `rolling_base` |
    /// | `AETHER_ROLLING_MODULUS` | `rolling_modulus` |
    /// | `AETHER_DIGEST` | `digest` |
    ///
    /// Values that fail to parse are ignored with a warning.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        override_from_env("AETHER_KGRAM_SIZE", &mut self.kgram_size);
        override_from_env("AETHER_WINDOW_SIZE", &mut self.window_size);
        override_from_env("AETHER_SIMHASH_BITS", &mut self.simhash_bits);
        override_from_env("AETHER_ROLLING_BASE", &mut self.rolling_base);
        override_from_env("AETHER_ROLLING_MODULUS", &mut self.rolling_modulus);
        override_from_env("AETHER_DIGEST", &mut self.digest);
        self
    }

    /// Winnower for `kgram_size` / `window_size`.
    pub fn winnower(&self) -> Result<Winnower> {
        Winnower::new(self.kgram_size, self.window_size)
    }

    /// SimHash generator for `simhash_bits`.
    pub fn simhash(&self) -> Result<SimHash> {
        SimHash::new(self.simhash_bits)
    }

    /// Rolling hash for `rolling_base` / `rolling_modulus`.
    pub fn rolling_hash(&self) -> Result<RollingHash> {
        RollingHash::new(self.rolling_base, self.rolling_modulus)
    }
}

/// Top-level tables of a `pyproject.toml` that never hold our keys.
const PYPROJECT_TABLES: [&str; 3] = ["tool", "project", "build-system"];

fn extract_section(s: &str) -> Result<toml::Table> {
    let mut root: toml::Table =
        toml::from_str(s).map_err(|e| Error::Config(format!("invalid TOML: {e}")))?;

    let nested = root
        .get_mut("tool")
        .and_then(|tool| tool.as_table_mut())
        .and_then(|tool| tool.remove(SECTION));
    if nested.is_some() {
        tracing::debug!("using [tool.{SECTION}] section");
    }
    match nested.or_else(|| root.remove(SECTION)) {
        Some(toml::Value::Table(section)) => Ok(section),
        Some(other) => Err(Error::Config(format!(
            "[{SECTION}] must be a table, found {}",
            other.type_str()
        ))),
        None => {
            for key in PYPROJECT_TABLES {
                root.remove(key);
            }
            Ok(root)
        }
    }
}

fn read_section(path: &Path) -> Result<toml::Table> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("failed to read '{}': {}", path.display(), e)))?;
    extract_section(&contents).map_err(|e| in_file(path, e))
}

fn in_file(path: &Path, e: Error) -> Error {
    match e {
        Error::Config(msg) => Error::Config(format!("{}: {}", path.display(), msg)),
        other => other,
    }
}

/// Lay `overlay` over `base`; nested tables merge key by key.
fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        let merged = match (base.remove(&key), value) {
            (Some(toml::Value::Table(mut inner)), toml::Value::Table(over)) => {
                merge_tables(&mut inner, over);
                toml::Value::Table(inner)
            }
            (_, value) => value,
        };
        base.insert(key, merged);
    }
}

fn override_from_env<T: std::str::FromStr>(var: &str, slot: &mut T) {
    let Ok(raw) = env::var(var) else {
        return;
    };
    match raw.parse::<T>() {
        Ok(v) => *slot = v,
        Err(_) => tracing::warn!(var, value = %raw, "ignoring unparseable override"),
    }
}

/// Per-user config directory: `%APPDATA%\aether` on Windows, otherwise
/// `$XDG_CONFIG_HOME/aether` falling back to `$HOME/.config/aether`.
///
/// Only computes the path; nothing is created.
pub fn user_config_dir() -> Option<PathBuf> {
    let non_empty = |var: &str| env::var_os(var).filter(|v| !v.is_empty()).map(PathBuf::from);
    let base = if cfg!(windows) {
        non_empty("APPDATA")
    } else {
        non_empty("XDG_CONFIG_HOME").or_else(|| non_empty("HOME").map(|h| h.join(".config")))
    };
    base.map(|dir| dir.join(SECTION))
}

/// `aether.toml` inside [`user_config_dir`].
pub fn user_config_path() -> Option<PathBuf> {
    user_config_dir().map(|dir| dir.join(CONFIG_FILE_NAMES[0]))
}

/// Find the nearest config file at or above `start`.
///
/// In each directory `aether.toml` wins over `pyproject.toml`.
pub fn find_project_config(start: impl AsRef<Path>) -> Option<PathBuf> {
    start.as_ref().ancestors().find_map(|dir| {
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|candidate| candidate.is_file())
    })
}
