//! Configuration system for the cache simulator.
//!
//! This module defines the configuration structures used to parameterize a
//! run. It provides:
//! 1. **Defaults:** Baseline geometry constants.
//! 2. **Structures:** `Config` with general options and the cache geometry.
//! 3. **Loading:** JSON deserialization from strings or files.
//!
//! Command-line flags are layered on top by the CLI; every field is optional
//! in JSON and falls back to the defaults below.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::cache::Geometry;
use crate::common::{Result, SimError};

/// Default configuration constants for the simulator.
mod defaults {
    /// Default set-index bits (16 sets).
    pub const SET_BITS: u32 = 4;

    /// Default associativity (1 way = direct-mapped).
    pub const WAYS: usize = 1;

    /// Default block-offset bits (16-byte blocks).
    pub const BLOCK_BITS: u32 = 4;
}

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Config {
    /// General run options
    #[serde(default)]
    pub general: GeneralConfig,
    /// Cache geometry
    #[serde(default)]
    pub cache: CacheConfig,
}

impl Config {
    /// Parses a configuration from JSON text.
    ///
    /// # Errors
    ///
    /// Returns the deserializer's error for malformed JSON or mistyped fields.
    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Reads and parses a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Io`] if the file cannot be read and
    /// [`SimError::Config`] if it is not a valid configuration.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| SimError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text).map_err(|source| SimError::Config {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// General run options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GeneralConfig {
    /// Print the outcome of every replayed record
    #[serde(default)]
    pub verbose: bool,
}

/// Cache geometry parameters as supplied by the user.
///
/// Accepts both descriptive keys and the conventional `s`, `E`, `b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CacheConfig {
    /// Number of set-index bits (`s`)
    #[serde(default = "CacheConfig::default_set_bits", alias = "s")]
    pub set_bits: u32,

    /// Lines per set (`E`)
    #[serde(default = "CacheConfig::default_ways", alias = "E")]
    pub ways: usize,

    /// Number of block-offset bits (`b`)
    #[serde(default = "CacheConfig::default_block_bits", alias = "b")]
    pub block_bits: u32,
}

impl CacheConfig {
    /// Returns the default number of set-index bits.
    const fn default_set_bits() -> u32 {
        defaults::SET_BITS
    }

    /// Returns the default associativity.
    const fn default_ways() -> usize {
        defaults::WAYS
    }

    /// Returns the default number of block-offset bits.
    const fn default_block_bits() -> u32 {
        defaults::BLOCK_BITS
    }

    /// Validates the parameters.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidGeometry`] as described on [`Geometry::new`].
    pub fn geometry(&self) -> Result<Geometry> {
        Geometry::new(self.set_bits, self.ways, self.block_bits)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            set_bits: defaults::SET_BITS,
            ways: defaults::WAYS,
            block_bits: defaults::BLOCK_BITS,
        }
    }
}
