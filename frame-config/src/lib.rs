//! Frame Config - Pure configuration data structures
//!
//! This crate contains only data structures, no logic or global state.
//! It serves as the shared configuration vocabulary across all frame crates.

use serde::{Deserialize, Serialize};

/// Configuration for the text reader
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// Convert string frame keys into interned names (JSON-compatible mode)
    pub json: bool,
    /// Maximum nesting depth of frames and arrays
    pub max_depth: usize,
    /// Largest numeric label accepted in `#N=` / `#N#`
    pub max_label: usize,
}

/// Configuration for the in-memory object store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Maximum number of live objects, including the reserved nil object
    pub max_objects: usize,
}

/// Top-level configuration file layout
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    pub reader: ReaderConfig,
    pub store: StoreConfig,
}

impl FrameConfig {
    /// Parse a configuration document; missing fields take their defaults
    pub fn from_json_str(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}

/// Processing phase enum for phase-specific log filtering
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Lexer,
    Reader,
    Store,
}

impl Phase {
    /// Get the string name of the phase
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Lexer => "lexer",
            Phase::Reader => "reader",
            Phase::Store => "store",
        }
    }

    /// Get the log target name for this phase
    pub fn target(&self) -> String {
        format!("frame::{}", self.as_str())
    }

    /// All phases, in pipeline order
    pub fn all() -> [Phase; 3] {
        [Phase::Lexer, Phase::Reader, Phase::Store]
    }
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            json: false,
            max_depth: 256,
            max_label: 1 << 20,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_objects: 1 << 24,
        }
    }
}
