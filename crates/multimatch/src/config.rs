//! Run configuration, owned by the orchestration layer
//!
//! The core never reads files or parses command lines; the orchestrator
//! fills this struct from whatever source it likes and hands it to
//! [`Registry::from_config`](crate::Registry::from_config). Source fields
//! are opaque labels the core carries through to reports.

use crate::registry::EngineKind;
use std::path::PathBuf;

/// One engine instance to build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSpec {
    /// Which algorithm variant
    pub kind: EngineKind,
    /// Treat this instance's output as ground truth for cross-validation
    pub reference: bool,
}

/// Aggregated run configuration
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Where the dictionary comes from; opaque to the core
    pub dictionary_sources: Vec<PathBuf>,
    /// Where the streams come from; opaque to the core
    pub stream_sources: Vec<PathBuf>,
    /// Reject patterns longer than this many bytes
    pub max_pattern_len: Option<usize>,
    /// Engine instances to build
    pub engines: Vec<EngineSpec>,
    /// Where reports go; opaque to the core
    pub output: Option<PathBuf>,
}

impl Config {
    /// Empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an engine instance to build
    pub fn with_engine(mut self, kind: EngineKind, reference: bool) -> Self {
        self.engines.push(EngineSpec { kind, reference });
        self
    }

    /// Set the maximum accepted pattern length
    pub fn with_max_pattern_len(mut self, max: usize) -> Self {
        self.max_pattern_len = Some(max);
        self
    }
}
