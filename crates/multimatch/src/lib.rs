//! Multimatch - Streaming Multi-Pattern Matching Framework
//!
//! Multimatch builds several multi-pattern matching automata over one
//! dictionary and streams input through all of them, one byte at a time,
//! reporting the longest pattern whose occurrence ends at each position.
//! Its purpose is benchmarking and cross-validating the algorithm variants
//! against each other on identical input.
//!
//! # Quick Start
//!
//! ```rust
//! use multimatch::{EngineKind, PatternId, Registry};
//!
//! let mut registry = Registry::new();
//! registry.register(EngineKind::Automaton, true); // reference oracle
//! registry.register(EngineKind::Compact, false);
//! registry.register(EngineKind::Skip, false);
//!
//! registry.add_pattern(b"he", PatternId(1))?;
//! registry.add_pattern(b"she", PatternId(2))?;
//! registry.add_pattern(b"his", PatternId(3))?;
//! registry.add_pattern(b"hers", PatternId(4))?;
//! registry.compile()?;
//!
//! let results = registry.read_stream(b"ushers")?;
//! assert_eq!(results[3].map(|m| m.id), Some(PatternId(2))); // "she"
//! assert_eq!(results[5].map(|m| m.id), Some(PatternId(4))); // "hers"
//! # Ok::<(), multimatch::MultimatchError>(())
//! ```
//!
//! # Engine Variants
//!
//! | Kind | Scheme | Per-byte cost | Memory |
//! |------|--------|---------------|--------|
//! | `Automaton` | dense Aho-Corasick table | O(1) | states x 256 entries |
//! | `Compact` | sparse Aho-Corasick edges | amortized O(1) | edges present |
//! | `Skip` | reversed-trie + shift table | skips at shifted positions | trie + 256-entry table |
//!
//! All variants produce byte-identical result sequences for the same
//! dictionary and stream; the registry enforces this at run time when a
//! reference instance is designated.
//!
//! The core does no I/O: dictionaries and streams arrive through the API,
//! and statistics leave through [`Registry::stats`]. Each registry drives
//! one stream sequentially; independent registries may run concurrently
//! since compiled structures are immutable.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Run configuration, owned by the orchestration layer
pub mod config;
/// Error types for the framework
pub mod error;
/// Engine kinds, instance registry, and cross-validation
pub mod registry;

pub use crate::config::{Config, EngineSpec};
pub use crate::error::{MultimatchError, Result};
pub use crate::registry::{EngineKind, InstanceId, InstanceStats, Registry};

/// Shared engine interface and match types
pub use multimatch_engine::{EngineError, Match, MatchEngine, PatternId};
/// Pattern trie preprocessing, shared by all variants
pub use multimatch_trie::{PatternTrie, TrieError};

/// The concrete engine types, for callers that want one variant directly
pub use multimatch_ac::AutomatonEngine;
pub use multimatch_compact::CompactEngine;
pub use multimatch_skip::SkipEngine;

/// Library version string
pub const MULTIMATCH_VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!MULTIMATCH_VERSION.is_empty());
    }

    #[test]
    fn test_direct_engine_use() {
        let mut engine = AutomatonEngine::new();
        engine.add_pattern(b"abc", PatternId(1)).unwrap();
        engine.compile().unwrap();
        let hit = engine.read_char(b'a').unwrap();
        assert_eq!(hit, None);
    }
}
