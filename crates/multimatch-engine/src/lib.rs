//! Shared interface for streaming multi-pattern matching engines
//!
//! Every engine variant in the multimatch workspace implements [`MatchEngine`]:
//! patterns are added before compilation, `compile` freezes the structure, and
//! the stream is then pushed in one byte at a time via `read_char`. The trait
//! is object-safe so the registry can drive heterogeneous engines through
//! `Box<dyn MatchEngine>`.
//!
//! # Lifecycle
//!
//! ```text
//! new() ──add_pattern()*──> compile() ──read_char()*──> reset() ──read_char()*──> drop
//! ```
//!
//! Calls out of order are contract violations and fail deterministically with
//! [`EngineError::AlreadyCompiled`] or [`EngineError::NotCompiled`]; they never
//! panic and never corrupt the instance.

use std::fmt;

/// Opaque identifier for a dictionary pattern
///
/// Supplied by the caller when the pattern is added; the engines only copy and
/// compare it. Reported back through [`Match`] when the pattern's occurrence
/// ends at the current stream position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PatternId(pub u64);

impl fmt::Display for PatternId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A reported match: the longest pattern whose occurrence ends at the current
/// stream position
///
/// `len` is the matched pattern's length, cached at compile time so reporting
/// stays O(1) per byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    /// Identifier the pattern was added with
    pub id: PatternId,
    /// Length of the matched pattern in bytes
    pub len: usize,
}

/// Error type for engine operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Pattern rejected at add time (empty, or longer than the configured maximum)
    InvalidPattern(String),
    /// Mutating call after `compile`, or `compile` called twice
    AlreadyCompiled,
    /// Streaming/reset/memory query before `compile`
    NotCompiled,
    /// Compilation would exceed the allocation guard for this variant
    AllocationFailure(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::InvalidPattern(msg) => write!(f, "invalid pattern: {}", msg),
            EngineError::AlreadyCompiled => write!(f, "engine is already compiled"),
            EngineError::NotCompiled => write!(f, "engine is not compiled yet"),
            EngineError::AllocationFailure(msg) => write!(f, "allocation failure: {}", msg),
        }
    }
}

impl std::error::Error for EngineError {}

/// Capability set every matching engine variant implements
///
/// All variants must produce identical `Option<Match>` sequences for the same
/// dictionary and stream, position for position. That identity is what lets
/// the registry use one instance as a reference oracle for the others.
pub trait MatchEngine {
    /// Stage a pattern for compilation
    ///
    /// Valid before `compile` only. The engine takes its own copy of the
    /// bytes; the caller keeps ownership of `pattern`.
    fn add_pattern(&mut self, pattern: &[u8], id: PatternId) -> Result<(), EngineError>;

    /// Freeze the staged dictionary into the variant's compiled structure
    ///
    /// Must be called exactly once; a second call fails with
    /// [`EngineError::AlreadyCompiled`]. Construction scratch is released
    /// here and does not count toward [`MatchEngine::total_mem`].
    fn compile(&mut self) -> Result<(), EngineError>;

    /// Consume the next stream byte and report the longest match ending at
    /// this position, if any
    fn read_char(&mut self, byte: u8) -> Result<Option<Match>, EngineError>;

    /// Size in bytes of the live compiled structure plus runtime state
    ///
    /// Measured once per compile and stable for the life of the instance.
    fn total_mem(&self) -> Result<usize, EngineError>;

    /// Restore the runtime state to the exact post-compile baseline
    ///
    /// Current state back to the root / empty window, byte and match counters
    /// zeroed. The compiled structure itself is untouched.
    fn reset(&mut self) -> Result<(), EngineError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_id_display() {
        assert_eq!(PatternId(42).to_string(), "#42");
    }

    #[test]
    fn test_error_display() {
        let err = EngineError::InvalidPattern("empty pattern".to_string());
        assert_eq!(err.to_string(), "invalid pattern: empty pattern");
        assert_eq!(
            EngineError::NotCompiled.to_string(),
            "engine is not compiled yet"
        );
    }
}
