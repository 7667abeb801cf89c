//! Error types for the multimatch framework
//!
//! The top-level error wraps the sub-crate error types and adds the
//! registry-level cross-validation failure. Every error is local to the
//! failing instance: a mismatch or allocation failure never invalidates the
//! trie or sibling instances.

use multimatch_engine::{EngineError, Match};
use multimatch_trie::TrieError;
use thiserror::Error;

/// Main error type for multimatch operations
#[derive(Error, Debug)]
pub enum MultimatchError {
    /// Error from an engine instance
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// Error from trie preprocessing
    #[error(transparent)]
    Trie(#[from] TrieError),

    /// Cross-validation detected two instances disagreeing on a stream position
    ///
    /// Reported, not corrected: all instances have already consumed the byte
    /// and the caller may keep streaming or abort.
    #[error(
        "engine mismatch at position {position}: reference {reference} reported {expected:?}, \
         candidate {candidate} reported {actual:?}"
    )]
    EngineMismatch {
        /// 0-indexed stream position of the diverging byte
        position: u64,
        /// Name of the reference instance's variant
        reference: &'static str,
        /// What the reference reported
        expected: Option<Match>,
        /// Name of the disagreeing instance's variant
        candidate: &'static str,
        /// What the disagreeing instance reported
        actual: Option<Match>,
    },

    /// Engine kind name not recognized by the registry
    #[error("unknown engine kind: {0}")]
    UnknownEngineKind(String),

    /// Operation needs at least one registered instance
    #[error("no engine instances registered")]
    NoInstances,
}

/// Result type alias for multimatch operations
pub type Result<T> = std::result::Result<T, MultimatchError>;
