//! Memory-reduced Aho-Corasick engine
//!
//! Identical automaton semantics and match results to the dense engine, but
//! transitions stay in the trie's sorted per-state edge lists instead of
//! being flattened into 256-wide rows. `read_char` binary-searches the
//! current state's edges and, on a miss, chases failure links until an edge
//! exists or the root is reached: the classic Aho-Corasick discipline, paid
//! at match time instead of compile time.
//!
//! Memory is proportional to edges actually present, which is the whole
//! point of the variant: `total_mem` counts node records and edge lists, not
//! alphabet-width tables.

use multimatch_engine::{EngineError, Match, MatchEngine, PatternId};
use multimatch_trie::PatternTrie;
use std::mem;

/// Sparse-storage Aho-Corasick engine
///
/// Amortized O(1) per character (each failure hop consumes depth built up by
/// earlier bytes); worst-case O(log fan-out) per transition lookup.
pub struct CompactEngine {
    staging: Option<PatternTrie>,
    compiled: Option<PatternTrie>,
    current: u32,
    bytes_read: u64,
    match_count: u64,
}

impl CompactEngine {
    /// Create an engine with no pattern length limit
    pub fn new() -> Self {
        Self {
            staging: Some(PatternTrie::new()),
            compiled: None,
            current: 0,
            bytes_read: 0,
            match_count: 0,
        }
    }

    /// Create an engine rejecting patterns longer than `max` bytes
    pub fn with_max_pattern_len(max: usize) -> Self {
        Self {
            staging: Some(PatternTrie::with_max_pattern_len(max)),
            ..Self::new()
        }
    }

    /// Bytes consumed since compile or the last reset
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    /// Matches reported since compile or the last reset
    pub fn match_count(&self) -> u64 {
        self.match_count
    }
}

impl Default for CompactEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchEngine for CompactEngine {
    fn add_pattern(&mut self, pattern: &[u8], id: PatternId) -> Result<(), EngineError> {
        let trie = self.staging.as_mut().ok_or(EngineError::AlreadyCompiled)?;
        trie.insert(pattern, id)?;
        Ok(())
    }

    fn compile(&mut self) -> Result<(), EngineError> {
        let mut trie = self.staging.take().ok_or(EngineError::AlreadyCompiled)?;
        if trie.pattern_count() == 0 {
            self.staging = Some(trie);
            return Err(EngineError::InvalidPattern("no patterns added".to_string()));
        }
        trie.finalize();
        self.compiled = Some(trie);
        Ok(())
    }

    fn read_char(&mut self, byte: u8) -> Result<Option<Match>, EngineError> {
        let trie = self.compiled.as_ref().ok_or(EngineError::NotCompiled)?;

        // Chase failure links until a state with this edge exists, or root
        let mut state = self.current;
        self.current = loop {
            if let Some(next) = trie.child(state, byte) {
                break next;
            }
            if state == 0 {
                break 0;
            }
            state = trie.failure(state);
        };

        self.bytes_read += 1;
        let result = trie.output_match(self.current);
        if result.is_some() {
            self.match_count += 1;
        }
        Ok(result)
    }

    fn total_mem(&self) -> Result<usize, EngineError> {
        let trie = self.compiled.as_ref().ok_or(EngineError::NotCompiled)?;
        Ok(mem::size_of::<Self>() + trie.heap_size())
    }

    fn reset(&mut self) -> Result<(), EngineError> {
        if self.compiled.is_none() {
            return Err(EngineError::NotCompiled);
        }
        self.current = 0;
        self.bytes_read = 0;
        self.match_count = 0;
        Ok(())
    }
}
