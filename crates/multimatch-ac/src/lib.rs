//! Dense Aho-Corasick automaton engine
//!
//! Compilation flattens the pattern trie into a full transition table: one
//! `[u32; 256]` row per state, where a missing child is replaced by the
//! failure state's transition for that byte. All failure traversal cost is
//! paid here, breadth-first, so `read_char` is a single table lookup plus one
//! cached-output read: no fail loop remains at match time.
//!
//! The dense rows dominate memory at `states x 256 x 4` bytes, which is
//! exactly what `total_mem` reports. A size guard rejects dictionaries whose
//! table would exceed the configured limit ([`MAX_TABLE_BYTES`] by default)
//! before any row is allocated.

use multimatch_engine::{EngineError, Match, MatchEngine, PatternId};
use multimatch_trie::PatternTrie;
use std::collections::VecDeque;
use std::mem;

/// Default upper bound on the dense transition table, in bytes
///
/// Large enough for legitimate dictionaries (roughly two million states) but
/// catches pathological inputs before the allocation is attempted.
pub const MAX_TABLE_BYTES: usize = 2_000_000_000;

/// Compiled automaton: immutable after `compile`
struct Compiled {
    /// Full next-state row per state, indexed by byte
    next: Vec<[u32; 256]>,
    /// Longest match ending at each state, merged through failure links
    out: Vec<Option<Match>>,
}

/// Dense-table Aho-Corasick engine
///
/// O(1) per character; memory proportional to `states x alphabet`.
pub struct AutomatonEngine {
    staging: Option<PatternTrie>,
    compiled: Option<Compiled>,
    max_table_bytes: usize,
    current: u32,
    bytes_read: u64,
    match_count: u64,
}

impl AutomatonEngine {
    /// Create an engine with no pattern length limit
    pub fn new() -> Self {
        Self {
            staging: Some(PatternTrie::new()),
            compiled: None,
            max_table_bytes: MAX_TABLE_BYTES,
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

    /// Create an engine whose compile fails with `AllocationFailure` once the
    /// dense table would exceed `max_bytes`
    ///
    /// Defaults to [`MAX_TABLE_BYTES`]; lowering it bounds the memory one
    /// instance may claim during compilation.
    pub fn with_table_limit(max_bytes: usize) -> Self {
        Self {
            max_table_bytes: max_bytes,
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

    /// Flatten the finalized trie into dense rows, breadth-first
    ///
    /// BFS order guarantees the failure state's row is complete before it is
    /// consulted for the current state's missing transitions.
    fn build_table(trie: &PatternTrie) -> Compiled {
        let states = trie.node_count();
        let mut next = vec![[0u32; 256]; states];
        let mut out = vec![None; states];

        out[0] = trie.output_match(0);
        for &(byte, child) in trie.edges(0) {
            next[0][byte as usize] = child;
        }

        let mut queue: VecDeque<u32> = trie.edges(0).iter().map(|&(_, c)| c).collect();
        while let Some(state) = queue.pop_front() {
            let failure = trie.failure(state);
            let failure_row = next[failure as usize];
            let mut row = failure_row;
            for &(byte, child) in trie.edges(state) {
                row[byte as usize] = child;
                queue.push_back(child);
            }
            next[state as usize] = row;
            out[state as usize] = trie.output_match(state);
        }

        Compiled { next, out }
    }
}

impl Default for AutomatonEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchEngine for AutomatonEngine {
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

        let states = trie.node_count();
        let table_bytes = states * mem::size_of::<[u32; 256]>();
        if table_bytes > self.max_table_bytes {
            self.staging = Some(trie);
            return Err(EngineError::AllocationFailure(format!(
                "dense table would need {} bytes for {} states, limit is {}",
                table_bytes, states, self.max_table_bytes
            )));
        }

        trie.finalize();
        self.compiled = Some(Self::build_table(&trie));
        // Trie scratch is dropped here; total_mem reports the table only
        Ok(())
    }

    fn read_char(&mut self, byte: u8) -> Result<Option<Match>, EngineError> {
        let compiled = self.compiled.as_ref().ok_or(EngineError::NotCompiled)?;
        self.current = compiled.next[self.current as usize][byte as usize];
        self.bytes_read += 1;
        let result = compiled.out[self.current as usize];
        if result.is_some() {
            self.match_count += 1;
        }
        Ok(result)
    }

    fn total_mem(&self) -> Result<usize, EngineError> {
        let compiled = self.compiled.as_ref().ok_or(EngineError::NotCompiled)?;
        Ok(mem::size_of::<Self>()
            + compiled.next.len() * mem::size_of::<[u32; 256]>()
            + compiled.out.len() * mem::size_of::<Option<Match>>())
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
