//! Skip-based multi-pattern engine
//!
//! Boyer-Moore-style scheme extended to pattern sets: compilation builds a
//! trie over the *reversed* patterns (the verification structure) and a
//! 256-entry bad-character shift table. At stream positions the shift table
//! has proven unable to end a match, `read_char` answers without scanning at
//! all; everywhere else it scans backwards through the reversed trie, and the
//! deepest terminal reached is the longest pattern ending at the position.
//!
//! The shift for byte `b` is the smallest distance from any pattern's last
//! byte back to an earlier occurrence of `b`, clamped to the minimum pattern
//! length. If no pattern could end at position `p + k` for `k <
//! shift[stream[p]]`, such a pattern would have to contain `stream[p]` at
//! distance `k` from its end, contradicting the table. Skipped positions
//! can never lose a match and the output sequence is position-for-position
//! identical to the automaton engines. Average cost is lower on sparse
//! dictionaries, but the backward scan makes the worst case per character
//! O(max pattern length) rather than O(1).
//!
//! To keep the uniform one-byte-at-a-time contract, the engine buffers the
//! last `max_len` bytes in a ring; no variable-length consumption leaks
//! through the interface.

use multimatch_engine::{EngineError, Match, MatchEngine, PatternId};
use multimatch_trie::PatternTrie;
use std::mem;

/// Compiled skip structure: immutable after `compile`
struct Compiled {
    /// Trie over the reversed patterns; terminal depth = pattern length
    reversed: PatternTrie,
    /// Bad-character shift per byte, every entry in `1..=min_len`
    shift: [u32; 256],
    /// Shortest pattern length: the first position a match can end
    min_len: usize,
    /// Longest pattern length: how far back a scan can ever need to look
    max_len: usize,
}

/// Skip-scan engine
pub struct SkipEngine {
    /// Staged patterns, dropped at compile (construction scratch)
    staging: Option<Vec<(Vec<u8>, PatternId)>>,
    max_pattern_len: Option<usize>,
    compiled: Option<Compiled>,
    /// Ring buffer over the last `max_len` stream bytes
    window: Vec<u8>,
    /// Bytes consumed so far; the newest byte is stream index `pos - 1`
    pos: u64,
    /// Earliest `pos` at which a match could still end
    next_check: u64,
    match_count: u64,
}

impl SkipEngine {
    /// Create an engine with no pattern length limit
    pub fn new() -> Self {
        Self {
            staging: Some(Vec::new()),
            max_pattern_len: None,
            compiled: None,
            window: Vec::new(),
            pos: 0,
            next_check: 0,
            match_count: 0,
        }
    }

    /// Create an engine rejecting patterns longer than `max` bytes
    pub fn with_max_pattern_len(max: usize) -> Self {
        Self {
            max_pattern_len: Some(max),
            ..Self::new()
        }
    }

    /// Bytes consumed since compile or the last reset
    pub fn bytes_read(&self) -> u64 {
        self.pos
    }

    /// Matches reported since compile or the last reset
    pub fn match_count(&self) -> u64 {
        self.match_count
    }

    /// Scan backwards from the newest byte through the reversed trie
    ///
    /// Walks at most `min(pos, max_len)` bytes; the deepest terminal seen is
    /// the longest pattern ending at the current position.
    fn scan_window(&self, compiled: &Compiled) -> Option<Match> {
        let cap = self.window.len() as u64;
        let limit = self.pos.min(compiled.max_len as u64);

        let mut state = 0u32;
        let mut best = None;
        for back in 0..limit {
            let byte = self.window[((self.pos - 1 - back) % cap) as usize];
            state = match compiled.reversed.child(state, byte) {
                Some(next) => next,
                None => break,
            };
            if let Some(id) = compiled.reversed.terminal(state) {
                best = Some(Match {
                    id,
                    len: (back + 1) as usize,
                });
            }
        }
        best
    }
}

impl Default for SkipEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchEngine for SkipEngine {
    fn add_pattern(&mut self, pattern: &[u8], id: PatternId) -> Result<(), EngineError> {
        let staging = self.staging.as_mut().ok_or(EngineError::AlreadyCompiled)?;
        if pattern.is_empty() {
            return Err(EngineError::InvalidPattern("empty pattern".to_string()));
        }
        if let Some(max) = self.max_pattern_len {
            if pattern.len() > max {
                return Err(EngineError::InvalidPattern(format!(
                    "pattern length {} exceeds maximum {}",
                    pattern.len(),
                    max
                )));
            }
        }
        staging.push((pattern.to_vec(), id));
        Ok(())
    }

    fn compile(&mut self) -> Result<(), EngineError> {
        let staging = self.staging.take().ok_or(EngineError::AlreadyCompiled)?;
        if staging.is_empty() {
            self.staging = Some(staging);
            return Err(EngineError::InvalidPattern("no patterns added".to_string()));
        }

        let mut reversed = PatternTrie::new();
        let mut min_len = usize::MAX;
        let mut max_len = 0usize;
        for (pattern, id) in &staging {
            let backwards: Vec<u8> = pattern.iter().rev().copied().collect();
            reversed
                .insert(&backwards, *id)
                .map_err(EngineError::from)?;
            min_len = min_len.min(pattern.len());
            max_len = max_len.max(pattern.len());
        }
        // Failure links are not used by the backward scan, but finalizing
        // freezes the trie against further inserts
        reversed.finalize();

        let mut shift = [min_len as u32; 256];
        for (pattern, _) in &staging {
            let last = pattern.len() - 1;
            for (i, &byte) in pattern[..last].iter().enumerate() {
                let distance = (last - i) as u32;
                if distance < shift[byte as usize] {
                    shift[byte as usize] = distance;
                }
            }
        }

        self.window = vec![0; max_len];
        self.pos = 0;
        self.next_check = min_len as u64;
        self.compiled = Some(Compiled {
            reversed,
            shift,
            min_len,
            max_len,
        });
        // staging drops here; its pattern copies do not count toward total_mem
        Ok(())
    }

    fn read_char(&mut self, byte: u8) -> Result<Option<Match>, EngineError> {
        let compiled = self.compiled.as_ref().ok_or(EngineError::NotCompiled)?;

        let cap = self.window.len() as u64;
        self.window[(self.pos % cap) as usize] = byte;
        self.pos += 1;

        if self.pos < self.next_check {
            // The shift table proved no pattern can end here
            return Ok(None);
        }

        let result = self.scan_window(compiled);
        self.next_check = self.pos + compiled.shift[byte as usize] as u64;
        if result.is_some() {
            self.match_count += 1;
        }
        Ok(result)
    }

    fn total_mem(&self) -> Result<usize, EngineError> {
        let compiled = self.compiled.as_ref().ok_or(EngineError::NotCompiled)?;
        Ok(mem::size_of::<Self>()
            + compiled.reversed.heap_size()
            + mem::size_of::<[u32; 256]>()
            + self.window.len())
    }

    fn reset(&mut self) -> Result<(), EngineError> {
        let compiled = self.compiled.as_ref().ok_or(EngineError::NotCompiled)?;
        self.pos = 0;
        self.next_check = compiled.min_len as u64;
        self.match_count = 0;
        Ok(())
    }
}
