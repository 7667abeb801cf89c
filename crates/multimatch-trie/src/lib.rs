//! Pattern trie with failure links
//!
//! Uniform preprocessing step for every engine variant: all dictionary
//! patterns are inserted into a prefix trie, then `finalize` computes failure
//! links breadth-first. Nodes live in a contiguous arena and reference each
//! other by `u32` index, so failure links and child edges carry no ownership
//! and the finalized trie can be shared across engines without copying
//! pattern bytes.
//!
//! Besides the failure link, `finalize` gives every node an *output link*:
//! the nearest node on its failure chain (including itself) that terminates a
//! pattern. Reporting the longest match at a state is then a single indexed
//! read: the state's own terminal is always strictly longer than anything
//! reachable through failure links, and equal-length duplicates collapse into
//! one terminal that keeps the first-inserted id.

use multimatch_engine::{EngineError, Match, PatternId};
use std::collections::VecDeque;
use std::fmt;
use std::mem;

/// Sentinel for "no node" in link fields
pub const INVALID_NODE: u32 = u32::MAX;

/// Error type for trie operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrieError {
    /// Zero-length patterns can never complete a match advance
    EmptyPattern,
    /// Pattern exceeds the configured maximum length
    PatternTooLong { len: usize, max: usize },
    /// Insert attempted after `finalize`
    Finalized,
}

impl fmt::Display for TrieError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrieError::EmptyPattern => write!(f, "empty pattern"),
            TrieError::PatternTooLong { len, max } => {
                write!(f, "pattern length {} exceeds maximum {}", len, max)
            }
            TrieError::Finalized => write!(f, "trie is already finalized"),
        }
    }
}

impl std::error::Error for TrieError {}

impl From<TrieError> for EngineError {
    fn from(err: TrieError) -> Self {
        match err {
            TrieError::EmptyPattern => EngineError::InvalidPattern("empty pattern".to_string()),
            TrieError::PatternTooLong { len, max } => EngineError::InvalidPattern(format!(
                "pattern length {} exceeds maximum {}",
                len, max
            )),
            TrieError::Finalized => EngineError::AlreadyCompiled,
        }
    }
}

/// One arena entry
///
/// Edges are kept sorted by byte so lookup is a binary search and iteration
/// order is deterministic across compiles of the same dictionary.
#[derive(Debug, Clone)]
struct TrieNode {
    edges: Vec<(u8, u32)>,
    terminal: Option<PatternId>,
    depth: u32,
    failure: u32,
    output: u32,
}

impl TrieNode {
    fn new(depth: u32) -> Self {
        Self {
            edges: Vec::new(),
            terminal: None,
            depth,
            failure: 0,
            output: INVALID_NODE,
        }
    }
}

/// Prefix trie over all dictionary patterns
///
/// Node 0 is the root. Read-only and shareable once [`PatternTrie::finalize`]
/// has run.
#[derive(Debug, Clone)]
pub struct PatternTrie {
    nodes: Vec<TrieNode>,
    finalized: bool,
    max_pattern_len: Option<usize>,
    pattern_count: usize,
    min_len: usize,
    max_len: usize,
}

impl Default for PatternTrie {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternTrie {
    /// Create an empty trie with no pattern length limit
    pub fn new() -> Self {
        Self {
            nodes: vec![TrieNode::new(0)],
            finalized: false,
            max_pattern_len: None,
            pattern_count: 0,
            min_len: usize::MAX,
            max_len: 0,
        }
    }

    /// Create an empty trie rejecting patterns longer than `max` bytes
    pub fn with_max_pattern_len(max: usize) -> Self {
        Self {
            max_pattern_len: Some(max),
            ..Self::new()
        }
    }

    /// Insert a pattern, valid before `finalize` only
    ///
    /// Duplicate byte sequences accumulate on the same terminal node; the
    /// node keeps the first-inserted id, which is the tie-break reported for
    /// equal-length matches. Rejected inserts leave the trie unchanged.
    pub fn insert(&mut self, pattern: &[u8], id: PatternId) -> Result<(), TrieError> {
        if self.finalized {
            return Err(TrieError::Finalized);
        }
        if pattern.is_empty() {
            return Err(TrieError::EmptyPattern);
        }
        if let Some(max) = self.max_pattern_len {
            if pattern.len() > max {
                return Err(TrieError::PatternTooLong {
                    len: pattern.len(),
                    max,
                });
            }
        }

        let mut current = 0u32;
        for &byte in pattern {
            current = match self.child(current, byte) {
                Some(next) => next,
                None => {
                    let next = self.nodes.len() as u32;
                    let depth = self.nodes[current as usize].depth + 1;
                    self.nodes.push(TrieNode::new(depth));
                    let edges = &mut self.nodes[current as usize].edges;
                    let pos = edges.partition_point(|&(b, _)| b < byte);
                    edges.insert(pos, (byte, next));
                    next
                }
            };
        }

        let terminal = &mut self.nodes[current as usize].terminal;
        if terminal.is_none() {
            *terminal = Some(id);
        }
        self.pattern_count += 1;
        self.min_len = self.min_len.min(pattern.len());
        self.max_len = self.max_len.max(pattern.len());
        Ok(())
    }

    /// Compute failure and output links breadth-first
    ///
    /// Root children fail to the root; deeper nodes follow the parent's
    /// failure chain until a node with a matching child byte is found, or the
    /// root. BFS order guarantees a node's failure target is fully linked
    /// before the node itself is processed. Idempotent calls are harmless
    /// but pointless; the trie is read-only afterwards.
    pub fn finalize(&mut self) {
        if self.finalized {
            return;
        }

        let mut queue = VecDeque::new();

        // Depth-1 nodes fail to root
        let root_children: Vec<u32> = self.nodes[0].edges.iter().map(|&(_, c)| c).collect();
        for child in root_children {
            self.nodes[child as usize].failure = 0;
            self.nodes[child as usize].output = match self.nodes[child as usize].terminal {
                Some(_) => child,
                None => INVALID_NODE,
            };
            queue.push_back(child);
        }

        while let Some(state) = queue.pop_front() {
            let edges = self.nodes[state as usize].edges.clone();
            for (byte, next) in edges {
                queue.push_back(next);

                let mut fail = self.nodes[state as usize].failure;
                let target = loop {
                    if let Some(t) = self.child(fail, byte) {
                        break t;
                    }
                    if fail == 0 {
                        break 0;
                    }
                    fail = self.nodes[fail as usize].failure;
                };
                self.nodes[next as usize].failure = target;
                self.nodes[next as usize].output = match self.nodes[next as usize].terminal {
                    Some(_) => next,
                    None => self.nodes[target as usize].output,
                };
            }
        }

        self.finalized = true;
    }

    /// Direct child of `state` for `byte`, if present
    #[inline]
    pub fn child(&self, state: u32, byte: u8) -> Option<u32> {
        let edges = &self.nodes[state as usize].edges;
        edges
            .binary_search_by_key(&byte, |&(b, _)| b)
            .ok()
            .map(|i| edges[i].1)
    }

    /// Sorted `(byte, child)` edges of `state`
    #[inline]
    pub fn edges(&self, state: u32) -> &[(u8, u32)] {
        &self.nodes[state as usize].edges
    }

    /// Failure link of `state`; meaningful after `finalize`
    #[inline]
    pub fn failure(&self, state: u32) -> u32 {
        self.nodes[state as usize].failure
    }

    /// Pattern terminating exactly at `state`, if any
    #[inline]
    pub fn terminal(&self, state: u32) -> Option<PatternId> {
        self.nodes[state as usize].terminal
    }

    /// Depth of `state` = length of the prefix it represents
    #[inline]
    pub fn depth(&self, state: u32) -> u32 {
        self.nodes[state as usize].depth
    }

    /// Longest pattern whose occurrence ends when the automaton sits at
    /// `state`: the output link's terminal, with the link node's depth as the
    /// match length. Meaningful after `finalize`.
    #[inline]
    pub fn output_match(&self, state: u32) -> Option<Match> {
        let out = self.nodes[state as usize].output;
        if out == INVALID_NODE {
            return None;
        }
        let node = &self.nodes[out as usize];
        node.terminal.map(|id| Match {
            id,
            len: node.depth as usize,
        })
    }

    /// Number of nodes including the root
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of successful inserts, duplicates included
    pub fn pattern_count(&self) -> usize {
        self.pattern_count
    }

    /// Shortest inserted pattern length; `None` when the trie is empty
    pub fn min_pattern_len(&self) -> Option<usize> {
        (self.pattern_count > 0).then_some(self.min_len)
    }

    /// Longest inserted pattern length; `None` when the trie is empty
    pub fn max_pattern_len_seen(&self) -> Option<usize> {
        (self.pattern_count > 0).then_some(self.max_len)
    }

    /// Whether `finalize` has run
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Heap footprint of the arena in bytes
    ///
    /// Counts live structure only: node records plus the edge lists actually
    /// present. Used by the compact and skip engines for `total_mem`.
    pub fn heap_size(&self) -> usize {
        let nodes = self.nodes.len() * mem::size_of::<TrieNode>();
        let edges: usize = self
            .nodes
            .iter()
            .map(|n| n.edges.len() * mem::size_of::<(u8, u32)>())
            .sum();
        nodes + edges
    }
}
