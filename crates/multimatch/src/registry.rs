//! Engine kinds, instance registry, and cross-validation
//!
//! The registry binds engine variants to live instances and drives them over
//! one stream: dictionary fan-out through `add_pattern`, one `compile` pass
//! that captures per-instance memory stats, then `read_char` per stream byte.
//! When one instance is designated the *reference*, every other instance's
//! result is compared against it after each position and a divergence
//! surfaces as [`MultimatchError::EngineMismatch`].
//!
//! Variant selection is a trait-object factory rather than a global dispatch
//! table: [`EngineKind::instantiate`] returns the `Box<dyn MatchEngine>` for
//! the chosen algorithm.

use crate::config::Config;
use crate::error::{MultimatchError, Result};
use multimatch_ac::AutomatonEngine;
use multimatch_compact::CompactEngine;
use multimatch_engine::{Match, MatchEngine, PatternId};
use multimatch_skip::SkipEngine;
use std::fmt;
use std::str::FromStr;

/// The matching algorithm variants the framework ships
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineKind {
    /// Dense-table Aho-Corasick automaton
    Automaton,
    /// Memory-reduced Aho-Corasick with sparse transitions
    Compact,
    /// Skip-based scheme with a bad-character shift table
    Skip,
}

impl EngineKind {
    /// All variants, in registry display order
    pub const ALL: [EngineKind; 3] = [EngineKind::Automaton, EngineKind::Compact, EngineKind::Skip];

    /// Stable display name, used in reports and mismatch errors
    pub fn name(&self) -> &'static str {
        match self {
            EngineKind::Automaton => "automaton",
            EngineKind::Compact => "compact",
            EngineKind::Skip => "skip",
        }
    }

    /// Build a fresh, empty engine of this kind
    pub fn instantiate(&self, max_pattern_len: Option<usize>) -> Box<dyn MatchEngine> {
        match (self, max_pattern_len) {
            (EngineKind::Automaton, Some(max)) => {
                Box::new(AutomatonEngine::with_max_pattern_len(max))
            }
            (EngineKind::Automaton, None) => Box::new(AutomatonEngine::new()),
            (EngineKind::Compact, Some(max)) => Box::new(CompactEngine::with_max_pattern_len(max)),
            (EngineKind::Compact, None) => Box::new(CompactEngine::new()),
            (EngineKind::Skip, Some(max)) => Box::new(SkipEngine::with_max_pattern_len(max)),
            (EngineKind::Skip, None) => Box::new(SkipEngine::new()),
        }
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EngineKind {
    type Err = MultimatchError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "automaton" | "ac" => Ok(EngineKind::Automaton),
            "compact" | "lmac" => Ok(EngineKind::Compact),
            "skip" => Ok(EngineKind::Skip),
            other => Err(MultimatchError::UnknownEngineKind(other.to_string())),
        }
    }
}

/// Handle to a registered instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstanceId(usize);

/// Per-instance statistics, captured by the registry
#[derive(Debug, Clone, Copy, Default)]
pub struct InstanceStats {
    /// Live compiled structure size in bytes, measured once after compile
    pub total_mem: usize,
    /// Stream bytes fed to the instance since compile or the last reset
    pub bytes_read: u64,
    /// Matches the instance reported since compile or the last reset
    pub matches: u64,
}

struct RegisteredInstance {
    name: &'static str,
    engine: Box<dyn MatchEngine>,
    stats: InstanceStats,
}

/// Binds engine variants to live instances and streams one input through all
/// of them
///
/// Sequential by design: one registry drives one stream. Independent
/// registries (or independently created instances) may run concurrently on
/// separate streams without synchronization, since compiled structures are
/// never mutated after `compile`.
pub struct Registry {
    instances: Vec<RegisteredInstance>,
    reference: Option<usize>,
    max_pattern_len: Option<usize>,
    max_pattern_seen: usize,
    position: u64,
}

impl Registry {
    /// Create an empty registry with no pattern length limit
    pub fn new() -> Self {
        Self {
            instances: Vec::new(),
            reference: None,
            max_pattern_len: None,
            max_pattern_seen: 0,
            position: 0,
        }
    }

    /// Create a registry and register every engine the config names
    pub fn from_config(config: &Config) -> Self {
        let mut registry = Self {
            max_pattern_len: config.max_pattern_len,
            ..Self::new()
        };
        for spec in &config.engines {
            registry.register(spec.kind, spec.reference);
        }
        registry
    }

    /// Register a fresh instance of `kind`
    ///
    /// With `reference == true` the instance becomes the ground-truth oracle
    /// for cross-validation; if several are flagged, the last one wins.
    pub fn register(&mut self, kind: EngineKind, reference: bool) -> InstanceId {
        let id = InstanceId(self.instances.len());
        self.instances.push(RegisteredInstance {
            name: kind.name(),
            engine: kind.instantiate(self.max_pattern_len),
            stats: InstanceStats::default(),
        });
        if reference {
            self.reference = Some(id.0);
        }
        id
    }

    /// Register an externally built engine under a caller-chosen name
    ///
    /// Escape hatch for algorithm experiments: anything implementing
    /// [`MatchEngine`] can join the cross-validation run.
    pub fn register_engine(
        &mut self,
        name: &'static str,
        engine: Box<dyn MatchEngine>,
        reference: bool,
    ) -> InstanceId {
        let id = InstanceId(self.instances.len());
        self.instances.push(RegisteredInstance {
            name,
            engine,
            stats: InstanceStats::default(),
        });
        if reference {
            self.reference = Some(id.0);
        }
        id
    }

    /// Number of registered instances
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Whether no instance is registered yet
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// The designated reference instance, if any
    pub fn reference(&self) -> Option<InstanceId> {
        self.reference.map(InstanceId)
    }

    /// Display name of an instance's variant
    pub fn name(&self, id: InstanceId) -> &'static str {
        self.instances[id.0].name
    }

    /// Statistics for an instance
    pub fn stats(&self, id: InstanceId) -> &InstanceStats {
        &self.instances[id.0].stats
    }

    /// Longest pattern length accepted so far
    pub fn max_pattern_len_seen(&self) -> usize {
        self.max_pattern_seen
    }

    /// Fan a dictionary pattern out to every registered instance
    pub fn add_pattern(&mut self, pattern: &[u8], id: PatternId) -> Result<()> {
        for instance in &mut self.instances {
            instance.engine.add_pattern(pattern, id)?;
        }
        self.max_pattern_seen = self.max_pattern_seen.max(pattern.len());
        Ok(())
    }

    /// Compile every instance and capture its memory footprint
    pub fn compile(&mut self) -> Result<()> {
        if self.instances.is_empty() {
            return Err(MultimatchError::NoInstances);
        }
        for instance in &mut self.instances {
            instance.engine.compile()?;
            instance.stats.total_mem = instance.engine.total_mem()?;
        }
        self.position = 0;
        Ok(())
    }

    /// Feed one stream byte to every instance and cross-validate
    ///
    /// Returns the reference instance's result (the first instance's when no
    /// reference is designated). On divergence every instance has still
    /// consumed the byte, so the caller may continue streaming after
    /// reporting the mismatch.
    pub fn read_char(&mut self, byte: u8) -> Result<Option<Match>> {
        if self.instances.is_empty() {
            return Err(MultimatchError::NoInstances);
        }

        let position = self.position;
        self.position += 1;

        let mut results = Vec::with_capacity(self.instances.len());
        for instance in &mut self.instances {
            let result = instance.engine.read_char(byte)?;
            instance.stats.bytes_read += 1;
            if result.is_some() {
                instance.stats.matches += 1;
            }
            results.push(result);
        }

        let oracle = self.reference.unwrap_or(0);
        let expected = results[oracle];
        for (i, &actual) in results.iter().enumerate() {
            if i != oracle && actual != expected {
                return Err(MultimatchError::EngineMismatch {
                    position,
                    reference: self.instances[oracle].name,
                    expected,
                    candidate: self.instances[i].name,
                    actual,
                });
            }
        }

        Ok(expected)
    }

    /// Feed a whole stream, collecting per-position results
    ///
    /// Convenience wrapper over [`Registry::read_char`]; stops at the first
    /// error.
    pub fn read_stream(&mut self, stream: &[u8]) -> Result<Vec<Option<Match>>> {
        stream.iter().map(|&b| self.read_char(b)).collect()
    }

    /// Reset every instance to its post-compile baseline
    ///
    /// Stream counters restart; `total_mem` stats are kept (the compiled
    /// structures are untouched).
    pub fn reset(&mut self) -> Result<()> {
        for instance in &mut self.instances {
            instance.engine.reset()?;
            instance.stats.bytes_read = 0;
            instance.stats.matches = 0;
        }
        self.position = 0;
        Ok(())
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trip() {
        for kind in EngineKind::ALL {
            assert_eq!(kind.name().parse::<EngineKind>().unwrap(), kind);
        }
        assert!(matches!(
            "rabin-karp".parse::<EngineKind>(),
            Err(MultimatchError::UnknownEngineKind(_))
        ));
    }

    #[test]
    fn test_register_and_compile_all_kinds() {
        let mut registry = Registry::new();
        for kind in EngineKind::ALL {
            registry.register(kind, false);
        }
        registry.add_pattern(b"stream", PatternId(1)).unwrap();
        registry.compile().unwrap();
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_compile_captures_memory_stats() {
        let mut registry = Registry::new();
        let dense = registry.register(EngineKind::Automaton, true);
        let compact = registry.register(EngineKind::Compact, false);
        registry.add_pattern(b"he", PatternId(1)).unwrap();
        registry.add_pattern(b"she", PatternId(2)).unwrap();
        registry.compile().unwrap();

        let dense_mem = registry.stats(dense).total_mem;
        let compact_mem = registry.stats(compact).total_mem;
        assert!(dense_mem > 0);
        assert!(compact_mem > 0);
        assert!(
            compact_mem < dense_mem,
            "sparse storage should undercut the dense table"
        );
    }

    #[test]
    fn test_last_reference_wins() {
        let mut registry = Registry::new();
        registry.register(EngineKind::Automaton, true);
        let skip = registry.register(EngineKind::Skip, true);
        assert_eq!(registry.reference(), Some(skip));
    }

    #[test]
    fn test_empty_registry_errors() {
        let mut registry = Registry::new();
        assert!(matches!(
            registry.compile(),
            Err(MultimatchError::NoInstances)
        ));
        assert!(matches!(
            registry.read_char(b'x'),
            Err(MultimatchError::NoInstances)
        ));
    }
}
