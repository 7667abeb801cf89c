// Cross-engine equivalence tests
//
// The framework's central contract: for the same dictionary and the same
// stream, every engine variant produces identical results position for
// position. Exercised on the classic Aho-Corasick dictionary, on adversarial
// overlap dictionaries, and on seeded random dictionaries and streams.

use multimatch::{
    AutomatonEngine, CompactEngine, EngineKind, Match, MatchEngine, PatternId, Registry,
    SkipEngine,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn all_engines() -> Vec<(&'static str, Box<dyn MatchEngine>)> {
    vec![
        ("automaton", Box::new(AutomatonEngine::new()) as Box<dyn MatchEngine>),
        ("compact", Box::new(CompactEngine::new())),
        ("skip", Box::new(SkipEngine::new())),
    ]
}

/// Compile the dictionary into every variant and assert identical output on
/// the stream
fn assert_equivalent(dictionary: &[&[u8]], stream: &[u8]) {
    let mut engines = all_engines();
    for (_, engine) in engines.iter_mut() {
        for (i, pattern) in dictionary.iter().enumerate() {
            engine.add_pattern(pattern, PatternId(i as u64)).unwrap();
        }
        engine.compile().unwrap();
    }

    let (ref_name, reference) = &mut engines[0];
    let ref_name = *ref_name;
    let expected: Vec<Option<Match>> = stream
        .iter()
        .map(|&b| reference.read_char(b).unwrap())
        .collect();

    for (name, engine) in engines.iter_mut().skip(1) {
        for (pos, &byte) in stream.iter().enumerate() {
            let actual = engine.read_char(byte).unwrap();
            assert_eq!(
                actual, expected[pos],
                "{} disagrees with {} at position {} (dictionary {:?})",
                name,
                ref_name,
                pos,
                dictionary
                    .iter()
                    .map(|p| String::from_utf8_lossy(p).into_owned())
                    .collect::<Vec<_>>()
            );
        }
    }
}

#[test]
fn test_classic_dictionary_expected_vector() {
    let mut registry = Registry::new();
    registry.register(EngineKind::Automaton, true);
    registry.register(EngineKind::Compact, false);
    registry.register(EngineKind::Skip, false);

    registry.add_pattern(b"he", PatternId(1)).unwrap();
    registry.add_pattern(b"she", PatternId(2)).unwrap();
    registry.add_pattern(b"his", PatternId(3)).unwrap();
    registry.add_pattern(b"hers", PatternId(4)).unwrap();
    registry.compile().unwrap();

    let results = registry.read_stream(b"ushers").unwrap();
    assert_eq!(
        results,
        vec![
            None,
            None,
            None,
            Some(Match {
                id: PatternId(2),
                len: 3
            }),
            None,
            Some(Match {
                id: PatternId(4),
                len: 4
            }),
        ]
    );
}

#[test]
fn test_equivalence_on_overlap_dictionaries() {
    assert_equivalent(&[b"he", b"she", b"his", b"hers"], b"ushers and shishers");
    assert_equivalent(&[b"a", b"ab", b"abc", b"bc", b"c"], b"abcabcabc");
    assert_equivalent(&[b"aa", b"aaa", b"aaaa"], b"aaaaaaaa");
    assert_equivalent(&[b"abab", b"bab"], b"abababab");
    // Patterns sharing a suffix but not nested in each other
    assert_equivalent(&[b"xay", b"zay", b"ay"], b"xayzayay");
}

#[test]
fn test_equivalence_no_matches() {
    assert_equivalent(&[b"needle"], b"pure haystack, nothing to find");
}

#[test]
fn test_equivalence_binary_alphabet_random() {
    let mut rng = StdRng::seed_from_u64(0x5eed);

    for _ in 0..20 {
        let pattern_count = rng.gen_range(1..=8);
        let patterns: Vec<Vec<u8>> = (0..pattern_count)
            .map(|_| {
                let len = rng.gen_range(1..=6);
                (0..len).map(|_| rng.gen_range(b'a'..=b'b')).collect()
            })
            .collect();
        let dictionary: Vec<&[u8]> = patterns.iter().map(|p| p.as_slice()).collect();

        let stream: Vec<u8> = (0..512).map(|_| rng.gen_range(b'a'..=b'b')).collect();
        assert_equivalent(&dictionary, &stream);
    }
}

#[test]
fn test_equivalence_full_byte_alphabet_random() {
    let mut rng = StdRng::seed_from_u64(0xdecade);

    for _ in 0..10 {
        let pattern_count = rng.gen_range(1..=16);
        let patterns: Vec<Vec<u8>> = (0..pattern_count)
            .map(|_| {
                let len = rng.gen_range(1..=12);
                (0..len).map(|_| rng.gen::<u8>()).collect()
            })
            .collect();
        let dictionary: Vec<&[u8]> = patterns.iter().map(|p| p.as_slice()).collect();

        // Embed a few pattern occurrences so the streams are not all misses
        let mut stream: Vec<u8> = (0..1024).map(|_| rng.gen::<u8>()).collect();
        for _ in 0..8 {
            let pattern = &patterns[rng.gen_range(0..patterns.len())];
            let at = rng.gen_range(0..=stream.len() - pattern.len());
            stream[at..at + pattern.len()].copy_from_slice(pattern);
        }
        assert_equivalent(&dictionary, &stream);
    }
}

#[test]
fn test_registry_cross_validation_passes_on_real_engines() {
    let mut rng = StdRng::seed_from_u64(7);

    let mut registry = Registry::new();
    registry.register(EngineKind::Skip, true);
    registry.register(EngineKind::Automaton, false);
    registry.register(EngineKind::Compact, false);

    for (i, word) in ["stream", "eam", "a", "mstr", "reams"].iter().enumerate() {
        registry
            .add_pattern(word.as_bytes(), PatternId(i as u64))
            .unwrap();
    }
    registry.compile().unwrap();

    let stream: Vec<u8> = (0..4096)
        .map(|_| b"streams "[rng.gen_range(0..8)])
        .collect();
    // Any divergence would surface as EngineMismatch
    registry.read_stream(&stream).unwrap();
}
