//! Build all three engine variants over one dictionary, stream a text
//! through them with the dense automaton as reference oracle, and print
//! per-instance statistics.
//!
//! Run with: `cargo run --example cross_validate`

use multimatch::{EngineKind, MultimatchError, PatternId, Registry};

fn main() -> Result<(), MultimatchError> {
    let dictionary: &[(&str, u64)] = &[
        ("he", 1),
        ("she", 2),
        ("his", 3),
        ("hers", 4),
        ("sea", 5),
        ("shells", 6),
    ];
    let stream = "she sells seashells by the seashore, and he sells hers";

    let mut registry = Registry::new();
    let ids: Vec<_> = [
        (EngineKind::Automaton, true),
        (EngineKind::Compact, false),
        (EngineKind::Skip, false),
    ]
    .into_iter()
    .map(|(kind, reference)| registry.register(kind, reference))
    .collect();

    for &(word, id) in dictionary {
        registry.add_pattern(word.as_bytes(), PatternId(id))?;
    }
    registry.compile()?;

    println!("streaming {:?}", stream);
    for (pos, &byte) in stream.as_bytes().iter().enumerate() {
        if let Some(m) = registry.read_char(byte)? {
            let start = pos + 1 - m.len;
            println!(
                "  position {:>2}: pattern {} = {:?}",
                pos,
                m.id,
                &stream[start..=pos]
            );
        }
    }

    println!("\nper-instance statistics:");
    for id in ids {
        let stats = registry.stats(id);
        println!(
            "  {:<10} {:>8} bytes compiled, {:>4} bytes read, {:>3} matches",
            registry.name(id),
            stats.total_mem,
            stats.bytes_read,
            stats.matches
        );
    }

    Ok(())
}
