//! Partitioning of overlapping transition sets into disjoint ones.
//!
//! The sweep works on the boundaries of every input range. Between two
//! consecutive boundaries no input changes membership, so each such
//! elementary interval either lies entirely inside an input's matcher or
//! entirely outside of it. The transitions for an interval are the
//! concatenation, in input order, of the transitions of every input that
//! covers it. Intervals that end up with equal transitions share one output
//! builder, whether or not they are adjacent.

use crate::charset::CharSet;
use crate::transition::{TransitionSet, TransitionSetBuilder};

/// One past `char::MAX`, the exclusive end of the last possible interval.
const END: u32 = 0x11_0000;

/// Reusable scratch space for one compilation.
///
/// Pass the same buffer to every `resolve` call of a graph so the sweep
/// boundaries are allocated once. Nothing keeps a reference to it after a
/// call returns.
#[derive(Debug, Default)]
pub struct CompilationBuffer {
    boundaries: Vec<u32>,
}

impl CompilationBuffer {
    pub fn new() -> Self {
        Self::default()
    }
}

struct Partition {
    ranges: Vec<(char, char)>,
    transitions: TransitionSet,
}

/// Turn `builders` into builders whose matchers are pairwise disjoint.
///
/// The union of the output matchers equals the union of the input matchers,
/// and for every symbol the output builder containing it carries the
/// transitions of all inputs containing it, in input order. Output order
/// follows the lowest symbol of each output matcher.
pub fn canonicalize(
    builders: &[TransitionSetBuilder],
    buffer: &mut CompilationBuffer,
) -> Vec<TransitionSetBuilder> {
    let boundaries = &mut buffer.boundaries;
    boundaries.clear();
    for builder in builders {
        for (start, end) in builder.matcher().ranges() {
            boundaries.push(start as u32);
            boundaries.push(after(end));
        }
    }
    boundaries.sort_unstable();
    boundaries.dedup();

    let mut partitions: Vec<Partition> = Vec::new();
    for window in boundaries.windows(2) {
        let (Some(lo), Some(hi)) = (char::from_u32(window[0]), last_before(window[1])) else {
            continue;
        };
        let mut transitions = TransitionSet::new();
        let mut covered = false;
        for builder in builders.iter().filter(|b| b.matcher().contains(lo)) {
            transitions.extend_from(builder.transitions());
            covered = true;
        }
        if !covered {
            continue;
        }
        match partitions.iter_mut().find(|p| p.transitions == transitions) {
            Some(partition) => partition.ranges.push((lo, hi)),
            None => partitions.push(Partition {
                ranges: vec![(lo, hi)],
                transitions,
            }),
        }
    }

    trace!(
        "canonicalized {} transition sets into {}",
        builders.len(),
        partitions.len()
    );

    partitions
        .into_iter()
        .map(|p| TransitionSetBuilder::new(CharSet::from_ranges(p.ranges), p.transitions))
        .collect()
}

/// The exclusive upper boundary of a range ending at `ch`.
fn after(ch: char) -> u32 {
    match ch {
        '\u{D7FF}' => 0xE000,
        char::MAX => END,
        c => c as u32 + 1,
    }
}

/// The last scalar value before the exclusive boundary `bound`.
fn last_before(bound: u32) -> Option<char> {
    match bound {
        0 => None,
        0xE000 => Some('\u{D7FF}'),
        b => char::from_u32(b - 1),
    }
}
