//! Deterministic chunking plans for streaming tests.

use std::fmt;

use crate::{Document, IncrementalParser, ParseError, parse};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BoundaryPolicy {
    /// Chunks split only on char boundaries and go through `feed`.
    Utf8Aligned,
    /// Chunks may split a character and go through `feed_bytes`.
    ByteStream,
}

impl fmt::Display for BoundaryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryPolicy::Utf8Aligned => f.write_str("utf8"),
            BoundaryPolicy::ByteStream => f.write_str("bytes"),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ChunkPlan {
    Fixed {
        size: usize,
        policy: BoundaryPolicy,
    },
    Boundaries {
        indices: Vec<usize>,
        policy: BoundaryPolicy,
    },
}

impl fmt::Display for ChunkPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChunkPlan::Fixed { size, policy } => write!(f, "fixed size={size} policy={policy}"),
            ChunkPlan::Boundaries { indices, policy } => write!(
                f,
                "boundaries count={} policy={policy} indices={indices:?}",
                indices.len()
            ),
        }
    }
}

impl ChunkPlan {
    pub fn fixed(size: usize) -> Self {
        Self::Fixed {
            size,
            policy: BoundaryPolicy::Utf8Aligned,
        }
    }

    pub fn fixed_unaligned(size: usize) -> Self {
        Self::Fixed {
            size,
            policy: BoundaryPolicy::ByteStream,
        }
    }

    pub fn boundaries(indices: impl Into<Vec<usize>>) -> Self {
        Self::Boundaries {
            indices: indices.into(),
            policy: BoundaryPolicy::Utf8Aligned,
        }
    }

    pub fn boundaries_unaligned(indices: impl Into<Vec<usize>>) -> Self {
        Self::Boundaries {
            indices: indices.into(),
            policy: BoundaryPolicy::ByteStream,
        }
    }

    pub fn policy(&self) -> BoundaryPolicy {
        match self {
            ChunkPlan::Fixed { policy, .. } | ChunkPlan::Boundaries { policy, .. } => *policy,
        }
    }

    /// Split points of `input` under this plan, sorted, without 0 or `len`.
    pub fn split_points(&self, input: &str) -> Vec<usize> {
        let len = input.len();
        let mut points: Vec<usize> = match self {
            ChunkPlan::Fixed { size, .. } => {
                assert!(*size > 0, "chunk size must be > 0");
                (1..)
                    .map(|i| i * size)
                    .take_while(|&idx| idx < len)
                    .collect()
            }
            ChunkPlan::Boundaries { indices, .. } => indices.clone(),
        };
        if self.policy() == BoundaryPolicy::Utf8Aligned {
            points.retain(|&idx| input.is_char_boundary(idx));
        }
        points.sort_unstable();
        points.dedup();
        points.retain(|&idx| idx > 0 && idx < len);
        points
    }

    pub fn for_each_chunk(&self, input: &str, mut f: impl FnMut(&[u8])) {
        let bytes = input.as_bytes();
        let mut last = 0usize;
        for idx in self.split_points(input) {
            f(&bytes[last..idx]);
            last = idx;
        }
        if last < bytes.len() {
            f(&bytes[last..]);
        }
    }
}

pub fn run_full(input: &str) -> Result<Document, ParseError> {
    parse(input)
}

pub fn run_chunked(input: &str, plan: &ChunkPlan) -> Result<Document, ParseError> {
    let mut parser = IncrementalParser::new();
    let mut result = Ok(());
    plan.for_each_chunk(input, |chunk| {
        if result.is_err() {
            return;
        }
        result = match plan.policy() {
            BoundaryPolicy::ByteStream => parser.feed_bytes(chunk),
            BoundaryPolicy::Utf8Aligned => match std::str::from_utf8(chunk) {
                Ok(text) => parser.feed(text),
                Err(err) => panic!("aligned plan produced a split character: {err}"),
            },
        };
    });
    result?;
    parser.close()
}

/// Fixed sizes, every boundary for short inputs, and seeded random cuts.
pub fn deterministic_chunk_plans(input: &str) -> Vec<ChunkPlan> {
    let mut plans = vec![ChunkPlan::fixed(64)];
    for size in [1usize, 2, 3, 4, 7, 16] {
        plans.push(ChunkPlan::fixed(size));
        plans.push(ChunkPlan::fixed_unaligned(size));
    }
    if input.len() <= 128 {
        for idx in 1..input.len() {
            plans.push(ChunkPlan::boundaries_unaligned(vec![idx]));
        }
    }
    let mut rng = LcgRng::new(0x7a65_726f ^ input.len() as u64);
    for _ in 0..4 {
        plans.push(ChunkPlan::boundaries_unaligned(random_boundaries(
            &mut rng,
            input.len(),
        )));
    }
    plans
}

fn random_boundaries(rng: &mut LcgRng, len: usize) -> Vec<usize> {
    if len < 2 {
        return Vec::new();
    }
    let count = 1 + rng.next_usize(len.min(16));
    (0..count).map(|_| 1 + rng.next_usize(len - 1)).collect()
}

struct LcgRng {
    state: u64,
}

impl LcgRng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.state
    }

    fn next_usize(&mut self, bound: usize) -> usize {
        ((self.next_u64() >> 33) as usize) % bound
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aligned_plans_never_split_characters() {
        let input = "a\u{e9}b\u{1F600}c";
        let plan = ChunkPlan::fixed(1);
        plan.for_each_chunk(input, |chunk| {
            assert!(std::str::from_utf8(chunk).is_ok(), "split chunk {chunk:?}");
        });
        assert_eq!(plan.split_points(input), vec![1, 3, 4, 8]);
    }

    #[test]
    fn unaligned_boundaries_are_normalized() {
        let plan = ChunkPlan::boundaries_unaligned(vec![5, 0, 2, 2, 99]);
        assert_eq!(plan.split_points("abcdefg"), vec![2, 5]);
        let mut seen = Vec::new();
        plan.for_each_chunk("abcdefg", |chunk| seen.push(chunk.to_vec()));
        assert_eq!(seen, vec![b"ab".to_vec(), b"cde".to_vec(), b"fg".to_vec()]);
    }
}
