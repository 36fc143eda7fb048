//! `fact` sample-count chunk

use super::chunk::{decode_leaf, read_u32_le, Chunk};
use super::error::{RiffError, RiffResult};
use super::registry::ChunkRegistry;
use super::tag::Tag;

pub const FACT_SIZE: usize = 4;

pub(crate) fn register(registry: &mut ChunkRegistry) {
    registry.install(Tag::FACT, decode_leaf, Some(describe_fact));
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FactChunk {
    pub sample_count: u32,
}

impl FactChunk {
    pub fn new(sample_count: u32) -> Self {
        Self { sample_count }
    }

    pub fn from_chunk(chunk: &Chunk) -> RiffResult<Self> {
        if chunk.tag() != Tag::FACT {
            return Err(RiffError::UnexpectedTag {
                expected: Tag::FACT,
                found: chunk.tag(),
            });
        }
        let sample_count = read_u32_le(chunk.payload(), 0).ok_or(RiffError::Truncated {
            tag: Tag::FACT,
            needed: FACT_SIZE,
            available: chunk.payload().len(),
        })?;
        Ok(Self { sample_count })
    }

    pub fn to_chunk(&self) -> Chunk {
        Chunk::new(Tag::FACT, self.sample_count.to_le_bytes().to_vec())
    }
}

pub fn describe_fact(_registry: &ChunkRegistry, chunk: &Chunk, _indent: usize) -> String {
    FactChunk::from_chunk(chunk)
        .map(|fact| fact.sample_count.to_string())
        .unwrap_or_default()
}
