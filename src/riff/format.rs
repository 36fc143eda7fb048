//! `fmt ` format-descriptor chunk

use super::chunk::{decode_leaf, read_u16_le, read_u32_le, Chunk, ChunkBuilder};
use super::error::{RiffError, RiffResult};
use super::registry::ChunkRegistry;
use super::tag::Tag;

// WAVE format codes
pub const WAVE_FORMAT_PCM: u16 = 1;
pub const WAVE_FORMAT_MULAW: u16 = 7;

/// Payload size without the extra-size field
pub const BASE_FORMAT_SIZE: usize = 16;
/// Payload size with the extra-size field, as written on encode
pub const EXTENDED_FORMAT_SIZE: usize = 18;

pub(crate) fn register(registry: &mut ChunkRegistry) {
    registry.install(Tag::FMT, decode_leaf, Some(describe_format));
}

/// Typed fields of a `fmt ` chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatChunk {
    pub format_tag: u16,
    pub channels: u16,
    pub sample_rate: u32,
    pub byte_rate: u32,
    pub block_align: u16,
    pub bits_per_sample: u16,
    /// Size of any format extension; 0 when the payload stops at 16 bytes
    pub extra_size: u16,
}

impl Default for FormatChunk {
    fn default() -> Self {
        Self {
            format_tag: WAVE_FORMAT_PCM,
            channels: 1,
            sample_rate: 8000,
            byte_rate: 8000,
            block_align: 1,
            bits_per_sample: 8,
            extra_size: 0,
        }
    }
}

impl FormatChunk {
    /// Read the fields from a decoded `fmt ` chunk.
    pub fn from_chunk(chunk: &Chunk) -> RiffResult<Self> {
        if chunk.tag() != Tag::FMT {
            return Err(RiffError::UnexpectedTag {
                expected: Tag::FMT,
                found: chunk.tag(),
            });
        }
        let payload = chunk.payload();
        let truncated = || RiffError::Truncated {
            tag: Tag::FMT,
            needed: BASE_FORMAT_SIZE,
            available: payload.len(),
        };

        Ok(Self {
            format_tag: read_u16_le(payload, 0).ok_or_else(truncated)?,
            channels: read_u16_le(payload, 2).ok_or_else(truncated)?,
            sample_rate: read_u32_le(payload, 4).ok_or_else(truncated)?,
            byte_rate: read_u32_le(payload, 8).ok_or_else(truncated)?,
            block_align: read_u16_le(payload, 12).ok_or_else(truncated)?,
            bits_per_sample: read_u16_le(payload, 14).ok_or_else(truncated)?,
            extra_size: read_u16_le(payload, 16).unwrap_or(0),
        })
    }

    /// Encode as an 18-byte `fmt ` chunk.
    pub fn to_chunk(&self) -> Chunk {
        let mut builder = ChunkBuilder::new(Tag::FMT);
        builder
            .append(&self.format_tag.to_le_bytes())
            .append(&self.channels.to_le_bytes())
            .append(&self.sample_rate.to_le_bytes())
            .append(&self.byte_rate.to_le_bytes())
            .append(&self.block_align.to_le_bytes())
            .append(&self.bits_per_sample.to_le_bytes())
            .append(&self.extra_size.to_le_bytes());
        builder.build()
    }
}

/// The seven fields, comma separated.
pub fn describe_format(_registry: &ChunkRegistry, chunk: &Chunk, _indent: usize) -> String {
    match FormatChunk::from_chunk(chunk) {
        Ok(fmt) => format!(
            "{}, {}, {}, {}, {}, {}, {}",
            fmt.format_tag,
            fmt.channels,
            fmt.sample_rate,
            fmt.byte_rate,
            fmt.block_align,
            fmt.bits_per_sample,
            fmt.extra_size
        ),
        Err(_) => format!("<{} bytes, truncated>", chunk.length()),
    }
}
