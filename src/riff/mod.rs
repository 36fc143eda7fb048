//! RIFF chunk model and codec
//!
//! # Architecture
//!
//! - `Tag` is the four-byte chunk identifier
//! - `Chunk` is a sealed chunk; `ChunkBuilder` and `ContainerBuilder` build them
//! - `ChunkRegistry` maps tags to decode/describe handlers; each chunk-kind
//!   module registers its own tags
//! - `FormatChunk`, `FactChunk` and `TextChunk` are typed views over payloads
//!
//! Length fields are little-endian throughout.

pub mod chunk;
pub mod error;
pub mod fact;
pub mod format;
pub mod list;
pub mod registry;
pub mod tag;
pub mod text;

pub use chunk::{Chunk, ChunkBody, ChunkBuilder, HEADER_SIZE};
pub use error::{RiffError, RiffResult};
pub use fact::FactChunk;
pub use format::{FormatChunk, WAVE_FORMAT_MULAW, WAVE_FORMAT_PCM};
pub use list::{list, riff_form, ContainerBuilder};
pub use registry::{
    decode, decode_from_buffer, describe, install, register, registered_tags, resolve,
    ChunkHandlers, ChunkRegistry, DecodeFn, Decoder, DescribeFn,
};
pub use tag::Tag;
pub use text::{TextChunk, INFO_TAGS};
