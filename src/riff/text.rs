//! Null-terminated text chunks (the `INFO` list metadata tags)

use super::chunk::{decode_leaf, Chunk};
use super::registry::ChunkRegistry;
use super::tag::Tag;

/// Metadata tags that share the text-plus-NUL layout
pub const INFO_TAGS: [Tag; 23] = [
    Tag::from_bytes(*b"IARL"), // archival location
    Tag::from_bytes(*b"IART"), // artist
    Tag::from_bytes(*b"ICMS"), // commissioned
    Tag::from_bytes(*b"ICMT"), // comments
    Tag::from_bytes(*b"ICOP"), // copyright
    Tag::from_bytes(*b"ICRD"), // creation date
    Tag::from_bytes(*b"ICRP"), // cropped
    Tag::from_bytes(*b"IDIM"), // dimensions
    Tag::from_bytes(*b"IDPI"), // dots per inch
    Tag::from_bytes(*b"IENG"), // engineer
    Tag::from_bytes(*b"IGNR"), // genre
    Tag::from_bytes(*b"IKEY"), // keywords
    Tag::from_bytes(*b"ILGT"), // lightness
    Tag::from_bytes(*b"IMED"), // medium
    Tag::from_bytes(*b"INAM"), // name
    Tag::from_bytes(*b"IPLT"), // palette setting
    Tag::from_bytes(*b"IPRD"), // product
    Tag::from_bytes(*b"ISBJ"), // subject
    Tag::from_bytes(*b"ISFT"), // software
    Tag::from_bytes(*b"ISHP"), // sharpness
    Tag::from_bytes(*b"ISRC"), // source
    Tag::from_bytes(*b"ISRF"), // source form
    Tag::from_bytes(*b"ITCH"), // technician
];

pub(crate) fn register(registry: &mut ChunkRegistry) {
    for tag in INFO_TAGS {
        registry.install(tag, decode_leaf, Some(describe_text));
    }
}

pub fn is_info_tag(tag: Tag) -> bool {
    INFO_TAGS.contains(&tag)
}

/// Text chunk: the payload is the text followed by one NUL byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChunk {
    pub tag: Tag,
    pub text: String,
}

impl TextChunk {
    pub fn new(tag: impl Into<Tag>, text: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            text: text.into(),
        }
    }

    /// Read the text of any chunk using the text layout.
    ///
    /// The text ends one byte before the declared length, or at the first
    /// NUL if that comes earlier.
    pub fn from_chunk(chunk: &Chunk) -> Self {
        let payload = chunk.payload();
        let body = &payload[..payload.len().saturating_sub(1)];
        let end = body.iter().position(|&b| b == 0).unwrap_or(body.len());
        Self {
            tag: chunk.tag(),
            text: String::from_utf8_lossy(&body[..end]).into_owned(),
        }
    }

    pub fn to_chunk(&self) -> Chunk {
        let mut payload = Vec::with_capacity(self.text.len() + 1);
        payload.extend_from_slice(self.text.as_bytes());
        payload.push(0);
        Chunk::new(self.tag, payload)
    }
}

/// `"text"Z`, marking the terminator.
pub fn describe_text(_registry: &ChunkRegistry, chunk: &Chunk, _indent: usize) -> String {
    format!("\"{}\"Z", TextChunk::from_chunk(chunk).text)
}
