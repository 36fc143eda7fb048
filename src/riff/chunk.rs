//! Chunk envelope: tag + little-endian length + payload + pad byte
//!
//! A [`Chunk`] is sealed once built or decoded. Chunks under construction go
//! through [`ChunkBuilder`], which is the only place a payload can grow.
//!
//! Decoding never fails. A header that cannot be read, or a declared length
//! that runs past the end of the buffer, yields a junk chunk covering the
//! remaining bytes so that a container walk always makes progress.
//!
//! Containers keep their list type and children only. Their payload bytes are
//! produced from the children on write, so a decoded tree holds each input
//! byte once however deep it nests.

use std::borrow::Cow;
use std::ops::Range;

use super::error::{RiffError, RiffResult};
use super::registry::Decoder;
use super::tag::Tag;

/// Size of the tag + length header
pub const HEADER_SIZE: usize = 8;

/// Structural kind of a sealed chunk
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChunkBody {
    /// Opaque payload, interpreted (if at all) by a typed view
    Leaf,
    /// `LIST`/`RIFF` style chunk: list type followed by nested chunks
    Container { list_type: Tag, children: Vec<Chunk> },
    /// Unparseable remainder of a buffer
    Junk,
}

/// A sealed RIFF chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    tag: Tag,
    length: u32,
    /// Raw bytes of a leaf or junk chunk. Empty for containers.
    payload: Vec<u8>,
    body: ChunkBody,
}

/// Header fields of a chunk whose declared payload fits in its buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Envelope {
    pub tag: Tag,
    pub length: u32,
    pub payload_start: usize,
}

impl Envelope {
    pub fn payload_range(&self) -> Range<usize> {
        self.payload_start..self.payload_start + self.length as usize
    }
}

/// Read the 8-byte header at `offset` and check the payload is in bounds.
pub(crate) fn read_envelope(buffer: &[u8], offset: usize) -> Option<Envelope> {
    let header = buffer.get(offset..offset.checked_add(HEADER_SIZE)?)?;
    let tag = Tag::read(header, 0);
    let length = read_u32_le(header, 4)?;
    let payload_start = offset + HEADER_SIZE;
    let available = buffer.len() - payload_start;
    if length as usize > available {
        return None;
    }
    Some(Envelope {
        tag,
        length,
        payload_start,
    })
}

pub(crate) fn read_u16_le(bytes: &[u8], at: usize) -> Option<u16> {
    let raw = bytes.get(at..at.checked_add(2)?)?;
    Some(u16::from_le_bytes([raw[0], raw[1]]))
}

pub(crate) fn read_u32_le(bytes: &[u8], at: usize) -> Option<u32> {
    let raw = bytes.get(at..at.checked_add(4)?)?;
    Some(u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]))
}

/// Length field for a payload of `size` bytes, if it fits in 32 bits.
pub(crate) fn checked_length(tag: Tag, size: usize) -> RiffResult<u32> {
    u32::try_from(size).map_err(|_| RiffError::TooLarge { tag, size })
}

impl Chunk {
    /// Encode `payload` under `tag`. The tag is normalised to four bytes.
    ///
    /// # Panics
    ///
    /// If `payload` is longer than `u32::MAX` bytes. Use [`Chunk::try_new`]
    /// when the size is not known to fit.
    pub fn new(tag: impl Into<Tag>, payload: impl Into<Vec<u8>>) -> Self {
        match Chunk::try_new(tag, payload) {
            Ok(chunk) => chunk,
            Err(err) => panic!("{}", err),
        }
    }

    /// Encode `payload` under `tag`, rejecting payloads the length field
    /// cannot describe.
    pub fn try_new(tag: impl Into<Tag>, payload: impl Into<Vec<u8>>) -> RiffResult<Self> {
        let tag = tag.into();
        let payload = payload.into();
        Ok(Chunk {
            tag,
            length: checked_length(tag, payload.len())?,
            payload,
            body: ChunkBody::Leaf,
        })
    }

    /// Leaf holding the payload `env` describes in `buffer`.
    pub(crate) fn from_envelope(buffer: &[u8], env: &Envelope) -> Self {
        Chunk {
            tag: env.tag,
            length: env.length,
            payload: buffer[env.payload_range()].to_vec(),
            body: ChunkBody::Leaf,
        }
    }

    /// Container whose payload is `length` bytes of list type and children.
    pub(crate) fn container(tag: Tag, length: u32, list_type: Tag, children: Vec<Chunk>) -> Self {
        Chunk {
            tag,
            length,
            payload: Vec::new(),
            body: ChunkBody::Container {
                list_type,
                children,
            },
        }
    }

    /// Decode a plain chunk at `offset` without consulting the registry.
    pub fn decode(buffer: &[u8], offset: usize) -> Self {
        match read_envelope(buffer, offset) {
            Some(env) => Chunk::from_envelope(buffer, &env),
            None => Chunk::junk(buffer, offset),
        }
    }

    /// Junk chunk spanning everything from `offset` to the end of `buffer`.
    pub fn junk(buffer: &[u8], offset: usize) -> Self {
        let rest = buffer.get(offset..).unwrap_or(&[]);
        log::warn!(
            "Unreadable chunk at offset {}: {} trailing bytes kept as junk",
            offset,
            rest.len()
        );
        Chunk {
            tag: Tag::JUNK,
            // Junk writes no header; its size comes from the payload itself.
            length: u32::try_from(rest.len()).unwrap_or(u32::MAX),
            payload: rest.to_vec(),
            body: ChunkBody::Junk,
        }
    }

    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// Declared payload length, excluding header and pad byte.
    pub fn length(&self) -> u32 {
        self.length
    }

    /// Raw bytes of a leaf or junk chunk.
    ///
    /// Containers hold no flat copy of their payload and return an empty
    /// slice; see [`Chunk::payload_bytes`].
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Payload as written to a file, rendering containers from their children.
    pub fn payload_bytes(&self) -> Cow<'_, [u8]> {
        if !self.is_container() {
            return Cow::Borrowed(&self.payload);
        }
        let mut out = Vec::with_capacity(self.encoded_size());
        self.write_to(&mut out);
        out.truncate(HEADER_SIZE + self.length as usize);
        out.drain(..HEADER_SIZE);
        Cow::Owned(out)
    }

    pub fn body(&self) -> &ChunkBody {
        &self.body
    }

    pub fn is_junk(&self) -> bool {
        matches!(self.body, ChunkBody::Junk)
    }

    pub fn is_container(&self) -> bool {
        matches!(self.body, ChunkBody::Container { .. })
    }

    /// List (or form) type of a container chunk.
    pub fn list_type(&self) -> Option<Tag> {
        match &self.body {
            ChunkBody::Container { list_type, .. } => Some(*list_type),
            _ => None,
        }
    }

    /// Nested chunks in file order. Empty for anything but a container.
    pub fn children(&self) -> &[Chunk] {
        match &self.body {
            ChunkBody::Container { children, .. } => children,
            _ => &[],
        }
    }

    /// First child carrying `tag`, if any.
    pub fn find_by_tag(&self, tag: impl Into<Tag>) -> Option<&Chunk> {
        let tag = tag.into();
        self.children().iter().find(|child| child.tag == tag)
    }

    /// Number of bytes this chunk occupies when encoded.
    ///
    /// Always `8 + length + length % 2`, except for junk, which re-encodes
    /// as the raw bytes it captured.
    pub fn encoded_size(&self) -> usize {
        match self.body {
            ChunkBody::Junk => self.payload.len(),
            _ => HEADER_SIZE + self.length as usize + self.pad_len(),
        }
    }

    fn pad_len(&self) -> usize {
        (self.length % 2) as usize
    }

    /// Append the encoded form of this chunk to `out`.
    ///
    /// A container writes its list type and children, clipped to its
    /// declared length. Only a decoded final child that lacked its pad byte
    /// writes past that length.
    pub fn write_to(&self, out: &mut Vec<u8>) {
        if self.is_junk() {
            out.extend_from_slice(&self.payload);
            return;
        }
        out.extend_from_slice(self.tag.as_bytes());
        out.extend_from_slice(&self.length.to_le_bytes());
        match &self.body {
            ChunkBody::Container {
                list_type,
                children,
            } => {
                let start = out.len();
                out.extend_from_slice(list_type.as_bytes());
                for child in children {
                    child.write_to(out);
                }
                out.truncate(start + self.length as usize);
            }
            _ => out.extend_from_slice(&self.payload),
        }
        if self.pad_len() == 1 {
            out.push(0);
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_size());
        self.write_to(&mut out);
        out
    }
}

/// Registry entry point for tags without a dedicated decoder.
pub fn decode_leaf(_decoder: &Decoder<'_>, buffer: &[u8], offset: usize) -> Chunk {
    Chunk::decode(buffer, offset)
}

/// Mutable chunk on the encode path.
#[derive(Debug, Clone, Default)]
pub struct ChunkBuilder {
    tag: Tag,
    payload: Vec<u8>,
}

impl ChunkBuilder {
    pub fn new(tag: impl Into<Tag>) -> Self {
        ChunkBuilder {
            tag: tag.into(),
            payload: Vec::new(),
        }
    }

    pub fn with_payload(mut self, data: &[u8]) -> Self {
        self.append(data);
        self
    }

    /// Grow the payload. The length and pad byte follow on `build`.
    pub fn append(&mut self, data: &[u8]) -> &mut Self {
        self.payload.extend_from_slice(data);
        self
    }

    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// Current payload length, saturating at `u32::MAX`.
    pub fn length(&self) -> u32 {
        u32::try_from(self.payload.len()).unwrap_or(u32::MAX)
    }

    /// Seal the chunk, or fail if the payload outgrew the length field.
    pub fn try_build(self) -> RiffResult<Chunk> {
        Chunk::try_new(self.tag, self.payload)
    }

    /// Seal the chunk.
    ///
    /// # Panics
    ///
    /// If the payload is longer than `u32::MAX` bytes.
    pub fn build(self) -> Chunk {
        Chunk::new(self.tag, self.payload)
    }
}
