//! `LIST` and `RIFF` container chunks
//!
//! A container payload is a four-byte list type followed by consecutive,
//! individually padded child chunks. The outer `RIFF` form is the same
//! structure under a fixed tag, where the list type is called the form type.
//!
//! A container's length is `4 + sum of child encoded sizes`. The one decoded
//! exception is a final odd-length child whose pad byte is missing from the
//! file: that child counts its pad, so the sum runs one byte over.

use super::chunk::{checked_length, read_envelope, Chunk};
use super::error::RiffResult;
use super::registry::{ChunkRegistry, Decoder};
use super::tag::Tag;

/// Size of the list type that opens a container payload
pub const LIST_TYPE_SIZE: usize = 4;

/// Containers nested deeper than this decode as plain chunks.
pub const MAX_NESTING_DEPTH: usize = 256;

pub(crate) fn register(registry: &mut ChunkRegistry) {
    registry.install(Tag::LIST, decode_container, Some(describe_container));
    registry.install(Tag::RIFF, decode_container, Some(describe_container));
}

/// Mutable container on the encode path.
#[derive(Debug, Clone)]
pub struct ContainerBuilder {
    tag: Tag,
    list_type: Tag,
    children: Vec<Chunk>,
    /// Payload bytes so far: list type plus encoded children
    size: usize,
}

impl ContainerBuilder {
    pub fn new(tag: impl Into<Tag>, list_type: impl Into<Tag>) -> Self {
        ContainerBuilder {
            tag: tag.into(),
            list_type: list_type.into(),
            children: Vec::new(),
            size: LIST_TYPE_SIZE,
        }
    }

    /// `LIST` container with the given list type
    pub fn list(list_type: impl Into<Tag>) -> Self {
        Self::new(Tag::LIST, list_type)
    }

    /// `RIFF` form with the given form type
    pub fn riff(form_type: impl Into<Tag>) -> Self {
        Self::new(Tag::RIFF, form_type)
    }

    /// Append a child; the payload grows by its encoded size.
    pub fn add(&mut self, child: Chunk) -> &mut Self {
        self.size = self.size.saturating_add(child.encoded_size());
        self.children.push(child);
        self
    }

    /// Current payload length, saturating at `u32::MAX`.
    pub fn length(&self) -> u32 {
        u32::try_from(self.size).unwrap_or(u32::MAX)
    }

    pub fn children(&self) -> &[Chunk] {
        &self.children
    }

    /// Seal the container, or fail if the children outgrew the length field.
    pub fn try_build(self) -> RiffResult<Chunk> {
        let length = checked_length(self.tag, self.size)?;
        Ok(Chunk::container(self.tag, length, self.list_type, self.children))
    }

    /// Seal the container.
    ///
    /// # Panics
    ///
    /// If the encoded children exceed `u32::MAX` bytes.
    pub fn build(self) -> Chunk {
        match self.try_build() {
            Ok(chunk) => chunk,
            Err(err) => panic!("{}", err),
        }
    }
}

/// Build a container under `tag` holding `children` in order.
pub fn create(
    list_type: impl Into<Tag>,
    tag: impl Into<Tag>,
    children: impl IntoIterator<Item = Chunk>,
) -> Chunk {
    let mut builder = ContainerBuilder::new(tag, list_type);
    for child in children {
        builder.add(child);
    }
    builder.build()
}

/// Build a `LIST` chunk.
pub fn list(list_type: impl Into<Tag>, children: impl IntoIterator<Item = Chunk>) -> Chunk {
    create(list_type, Tag::LIST, children)
}

/// Build a `RIFF` form.
pub fn riff_form(form_type: impl Into<Tag>, children: impl IntoIterator<Item = Chunk>) -> Chunk {
    create(form_type, Tag::RIFF, children)
}

/// Decode a container at `offset`, then its children in file order.
///
/// Children are decoded against the container's own payload, so a damaged
/// child turns the rest of its parent (not the rest of the file) into junk.
pub fn decode_container(decoder: &Decoder<'_>, buffer: &[u8], offset: usize) -> Chunk {
    let Some(envelope) = read_envelope(buffer, offset) else {
        return Chunk::junk(buffer, offset);
    };
    let payload = &buffer[envelope.payload_range()];

    if payload.len() < LIST_TYPE_SIZE {
        log::debug!(
            "'{}' at offset {} has no room for a list type",
            envelope.tag,
            offset
        );
        return Chunk::from_envelope(buffer, &envelope);
    }

    let Some(inner) = decoder.nested() else {
        log::warn!(
            "'{}' at offset {} nested deeper than {} levels, children left undecoded",
            envelope.tag,
            offset,
            MAX_NESTING_DEPTH
        );
        return Chunk::from_envelope(buffer, &envelope);
    };

    let list_type = Tag::read(payload, 0);
    let mut children = Vec::new();
    let mut cursor = LIST_TYPE_SIZE;
    while cursor < payload.len() {
        let child = inner.decode_from_buffer(payload, cursor);
        // Junk covers at least one byte here; the floor guards custom decoders.
        cursor += child.encoded_size().max(1);
        children.push(child);
    }

    log::debug!(
        "Decoded '{}' ('{}') with {} children at depth {}",
        envelope.tag,
        list_type,
        children.len(),
        decoder.depth()
    );

    Chunk::container(envelope.tag, envelope.length, list_type, children)
}

/// `'TYPE'  first\n<indent>second...`, children aligned after the list type.
pub fn describe_container(registry: &ChunkRegistry, chunk: &Chunk, indent: usize) -> String {
    let Some(list_type) = chunk.list_type() else {
        return String::new();
    };
    let child_indent = indent + 8;
    let mut out = format!("'{}'", list_type);
    for (i, child) in chunk.children().iter().enumerate() {
        if i == 0 {
            out.push_str("  ");
        } else {
            out.push('\n');
            out.push_str(&" ".repeat(child_indent));
        }
        out.push_str(&registry.describe(child, child_indent));
    }
    out
}
