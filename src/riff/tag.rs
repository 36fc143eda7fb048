//! Four-character chunk identifiers (FourCC)

use std::fmt;

/// A four-byte chunk tag.
///
/// Tags built from text are space-padded or truncated to exactly four bytes.
/// Tags read from a buffer are kept verbatim and need not be valid ASCII.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag([u8; 4]);

impl Tag {
    pub const RIFF: Tag = Tag(*b"RIFF");
    pub const LIST: Tag = Tag(*b"LIST");
    pub const FMT: Tag = Tag(*b"fmt ");
    pub const FACT: Tag = Tag(*b"fact");
    pub const DATA: Tag = Tag(*b"data");
    pub const WAVE: Tag = Tag(*b"WAVE");
    pub const JUNK: Tag = Tag(*b"JUNK");
    /// Tag assumed when fewer than four bytes are left to read.
    pub const EMPTY: Tag = Tag(*b"    ");

    /// Build a tag from text, padding with spaces or truncating to 4 bytes.
    pub fn new(id: &str) -> Self {
        let mut bytes = [b' '; 4];
        for (dst, src) in bytes.iter_mut().zip(id.bytes()) {
            *dst = src;
        }
        Tag(bytes)
    }

    pub const fn from_bytes(bytes: [u8; 4]) -> Self {
        Tag(bytes)
    }

    /// Read a tag at `offset`, or `EMPTY` if fewer than 4 bytes remain.
    pub fn read(buffer: &[u8], offset: usize) -> Self {
        match offset
            .checked_add(4)
            .and_then(|end| buffer.get(offset..end))
        {
            Some(bytes) => {
                let mut tag = [0u8; 4];
                tag.copy_from_slice(bytes);
                Tag(tag)
            }
            None => Tag::EMPTY,
        }
    }

    pub const fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl Default for Tag {
    fn default() -> Self {
        Tag::EMPTY
    }
}

impl From<&str> for Tag {
    fn from(id: &str) -> Self {
        Tag::new(id)
    }
}

impl From<[u8; 4]> for Tag {
    fn from(bytes: [u8; 4]) -> Self {
        Tag(bytes)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag({:?})", String::from_utf8_lossy(&self.0))
    }
}
