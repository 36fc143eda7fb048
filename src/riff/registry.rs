// Chunk type registry
//
// Provides `ChunkRegistry`, which maps a four-byte tag to the handlers that
// decode and describe chunks carrying it. Tags without an entry fall back to
// the plain envelope decoder, so new chunk kinds are added by registering a
// handler rather than by touching the core decoder.
//
// A process-wide registry pre-loaded with the built-in chunk kinds backs the
// free functions at the bottom of this file. It is meant to be written during
// start-up only; after that every access is a shared read.

use std::collections::HashMap;
use std::sync::LazyLock;

use parking_lot::RwLock;

use super::chunk::{decode_leaf, Chunk, ChunkBody};
use super::tag::Tag;
use super::{fact, format, list, text};

/// Decodes the chunk starting at `offset` in `buffer`.
pub type DecodeFn = fn(&Decoder<'_>, &[u8], usize) -> Chunk;

/// Renders the data portion of a chunk description at the given indent.
pub type DescribeFn = fn(&ChunkRegistry, &Chunk, usize) -> String;

/// Handlers installed for one tag.
#[derive(Clone, Copy)]
pub struct ChunkHandlers {
    tag: Tag,
    pub decode: DecodeFn,
    pub describe: Option<DescribeFn>,
}

impl ChunkHandlers {
    pub fn new(tag: Tag, decode: DecodeFn, describe: Option<DescribeFn>) -> Self {
        ChunkHandlers {
            tag,
            decode,
            describe,
        }
    }

    pub fn tag(&self) -> Tag {
        self.tag
    }
}

impl std::fmt::Debug for ChunkHandlers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChunkHandlers")
            .field("tag", &self.tag)
            .field("describe", &self.describe.is_some())
            .finish()
    }
}

/// Registry of chunk handlers keyed by tag.
pub struct ChunkRegistry {
    handlers: HashMap<Tag, ChunkHandlers>,
}

impl ChunkRegistry {
    /// Create an empty registry. Every tag decodes as a plain chunk.
    pub fn new() -> Self {
        ChunkRegistry {
            handlers: HashMap::new(),
        }
    }

    /// Create a registry holding the container, format, fact and text kinds.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        list::register(&mut registry);
        format::register(&mut registry);
        fact::register(&mut registry);
        text::register(&mut registry);
        registry
    }

    /// Associate `decode` with `tag`, dropping any describer it had.
    ///
    /// The last registration for a tag wins.
    pub fn register(&mut self, tag: impl Into<Tag>, decode: DecodeFn) {
        self.install(tag, decode, None);
    }

    /// Install both handlers for `tag`, replacing any previous entry.
    pub fn install(&mut self, tag: impl Into<Tag>, decode: DecodeFn, describe: Option<DescribeFn>) {
        let tag = tag.into();
        if self.handlers.contains_key(&tag) {
            log::debug!("Replacing chunk handlers for '{}'", tag);
        }
        self.handlers
            .insert(tag, ChunkHandlers::new(tag, decode, describe));
    }

    /// Look up the handlers registered for `tag`.
    pub fn lookup(&self, tag: Tag) -> Option<&ChunkHandlers> {
        self.handlers.get(&tag)
    }

    /// Decoder for `tag`, falling back to the plain envelope decoder.
    pub fn resolve(&self, tag: Tag) -> DecodeFn {
        self.lookup(tag)
            .map(|handlers| handlers.decode)
            .unwrap_or(decode_leaf)
    }

    pub fn describer(&self, tag: Tag) -> Option<DescribeFn> {
        self.lookup(tag).and_then(|handlers| handlers.describe)
    }

    /// Return the number of registered tags.
    pub fn count(&self) -> usize {
        self.handlers.len()
    }

    /// Registered tags in byte order.
    pub fn tags(&self) -> Vec<Tag> {
        let mut tags: Vec<Tag> = self.handlers.keys().copied().collect();
        tags.sort();
        tags
    }

    /// Decode the chunk at `offset`, dispatching on the tag found there.
    pub fn decode_from_buffer(&self, buffer: &[u8], offset: usize) -> Chunk {
        Decoder::new(self).decode_from_buffer(buffer, offset)
    }

    /// Decode the chunk at the start of `buffer`.
    pub fn decode(&self, buffer: &[u8]) -> Chunk {
        self.decode_from_buffer(buffer, 0)
    }

    /// Render `chunk` as `TAG(data)`, recursing into containers.
    pub fn describe(&self, chunk: &Chunk, indent: usize) -> String {
        let data = match chunk.body() {
            ChunkBody::Junk => format!("<{} bytes unparsed>", chunk.payload().len()),
            _ => self
                .describer(chunk.tag())
                .map(|describe| describe(self, chunk, indent + 5))
                .unwrap_or_default(),
        };
        format!("{}({})", chunk.tag(), data)
    }
}

impl Default for ChunkRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

/// Decoding state threaded through nested container decodes.
#[derive(Clone, Copy)]
pub struct Decoder<'r> {
    registry: &'r ChunkRegistry,
    depth: usize,
}

impl<'r> Decoder<'r> {
    pub fn new(registry: &'r ChunkRegistry) -> Self {
        Decoder { registry, depth: 0 }
    }

    pub fn registry(&self) -> &'r ChunkRegistry {
        self.registry
    }

    /// Container nesting level of the chunk being decoded.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Decoder for the children of a container, or `None` past the nesting limit.
    pub fn nested(&self) -> Option<Decoder<'r>> {
        if self.depth >= list::MAX_NESTING_DEPTH {
            return None;
        }
        Some(Decoder {
            registry: self.registry,
            depth: self.depth + 1,
        })
    }

    pub fn decode_from_buffer(&self, buffer: &[u8], offset: usize) -> Chunk {
        let tag = Tag::read(buffer, offset);
        (self.registry.resolve(tag))(self, buffer, offset)
    }
}

// =============================================================================
// Process-wide registry
// =============================================================================

static GLOBAL_REGISTRY: LazyLock<RwLock<ChunkRegistry>> =
    LazyLock::new(|| RwLock::new(ChunkRegistry::with_builtins()));

/// Register a decoder for `tag` in the process-wide registry.
pub fn register(tag: impl Into<Tag>, decode: DecodeFn) {
    GLOBAL_REGISTRY.write().register(tag, decode);
}

/// Install decode and describe handlers in the process-wide registry.
pub fn install(tag: impl Into<Tag>, decode: DecodeFn, describe: Option<DescribeFn>) {
    GLOBAL_REGISTRY.write().install(tag, decode, describe);
}

/// Decoder the process-wide registry uses for `tag`.
pub fn resolve(tag: Tag) -> DecodeFn {
    GLOBAL_REGISTRY.read().resolve(tag)
}

/// Tags known to the process-wide registry.
pub fn registered_tags() -> Vec<Tag> {
    GLOBAL_REGISTRY.read().tags()
}

/// Decode the chunk at `offset` using the process-wide registry.
pub fn decode_from_buffer(buffer: &[u8], offset: usize) -> Chunk {
    GLOBAL_REGISTRY.read().decode_from_buffer(buffer, offset)
}

/// Decode the chunk at the start of `buffer` using the process-wide registry.
pub fn decode(buffer: &[u8]) -> Chunk {
    decode_from_buffer(buffer, 0)
}

/// Describe `chunk` using the process-wide registry's describers.
pub fn describe(chunk: &Chunk, indent: usize) -> String {
    GLOBAL_REGISTRY.read().describe(chunk, indent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::riff::chunk::ChunkBuilder;
    use serial_test::serial;

    // Decodes like the plain decoder but marks the payload so dispatch is visible.
    fn marking_decode(_decoder: &Decoder<'_>, buffer: &[u8], offset: usize) -> Chunk {
        let plain = Chunk::decode(buffer, offset);
        let mut builder = ChunkBuilder::new(plain.tag());
        builder.append(b"seen");
        builder.build()
    }

    fn describe_marker(_registry: &ChunkRegistry, _chunk: &Chunk, _indent: usize) -> String {
        "marker".to_string()
    }

    fn mcla_bytes() -> Vec<u8> {
        let mut buf = b"mcla".to_vec();
        buf.extend_from_slice(&4u32.to_le_bytes());
        buf.extend_from_slice(&1234u32.to_le_bytes());
        buf
    }

    #[test]
    fn test_registry_new_empty() {
        let registry = ChunkRegistry::new();
        assert_eq!(registry.count(), 0);
        assert!(registry.lookup(Tag::LIST).is_none());
    }

    #[test]
    fn test_builtins_registered() {
        let registry = ChunkRegistry::with_builtins();
        for tag in [Tag::RIFF, Tag::LIST, Tag::FMT, Tag::FACT, Tag::new("IARL")] {
            assert!(registry.lookup(tag).is_some(), "missing {}", tag);
        }
        // LIST, RIFF, fmt, fact and the 23 INFO text tags
        assert_eq!(registry.count(), 27);
        assert!(registry.lookup(Tag::DATA).is_none());
    }

    #[test]
    fn test_resolve_unknown_falls_back_to_plain_decoder() {
        let registry = ChunkRegistry::new();
        let chunk = (registry.resolve(Tag::new("mcla")))(&Decoder::new(&registry), &mcla_bytes(), 0);
        assert_eq!(chunk.payload(), &1234u32.to_le_bytes());
    }

    #[test]
    fn test_register_dispatches_by_tag() {
        let mut registry = ChunkRegistry::new();
        registry.register("mcla", marking_decode);

        let chunk = registry.decode(&mcla_bytes());
        assert_eq!(chunk.tag(), Tag::new("mcla"));
        assert_eq!(chunk.payload(), b"seen");
    }

    #[test]
    fn test_register_duplicate_overwrites() {
        let mut registry = ChunkRegistry::new();
        registry.install("mcla", marking_decode, Some(describe_marker));
        registry.register("mcla", decode_leaf);

        assert_eq!(registry.count(), 1);
        let handlers = registry.lookup(Tag::new("mcla")).unwrap();
        assert!(handlers.describe.is_none());
        assert_eq!(handlers.tag(), Tag::new("mcla"));
        assert_eq!(registry.decode(&mcla_bytes()).payload(), &1234u32.to_le_bytes());
    }

    #[test]
    fn test_decode_short_buffer_uses_empty_tag() {
        let mut registry = ChunkRegistry::new();
        registry.register(Tag::EMPTY, marking_decode);

        // Fewer than four bytes: dispatch on "    ", which here marks the chunk.
        let chunk = registry.decode(b"ab");
        assert_eq!(chunk.payload(), b"seen");
    }

    #[test]
    fn test_describe_uses_installed_describer() {
        let mut registry = ChunkRegistry::new();
        registry.install("mcla", decode_leaf, Some(describe_marker));

        let chunk = registry.decode(&mcla_bytes());
        assert_eq!(registry.describe(&chunk, 0), "mcla(marker)");
        assert_eq!(registry.describe(&Chunk::new("zzzz", vec![]), 0), "zzzz()");
    }

    #[test]
    fn test_describe_junk() {
        let registry = ChunkRegistry::new();
        let chunk = registry.decode(&[1, 2, 3]);
        assert_eq!(registry.describe(&chunk, 0), "JUNK(<3 bytes unparsed>)");
    }

    #[test]
    fn test_nested_depth_limit() {
        let registry = ChunkRegistry::new();
        let mut decoder = Decoder::new(&registry);
        for _ in 0..list::MAX_NESTING_DEPTH {
            decoder = decoder.nested().unwrap();
        }
        assert_eq!(decoder.depth(), list::MAX_NESTING_DEPTH);
        assert!(decoder.nested().is_none());
    }

    #[test]
    fn test_tags_sorted() {
        let mut registry = ChunkRegistry::new();
        registry.register("zzzz", decode_leaf);
        registry.register("aaaa", decode_leaf);
        assert_eq!(registry.tags(), vec![Tag::new("aaaa"), Tag::new("zzzz")]);
    }

    #[test]
    #[serial]
    fn test_global_register_and_decode() {
        register("glob", marking_decode);
        assert!(registered_tags().contains(&Tag::new("glob")));

        let mut buf = b"glob".to_vec();
        buf.extend_from_slice(&0u32.to_le_bytes());
        assert_eq!(decode(&buf).payload(), b"seen");
        assert_eq!(decode_from_buffer(&buf, 0).payload(), b"seen");

        // Restore plain decoding so other tests see the default behaviour.
        install("glob", decode_leaf, None);
        assert_eq!(decode(&buf).payload(), b"");
    }

    #[test]
    #[serial]
    fn test_global_resolve_builtin() {
        let buf = crate::riff::list::list(Tag::WAVE, vec![]).to_bytes();
        let chunk = (resolve(Tag::LIST))(&Decoder::new(&ChunkRegistry::new()), &buf, 0);
        assert!(chunk.is_container());
    }
}
