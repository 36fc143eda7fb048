//! PCM WAVE form to mu-law WAVE form
//!
//! The input form must hold a `fmt ` chunk and a `data` chunk of signed
//! 16-bit little-endian samples. Channels stay interleaved exactly as they
//! were; each input sample becomes one output byte at the same index.

use crate::riff::{self, riff_form, Chunk, FactChunk, FormatChunk, RiffError, RiffResult, Tag};

use super::mulaw::encode_samples;

/// Return the first child of `form` tagged `tag`, or a missing-chunk error.
fn required_child(form: &Chunk, tag: Tag) -> RiffResult<&Chunk> {
    form.find_by_tag(tag)
        .ok_or(RiffError::MissingChunk { tag })
}

/// Transcode a decoded PCM WAVE form into a new mu-law WAVE form.
///
/// The result holds `fmt `, `fact` and `data`, in that order.
pub fn to_mu_law(pcm_form: &Chunk) -> RiffResult<Chunk> {
    if !pcm_form.is_container() {
        return Err(RiffError::NotAContainer {
            tag: pcm_form.tag(),
        });
    }
    let pcm_fmt = FormatChunk::from_chunk(required_child(pcm_form, Tag::FMT)?)?;
    let pcm_data = required_child(pcm_form, Tag::DATA)?;

    let samples = encode_samples(pcm_data.payload());
    let sample_count = samples.len() as u32;
    log::debug!(
        "Encoding {} samples ({} channels, {} Hz) as mu-law",
        sample_count,
        pcm_fmt.channels,
        pcm_fmt.sample_rate
    );

    let mulaw_fmt = FormatChunk {
        format_tag: riff::WAVE_FORMAT_MULAW,
        channels: pcm_fmt.channels,
        sample_rate: pcm_fmt.sample_rate,
        byte_rate: pcm_fmt.sample_rate,
        block_align: 1,
        bits_per_sample: 8,
        extra_size: 0,
    };

    Ok(riff_form(
        Tag::WAVE,
        [
            mulaw_fmt.to_chunk(),
            FactChunk::new(sample_count).to_chunk(),
            Chunk::new(Tag::DATA, samples),
        ],
    ))
}

/// Decode a PCM WAVE file image, transcode it, and encode the result.
pub fn convert_to_mu_law(buffer: &[u8]) -> RiffResult<Vec<u8>> {
    let pcm_form = riff::decode(buffer);
    Ok(to_mu_law(&pcm_form)?.to_bytes())
}
