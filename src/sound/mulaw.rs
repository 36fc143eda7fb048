//! 16-bit linear PCM to 8-bit mu-law (G.711)
//!
//! Bit-exact with the classic CCITT reference encoder: bias 0x84, clip at
//! 32635, segment taken from a 256-entry table over bits 7..14 of the
//! biased magnitude.

/// Added to the magnitude before segment lookup
pub const BIAS: i32 = 0x84;
/// Largest magnitude encoded before clipping
pub const CLIP: i32 = 32635;

/// Segment number for `(biased_magnitude >> 7) & 0xFF`
#[rustfmt::skip]
const EXPONENT_LUT: [u8; 256] = [
    0, 0, 1, 1, 2, 2, 2, 2, 3, 3, 3, 3, 3, 3, 3, 3,
    4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4,
    5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5,
    5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5,
    6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6,
    6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6,
    6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6,
    6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6,
    7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7,
    7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7,
    7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7,
    7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7,
    7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7,
    7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7,
    7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7,
    7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7,
];

/// Encode one signed 16-bit sample as a mu-law byte.
pub fn linear_to_mulaw(sample: i16) -> u8 {
    let mut magnitude = sample as i32;
    let sign: i32 = if magnitude < 0 { 0x80 } else { 0 };
    if sign != 0 {
        magnitude = -magnitude;
    }
    magnitude = magnitude.min(CLIP) + BIAS;

    let exponent = EXPONENT_LUT[((magnitude >> 7) & 0xFF) as usize] as i32;
    let mantissa = (magnitude >> (exponent + 3)) & 0x0F;
    !(sign | (exponent << 4) | mantissa) as u8
}

/// Encode a buffer of little-endian 16-bit samples, one output byte each.
///
/// A trailing odd byte is ignored.
pub fn encode_samples(pcm: &[u8]) -> Vec<u8> {
    let count = pcm.len() / 2;
    let mut out = vec![0u8; count];
    for i in (0..count).rev() {
        let sample = i16::from_le_bytes([pcm[2 * i], pcm[2 * i + 1]]);
        out[i] = linear_to_mulaw(sample);
    }
    out
}
