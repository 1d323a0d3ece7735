use log::{debug, warn};

use super::consts::*;
use super::error::*;
use super::image::*;
use super::permutation::draw_without_replacement;

/// Recovers the payload previously hidden in `container` by [`super::embed`].
///
/// Reads the seed header back out of the carrier's first [`HEADER_PIXELS`]
/// pixels, regenerates the same without-replacement draw over the remaining
/// pixels, and reads payload bits in that order until [`DELIMITER`] is seen
/// in the recovered byte stream. The delimiter itself is not included in the
/// returned bytes.
///
/// # Errors
///
/// * [`StegError::ImageTooSmall`] if the carrier can't even hold the header.
/// * [`StegError::DelimiterNotFound`] if the draw is exhausted without ever
///   matching [`DELIMITER`].
pub fn extract(container: &[u8]) -> StegResult<Vec<u8>> {
    let image = decode(container)?;
    let total_pixels = pixel_count(&image)?;

    if total_pixels < HEADER_PIXELS {
        return Err(StegError::ImageTooSmall(format!(
            "carrier has {} pixels; the seed header alone needs {}",
            total_pixels, HEADER_PIXELS
        )));
    }

    let header_seq: Vec<usize> = (0..HEADER_PIXELS).collect();
    let header_bits = read_bits(&image, &header_seq, SEED_HEADER_BITS);
    let header = bits_to_bytes(&header_bits);

    let declared_len = header[0] as usize;
    if declared_len != SEED_LEN {
        warn!(
            "extract: declared seed length {} differs from the {} bytes actually read",
            declared_len, SEED_LEN
        );
    }
    let seed = &header[1..1 + SEED_LEN];
    debug!("extract: recovered seed header, scanning for delimiter");

    let remaining = total_pixels - HEADER_PIXELS;
    let seq = draw_without_replacement(seed, HEADER_PIXELS, total_pixels, remaining);

    scan_for_delimiter(&image, &seq)
}

/// Reads payload bits pixel-by-pixel (in draw order) until [`DELIMITER`] is
/// found in the reconstructed byte stream, then returns everything before it.
fn scan_for_delimiter(image: &RgbImage, seq: &[usize]) -> StegResult<Vec<u8>> {
    let width = image.width();
    let mut bit_buffer: Vec<u8> = Vec::with_capacity(EMBEDDABLE_CHANNELS);
    let mut bytes: Vec<u8> = Vec::new();

    for &flat in seq {
        let (row, col) = (flat as u32 / width, flat as u32 % width);
        let pixel = image.get_pixel(col, row);

        for channel in 0..EMBEDDABLE_CHANNELS {
            bit_buffer.push(pixel[channel] & 1);
            if bit_buffer.len() == BITS_PER_BYTE {
                let byte = bits_to_bytes(&bit_buffer)[0];
                bytes.push(byte);
                bit_buffer.clear();

                if bytes.len() >= DELIMITER.len()
                    && &bytes[bytes.len() - DELIMITER.len()..] == DELIMITER
                {
                    bytes.truncate(bytes.len() - DELIMITER.len());
                    debug!("extract: delimiter found, payload is {} bytes", bytes.len());
                    return Ok(bytes);
                }
            }
        }
    }

    Err(StegError::DelimiterNotFound)
}

/// Packs a slice of 0/1 bytes, most-significant bit first, into bytes.
/// `bits.len()` need not be a multiple of 8: a trailing partial byte is
/// left-shifted as if padded with zero bits.
fn bits_to_bytes(bits: &[u8]) -> Vec<u8> {
    bits.chunks(BITS_PER_BYTE)
        .map(|chunk| {
            chunk
                .iter()
                .fold(0u8, |acc, &bit| (acc << 1) | (bit & 1))
                << (BITS_PER_BYTE - chunk.len())
        })
        .collect()
}

/// Reads exactly `n_bits` bits, three at a time (R, G, B), from the pixels
/// named by `seq`, in order.
fn read_bits(image: &RgbImage, seq: &[usize], n_bits: usize) -> Vec<u8> {
    let width = image.width();
    let mut bits = Vec::with_capacity(n_bits);

    'outer: for &flat in seq {
        let (row, col) = (flat as u32 / width, flat as u32 % width);
        let pixel = image.get_pixel(col, row);
        for channel in 0..EMBEDDABLE_CHANNELS {
            if bits.len() == n_bits {
                break 'outer;
            }
            bits.push(pixel[channel] & 1);
        }
    }
    bits
}
