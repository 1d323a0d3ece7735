use log::debug;

use super::consts::*;
use super::error::*;
use super::image::*;
use super::permutation::draw_without_replacement;
use super::random::random_bytes;

/// Embeds `payload` into `container` using seed-header + permuted-pixel LSB
/// steganography.
///
/// [`DELIMITER`] is appended to the payload before embedding; a fresh
/// 16-byte seed is drawn from the Random Source and written raster-order
/// into the carrier's first [`HEADER_PIXELS`] pixels, then the remaining
/// pixels are sampled without replacement (seeded by that value) to decide
/// where the payload bits land.
///
/// # Errors
///
/// * [`StegError::UnsupportedFormat`] if `format` is not a lossless format.
/// * [`StegError::ImageTooSmall`] if the carrier can't even hold the header.
/// * [`StegError::CapacityExceeded`] if the container cannot hold the header
///   plus the payload and its delimiter.
pub fn embed(
    container: &[u8],
    payload: &[u8],
    format: ImageFormat,
    use_external_rng: bool,
) -> StegResult<Vec<u8>> {
    if !LOSSLESS_FORMATS.contains(&format) {
        return Err(StegError::UnsupportedFormat(format!(
            "format {:?} is not accepted for stego output",
            format
        )));
    }

    let mut full_payload = Vec::with_capacity(payload.len() + DELIMITER.len());
    full_payload.extend_from_slice(payload);
    full_payload.extend_from_slice(DELIMITER);

    // Potential overflow when calculating payload_bits
    let payload_bits = full_payload.len().checked_mul(BITS_PER_BYTE).ok_or_else(|| {
        StegError::CalculationOverflow(format!(
            "overflow calculating payload_bits: full_payload.len() ({}) * BITS_PER_BYTE ({})",
            full_payload.len(),
            BITS_PER_BYTE
        ))
    })?;
    let payload_pixels = payload_bits.div_ceil(EMBEDDABLE_CHANNELS);

    debug!(
        "embed: payload {} bytes + delimiter = {} bytes ({} bits, {} pixels)",
        payload.len(),
        full_payload.len(),
        payload_bits,
        payload_pixels
    );

    let mut image = decode(container)?;
    let total_pixels = pixel_count(&image)?;

    if total_pixels < HEADER_PIXELS {
        return Err(StegError::ImageTooSmall(format!(
            "carrier has {} pixels; the seed header alone needs {}",
            total_pixels, HEADER_PIXELS
        )));
    }
    if HEADER_PIXELS + payload_pixels > total_pixels {
        return Err(StegError::CapacityExceeded(format!(
            "carrier has {} pixels; needs {} for the header and {} for the payload",
            total_pixels, HEADER_PIXELS, payload_pixels
        )));
    }

    let seed = random_bytes(SEED_LEN, use_external_rng);

    let mut header = Vec::with_capacity(SEED_HEADER_LEN);
    header.push(DECLARED_SEED_LEN);
    header.extend_from_slice(&seed);

    let header_seq: Vec<usize> = (0..HEADER_PIXELS).collect();
    write_bits(&mut image, &bits_msb_first(&header), &header_seq);

    let seq = draw_without_replacement(&seed, HEADER_PIXELS, total_pixels, payload_pixels);
    write_bits(&mut image, &bits_msb_first(&full_payload), &seq);

    encode(&image, format)
}

/// Writes `bits` (each either `0` or `1`) three at a time into the R, G, B
/// LSBs of the pixels named by `seq`, in order. A final partial group of
/// fewer than three bits leaves the untouched channels' LSBs as-is.
fn write_bits(image: &mut RgbImage, bits: &[u8], seq: &[usize]) {
    let width = image.width();
    for (chunk, &flat) in bits.chunks(EMBEDDABLE_CHANNELS).zip(seq.iter()) {
        let (row, col) = (flat as u32 / width, flat as u32 % width);
        let pixel = image.get_pixel_mut(col, row);
        for (channel, &bit) in chunk.iter().enumerate() {
            pixel[channel] = (pixel[channel] & 0xFE) | bit;
        }
    }
}

/// Expands `data` into one byte (0 or 1) per bit, most-significant bit of
/// byte 0 first.
pub(crate) fn bits_msb_first(data: &[u8]) -> Vec<u8> {
    let mut bits = Vec::with_capacity(data.len() * BITS_PER_BYTE);
    for &byte in data {
        for shift in (0..BITS_PER_BYTE).rev() {
            bits.push((byte >> shift) & 1);
        }
    }
    bits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::extract;

    fn solid_image(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, image::Rgb([255, 255, 255]));
        let mut buf = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn embed_rejects_lossy_output_format() {
        let container = solid_image(100, 100);
        let result = embed(&container, b"hi", ImageFormat::Jpeg, false);
        assert!(matches!(result, Err(StegError::UnsupportedFormat(_))));
    }

    #[test]
    fn embed_rejects_when_capacity_exceeded() {
        let container = solid_image(50, 50);
        let payload = vec![0u8; 10_000];
        let result = embed(&container, &payload, ImageFormat::Png, false);
        assert!(matches!(result, Err(StegError::CapacityExceeded(_))));
    }

    #[test]
    fn embed_rejects_carrier_too_small_for_header() {
        let container = solid_image(5, 5);
        let result = embed(&container, b"x", ImageFormat::Png, false);
        assert!(matches!(result, Err(StegError::ImageTooSmall(_))));
    }

    #[test]
    fn embed_rejects_nonempty_payload_on_a_carrier_exactly_header_sized() {
        // 46 pixels holds the seed header exactly (HEADER_PIXELS), leaving
        // no room at all for payload pixels: any non-empty payload must
        // fail CapacityExceeded rather than ImageTooSmall.
        let container = solid_image(HEADER_PIXELS as u32, 1);
        let result = embed(&container, b"x", ImageFormat::Png, false);
        assert!(matches!(result, Err(StegError::CapacityExceeded(_))));
    }

    #[test]
    fn embed_then_extract_round_trips_empty_payload() {
        let container = solid_image(20, 20);
        let stego = embed(&container, b"", ImageFormat::Png, false).unwrap();
        let extracted = extract(&stego).unwrap();
        assert_eq!(extracted, Vec::<u8>::new());
    }

    #[test]
    fn embed_then_extract_round_trips_binary_payload() {
        let container = solid_image(64, 64);
        let payload: Vec<u8> = (0..=255u8).collect();
        let stego = embed(&container, &payload, ImageFormat::Png, false).unwrap();
        let extracted = extract(&stego).unwrap();
        assert_eq!(extracted, payload);
    }
}
