use std::io::Cursor;

use super::error::{StegError, StegResult};
use image::ImageReader;
pub use image::{ImageFormat, RgbImage};

/// Image formats accepted for stego output: lossless raster containers only.
/// PNG, BMP, and (non-JPEG-compressed) TIFF preserve LSBs exactly; any other
/// format risks silently destroying the embedded payload on re-encode.
pub const LOSSLESS_FORMATS: [ImageFormat; 3] =
    [ImageFormat::Png, ImageFormat::Bmp, ImageFormat::Tiff];

pub(crate) fn decode(container: &[u8]) -> StegResult<RgbImage> {
    let container_reader = ImageReader::new(Cursor::new(container)).with_guessed_format()?;
    let image = container_reader.decode()?.to_rgb8();
    Ok(image)
}

/// Format validity is checked once, at the public `embed()` entry point,
/// before any decoding happens; `encode()` trusts that gate.
pub(crate) fn encode(image: &RgbImage, format: ImageFormat) -> StegResult<Vec<u8>> {
    let mut output = Vec::new();
    let mut cursor = Cursor::new(&mut output);
    image.write_to(&mut cursor, format)?;
    Ok(output)
}

/// Total pixel count of `image`, guarding the width*height multiplication
/// against overflow the way the teacher guards its own capacity arithmetic.
pub(crate) fn pixel_count(image: &RgbImage) -> StegResult<usize> {
    (image.width() as usize)
        .checked_mul(image.height() as usize)
        .ok_or_else(|| {
            StegError::CalculationOverflow(format!(
                "overflow calculating pixel count: width ({}) * height ({})",
                image.width(),
                image.height()
            ))
        })
}
