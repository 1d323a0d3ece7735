//! Core functionality for hiding an archived virtual filesystem inside the
//! least-significant bits of a lossless raster image.
//!
//! The embedding process:
//! 1. A virtual filesystem (a set of files and folders) is packed into a
//!    single zip blob by the Archive Codec ([`archive`]).
//! 2. A fresh random seed is obtained from the Random Source ([`random`])
//!    and written into the carrier's first pixels (the seed header).
//! 3. The blob, with an end-of-payload delimiter appended, is scattered
//!    across the carrier's remaining pixels using a seeded permutation
//!    ([`permutation`]) and written one bit per color channel ([`embed`]).
//!
//! Extraction ([`extract`]) reverses this: the seed header is read back,
//! the same permutation is regenerated, and payload bits are read until the
//! delimiter reappears in the recovered byte stream.

pub mod archive;
pub mod cli;
pub mod consts;
pub mod embed;
pub mod error;
pub mod image;
pub mod permutation;
pub mod random;

mod extract;

use std::fs;
use std::path::Path;

use log::debug;

pub use crate::error::{StegError, StegResult};
pub use crate::image::ImageFormat;
pub use archive::{Entry, EntryKind, list_vfs, pack_vfs, unpack_vfs};
pub use embed::embed as embed_bytes;
pub use extract::extract as extract_bytes;

/// Embeds `payload` into the image at `image_in_path`, writing the result to
/// `image_out_path`. The output is written atomically: it is first written
/// to a temporary file in the destination directory, then renamed into
/// place, so a concurrent reader never observes a partially written file.
///
/// `image_out_path`'s extension (or, failing that, `image_in_path`'s)
/// determines the output image format.
pub fn embed(
    image_in_path: &Path,
    payload: &[u8],
    image_out_path: &Path,
    use_external_rng: bool,
) -> StegResult<()> {
    let container = fs::read(image_in_path)?;
    let format = output_format(image_out_path, image_in_path)?;

    let stego = embed_bytes(&container, payload, format, use_external_rng)?;

    let out_dir = image_out_path.parent().filter(|p| !p.as_os_str().is_empty());
    let mut temp = tempfile::Builder::new()
        .prefix(".stegapp-")
        .tempfile_in(out_dir.unwrap_or_else(|| Path::new(".")))?;
    {
        use std::io::Write;
        temp.write_all(&stego)?;
        temp.flush()?;
    }
    temp.persist(image_out_path)
        .map_err(|e| StegError::Io(e.error))?;

    debug!(
        "embed: wrote {} bytes to {}",
        stego.len(),
        image_out_path.display()
    );
    Ok(())
}

/// Extracts the payload hidden in the image at `image_in_path`.
pub fn extract(image_in_path: &Path) -> StegResult<Vec<u8>> {
    let container = fs::read(image_in_path)?;
    extract_bytes(&container)
}

/// Alias for [`extract`]; reads the payload hidden in an image without
/// implying anything about what's inside it.
pub fn read_payload(image_in_path: &Path) -> StegResult<Vec<u8>> {
    extract(image_in_path)
}

fn output_format(preferred: &Path, fallback: &Path) -> StegResult<ImageFormat> {
    let from_ext = |p: &Path| -> Option<ImageFormat> {
        p.extension()
            .and_then(|e| e.to_str())
            .and_then(ImageFormat::from_extension)
    };

    from_ext(preferred).or_else(|| from_ext(fallback)).ok_or_else(|| {
        StegError::UnsupportedFormat(format!(
            "could not determine an output format from '{}' or '{}'",
            preferred.display(),
            fallback.display()
        ))
    })
}
