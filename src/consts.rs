/// The number of bits in a byte.
pub const BITS_PER_BYTE: usize = 8;
/// The number of color channels in an image used for embedding (R, G, B).
pub const EMBEDDABLE_CHANNELS: usize = 3;

/// Fixed end-of-payload sentinel. Archive containers begin with their own
/// magic bytes and never contain this ASCII literal, so it is safe to use
/// as a delimiter without an explicit length prefix.
pub const DELIMITER: &[u8] = b"==STEGAPP_EOF==";

/// Length in bytes of the randomly generated permutation seed.
pub const SEED_LEN: usize = 16;

/// Seed-header layout: a one-byte declared seed length followed by the seed
/// itself. Readers always consume `SEED_LEN` bytes regardless of the
/// declared value, warning if it differs.
pub const SEED_HEADER_LEN: usize = 1 + SEED_LEN;
pub const SEED_HEADER_BITS: usize = SEED_HEADER_LEN * BITS_PER_BYTE;

/// Number of raster-order pixels needed to hold the seed header at three
/// bits per pixel: `ceil(136 / 3) = 46`.
pub const HEADER_PIXELS: usize = (SEED_HEADER_BITS + EMBEDDABLE_CHANNELS - 1) / EMBEDDABLE_CHANNELS;

/// Declared seed length written into the header's first byte.
pub const DECLARED_SEED_LEN: u8 = SEED_LEN as u8;
