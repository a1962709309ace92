/// Largest RGBA8 pixel buffer any canvas may allocate, in bytes (4 GiB)
pub const MAX_CANVAS_BYTES: u64 = 1 << 32;

/// Byte length of a `width`x`height` RGBA8 canvas, or `None` when it is
/// larger than `MAX_CANVAS_BYTES` or cannot be addressed on this platform.
pub fn canvas_bytes(width: u32, height: u32) -> Option<u64> {
    let bytes = u64::from(width)
        .checked_mul(u64::from(height))?
        .checked_mul(4)?;
    (bytes <= MAX_CANVAS_BYTES && usize::try_from(bytes).is_ok()).then_some(bytes)
}

/// `size` extended by `border` on both sides, or `None` on overflow
pub fn grown(size: u32, border: u32) -> Option<u32> {
    border.checked_mul(2)?.checked_add(size)
}
