/// Significant bits kept when compressing observation counts.
pub const COUNT_COMPRESSION_BITS: u32 = 4;

/// Round `value` to the nearest integer expressible with `bit_count`
/// significant bits, ties rounding up.
///
/// Values that already fit in `bit_count` bits are returned unchanged. The
/// mapping is deterministic and monotonic non-decreasing.
pub fn compress_int(value: u32, bit_count: u32) -> u32 {
    debug_assert!(bit_count > 0);
    let significant = u32::BITS - value.leading_zeros();
    if significant <= bit_count {
        return value;
    }
    let shift = significant - bit_count;
    let half = 1u64 << (shift - 1);
    let rounded = ((u64::from(value) + half) >> shift) << shift;
    rounded.min(u64::from(u32::MAX)) as u32
}
