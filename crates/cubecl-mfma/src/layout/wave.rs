//! Splitting thread ids into wave and lane coordinates.

/// Lanes in each half of a wave64.
pub const HALF_WAVE: u32 = 32;

/// Split a linear thread id into `(wave_id, lane_id)`.
pub fn wave_lane(thread: u32, wave_size: u32) -> (u32, u32) {
    (thread / wave_size, thread % wave_size)
}

/// Wave coordinate along the `M` axis of operand A.
///
/// Clipped to the number of instruction tiles along `M`: warps beyond that load the same data as
/// a lower warp.
pub fn wave_m(wave: u32, warps_per_cta: [u32; 2], instr_m: u32, m: u32) -> u32 {
    (wave % warps_per_cta[0]) % (m / instr_m)
}

/// Wave coordinate along the `N` axis of operand B.
pub fn wave_n(wave: u32, warps_per_cta: [u32; 2], instr_n: u32, n: u32) -> u32 {
    let wave_mn = wave / warps_per_cta[0];
    (wave_mn % warps_per_cta[1]) % (n / instr_n)
}
