//! Random draws used by the generators and the placement engine.
//!
//! Every random decision in the crate goes through these helpers and an injected
//! [`RngCore`], so callers can seed or script the sequence.
use rand::RngCore;

/// Generate a random float in the range [0, 1).
#[inline]
pub(crate) fn rand01(rng: &mut dyn RngCore) -> f32 {
    (rng.next_u32() >> 8) as f32 * (1.0 / (1u32 << 24) as f32)
}

/// Generate a random float in the range [0, 1) with 53 bits of precision.
#[inline]
pub(crate) fn rand01_f64(rng: &mut dyn RngCore) -> f64 {
    (rng.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
}

/// Uniform float in `[min, max]`.
#[inline]
pub(crate) fn uniform(rng: &mut dyn RngCore, min: f32, max: f32) -> f32 {
    let v = min + rand01(rng) * (max - min);
    v.clamp(min.min(max), min.max(max))
}

/// Uniform integer in the inclusive range `[lo, hi]`. Swapped bounds are reordered.
pub(crate) fn int_inclusive(rng: &mut dyn RngCore, lo: i64, hi: i64) -> i64 {
    let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
    let span = (hi - lo + 1) as f64;
    let offset = (rand01_f64(rng) * span).floor() as i64;
    (lo + offset).min(hi)
}

/// Uniform index into a collection of `len` items. `len` must be non-zero.
#[inline]
pub(crate) fn pick_index(rng: &mut dyn RngCore, len: usize) -> usize {
    debug_assert!(len > 0, "pick_index on empty collection");
    let idx = (rand01_f64(rng) * len as f64) as usize;
    idx.min(len.saturating_sub(1))
}
