//! Easing curves
//!
//! Pure functions of normalized progress. Input is clamped to `0.0..=1.0`,
//! so every curve maps 0 to 0 and 1 to 1.

/// Easing curve applied to animation progress
pub type Easing = fn(f32) -> f32;

#[inline]
fn unit(progress: f32) -> f32 {
    if progress.is_nan() {
        return 0.0;
    }
    progress.clamp(0.0, 1.0)
}

/// No easing
pub fn linear(progress: f32) -> f32 {
    unit(progress)
}

/// Ease in quadratic
pub fn quadratic_in(progress: f32) -> f32 {
    let t = unit(progress);
    t * t
}

/// Ease out quadratic
pub fn quadratic_out(progress: f32) -> f32 {
    let t = unit(progress);
    -t * (t - 2.0)
}

/// Ease in out quadratic
pub fn quadratic_in_out(progress: f32) -> f32 {
    let t = unit(progress) * 2.0;
    if t < 1.0 {
        return 0.5 * t * t;
    }
    let t = t - 1.0;
    -0.5 * (t * (t - 2.0) - 1.0)
}

/// Ease in cubic
pub fn cubic_in(progress: f32) -> f32 {
    let t = unit(progress);
    t * t * t
}

/// Ease out cubic
pub fn cubic_out(progress: f32) -> f32 {
    let t = unit(progress) - 1.0;
    t * t * t + 1.0
}

/// Ease in out cubic
pub fn cubic_in_out(progress: f32) -> f32 {
    let t = unit(progress) * 2.0;
    if t < 1.0 {
        return 0.5 * t * t * t;
    }
    let t = t - 2.0;
    0.5 * (t * t * t + 2.0)
}

/// Interpolate between `from` and `to` with an eased progress
///
/// Returns `to` exactly once progress reaches 1.0.
pub fn interpolate(from: f32, to: f32, progress: f32, easing: Easing) -> f32 {
    if progress >= 1.0 {
        return to;
    }
    from + (to - from) * easing(progress)
}
