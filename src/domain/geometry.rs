//! Wheel geometry: slices, pointer and rotation alignment
//!
//! Angles are in radians and grow clockwise on screen (y axis down). Slice
//! `i` of `n` covers `[rotation + slice * i, rotation + slice * (i + 1))`.
//! The pointer is fixed at angle 0, on the right edge of the wheel, pointing
//! inwards. The wheel only ever turns forward (increasing rotation).

use std::f64::consts::TAU;

/// Angular span of one slice for `count` entries
///
/// A zero count is treated as a single full-turn slice.
pub fn slice_angle(count: usize) -> f64 {
    TAU / count.max(1) as f64
}

/// Reduces an unbounded rotation into `[0, 2π)`
pub fn normalize(angle: f64) -> f64 {
    let reduced = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if reduced >= TAU { 0.0 } else { reduced }
}

/// Angle of the midpoint of slice `index`, measured at zero rotation
pub fn slice_midpoint(index: usize, count: usize) -> f64 {
    let slice = slice_angle(count);
    slice * index as f64 + slice / 2.0
}

/// Index of the slice currently under the pointer
///
/// # Returns
/// None for an empty wheel
///
/// The pointer sits at angle 0 (equivalently 2π). Slice `i` is under it
/// when `rotation + slice * i <= 2π < rotation + slice * (i + 1)`, which
/// inverts to `floor((2π - rotation mod 2π) / slice)`.
pub fn segment_at_pointer(rotation: f64, count: usize) -> Option<usize> {
    if count == 0 {
        return None;
    }

    let slice = slice_angle(count);
    let offset = TAU - normalize(rotation);
    let index = (offset / slice).floor() as usize;
    Some(index % count)
}

/// Forward rotation that parks the pointer on `target_angle`
///
/// Turns the wheel `extra_turns` full revolutions and then the remaining
/// distance that brings `target_angle` under the pointer, measured from
/// `start_rotation`. From a zero start this is exactly
/// `extra_turns * 2π + 2π - target_angle`.
pub fn forward_rotation(start_rotation: f64, target_angle: f64, extra_turns: u32) -> f64 {
    let alignment = normalize(TAU - target_angle - start_rotation);
    // A zero alignment only happens when the target already sits under the
    // pointer; keep the extra full turn the zero-start formula would give.
    let alignment = if alignment == 0.0 { TAU } else { alignment };
    f64::from(extra_turns) * TAU + alignment
}

/// Ease-out cubic easing: fast start, gentle stop
pub fn ease_out_cubic(progress: f64) -> f64 {
    let p = progress.clamp(0.0, 1.0);
    1.0 - (1.0 - p).powi(3)
}
