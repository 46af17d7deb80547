//! Linear range mapping
//!
//! Pulse-width to normalized conversions. [`dual_map`] splits the input range
//! at an idle point so that the idle pulse lands exactly on the idle output
//! even when the receiver's neutral is not centered.

/// Linear map of `x` from `[x_min, x_max]` onto `[y_min, y_max]`
///
/// Not clamped: inputs outside the source range extrapolate. A zero-width
/// source range returns `y_min`.
pub fn map_range(x: f32, x_min: f32, x_max: f32, y_min: f32, y_max: f32) -> f32 {
    let x_range = x_max - x_min;
    if x_range == 0.0 {
        return y_min;
    }
    (x - x_min) * (y_max - y_min) / x_range + y_min
}

/// Two-piece linear map around an idle point
///
/// - `x < in_idle`: `[in_min, in_idle]` → `[out_min, out_idle]`
/// - `x > in_idle`: `[in_idle, in_max]` → `[out_idle, out_max]`
/// - `x == in_idle`: exactly `out_idle`
pub fn dual_map(
    x: f32,
    in_min: f32,
    in_idle: f32,
    in_max: f32,
    out_min: f32,
    out_idle: f32,
    out_max: f32,
) -> f32 {
    if x < in_idle {
        map_range(x, in_min, in_idle, out_min, out_idle)
    } else if x > in_idle {
        map_range(x, in_idle, in_max, out_idle, out_max)
    } else {
        out_idle
    }
}

/// Pulse-width input range (microseconds)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PwmRange {
    pub min: i32,
    pub max: i32,
}

impl PwmRange {
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    /// Single linear map over the whole range into [-1, 1], clamped
    pub fn normalize(&self, pulse: i32) -> f32 {
        map_range(pulse as f32, self.min as f32, self.max as f32, -1.0, 1.0).clamp(-1.0, 1.0)
    }

    /// Two-piece map around `idle` into [-1, 0, 1], clamped
    pub fn normalize_around(&self, pulse: i32, idle: i32) -> f32 {
        dual_map(
            pulse as f32,
            self.min as f32,
            idle as f32,
            self.max as f32,
            -1.0,
            0.0,
            1.0,
        )
        .clamp(-1.0, 1.0)
    }
}

impl Default for PwmRange {
    fn default() -> Self {
        Self::new(1000, 2000)
    }
}
