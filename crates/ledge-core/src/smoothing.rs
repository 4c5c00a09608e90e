//! Critically damped smoothing for horizontal velocity.
//!
//! [`smooth_damp`] moves a value toward a target along a critically damped
//! spring, using the polynomial approximation of `exp(-x)` from Game
//! Programming Gems 4 ("Critically Damped Ease-In/Ease-Out Smoothing"). The
//! caller owns the spring's velocity and must carry it between calls.

/// Smallest smoothing time accepted; shorter times are clamped up to this.
pub const MIN_SMOOTH_TIME: f32 = 1e-4;

/// Move `current` toward `target`, returning the new value.
///
/// `velocity` is the spring's rate of change and is updated in place.
/// `smooth_time` is roughly the time to reach the target. The result never
/// overshoots `target`; if it would, the target is returned and `velocity` is
/// zeroed.
///
/// Unlike Unity's `SmoothDamp`, a call that starts exactly on `target` also
/// settles there and zeroes `velocity`, even when the spring still carries
/// velocity. Unity's overshoot check would let such a call drift past the
/// target.
///
/// # Example
///
/// ```
/// use ledge_core::smoothing::smooth_damp;
///
/// let mut velocity = 0.0;
/// let mut x = 0.0;
/// for _ in 0..200 {
///     x = smooth_damp(x, 8.0, &mut velocity, 0.05, 0.02);
/// }
/// assert!((x - 8.0).abs() < 1e-3);
/// ```
#[must_use]
pub fn smooth_damp(current: f32, target: f32, velocity: &mut f32, smooth_time: f32, dt: f32) -> f32 {
    let smooth_time = smooth_time.max(MIN_SMOOTH_TIME);
    let omega = 2.0 / smooth_time;

    let x = omega * dt;
    let decay = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

    let change = current - target;
    let temp = (*velocity + omega * change) * dt;
    *velocity = (*velocity - omega * temp) * decay;
    let mut output = target + (change + temp) * decay;

    // Crossed the target this step, or was already on it: settle.
    let settled = if current < target {
        output >= target
    } else if current > target {
        output <= target
    } else {
        true
    };
    if settled {
        output = target;
        *velocity = 0.0;
    }

    output
}
