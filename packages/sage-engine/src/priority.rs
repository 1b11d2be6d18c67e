use sage_domain::{MAX_PRIORITY, MIN_PRIORITY};

/// Linear curve: `1.0` at priority 1, plus `step` per level, so `1.9` at priority 10 with the
/// default step.
///
/// Out-of-range priorities clamp to `[1, 10]` and a negative or NaN step acts as zero, which keeps
/// the curve non-decreasing for any input. While the curve stays below `2.0`, priority cannot make
/// one matched keyword outrank two.
pub fn priority_multiplier(priority: u8, step: f32) -> f32 {
	let level = priority.clamp(MIN_PRIORITY, MAX_PRIORITY) - MIN_PRIORITY;

	1.0 + f32::from(level) * step.max(0.0)
}
