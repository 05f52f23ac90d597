//! Constraint types attached to every recorded choice

/// Bounds and shrink target for an integer choice.
///
/// Both bounds are inclusive. `shrink_towards` is always kept inside
/// `[min_value, max_value]`; it is the value the shrinker considers simplest
/// and the value replay falls back to when a recorded choice no longer fits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IntegerConstraints {
    /// Minimum value (inclusive).
    pub min_value: i128,

    /// Maximum value (inclusive).
    pub max_value: i128,

    /// Preferred target for shrinking.
    pub shrink_towards: i128,
}

impl IntegerConstraints {
    /// Creates constraints for `[min_value, max_value]`, shrinking towards the
    /// value in range closest to zero.
    pub fn new(min_value: i128, max_value: i128) -> Self {
        Self {
            min_value,
            max_value,
            shrink_towards: 0.clamp(min_value, max_value.max(min_value)),
        }
    }

    /// Replaces the shrink target, clamped into range.
    pub fn with_shrink_towards(mut self, target: i128) -> Self {
        self.shrink_towards = target.clamp(self.min_value, self.max_value.max(self.min_value));
        self
    }

    pub fn is_valid(&self, value: i128) -> bool {
        self.min_value <= value && value <= self.max_value
    }

    /// Number of permitted values, saturating at `u128::MAX`.
    pub fn size(&self) -> u128 {
        if self.max_value < self.min_value {
            return 0;
        }
        self.max_value.abs_diff(self.min_value).saturating_add(1)
    }
}

/// Probability of drawing `true`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BooleanConstraints {
    pub p: f64,
}

impl Default for BooleanConstraints {
    fn default() -> Self {
        Self { p: 0.5 }
    }
}

impl BooleanConstraints {
    pub fn new(p: f64) -> Self {
        let p = if p.is_nan() { 0.5 } else { p.clamp(0.0, 1.0) };
        Self { p }
    }
}
