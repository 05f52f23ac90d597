// General distribution functions and utilities.
// This module contains weighted coin flips and the repetition control
// used by strategies that draw variable-length collections.

use crate::data::ConjectureData;
use crate::error::DrawError;

/// A boolean that is `true` with probability `p`.
pub fn weighted(data: &mut ConjectureData, p: f64) -> Result<bool, DrawError> {
    data.draw_boolean(p)
}

/// Controls the length of a drawn collection.
///
/// Each element is preceded by one boolean choice saying whether to continue,
/// so deleting an element's choices during shrinking simply shortens the
/// collection. Below `min_count` and at `max_count` the choice is forced.
#[derive(Debug, Clone)]
pub struct Repeat {
    min_count: u64,
    max_count: u64,
    p_continue: f64,

    current_count: u64,
    rejections: u64,
    force_stop: bool,
}

impl Repeat {
    pub fn new(min_count: u64, max_count: u64, expected_count: f64) -> Repeat {
        Repeat {
            min_count,
            max_count,
            p_continue: 1.0 - 1.0 / (1.0 + expected_count),
            current_count: 0,
            rejections: 0,
            force_stop: false,
        }
    }

    /// The average size Hypothesis uses when none is given.
    pub fn default_expected_count(min_count: u64, max_count: u64) -> f64 {
        let min = min_count as f64;
        let max = max_count as f64;
        (2.0 * min).max(min + 5.0).min(0.5 * (min + max))
    }

    pub fn count(&self) -> u64 {
        self.current_count
    }

    /// Undo the last accepted element.
    ///
    /// After too many rejections the collection stops growing; if it is still
    /// below `min_count` at that point the whole draw is rejected.
    pub fn reject(&mut self, data: &mut ConjectureData) -> Result<(), DrawError> {
        assert!(self.current_count > 0);
        self.current_count -= 1;
        self.rejections += 1;
        if self.rejections > 3u64.max(2 * self.current_count) {
            if self.current_count < self.min_count {
                return Err(data.reject());
            }
            self.force_stop = true;
        }
        Ok(())
    }

    pub fn should_continue(&mut self, data: &mut ConjectureData) -> Result<bool, DrawError> {
        if self.min_count == self.max_count {
            if self.current_count < self.max_count {
                self.current_count += 1;
                return Ok(true);
            } else {
                return Ok(false);
            }
        } else if self.force_stop || self.current_count >= self.max_count {
            data.draw_boolean_forced(false)?;
            return Ok(false);
        } else if self.current_count < self.min_count {
            data.draw_boolean_forced(true)?;
            self.current_count += 1;
            return Ok(true);
        }

        let result = weighted(data, self.p_continue)?;
        if result {
            self.current_count += 1;
        }
        Ok(result)
    }
}
