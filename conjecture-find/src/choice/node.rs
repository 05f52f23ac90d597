//! ChoiceNode implementation - the record of a single drawn choice

use super::{ChoiceType, ChoiceValue, Constraints};
use crate::error::ChoiceError;

/// A single choice made during a draw
#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceNode {
    pub choice_type: ChoiceType,
    pub value: ChoiceValue,
    pub constraints: Constraints,
    pub was_forced: bool,
}

impl ChoiceNode {
    pub fn new(
        choice_type: ChoiceType,
        value: ChoiceValue,
        constraints: Constraints,
        was_forced: bool,
    ) -> Self {
        Self {
            choice_type,
            value,
            constraints,
            was_forced,
        }
    }

    /// Copy this node with a new value.
    ///
    /// Forced nodes carry a value the strategy insisted on, so they cannot be
    /// modified.
    pub fn copy_with_value(&self, new_value: ChoiceValue) -> Result<Self, ChoiceError> {
        if self.was_forced {
            return Err(ChoiceError::ForcedNode);
        }
        if new_value.choice_type() != self.choice_type {
            return Err(ChoiceError::TypeMismatch {
                expected: self.choice_type,
                found: new_value.choice_type(),
            });
        }
        Ok(Self {
            value: new_value,
            ..self.clone()
        })
    }

    /// A node is trivial when shrinking cannot make it any simpler.
    pub fn trivial(&self) -> bool {
        self.was_forced || super::choice_to_index(&self.value, &self.constraints) == 0
    }
}
