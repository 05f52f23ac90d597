//! Value handling and ordering for choices

use super::{ChoiceNode, ChoiceValue, Constraints};

/// Check if a choice value is permitted under the given constraints
pub fn choice_permitted(value: &ChoiceValue, constraints: &Constraints) -> bool {
    match (value, constraints) {
        (ChoiceValue::Integer(val), Constraints::Integer(c)) => c.is_valid(*val),
        (ChoiceValue::Boolean(val), Constraints::Boolean(c)) => {
            if c.p <= 0.0 {
                !val
            } else if c.p >= 1.0 {
                *val
            } else {
                true
            }
        }
        _ => false,
    }
}

/// The simplest value permitted by the constraints.
pub fn simplest_choice(constraints: &Constraints) -> ChoiceValue {
    match constraints {
        Constraints::Integer(c) => ChoiceValue::Integer(c.shrink_towards),
        Constraints::Boolean(c) => ChoiceValue::Boolean(c.p >= 1.0),
    }
}

/// Position of a value in shrink order, `0` being the simplest.
///
/// Integers are ordered by distance from `shrink_towards`, with the value
/// above the target before the one below it at equal distance.
pub fn choice_to_index(value: &ChoiceValue, constraints: &Constraints) -> u128 {
    match (value, constraints) {
        (ChoiceValue::Integer(val), Constraints::Integer(c)) => {
            let distance = val.abs_diff(c.shrink_towards);
            if distance == 0 {
                0
            } else if *val > c.shrink_towards {
                distance.saturating_mul(2).saturating_sub(1)
            } else {
                distance.saturating_mul(2)
            }
        }
        (ChoiceValue::Boolean(val), Constraints::Boolean(c)) => {
            if c.p >= 1.0 {
                0
            } else {
                u128::from(*val)
            }
        }
        (ChoiceValue::Integer(val), Constraints::Boolean(_)) => val.unsigned_abs(),
        (ChoiceValue::Boolean(val), Constraints::Integer(_)) => u128::from(*val),
    }
}

/// Sort key of a choice sequence: shorter is simpler, then lexicographic
/// comparison of the choice indices.
pub fn sort_key(nodes: &[ChoiceNode]) -> (usize, Vec<u128>) {
    let indices = nodes
        .iter()
        .map(|node| choice_to_index(&node.value, &node.constraints))
        .collect();
    (nodes.len(), indices)
}
