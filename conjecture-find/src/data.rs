//! # ConjectureData: the source of every random decision
//!
//! A `ConjectureData` is handed to a strategy for exactly one draw. It is
//! either backed by a seeded ChaCha8 generator, or replays a previously
//! recorded prefix of choices. Every draw records a [`ChoiceNode`], so the
//! value a strategy produced can be reproduced later from the nodes alone.
//! This is what the shrinker relies on: it edits the recorded nodes and asks
//! the strategy to draw again from the edited prefix.
//!
//! Replay is lenient. When the k-th draw asks for a different type than the
//! k-th recorded node, or the recorded value no longer satisfies the new
//! constraints, the simplest permitted value is used instead. A non-forced
//! draw past the end of the prefix is an overrun.

use crate::choice::{
    choice_permitted, simplest_choice, BooleanConstraints, ChoiceNode, ChoiceType, ChoiceValue,
    Constraints, IntegerConstraints,
};
use crate::error::DrawError;
use log::trace;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Default cap on the number of choices a single draw may make.
pub const DEFAULT_MAX_CHOICES: usize = 8 * 1024;

/// Status of a draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Status {
    /// Ran past the available choices
    Overrun,
    /// Rejected by the generator
    Invalid,
    /// Completed normally
    Valid,
    /// Completed and satisfied the predicate
    Interesting,
}

#[derive(Debug)]
enum Source {
    Random(ChaCha8Rng),
    Replay(Vec<ChoiceValue>),
}

#[derive(Debug)]
pub struct ConjectureData {
    source: Source,
    nodes: Vec<ChoiceNode>,
    max_choices: usize,
    status: Status,
    frozen: bool,
}

impl ConjectureData {
    /// Random data seeded with `seed`.
    pub fn new(seed: u64) -> Self {
        Self::with_source(Source::Random(ChaCha8Rng::seed_from_u64(seed)))
    }

    /// Data that replays the values of `prefix` in order.
    pub fn for_choices(prefix: &[ChoiceNode]) -> Self {
        Self::with_source(Source::Replay(prefix.iter().map(|node| node.value).collect()))
    }

    fn with_source(source: Source) -> Self {
        Self {
            source,
            nodes: Vec::new(),
            max_choices: DEFAULT_MAX_CHOICES,
            status: Status::Valid,
            frozen: false,
        }
    }

    pub fn with_max_choices(mut self, max_choices: usize) -> Self {
        self.max_choices = max_choices;
        self
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn nodes(&self) -> &[ChoiceNode] {
        &self.nodes
    }

    pub fn into_nodes(self) -> Vec<ChoiceNode> {
        self.nodes
    }

    pub fn mark_interesting(&mut self) {
        self.status = Status::Interesting;
    }

    /// End the draw. Further draws fail with [`DrawError::Frozen`].
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    /// Reject the current draw.
    pub fn reject(&mut self) -> DrawError {
        self.status = Status::Invalid;
        self.frozen = true;
        DrawError::Rejected
    }

    /// Reject the current draw unless `condition` holds.
    pub fn assume(&mut self, condition: bool) -> Result<(), DrawError> {
        if condition {
            Ok(())
        } else {
            Err(self.reject())
        }
    }

    /// Draw an integer in `[min_value, max_value]`.
    pub fn draw_integer(&mut self, min_value: i128, max_value: i128) -> Result<i128, DrawError> {
        if max_value < min_value {
            return Err(self.reject());
        }
        let constraints = IntegerConstraints::new(min_value, max_value);
        match self.draw(Constraints::Integer(constraints), None)? {
            ChoiceValue::Integer(value) => Ok(value),
            ChoiceValue::Boolean(_) => unreachable!("integer constraints yield integer choices"),
        }
    }

    /// Draw a boolean that is `true` with probability `p`.
    pub fn draw_boolean(&mut self, p: f64) -> Result<bool, DrawError> {
        let constraints = BooleanConstraints::new(p);
        match self.draw(Constraints::Boolean(constraints), None)? {
            ChoiceValue::Boolean(value) => Ok(value),
            ChoiceValue::Integer(_) => unreachable!("boolean constraints yield boolean choices"),
        }
    }

    /// Record a boolean whose value the strategy has already decided.
    pub fn draw_boolean_forced(&mut self, value: bool) -> Result<bool, DrawError> {
        let constraints = BooleanConstraints::new(if value { 1.0 } else { 0.0 });
        self.draw(
            Constraints::Boolean(constraints),
            Some(ChoiceValue::Boolean(value)),
        )?;
        Ok(value)
    }

    fn draw(
        &mut self,
        constraints: Constraints,
        forced: Option<ChoiceValue>,
    ) -> Result<ChoiceValue, DrawError> {
        if self.frozen {
            return Err(DrawError::Frozen);
        }
        if self.nodes.len() >= self.max_choices {
            return Err(self.overrun());
        }

        let value = match forced {
            Some(value) => value,
            None => match self.next_value(&constraints) {
                Some(value) => value,
                None => return Err(self.overrun()),
            },
        };

        let choice_type: ChoiceType = constraints.choice_type();
        self.nodes.push(ChoiceNode::new(
            choice_type,
            value,
            constraints,
            forced.is_some(),
        ));
        Ok(value)
    }

    fn next_value(&mut self, constraints: &Constraints) -> Option<ChoiceValue> {
        let index = self.nodes.len();
        match &mut self.source {
            Source::Random(rng) => Some(random_choice(rng, constraints)),
            Source::Replay(prefix) => {
                let recorded = *prefix.get(index)?;
                if recorded.choice_type() == constraints.choice_type()
                    && choice_permitted(&recorded, constraints)
                {
                    Some(recorded)
                } else {
                    trace!(
                        "replay: choice {} ({:?}) misaligned with {:?}",
                        index,
                        recorded,
                        constraints
                    );
                    Some(simplest_choice(constraints))
                }
            }
        }
    }

    fn overrun(&mut self) -> DrawError {
        self.status = Status::Overrun;
        self.frozen = true;
        DrawError::Overrun
    }
}

fn random_choice(rng: &mut ChaCha8Rng, constraints: &Constraints) -> ChoiceValue {
    match constraints {
        Constraints::Integer(c) => ChoiceValue::Integer(rng.gen_range(c.min_value..=c.max_value)),
        Constraints::Boolean(c) => {
            let value = if c.p <= 0.0 {
                false
            } else if c.p >= 1.0 {
                true
            } else {
                rng.gen_bool(c.p)
            };
            ChoiceValue::Boolean(value)
        }
    }
}
