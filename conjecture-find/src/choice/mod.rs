//! Choice system for the search engine
//!
//! Every random decision a strategy makes flows through a typed choice with
//! associated constraints. Recording those choices is what makes a draw
//! replayable and shrinkable.

mod constraints;
mod node;
mod values;

pub use constraints::*;
pub use node::*;
pub use values::*;

/// Choice types that can be drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChoiceType {
    Integer,
    Boolean,
}

impl std::fmt::Display for ChoiceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChoiceType::Integer => write!(f, "integer"),
            ChoiceType::Boolean => write!(f, "boolean"),
        }
    }
}

/// Choice value that can be drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChoiceValue {
    Integer(i128),
    Boolean(bool),
}

impl ChoiceValue {
    pub fn choice_type(&self) -> ChoiceType {
        match self {
            ChoiceValue::Integer(_) => ChoiceType::Integer,
            ChoiceValue::Boolean(_) => ChoiceType::Boolean,
        }
    }
}

/// Constraints for different choice types
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Constraints {
    Integer(IntegerConstraints),
    Boolean(BooleanConstraints),
}

impl Constraints {
    pub fn choice_type(&self) -> ChoiceType {
        match self {
            Constraints::Integer(_) => ChoiceType::Integer,
            Constraints::Boolean(_) => ChoiceType::Boolean,
        }
    }
}
