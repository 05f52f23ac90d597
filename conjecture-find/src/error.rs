//! Error types for searches, draws and distribution construction

use crate::choice::ChoiceType;
use thiserror::Error;

/// Why a search stopped without finding a satisfying candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExhaustionReason {
    /// `Settings::max_examples` draws were made.
    MaxExamples,
    /// `Settings::deadline` elapsed.
    Deadline,
    /// A finite candidate sequence ran out.
    GeneratorExhausted,
    /// The generator rejected more than `Settings::max_invalid` draws.
    TooManyInvalid,
    /// Every draw ran past `Settings::max_choices`.
    Overrun,
}

impl std::fmt::Display for ExhaustionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExhaustionReason::MaxExamples => write!(f, "draw budget exhausted"),
            ExhaustionReason::Deadline => write!(f, "deadline exceeded"),
            ExhaustionReason::GeneratorExhausted => write!(f, "generator exhausted"),
            ExhaustionReason::TooManyInvalid => write!(f, "too many invalid draws"),
            ExhaustionReason::Overrun => write!(f, "every draw overran max_choices"),
        }
    }
}

/// Outcome of a failed search.
///
/// `NoExampleFound` is an expected result for unsatisfiable predicates and is
/// kept separate from configuration errors. Errors raised by the predicate are
/// carried unmodified in `Predicate`.
#[derive(Debug, Error)]
pub enum FindError<E> {
    #[error("no example found satisfying `{predicate}` after {draws} draws ({reason})")]
    NoExampleFound {
        predicate: String,
        draws: u64,
        reason: ExhaustionReason,
    },

    #[error("invalid generator: {0}")]
    InvalidGenerator(#[from] InvalidArgument),

    #[error("predicate failed: {0}")]
    Predicate(#[source] E),
}

impl<E> FindError<E> {
    pub fn is_no_example_found(&self) -> bool {
        matches!(self, FindError::NoExampleFound { .. })
    }

    pub fn is_invalid_generator(&self) -> bool {
        matches!(self, FindError::InvalidGenerator(_))
    }

    /// The predicate's own error, if that is what stopped the search.
    pub fn into_predicate_error(self) -> Option<E> {
        match self {
            FindError::Predicate(e) => Some(e),
            _ => None,
        }
    }
}

/// Malformed generator or search configuration, detected before any draw.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidArgument {
    #[error("size must be positive")]
    ZeroSize,

    #[error("alphabet of variable {variable} must be positive")]
    ZeroAlphabet { variable: usize },

    #[error("expected {expected} alphabets, got {found}")]
    AlphabetMismatch { expected: usize, found: usize },

    #[error("min_events={min_events} exceeds the {outcomes} possible outcomes")]
    MinEventsTooLarge { min_events: usize, outcomes: usize },

    #[error("empty range [{min}, {max}]")]
    EmptyRange { min: i128, max: i128 },

    #[error("max_examples must be positive")]
    ZeroMaxExamples,

    #[error("grid base must be positive")]
    ZeroBase,

    #[error("grid of {base}^{depth} points is too large")]
    GridTooLarge { base: u64, depth: u32 },
}

/// Why a single draw could not produce a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DrawError {
    #[error("draw ran past the available choices")]
    Overrun,

    #[error("draw attempted on frozen data")]
    Frozen,

    #[error("draw rejected by the generator")]
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ChoiceError {
    #[error("cannot modify forced nodes")]
    ForcedNode,

    #[error("expected a {expected} value, got {found}")]
    TypeMismatch {
        expected: ChoiceType,
        found: ChoiceType,
    },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DistributionError {
    #[error("outcome and pmf lengths differ ({outcomes} vs {pmf})")]
    LengthMismatch { outcomes: usize, pmf: usize },

    #[error("outcome {outcome:?} does not have length {expected}")]
    OutcomeLength { outcome: Vec<usize>, expected: usize },

    #[error("outcome {outcome:?} lies outside the alphabets {alphabets:?}")]
    OutcomeOutOfRange {
        outcome: Vec<usize>,
        alphabets: Vec<usize>,
    },

    #[error("duplicate outcome {0:?}")]
    DuplicateOutcome(Vec<usize>),

    #[error("invalid probability {0}")]
    InvalidProbability(f64),

    #[error("probabilities sum to {0}, not 1")]
    InvalidNormalization(f64),

    #[error("distribution has no outcomes")]
    Empty,

    #[error("incompatible sample spaces: {0:?} vs {1:?}")]
    IncompatibleAlphabets(Vec<usize>, Vec<usize>),

    #[error("{dists} distributions but {weights} weights")]
    WeightCount { dists: usize, weights: usize },

    #[error("variable index {index} out of range for outcome length {length}")]
    IndexOutOfRange { index: usize, length: usize },

    #[error("expected {expected} concentration parameters, got {found}")]
    ConcentrationCount { expected: usize, found: usize },

    #[error("concentration parameter {0} must be positive and finite")]
    InvalidConcentration(f64),

    #[error("outcome {0:?} has no assigned value")]
    Unmapped(Vec<usize>),

    #[error(transparent)]
    InvalidArgument(#[from] InvalidArgument),
}
