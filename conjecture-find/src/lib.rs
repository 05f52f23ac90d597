//! # conjecture-find
//!
//! Bounded example search in the style of Hypothesis's `find`: draw random
//! candidates from a strategy, return the first one that satisfies a
//! predicate, and shrink it towards a simpler candidate that still does.
//!
//! All randomness flows through typed choices recorded by [`ConjectureData`],
//! so a satisfying candidate can be replayed and shrunk from its choices
//! alone. The [`strategies::distributions`] strategy draws small discrete
//! joint distributions, the candidates this crate was built to search over.
//!
//! ```
//! use conjecture_find::{find, named, distributions};
//!
//! let d = find(
//!     &distributions(2, 2),
//!     &named("three outcomes", |d: &conjecture_find::Distribution| d.len() == 3),
//! )
//! .unwrap();
//! assert_eq!(d.len(), 3);
//! ```

pub mod choice;
pub mod constructors;
pub mod data;
pub mod display;
pub mod distribution;
pub mod distributions;
pub mod engine;
pub mod error;
pub mod predicate;
pub mod shrinking;
pub mod strategies;

pub use choice::{ChoiceNode, ChoiceType, ChoiceValue, Constraints};
pub use constructors::{
    from_mapping, from_partition, insert_rvf, mixture_distribution, modify_outcomes,
    random_distribution, random_scalar_distribution, simplex_grid, simplex_grid_over,
    uniform_distribution, uniform_scalar_distribution, xor, SimplexGrid,
};
pub use data::{ConjectureData, Status};
pub use display::{format_distribution, Cell, DisplayOptions, Table};
pub use distribution::{Alphabet, Distribution, Outcome};
pub use engine::{find, ExampleFinder, FinderStats, Settings};
pub use error::{DistributionError, DrawError, ExhaustionReason, FindError, InvalidArgument};
pub use predicate::{above, below, fallible, named, Predicate};
pub use strategies::{booleans, distributions, integers, just, Strategy};
