//! Strategies: restartable generators of candidate values.
//!
//! A strategy draws a value from a [`ConjectureData`]. Because every random
//! decision goes through the data, drawing again from the same seed or from
//! the same recorded choices reproduces the same value, which is what lets
//! the engine shrink a satisfying candidate.

use crate::data::ConjectureData;
use crate::distribution::{Alphabet, Distribution, Outcome};
use crate::distributions::Repeat;
use crate::error::{DrawError, InvalidArgument};
use std::collections::HashSet;

/// Largest integer weight drawn for a non-uniform distribution.
pub const MAX_WEIGHT: i128 = 100;

pub trait Strategy {
    type Value;

    /// Check the configuration before anything is drawn.
    fn validate(&self) -> Result<(), InvalidArgument> {
        Ok(())
    }

    fn draw(&self, data: &mut ConjectureData) -> Result<Self::Value, DrawError>;

    fn map<T, F>(self, f: F) -> Map<Self, F>
    where
        Self: Sized,
        F: Fn(Self::Value) -> T,
    {
        Map { inner: self, f }
    }
}

impl<S: Strategy + ?Sized> Strategy for &S {
    type Value = S::Value;

    fn validate(&self) -> Result<(), InvalidArgument> {
        (**self).validate()
    }

    fn draw(&self, data: &mut ConjectureData) -> Result<S::Value, DrawError> {
        (**self).draw(data)
    }
}

#[derive(Debug, Clone)]
pub struct Map<S, F> {
    inner: S,
    f: F,
}

impl<S, F, T> Strategy for Map<S, F>
where
    S: Strategy,
    F: Fn(S::Value) -> T,
{
    type Value = T;

    fn validate(&self) -> Result<(), InvalidArgument> {
        self.inner.validate()
    }

    fn draw(&self, data: &mut ConjectureData) -> Result<T, DrawError> {
        self.inner.draw(data).map(&self.f)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Integers {
    min_value: i128,
    max_value: i128,
}

/// Integers in `[min_value, max_value]`, shrinking towards zero.
pub fn integers(min_value: i128, max_value: i128) -> Integers {
    Integers {
        min_value,
        max_value,
    }
}

impl Strategy for Integers {
    type Value = i128;

    fn validate(&self) -> Result<(), InvalidArgument> {
        if self.max_value < self.min_value {
            return Err(InvalidArgument::EmptyRange {
                min: self.min_value,
                max: self.max_value,
            });
        }
        Ok(())
    }

    fn draw(&self, data: &mut ConjectureData) -> Result<i128, DrawError> {
        data.draw_integer(self.min_value, self.max_value)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Booleans;

pub fn booleans() -> Booleans {
    Booleans
}

impl Strategy for Booleans {
    type Value = bool;

    fn draw(&self, data: &mut ConjectureData) -> Result<bool, DrawError> {
        data.draw_boolean(0.5)
    }
}

#[derive(Debug, Clone)]
pub struct Just<T> {
    value: T,
}

/// Always `value`, without making any choice.
pub fn just<T: Clone>(value: T) -> Just<T> {
    Just { value }
}

impl<T: Clone> Strategy for Just<T> {
    type Value = T;

    fn draw(&self, _data: &mut ConjectureData) -> Result<T, DrawError> {
        Ok(self.value.clone())
    }
}

/// Random discrete joint distributions over `size` variables.
///
/// A draw picks a list of distinct events (outcome tuples), at least
/// `min_events` of them, then assigns probabilities: equal ones when
/// `uniform` is set, otherwise integer weights in `1..=MAX_WEIGHT`
/// normalised to one. Shrinking removes events and pulls weights down to 1.
///
/// ```
/// use conjecture_find::data::ConjectureData;
/// use conjecture_find::strategies::{distributions, Strategy};
///
/// let strategy = distributions(3, 2).uniform(true);
/// let d = strategy.draw(&mut ConjectureData::new(0)).unwrap();
/// assert_eq!(d.outcome_length(), 3);
/// assert!(d.pmf().iter().all(|&p| p == d.pmf()[0]));
/// ```
#[derive(Debug, Clone)]
pub struct DistributionStrategy {
    size: usize,
    alphabet: Alphabet,
    uniform: bool,
    min_events: usize,
}

pub fn distributions(size: usize, alphabet: impl Into<Alphabet>) -> DistributionStrategy {
    DistributionStrategy {
        size,
        alphabet: alphabet.into(),
        uniform: false,
        min_events: 1,
    }
}

impl DistributionStrategy {
    pub fn uniform(mut self, uniform: bool) -> Self {
        self.uniform = uniform;
        self
    }

    /// Smallest number of events per distribution. Values below one are
    /// raised to one, since a distribution needs at least one outcome.
    pub fn min_events(mut self, min_events: usize) -> Self {
        self.min_events = min_events.max(1);
        self
    }

    fn sample_space(&self) -> Result<(Vec<usize>, usize), InvalidArgument> {
        let alphabets = self.alphabet.resolve(self.size)?;
        let outcomes = alphabets
            .iter()
            .try_fold(1usize, |total, &k| total.checked_mul(k))
            .unwrap_or(usize::MAX);
        Ok((alphabets, outcomes))
    }

    fn draw_event(
        alphabets: &[usize],
        data: &mut ConjectureData,
    ) -> Result<Outcome, DrawError> {
        alphabets
            .iter()
            .map(|&k| -> Result<usize, DrawError> {
                let symbol = data.draw_integer(0, k as i128 - 1)?;
                Ok(symbol as usize)
            })
            .collect()
    }
}

impl Strategy for DistributionStrategy {
    type Value = Distribution;

    fn validate(&self) -> Result<(), InvalidArgument> {
        let (_, outcomes) = self.sample_space()?;
        if self.min_events > outcomes {
            return Err(InvalidArgument::MinEventsTooLarge {
                min_events: self.min_events,
                outcomes,
            });
        }
        Ok(())
    }

    fn draw(&self, data: &mut ConjectureData) -> Result<Distribution, DrawError> {
        let (alphabets, outcomes) = match self.sample_space() {
            Ok(space) => space,
            Err(_) => return Err(data.reject()),
        };

        let min_count = self.min_events as u64;
        let max_count = outcomes as u64;
        let mut repeat = Repeat::new(
            min_count,
            max_count,
            Repeat::default_expected_count(min_count, max_count),
        );
        let mut events: Vec<Outcome> = Vec::new();
        let mut seen: HashSet<Outcome> = HashSet::new();
        while repeat.should_continue(data)? {
            let event = Self::draw_event(&alphabets, data)?;
            if seen.insert(event.clone()) {
                events.push(event);
            } else {
                repeat.reject(data)?;
            }
        }

        let weights = if self.uniform {
            vec![1.0; events.len()]
        } else {
            events
                .iter()
                .map(|_| data.draw_integer(1, MAX_WEIGHT).map(|w| w as f64))
                .collect::<Result<Vec<_>, _>>()?
        };

        match Distribution::from_weights(alphabets, events, weights) {
            Ok(distribution) => Ok(distribution),
            Err(_) => Err(data.reject()),
        }
    }
}
