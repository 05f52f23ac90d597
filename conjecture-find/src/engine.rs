//! ExampleFinder: the bounded search loop.
//!
//! The finder draws candidates from a strategy one at a time, each from a
//! fresh [`ConjectureData`] seeded with `seed + draw_index`, and returns the
//! first one the predicate accepts. The search stops after
//! `Settings::max_examples` draws, when the optional deadline passes, or
//! after too many draws the strategy itself rejected. A satisfying candidate
//! is then shrunk by replaying edited choice sequences through the strategy.

use crate::choice::ChoiceNode;
use crate::data::{ConjectureData, DEFAULT_MAX_CHOICES};
use crate::error::{DrawError, ExhaustionReason, FindError, InvalidArgument};
use crate::predicate::Predicate;
use crate::shrinking::{Replayed, Shrinker, DEFAULT_MAX_SHRINKS};
use crate::strategies::Strategy;
use log::{debug, info};
use std::time::{Duration, Instant};

/// Default number of draws before a search gives up.
pub const DEFAULT_MAX_EXAMPLES: u64 = 2000;

/// Search configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Maximum number of draws
    pub max_examples: u64,

    /// Maximum number of draws the strategy may reject. Defaults to ten
    /// times `max_examples`.
    pub max_invalid: Option<u64>,

    /// Seed of the first draw; draw `i` uses `seed + i`
    pub seed: u64,

    /// Maximum number of choices a single draw may make
    pub max_choices: usize,

    /// Wall-clock budget for the whole search, shrinking included
    pub deadline: Option<Duration>,

    /// Shrink the first satisfying candidate
    pub shrink: bool,

    /// Maximum number of replays during shrinking
    pub max_shrinks: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_examples: DEFAULT_MAX_EXAMPLES,
            max_invalid: None,
            seed: 0,
            max_choices: DEFAULT_MAX_CHOICES,
            deadline: None,
            shrink: true,
            max_shrinks: DEFAULT_MAX_SHRINKS,
        }
    }
}

impl Settings {
    pub fn with_max_examples(mut self, max_examples: u64) -> Self {
        self.max_examples = max_examples;
        self
    }

    pub fn with_max_invalid(mut self, max_invalid: u64) -> Self {
        self.max_invalid = Some(max_invalid);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_max_choices(mut self, max_choices: usize) -> Self {
        self.max_choices = max_choices;
        self
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_shrink(mut self, shrink: bool) -> Self {
        self.shrink = shrink;
        self
    }

    pub fn with_max_shrinks(mut self, max_shrinks: usize) -> Self {
        self.max_shrinks = max_shrinks;
        self
    }

    pub fn max_invalid(&self) -> u64 {
        self.max_invalid
            .unwrap_or_else(|| self.max_examples.saturating_mul(10))
    }

    pub fn validate(&self) -> Result<(), InvalidArgument> {
        if self.max_examples == 0 {
            return Err(InvalidArgument::ZeroMaxExamples);
        }
        Ok(())
    }
}

/// Statistics about the last search
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FinderStats {
    /// Draws attempted, whatever their outcome
    pub draws: u64,

    /// Draws that produced a candidate
    pub valid: u64,

    /// Draws the strategy rejected
    pub invalid: u64,

    /// Draws that ran out of choices
    pub overruns: u64,

    /// Predicate evaluations, shrinking included
    pub evaluations: u64,

    /// Replays made while shrinking
    pub shrink_calls: usize,

    /// Improvements accepted while shrinking
    pub shrinks: usize,

    /// Time spent drawing and evaluating candidates
    pub generation_time: Duration,

    /// Time spent shrinking
    pub shrinking_time: Duration,
}

#[derive(Debug, Clone, Default)]
pub struct ExampleFinder {
    settings: Settings,
    stats: FinderStats,
}

impl ExampleFinder {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            stats: FinderStats::default(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Statistics of the most recent search.
    pub fn stats(&self) -> &FinderStats {
        &self.stats
    }

    /// Return the first candidate drawn from `strategy` that satisfies
    /// `predicate`, shrunk unless `Settings::shrink` is off.
    ///
    /// The settings and the strategy are validated before the first draw, so
    /// a malformed configuration fails with [`FindError::InvalidGenerator`]
    /// without calling the predicate. A budget spent entirely on draws that
    /// overran `Settings::max_choices` is reported as
    /// [`ExhaustionReason::Overrun`].
    pub fn find<S, P>(
        &mut self,
        strategy: &S,
        predicate: &P,
    ) -> Result<S::Value, FindError<P::Error>>
    where
        S: Strategy + ?Sized,
        P: Predicate<S::Value> + ?Sized,
    {
        self.stats = FinderStats::default();
        self.settings.validate()?;
        strategy.validate()?;

        let start = Instant::now();
        let deadline = self.settings.deadline.map(|budget| start + budget);
        let description = predicate.describe();
        debug!(
            "find: searching for `{}` with up to {} draws from seed {}",
            description, self.settings.max_examples, self.settings.seed
        );

        for index in 0..self.settings.max_examples {
            if deadline.map_or(false, |deadline| Instant::now() >= deadline) {
                return Err(self.exhausted(description, ExhaustionReason::Deadline, start));
            }

            self.stats.draws += 1;
            let mut data = ConjectureData::new(self.settings.seed.wrapping_add(index))
                .with_max_choices(self.settings.max_choices);
            let value = match strategy.draw(&mut data) {
                Ok(value) => value,
                Err(DrawError::Overrun) => {
                    debug!("find: draw {} overran", index);
                    self.stats.overruns += 1;
                    continue;
                }
                Err(e) => {
                    debug!("find: draw {} invalid: {}", index, e);
                    self.stats.invalid += 1;
                    if self.stats.invalid > self.settings.max_invalid() {
                        return Err(self.exhausted(
                            description,
                            ExhaustionReason::TooManyInvalid,
                            start,
                        ));
                    }
                    continue;
                }
            };
            data.freeze();
            self.stats.valid += 1;

            self.stats.evaluations += 1;
            if !predicate.evaluate(&value).map_err(FindError::Predicate)? {
                continue;
            }

            data.mark_interesting();
            self.stats.generation_time = start.elapsed();
            info!(
                "find: `{}` satisfied on draw {} ({} choices)",
                description,
                self.stats.draws,
                data.nodes().len()
            );
            if !self.settings.shrink {
                return Ok(value);
            }
            return self
                .shrink(strategy, predicate, data.into_nodes(), value, deadline)
                .map_err(FindError::Predicate);
        }

        let reason = if self.stats.valid == 0 && self.stats.overruns > 0 {
            ExhaustionReason::Overrun
        } else {
            ExhaustionReason::MaxExamples
        };
        Err(self.exhausted(description, reason, start))
    }

    /// Return the first candidate of `candidates`, in iteration order, that
    /// satisfies `predicate`. Nothing is shrunk.
    ///
    /// Running out of candidates yields [`ExhaustionReason::GeneratorExhausted`].
    pub fn find_in<C, I, P>(
        &mut self,
        candidates: I,
        predicate: &P,
    ) -> Result<C, FindError<P::Error>>
    where
        I: IntoIterator<Item = C>,
        P: Predicate<C> + ?Sized,
    {
        self.stats = FinderStats::default();
        self.settings.validate()?;

        let start = Instant::now();
        let deadline = self.settings.deadline.map(|budget| start + budget);
        let description = predicate.describe();
        let mut candidates = candidates.into_iter();

        loop {
            if self.stats.draws >= self.settings.max_examples {
                return Err(self.exhausted(description, ExhaustionReason::MaxExamples, start));
            }
            if deadline.map_or(false, |deadline| Instant::now() >= deadline) {
                return Err(self.exhausted(description, ExhaustionReason::Deadline, start));
            }
            let Some(candidate) = candidates.next() else {
                return Err(self.exhausted(
                    description,
                    ExhaustionReason::GeneratorExhausted,
                    start,
                ));
            };

            self.stats.draws += 1;
            self.stats.valid += 1;
            self.stats.evaluations += 1;
            if predicate.evaluate(&candidate).map_err(FindError::Predicate)? {
                self.stats.generation_time = start.elapsed();
                info!(
                    "find: `{}` satisfied by candidate {}",
                    description, self.stats.draws
                );
                return Ok(candidate);
            }
        }
    }

    fn shrink<S, P>(
        &mut self,
        strategy: &S,
        predicate: &P,
        nodes: Vec<ChoiceNode>,
        value: S::Value,
        deadline: Option<Instant>,
    ) -> Result<S::Value, P::Error>
    where
        S: Strategy + ?Sized,
        P: Predicate<S::Value> + ?Sized,
    {
        let start = Instant::now();
        let max_choices = self.settings.max_choices;
        let mut evaluations = 0;
        let test = |candidate: &[ChoiceNode]| -> Result<Replayed<S::Value>, P::Error> {
            let mut data = ConjectureData::for_choices(candidate).with_max_choices(max_choices);
            let Ok(value) = strategy.draw(&mut data) else {
                return Ok(None);
            };
            data.freeze();
            evaluations += 1;
            if predicate.evaluate(&value)? {
                data.mark_interesting();
                Ok(Some((data.into_nodes(), value)))
            } else {
                Ok(None)
            }
        };

        let mut shrinker = Shrinker::new(nodes, value, test)
            .with_max_calls(self.settings.max_shrinks)
            .with_deadline(deadline);
        let outcome = shrinker.shrink();
        self.stats.shrink_calls = shrinker.calls();
        self.stats.shrinks = shrinker.shrinks();
        let (nodes, value) = shrinker.into_parts();
        self.stats.evaluations += evaluations;
        self.stats.shrinking_time = start.elapsed();
        outcome?;

        info!(
            "find: shrunk to {} choices with {} improvements in {} replays",
            nodes.len(),
            self.stats.shrinks,
            self.stats.shrink_calls
        );
        Ok(value)
    }

    fn exhausted<E>(
        &mut self,
        predicate: String,
        reason: ExhaustionReason,
        start: Instant,
    ) -> FindError<E> {
        self.stats.generation_time = start.elapsed();
        info!(
            "find: no example satisfying `{}` after {} draws ({}; {} invalid, {} overruns)",
            predicate, self.stats.draws, reason, self.stats.invalid, self.stats.overruns
        );
        FindError::NoExampleFound {
            predicate,
            draws: self.stats.draws,
            reason,
        }
    }
}

/// Search `strategy` for a candidate satisfying `predicate` with default
/// settings.
///
/// ```
/// use conjecture_find::predicate::named;
/// use conjecture_find::strategies::integers;
///
/// let predicate = named("x > 500", |x: &i128| *x > 500);
/// let found = conjecture_find::find(&integers(0, 1000), &predicate).unwrap();
/// assert_eq!(found, 501);
/// ```
pub fn find<S, P>(strategy: &S, predicate: &P) -> Result<S::Value, FindError<P::Error>>
where
    S: Strategy + ?Sized,
    P: Predicate<S::Value> + ?Sized,
{
    ExampleFinder::default().find(strategy, predicate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicate::{fallible, named};
    use crate::strategies::{booleans, distributions, integers, just};
    use std::cell::Cell;

    #[test]
    fn test_finder_creation() {
        let finder = ExampleFinder::default();
        assert_eq!(finder.settings().max_examples, 2000);
        assert_eq!(finder.settings().max_invalid(), 20_000);
        assert_eq!(finder.stats().draws, 0);
    }

    #[test]
    fn test_trivially_true_predicate_found_on_first_draw() {
        let mut finder = ExampleFinder::new(Settings::default().with_shrink(false));
        let result = finder.find(&integers(0, 100), &named("anything", |_: &i128| true));
        assert!(result.is_ok());
        assert_eq!(finder.stats().draws, 1);
        assert_eq!(finder.stats().evaluations, 1);
    }

    #[test]
    fn test_unsatisfiable_predicate_uses_the_whole_budget() {
        let mut finder = ExampleFinder::new(Settings::default().with_max_examples(50));
        let err = finder
            .find(&booleans(), &named("neither", |_: &bool| false))
            .unwrap_err();
        match err {
            FindError::NoExampleFound {
                predicate,
                draws,
                reason,
            } => {
                assert_eq!(predicate, "neither");
                assert_eq!(draws, 50);
                assert_eq!(reason, ExhaustionReason::MaxExamples);
            }
            other => panic!("unexpected error: {}", other),
        }
        assert_eq!(finder.stats().draws, 50);
    }

    #[test]
    fn test_property_with_condition_shrinks_to_boundary() {
        let mut finder = ExampleFinder::new(Settings::default().with_seed(42));
        let found = finder
            .find(&integers(0, 100), &named("x > 50", |x: &i128| *x > 50))
            .unwrap();
        assert_eq!(found, 51);
        assert!(finder.stats().shrink_calls > 0);
    }

    #[test]
    fn test_shrink_disabled_returns_first_satisfying_draw() {
        let settings = Settings::default().with_seed(7).with_shrink(false);
        let predicate = named("x > 50", |x: &i128| *x > 50);

        let mut finder = ExampleFinder::new(settings.clone());
        let found = finder.find(&integers(0, 100), &predicate).unwrap();

        let draws = finder.stats().draws;
        let mut data = ConjectureData::new(settings.seed + draws - 1);
        assert_eq!(integers(0, 100).draw(&mut data), Ok(found));
    }

    #[test]
    fn test_same_seed_same_result() {
        let strategy = distributions(3, 2);
        let predicate = named("at least three events", |d: &crate::Distribution| d.len() >= 3);
        let settings = Settings::default().with_seed(1234);
        let a = ExampleFinder::new(settings.clone()).find(&strategy, &predicate).unwrap();
        let b = ExampleFinder::new(settings).find(&strategy, &predicate).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_settings_fail_before_drawing() {
        let calls = Cell::new(0);
        let predicate = named("counted", |_: &i128| {
            calls.set(calls.get() + 1);
            true
        });
        let mut finder = ExampleFinder::new(Settings::default().with_max_examples(0));
        let err = finder.find(&integers(0, 1), &predicate).unwrap_err();
        assert!(matches!(
            err,
            FindError::InvalidGenerator(InvalidArgument::ZeroMaxExamples)
        ));

        let mut finder = ExampleFinder::default();
        let err = finder.find(&integers(1, 0), &predicate).unwrap_err();
        assert!(err.is_invalid_generator());
        assert_eq!(finder.stats().draws, 0);
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_predicate_errors_propagate() {
        let predicate = fallible("explodes", |x: &i128| {
            if *x >= 0 {
                Err(format!("cannot evaluate {}", x))
            } else {
                Ok(true)
            }
        });
        let err = find(&integers(0, 10), &predicate).unwrap_err();
        let message = err.into_predicate_error().unwrap();
        assert!(message.starts_with("cannot evaluate"));
    }

    #[test]
    fn test_predicate_errors_during_shrinking_propagate() {
        // Satisfied above 5, fails to evaluate below 3.
        let predicate = fallible("x > 5", |x: &i128| {
            if *x < 3 {
                Err("too small")
            } else {
                Ok(*x > 5)
            }
        });
        let mut finder = ExampleFinder::new(Settings::default().with_seed(3));
        let found = finder.find(&integers(6, 10), &predicate).unwrap();
        assert!(found > 5);

        // Shrinking integers(0, 100) tries 0 first.
        let err = finder.find(&integers(0, 100), &predicate).unwrap_err();
        assert_eq!(err.into_predicate_error(), Some("too small"));
    }

    #[test]
    fn test_too_many_invalid() {
        struct AlwaysRejects;
        impl Strategy for AlwaysRejects {
            type Value = ();
            fn draw(&self, data: &mut ConjectureData) -> Result<(), DrawError> {
                Err(data.reject())
            }
        }

        let settings = Settings::default().with_max_examples(100).with_max_invalid(5);
        let mut finder = ExampleFinder::new(settings);
        let err = finder
            .find(&AlwaysRejects, &named("anything", |_: &()| true))
            .unwrap_err();
        assert!(matches!(
            err,
            FindError::NoExampleFound {
                reason: ExhaustionReason::TooManyInvalid,
                draws: 6,
                ..
            }
        ));
        assert_eq!(finder.stats().invalid, 6);
    }

    #[test]
    fn test_deadline() {
        let settings = Settings::default().with_deadline(Duration::ZERO);
        let mut finder = ExampleFinder::new(settings);
        let err = finder
            .find(&just(1), &named("never", |_: &i32| false))
            .unwrap_err();
        assert!(matches!(
            err,
            FindError::NoExampleFound {
                reason: ExhaustionReason::Deadline,
                draws: 0,
                ..
            }
        ));
    }

    #[test]
    fn test_find_in_iteration_order() {
        let mut finder = ExampleFinder::default();
        let found = finder
            .find_in(1..100, &named("divisible by 7", |x: &i32| x % 7 == 0))
            .unwrap();
        assert_eq!(found, 7);
        assert_eq!(finder.stats().draws, 7);

        let err = finder
            .find_in(1..5, &named("negative", |x: &i32| *x < 0))
            .unwrap_err();
        assert!(matches!(
            err,
            FindError::NoExampleFound {
                reason: ExhaustionReason::GeneratorExhausted,
                draws: 4,
                ..
            }
        ));
    }

    #[test]
    fn test_find_in_respects_budget() {
        let mut finder = ExampleFinder::new(Settings::default().with_max_examples(3));
        let err = finder
            .find_in(0.., &named("huge", |x: &u64| *x > 1000))
            .unwrap_err();
        assert!(matches!(
            err,
            FindError::NoExampleFound {
                reason: ExhaustionReason::MaxExamples,
                draws: 3,
                ..
            }
        ));
    }

    #[test]
    fn test_deadline_cuts_shrinking_short() {
        let strategy = distributions(3, 2);
        let predicate = named("normalised", |d: &crate::Distribution| {
            std::thread::sleep(Duration::from_millis(10));
            (d.pmf().iter().sum::<f64>() - 1.0).abs() < 1e-9
        });
        let settings = Settings::default().with_deadline(Duration::from_millis(100));
        let mut finder = ExampleFinder::new(settings);
        let found = finder.find(&strategy, &predicate).unwrap();

        assert!((found.pmf().iter().sum::<f64>() - 1.0).abs() < 1e-9);
        let stats = finder.stats();
        assert_eq!(stats.draws, 1);
        // Every evaluation sleeps, so few fit before the deadline.
        assert!(stats.evaluations <= 12, "{} evaluations", stats.evaluations);
        assert!(stats.shrinking_time < Duration::from_secs(1));
    }

    #[test]
    fn test_budget_spent_on_overruns() {
        let settings = Settings::default().with_max_examples(20).with_max_choices(1);
        let mut finder = ExampleFinder::new(settings);
        let err = finder
            .find(&distributions(3, 2), &named("anything", |_: &crate::Distribution| true))
            .unwrap_err();
        assert!(matches!(
            err,
            FindError::NoExampleFound {
                reason: ExhaustionReason::Overrun,
                draws: 20,
                ..
            }
        ));
        assert!(err.to_string().contains("max_choices"));
        assert_eq!(finder.stats().overruns, 20);
        assert_eq!(finder.stats().valid, 0);
        assert_eq!(finder.stats().evaluations, 0);
    }
}
