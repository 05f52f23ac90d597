//! Predicates over candidates.
//!
//! A predicate is evaluated with a shared reference only, must be
//! deterministic, and carries a description used when a search fails.

use std::convert::Infallible;
use std::fmt;

pub trait Predicate<C: ?Sized> {
    /// Error a fallible predicate may raise. The engine returns it unmodified.
    type Error;

    fn evaluate(&self, candidate: &C) -> Result<bool, Self::Error>;

    fn describe(&self) -> String;
}

impl<C: ?Sized, P: Predicate<C> + ?Sized> Predicate<C> for &P {
    type Error = P::Error;

    fn evaluate(&self, candidate: &C) -> Result<bool, P::Error> {
        (**self).evaluate(candidate)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// An infallible predicate with a label.
#[derive(Clone)]
pub struct Named<F> {
    label: String,
    f: F,
}

pub fn named<F>(label: impl Into<String>, f: F) -> Named<F> {
    Named {
        label: label.into(),
        f,
    }
}

impl<C: ?Sized, F> Predicate<C> for Named<F>
where
    F: Fn(&C) -> bool,
{
    type Error = Infallible;

    fn evaluate(&self, candidate: &C) -> Result<bool, Infallible> {
        Ok((self.f)(candidate))
    }

    fn describe(&self) -> String {
        self.label.clone()
    }
}

impl<F> fmt::Debug for Named<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Named").field("label", &self.label).finish()
    }
}

/// A labelled predicate whose evaluation can fail.
#[derive(Clone)]
pub struct Fallible<F> {
    label: String,
    f: F,
}

pub fn fallible<F>(label: impl Into<String>, f: F) -> Fallible<F> {
    Fallible {
        label: label.into(),
        f,
    }
}

impl<C: ?Sized, F, E> Predicate<C> for Fallible<F>
where
    F: Fn(&C) -> Result<bool, E>,
{
    type Error = E;

    fn evaluate(&self, candidate: &C) -> Result<bool, E> {
        (self.f)(candidate)
    }

    fn describe(&self) -> String {
        self.label.clone()
    }
}

impl<F> fmt::Debug for Fallible<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fallible").field("label", &self.label).finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Below,
    Above,
}

/// Compares a real-valued measure of the candidate against a fixed threshold.
///
/// ```
/// use conjecture_find::predicate::{below, Predicate};
///
/// let negative = below("x", |x: &f64| *x, 0.0);
/// assert_eq!(negative.evaluate(&-1.5), Ok(true));
/// assert_eq!(negative.describe(), "x < 0");
/// ```
#[derive(Clone)]
pub struct Threshold<F> {
    label: String,
    measure: F,
    threshold: f64,
    comparison: Comparison,
}

/// Holds when `measure(candidate) < threshold`.
pub fn below<F>(label: impl Into<String>, measure: F, threshold: f64) -> Threshold<F> {
    Threshold {
        label: label.into(),
        measure,
        threshold,
        comparison: Comparison::Below,
    }
}

/// Holds when `measure(candidate) > threshold`.
pub fn above<F>(label: impl Into<String>, measure: F, threshold: f64) -> Threshold<F> {
    Threshold {
        label: label.into(),
        measure,
        threshold,
        comparison: Comparison::Above,
    }
}

impl<F> Threshold<F> {
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn comparison(&self) -> Comparison {
        self.comparison
    }
}

impl<C: ?Sized, F> Predicate<C> for Threshold<F>
where
    F: Fn(&C) -> f64,
{
    type Error = Infallible;

    // NaN measures never satisfy either comparison.
    fn evaluate(&self, candidate: &C) -> Result<bool, Infallible> {
        let value = (self.measure)(candidate);
        Ok(match self.comparison {
            Comparison::Below => value < self.threshold,
            Comparison::Above => value > self.threshold,
        })
    }

    fn describe(&self) -> String {
        let op = match self.comparison {
            Comparison::Below => "<",
            Comparison::Above => ">",
        };
        format!("{} {} {}", self.label, op, self.threshold)
    }
}

impl<F> fmt::Debug for Threshold<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Threshold")
            .field("label", &self.label)
            .field("threshold", &self.threshold)
            .field("comparison", &self.comparison)
            .finish()
    }
}
