//! Shrinking of satisfying choice sequences.
//!
//! The shrinker edits the recorded choices of a satisfying draw and asks a
//! test function to replay each edit. A variant is accepted only when the
//! replay still satisfies the predicate and its recorded choices have a
//! smaller [`sort_key`], so the result is never worse than the starting point.
//!
//! Passes, repeated until none makes progress or the budget runs out:
//! deleting chunks of 8, 4, 2 and 1 choices, minimising integers towards
//! their `shrink_towards` and setting booleans to `false`.

use crate::choice::{sort_key, ChoiceNode, ChoiceValue, Constraints};
use log::debug;
use std::collections::HashSet;
use std::time::Instant;

/// Default bound on test function calls.
pub const DEFAULT_MAX_SHRINKS: usize = 500;

const CHUNK_SIZES: [usize; 4] = [8, 4, 2, 1];

/// Result of replaying a candidate: the choices actually recorded and the
/// value drawn, if that value satisfied the predicate.
pub type Replayed<T> = Option<(Vec<ChoiceNode>, T)>;

pub struct Shrinker<T, F> {
    current: Vec<ChoiceNode>,
    value: T,
    test: F,
    seen: HashSet<Vec<ChoiceValue>>,
    calls: usize,
    shrinks: usize,
    max_calls: usize,
    deadline: Option<Instant>,
}

impl<T, E, F> Shrinker<T, F>
where
    F: FnMut(&[ChoiceNode]) -> Result<Replayed<T>, E>,
{
    /// `initial` must be the recorded choices of a draw that produced `value`
    /// and satisfied the predicate.
    pub fn new(initial: Vec<ChoiceNode>, value: T, test: F) -> Self {
        let mut seen = HashSet::new();
        seen.insert(values_of(&initial));
        Self {
            current: initial,
            value,
            test,
            seen,
            calls: 0,
            shrinks: 0,
            max_calls: DEFAULT_MAX_SHRINKS,
            deadline: None,
        }
    }

    pub fn with_max_calls(mut self, max_calls: usize) -> Self {
        self.max_calls = max_calls;
        self
    }

    pub fn with_deadline(mut self, deadline: Option<Instant>) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn current(&self) -> &[ChoiceNode] {
        &self.current
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    /// Number of test function calls made.
    pub fn calls(&self) -> usize {
        self.calls
    }

    /// Number of accepted improvements.
    pub fn shrinks(&self) -> usize {
        self.shrinks
    }

    pub fn into_parts(self) -> (Vec<ChoiceNode>, T) {
        (self.current, self.value)
    }

    fn exhausted(&self) -> bool {
        self.calls >= self.max_calls
            || self.deadline.map_or(false, |deadline| Instant::now() >= deadline)
    }

    /// Replay `candidate` and keep it if it is a satisfying improvement.
    pub fn consider(&mut self, candidate: Vec<ChoiceNode>) -> Result<bool, E> {
        if self.exhausted() || !self.seen.insert(values_of(&candidate)) {
            return Ok(false);
        }
        self.calls += 1;

        match (self.test)(&candidate)? {
            Some((nodes, value)) if sort_key(&nodes) < sort_key(&self.current) => {
                debug!(
                    "shrink: {} -> {} choices after {} calls",
                    self.current.len(),
                    nodes.len(),
                    self.calls
                );
                self.seen.insert(values_of(&nodes));
                self.current = nodes;
                self.value = value;
                self.shrinks += 1;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    pub fn shrink(&mut self) -> Result<(), E> {
        loop {
            let before = self.shrinks;
            self.delete_chunks()?;
            self.minimize_integers()?;
            self.minimize_booleans()?;
            if self.shrinks == before || self.exhausted() {
                break;
            }
        }
        debug!(
            "shrink: finished with {} choices, {} improvements in {} calls",
            self.current.len(),
            self.shrinks,
            self.calls
        );
        Ok(())
    }

    fn delete_chunks(&mut self) -> Result<(), E> {
        for k in CHUNK_SIZES {
            let mut i = self.current.len().saturating_sub(k);
            loop {
                if i + k <= self.current.len() {
                    let mut candidate = self.current.clone();
                    candidate.drain(i..i + k);
                    self.consider(candidate)?;
                }
                if i == 0 || self.exhausted() {
                    break;
                }
                i -= 1;
            }
        }
        Ok(())
    }

    fn minimize_integers(&mut self) -> Result<(), E> {
        let mut i = 0;
        while i < self.current.len() && !self.exhausted() {
            let node = &self.current[i];
            if let (ChoiceValue::Integer(value), Constraints::Integer(c), false) =
                (node.value, node.constraints, node.was_forced)
            {
                let target = c.shrink_towards;
                let above = value >= target;
                // A distance of 2^127 only arises for i128::MIN on a full range.
                let distance = i128::try_from(value.abs_diff(target)).unwrap_or(0);
                if distance > 0 {
                    let index = i;
                    shrink_integer(distance, |d| {
                        let shifted = if above { target + d } else { target - d };
                        self.try_integer_at(index, shifted)
                    })?;
                }
            }
            i += 1;
        }
        Ok(())
    }

    fn try_integer_at(&mut self, index: usize, value: i128) -> Result<bool, E> {
        let Some(node) = self.current.get(index) else {
            return Ok(false);
        };
        let Constraints::Integer(c) = node.constraints else {
            return Ok(false);
        };
        if !c.is_valid(value) {
            return Ok(false);
        }
        let Ok(replacement) = node.copy_with_value(ChoiceValue::Integer(value)) else {
            return Ok(false);
        };
        let mut candidate = self.current.clone();
        candidate[index] = replacement;
        self.consider(candidate)
    }

    fn minimize_booleans(&mut self) -> Result<(), E> {
        let mut i = 0;
        while i < self.current.len() && !self.exhausted() {
            let node = &self.current[i];
            if node.value == ChoiceValue::Boolean(true) {
                if let Ok(replacement) = node.copy_with_value(ChoiceValue::Boolean(false)) {
                    let mut candidate = self.current.clone();
                    candidate[i] = replacement;
                    self.consider(candidate)?;
                }
            }
            i += 1;
        }
        Ok(())
    }
}

fn values_of(nodes: &[ChoiceNode]) -> Vec<ChoiceValue> {
    nodes.iter().map(|node| node.value).collect()
}

/// Shrinks a non-negative integer towards zero.
///
/// `predicate` reports whether a smaller value is still acceptable; it is
/// called with values below the current best only, and its errors end the
/// shrink.
pub struct IntegerShrinker<F> {
    current: i128,
    predicate: F,
    seen: HashSet<i128>,
    calls: usize,
}

impl<F, E> IntegerShrinker<F>
where
    F: FnMut(i128) -> Result<bool, E>,
{
    pub fn new(initial: i128, predicate: F) -> Self {
        let mut seen = HashSet::new();
        seen.insert(initial);
        Self {
            current: initial,
            predicate,
            seen,
            calls: 0,
        }
    }

    fn consider(&mut self, value: i128) -> Result<bool, E> {
        if value < 0 || value >= self.current || !self.seen.insert(value) {
            return Ok(false);
        }
        self.calls += 1;
        if (self.predicate)(value)? {
            self.current = value;
            return Ok(true);
        }
        Ok(false)
    }

    pub fn shrink(&mut self) -> Result<i128, E> {
        if self.short_circuit()? {
            return Ok(self.current);
        }
        loop {
            let before = self.current;
            self.shift_right()?;
            self.shrink_by_multiples(2)?;
            self.shrink_by_multiples(1)?;
            if self.current == before {
                break;
            }
        }
        Ok(self.current)
    }

    fn short_circuit(&mut self) -> Result<bool, E> {
        for value in 0..2 {
            if self.consider(value)? {
                return Ok(true);
            }
        }
        self.mask_high_bits()?;
        if self.bit_length() > 8 {
            self.consider(self.current >> (self.bit_length() - 8))?;
            self.consider(self.current & 0xFF)?;
        }
        Ok(self.current == 2)
    }

    fn shift_right(&mut self) -> Result<(), E> {
        let base = self.current;
        for k in 1..=self.bit_length() {
            let shifted = base >> k;
            if shifted == 0 || self.consider(shifted)? {
                break;
            }
        }
        Ok(())
    }

    fn mask_high_bits(&mut self) -> Result<(), E> {
        let base = self.current;
        let n = self.bit_length();
        for k in 1..n {
            let mask = (1_i128 << (n - k)) - 1;
            if self.consider(mask & base)? {
                break;
            }
        }
        Ok(())
    }

    // Binary search for the largest accepted `n` in `base - n * k`.
    fn shrink_by_multiples(&mut self, k: i128) -> Result<(), E> {
        let base = self.current;
        if !self.consider(base - k)? {
            return Ok(());
        }
        let (mut lo, mut hi) = (1, base / k + 1);
        while lo + 1 < hi {
            let mid = lo + (hi - lo) / 2;
            if self.consider(base - mid * k)? {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        Ok(())
    }

    fn bit_length(&self) -> usize {
        if self.current == 0 {
            1
        } else {
            (128 - self.current.leading_zeros()) as usize
        }
    }

    pub fn current(&self) -> i128 {
        self.current
    }

    pub fn calls(&self) -> usize {
        self.calls
    }
}

/// Shrink a non-negative integer with [`IntegerShrinker`].
pub fn shrink_integer<F, E>(initial: i128, predicate: F) -> Result<i128, E>
where
    F: FnMut(i128) -> Result<bool, E>,
{
    IntegerShrinker::new(initial, predicate).shrink()
}
