//! Discrete joint distributions, the candidates the distribution strategy
//! produces.
//!
//! A distribution over `n` variables stores, for each variable, the size of its
//! alphabet (symbols are `0..k`), and a sorted list of distinct outcome tuples
//! with their probabilities.

use crate::error::{DistributionError, InvalidArgument};
use std::collections::BTreeMap;

/// One joint outcome: a symbol for each variable.
pub type Outcome = Vec<usize>;

const NORMALIZATION_TOLERANCE: f64 = 1e-9;

/// Alphabet sizes for the variables of a distribution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Alphabet {
    /// Every variable takes symbols `0..k`.
    Shared(usize),
    /// One size per variable. A single entry is used for every variable.
    PerVariable(Vec<usize>),
}

impl Alphabet {
    /// Alphabet sizes for `size` variables.
    pub fn resolve(&self, size: usize) -> Result<Vec<usize>, InvalidArgument> {
        if size == 0 {
            return Err(InvalidArgument::ZeroSize);
        }
        let alphabets = match self {
            Alphabet::Shared(k) => vec![*k; size],
            Alphabet::PerVariable(ks) if ks.len() == 1 => vec![ks[0]; size],
            Alphabet::PerVariable(ks) if ks.len() == size => ks.clone(),
            Alphabet::PerVariable(ks) => {
                return Err(InvalidArgument::AlphabetMismatch {
                    expected: size,
                    found: ks.len(),
                })
            }
        };
        match alphabets.iter().position(|&k| k == 0) {
            Some(variable) => Err(InvalidArgument::ZeroAlphabet { variable }),
            None => Ok(alphabets),
        }
    }
}

impl From<usize> for Alphabet {
    fn from(k: usize) -> Self {
        Alphabet::Shared(k)
    }
}

impl From<Vec<usize>> for Alphabet {
    fn from(ks: Vec<usize>) -> Self {
        Alphabet::PerVariable(ks)
    }
}

impl From<&[usize]> for Alphabet {
    fn from(ks: &[usize]) -> Self {
        Alphabet::PerVariable(ks.to_vec())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Distribution {
    alphabets: Vec<usize>,
    outcomes: Vec<Outcome>,
    pmf: Vec<f64>,
}

impl Distribution {
    /// Build a distribution from outcomes and probabilities summing to one.
    ///
    /// Outcomes are sorted; the probabilities are renormalised to remove
    /// rounding error.
    pub fn new(
        alphabets: Vec<usize>,
        outcomes: Vec<Outcome>,
        pmf: Vec<f64>,
    ) -> Result<Self, DistributionError> {
        let total = check_pmf(&outcomes, &pmf)?;
        if (total - 1.0).abs() > NORMALIZATION_TOLERANCE {
            return Err(DistributionError::InvalidNormalization(total));
        }
        Self::build(alphabets, outcomes, pmf, total)
    }

    /// Build a distribution from non-negative weights with a positive total.
    pub fn from_weights(
        alphabets: Vec<usize>,
        outcomes: Vec<Outcome>,
        weights: Vec<f64>,
    ) -> Result<Self, DistributionError> {
        let total = check_pmf(&outcomes, &weights)?;
        if total <= 0.0 {
            return Err(DistributionError::InvalidNormalization(total));
        }
        Self::build(alphabets, outcomes, weights, total)
    }

    fn build(
        alphabets: Vec<usize>,
        outcomes: Vec<Outcome>,
        weights: Vec<f64>,
        total: f64,
    ) -> Result<Self, DistributionError> {
        if alphabets.is_empty() {
            return Err(InvalidArgument::ZeroSize.into());
        }
        if let Some(variable) = alphabets.iter().position(|&k| k == 0) {
            return Err(InvalidArgument::ZeroAlphabet { variable }.into());
        }
        for outcome in &outcomes {
            if outcome.len() != alphabets.len() {
                return Err(DistributionError::OutcomeLength {
                    outcome: outcome.clone(),
                    expected: alphabets.len(),
                });
            }
            if outcome.iter().zip(&alphabets).any(|(&s, &k)| s >= k) {
                return Err(DistributionError::OutcomeOutOfRange {
                    outcome: outcome.clone(),
                    alphabets: alphabets.clone(),
                });
            }
        }

        let mut pairs: Vec<(Outcome, f64)> = outcomes.into_iter().zip(weights).collect();
        pairs.sort_by(|a, b| a.0.cmp(&b.0));
        if let Some(pair) = pairs.windows(2).find(|w| w[0].0 == w[1].0) {
            return Err(DistributionError::DuplicateOutcome(pair[0].0.clone()));
        }

        let (outcomes, pmf) = pairs.into_iter().map(|(o, w)| (o, w / total)).unzip();
        Ok(Self {
            alphabets,
            outcomes,
            pmf,
        })
    }

    /// Number of variables.
    pub fn outcome_length(&self) -> usize {
        self.alphabets.len()
    }

    pub fn alphabets(&self) -> &[usize] {
        &self.alphabets
    }

    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcomes
    }

    pub fn pmf(&self) -> &[f64] {
        &self.pmf
    }

    /// Number of listed outcomes, including any with zero probability.
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&[usize], f64)> + '_ {
        self.outcomes
            .iter()
            .map(Vec::as_slice)
            .zip(self.pmf.iter().copied())
    }

    /// Outcomes with positive probability.
    pub fn support(&self) -> impl Iterator<Item = (&[usize], f64)> + '_ {
        self.iter().filter(|(_, p)| *p > 0.0)
    }

    pub fn probability(&self, outcome: &[usize]) -> f64 {
        match self
            .outcomes
            .binary_search_by(|o| o.as_slice().cmp(outcome))
        {
            Ok(i) => self.pmf[i],
            Err(_) => 0.0,
        }
    }

    /// The marginal distribution of the variables at `indices`, in that order.
    pub fn marginal(&self, indices: &[usize]) -> Result<Distribution, DistributionError> {
        if indices.is_empty() {
            return Err(InvalidArgument::ZeroSize.into());
        }
        if let Some(&index) = indices.iter().find(|&&i| i >= self.outcome_length()) {
            return Err(DistributionError::IndexOutOfRange {
                index,
                length: self.outcome_length(),
            });
        }

        let mut masses: BTreeMap<Outcome, f64> = BTreeMap::new();
        for (outcome, p) in self.iter() {
            let projected = indices.iter().map(|&i| outcome[i]).collect();
            *masses.entry(projected).or_insert(0.0) += p;
        }
        let alphabets = indices.iter().map(|&i| self.alphabets[i]).collect();
        let (outcomes, pmf) = masses.into_iter().unzip();
        Ok(Distribution {
            alphabets,
            outcomes,
            pmf,
        })
    }
}

fn check_pmf(outcomes: &[Outcome], pmf: &[f64]) -> Result<f64, DistributionError> {
    if outcomes.len() != pmf.len() {
        return Err(DistributionError::LengthMismatch {
            outcomes: outcomes.len(),
            pmf: pmf.len(),
        });
    }
    if outcomes.is_empty() {
        return Err(DistributionError::Empty);
    }
    if let Some(&p) = pmf.iter().find(|p| !p.is_finite() || **p < 0.0) {
        return Err(DistributionError::InvalidProbability(p));
    }
    Ok(pmf.iter().sum())
}
