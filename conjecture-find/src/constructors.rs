//! Specialized distribution constructors.
//!
//! Uniform and Dirichlet-sampled distributions, finite simplex grids, and
//! helpers for mixing distributions, relabelling outcomes, or appending a
//! variable that is a function of the others.

use crate::distribution::{Alphabet, Distribution, Outcome};
use crate::error::{DistributionError, InvalidArgument};
use rand::Rng;
use rand_distr::{Exp1, Gamma};
use std::collections::BTreeMap;

/// All outcomes of the given alphabets, in lexicographic order.
fn product(alphabets: &[usize]) -> Vec<Outcome> {
    let mut outcomes: Vec<Outcome> = vec![Vec::new()];
    for &k in alphabets {
        outcomes = outcomes
            .into_iter()
            .flat_map(|prefix| {
                (0..k).map(move |symbol| {
                    let mut outcome = prefix.clone();
                    outcome.push(symbol);
                    outcome
                })
            })
            .collect();
    }
    outcomes
}

/// The uniform distribution over every outcome of `outcome_length` variables.
///
/// ```
/// use conjecture_find::constructors::uniform_distribution;
///
/// let d = uniform_distribution(2, 2).unwrap();
/// assert_eq!(d.len(), 4);
/// assert_eq!(d.probability(&[1, 0]), 0.25);
/// ```
pub fn uniform_distribution(
    outcome_length: usize,
    alphabet: impl Into<Alphabet>,
) -> Result<Distribution, DistributionError> {
    let alphabets = alphabet.into().resolve(outcome_length)?;
    let outcomes = product(&alphabets);
    let weights = vec![1.0; outcomes.len()];
    Distribution::from_weights(alphabets, outcomes, weights)
}

/// The uniform distribution over `n` scalar outcomes `0..n`.
pub fn uniform_scalar_distribution(n: usize) -> Result<Distribution, DistributionError> {
    uniform_distribution(1, n)
}

/// A Dirichlet sample over every outcome of `outcome_length` variables.
///
/// `alpha` holds one concentration parameter per outcome, in lexicographic
/// outcome order. `None` means all ones, i.e. a draw uniform on the simplex.
///
/// ```
/// use conjecture_find::constructors::random_distribution;
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
///
/// let mut rng = ChaCha8Rng::seed_from_u64(1);
/// let d = random_distribution(2, 2, Some(&[1.0, 2.0, 3.0, 4.0][..]), &mut rng).unwrap();
/// assert!((d.pmf().iter().sum::<f64>() - 1.0).abs() < 1e-12);
/// ```
pub fn random_distribution<R: Rng + ?Sized>(
    outcome_length: usize,
    alphabet: impl Into<Alphabet>,
    alpha: Option<&[f64]>,
    rng: &mut R,
) -> Result<Distribution, DistributionError> {
    let alphabets = alphabet.into().resolve(outcome_length)?;
    let outcomes = product(&alphabets);
    let weights = dirichlet_weights(outcomes.len(), alpha, rng)?;
    Distribution::from_weights(alphabets, outcomes, weights)
}

/// A Dirichlet sample over the scalar outcomes `0..n`.
pub fn random_scalar_distribution<R: Rng + ?Sized>(
    n: usize,
    alpha: Option<&[f64]>,
    rng: &mut R,
) -> Result<Distribution, DistributionError> {
    random_distribution(1, n, alpha, rng)
}

// Normalised Gamma(alpha_i, 1) draws are Dirichlet(alpha) distributed; for
// alpha_i = 1 these are unit exponentials. Zero draws are raised to the
// smallest positive value so some mass always remains.
fn dirichlet_weights<R: Rng + ?Sized>(
    n: usize,
    alpha: Option<&[f64]>,
    rng: &mut R,
) -> Result<Vec<f64>, DistributionError> {
    let weights: Vec<f64> = match alpha {
        None => (0..n)
            .map(|_| {
                let w: f64 = rng.sample(Exp1);
                w
            })
            .collect(),
        Some(alpha) => {
            if alpha.len() != n {
                return Err(DistributionError::ConcentrationCount {
                    expected: n,
                    found: alpha.len(),
                });
            }
            alpha
                .iter()
                .map(|&a| {
                    if !(a.is_finite() && a > 0.0) {
                        return Err(DistributionError::InvalidConcentration(a));
                    }
                    let gamma = Gamma::new(a, 1.0)
                        .map_err(|_| DistributionError::InvalidConcentration(a))?;
                    Ok(rng.sample(gamma))
                })
                .collect::<Result<_, _>>()?
        }
    };
    Ok(weights.into_iter().map(|w| w.max(f64::MIN_POSITIVE)).collect())
}

/// Iterator over the distributions of a triangular grid on the simplex.
///
/// Every pmf is a composition of `base^depth` into one non-negative part per
/// outcome, scaled by `base^depth`. Pmfs are produced in lexicographic order,
/// so `simplex_grid(2, 2, 2)` yields `(0, 1), (0.25, 0.75), (0.5, 0.5),
/// (0.75, 0.25), (1, 0)`. Zero entries are kept as zero-probability outcomes.
#[derive(Debug, Clone)]
pub struct SimplexGrid {
    alphabets: Vec<usize>,
    outcomes: Vec<Outcome>,
    total: u64,
    current: Option<Vec<u64>>,
}

/// The simplex grid over the scalar outcomes `0..length`.
pub fn simplex_grid(
    length: usize,
    depth: u32,
    base: u64,
) -> Result<SimplexGrid, InvalidArgument> {
    let outcomes = (0..length).map(|i| vec![i]).collect();
    SimplexGrid::new(vec![length], outcomes, depth, base)
}

/// The simplex grid over the outcomes of `using`, zero-mass ones included.
///
/// Every grid point keeps the alphabets and outcomes of `using`, so a joint
/// sample space can be enumerated exhaustively with
/// [`ExampleFinder::find_in`](crate::engine::ExampleFinder::find_in).
///
/// ```
/// use conjecture_find::constructors::{simplex_grid_over, uniform_distribution};
///
/// let space = uniform_distribution(3, 2).unwrap();
/// let grid = simplex_grid_over(&space, 1, 2).unwrap();
/// // Two units spread over eight outcomes.
/// assert_eq!(grid.count(), 36);
/// ```
pub fn simplex_grid_over(
    using: &Distribution,
    depth: u32,
    base: u64,
) -> Result<SimplexGrid, InvalidArgument> {
    SimplexGrid::new(using.alphabets().to_vec(), using.outcomes().to_vec(), depth, base)
}

impl SimplexGrid {
    fn new(
        alphabets: Vec<usize>,
        outcomes: Vec<Outcome>,
        depth: u32,
        base: u64,
    ) -> Result<Self, InvalidArgument> {
        if outcomes.is_empty() {
            return Err(InvalidArgument::ZeroSize);
        }
        if base == 0 {
            return Err(InvalidArgument::ZeroBase);
        }
        let total = base
            .checked_pow(depth)
            .ok_or(InvalidArgument::GridTooLarge { base, depth })?;

        let mut first = vec![0; outcomes.len()];
        first[outcomes.len() - 1] = total;
        Ok(Self {
            alphabets,
            outcomes,
            total,
            current: Some(first),
        })
    }

    fn advance(&mut self) {
        let Some(parts) = self.current.as_mut() else {
            return;
        };
        let last = parts.len() - 1;
        // Rightmost position with mass to its right moves one unit left.
        let mut tail = 0;
        for i in (0..last).rev() {
            tail += parts[i + 1];
            if tail > 0 {
                parts[i] += 1;
                for part in parts[i + 1..].iter_mut() {
                    *part = 0;
                }
                parts[last] = tail - 1;
                return;
            }
        }
        self.current = None;
    }
}

impl Iterator for SimplexGrid {
    type Item = Distribution;

    fn next(&mut self) -> Option<Distribution> {
        let parts = self.current.clone()?;
        self.advance();

        let total = self.total as f64;
        let pmf = parts.iter().map(|&p| p as f64 / total).collect();
        Distribution::from_weights(self.alphabets.clone(), self.outcomes.clone(), pmf).ok()
    }
}

/// The mixture `sum_i weights[i] * dists[i]` over the merged sample space.
pub fn mixture_distribution(
    dists: &[Distribution],
    weights: &[f64],
) -> Result<Distribution, DistributionError> {
    if dists.len() != weights.len() {
        return Err(DistributionError::WeightCount {
            dists: dists.len(),
            weights: weights.len(),
        });
    }
    let first = dists.first().ok_or(DistributionError::Empty)?;
    if let Some(&w) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
        return Err(DistributionError::InvalidProbability(w));
    }
    let total: f64 = weights.iter().sum();
    if (total - 1.0).abs() > 1e-9 {
        return Err(DistributionError::InvalidNormalization(total));
    }
    if let Some(other) = dists.iter().find(|d| d.alphabets() != first.alphabets()) {
        return Err(DistributionError::IncompatibleAlphabets(
            first.alphabets().to_vec(),
            other.alphabets().to_vec(),
        ));
    }

    let mut masses: BTreeMap<Outcome, f64> = BTreeMap::new();
    for (dist, &w) in dists.iter().zip(weights) {
        for (outcome, p) in dist.iter() {
            *masses.entry(outcome.to_vec()).or_insert(0.0) += w * p;
        }
    }
    let (outcomes, pmf) = masses.into_iter().unzip();
    Distribution::from_weights(first.alphabets().to_vec(), outcomes, pmf)
}

/// Relabel every outcome of `dist` with `f`, into outcomes of
/// `outcome_length` variables over `alphabet`.
///
/// Outcomes that `f` sends to the same new outcome have their masses added.
///
/// ```
/// use conjecture_find::constructors::{modify_outcomes, uniform_scalar_distribution};
///
/// let d = uniform_scalar_distribution(5).unwrap();
/// let shifted = modify_outcomes(&d, 1, 6, |o| vec![o[0] + 1]).unwrap();
/// assert_eq!(shifted.probability(&[5]), 0.2);
/// assert_eq!(shifted.probability(&[0]), 0.0);
/// ```
pub fn modify_outcomes<F>(
    dist: &Distribution,
    outcome_length: usize,
    alphabet: impl Into<Alphabet>,
    f: F,
) -> Result<Distribution, DistributionError>
where
    F: Fn(&[usize]) -> Outcome,
{
    let alphabets = alphabet.into().resolve(outcome_length)?;
    let mut masses: BTreeMap<Outcome, f64> = BTreeMap::new();
    for (outcome, p) in dist.iter() {
        *masses.entry(f(outcome)).or_insert(0.0) += p;
    }
    let (outcomes, pmf) = masses.into_iter().unzip();
    Distribution::from_weights(alphabets, outcomes, pmf)
}

/// Append a variable with alphabet size `alphabet` whose value is `f` of the
/// existing outcome. Errors raised by `f` are returned as they are.
///
/// ```
/// use conjecture_find::constructors::{insert_rvf, uniform_distribution, xor};
///
/// let d = insert_rvf(&uniform_distribution(2, 2).unwrap(), xor(0, 1), 2).unwrap();
/// assert_eq!(d.outcomes(), &[vec![0, 0, 0], vec![0, 1, 1], vec![1, 0, 1], vec![1, 1, 0]]);
/// ```
pub fn insert_rvf<F>(
    dist: &Distribution,
    f: F,
    alphabet: usize,
) -> Result<Distribution, DistributionError>
where
    F: Fn(&[usize]) -> Result<usize, DistributionError>,
{
    let mut alphabets = dist.alphabets().to_vec();
    alphabets.push(alphabet);
    let outcomes = dist
        .outcomes()
        .iter()
        .map(|outcome| {
            let mut extended = outcome.clone();
            extended.push(f(outcome)?);
            Ok(extended)
        })
        .collect::<Result<Vec<_>, DistributionError>>()?;
    Distribution::from_weights(alphabets, outcomes, dist.pmf().to_vec())
}

/// The XOR of the (binary) variables at `i` and `j`, for use with
/// [`insert_rvf`].
pub fn xor(i: usize, j: usize) -> impl Fn(&[usize]) -> Result<usize, DistributionError> {
    move |outcome: &[usize]| {
        let symbol = |index: usize| {
            outcome
                .get(index)
                .copied()
                .ok_or(DistributionError::IndexOutOfRange {
                    index,
                    length: outcome.len(),
                })
        };
        Ok(usize::from(symbol(i)? != symbol(j)?))
    }
}

/// A variable given by an explicit table from outcomes to values. Outcomes
/// missing from the table are an error.
pub fn from_mapping(
    mapping: BTreeMap<Outcome, usize>,
) -> impl Fn(&[usize]) -> Result<usize, DistributionError> {
    move |outcome: &[usize]| {
        mapping
            .get(outcome)
            .copied()
            .ok_or_else(|| DistributionError::Unmapped(outcome.to_vec()))
    }
}

/// A variable whose value is the index of the block of `partition` holding
/// the outcome.
///
/// ```
/// use conjecture_find::constructors::{from_partition, insert_rvf, uniform_distribution};
///
/// let parity = from_partition(&[vec![vec![0, 0], vec![1, 1]], vec![vec![0, 1], vec![1, 0]]]);
/// let d = insert_rvf(&uniform_distribution(2, 2).unwrap(), parity, 2).unwrap();
/// assert_eq!(d.probability(&[1, 0, 1]), 0.25);
/// ```
pub fn from_partition(
    partition: &[Vec<Outcome>],
) -> impl Fn(&[usize]) -> Result<usize, DistributionError> {
    let mut mapping = BTreeMap::new();
    for (block, outcomes) in partition.iter().enumerate() {
        for outcome in outcomes {
            mapping.insert(outcome.clone(), block);
        }
    }
    from_mapping(mapping)
}
