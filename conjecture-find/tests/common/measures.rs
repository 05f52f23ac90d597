//! Information measures over small discrete distributions, in bits.
//!
//! Only what the search scenarios need: entropies of marginals,
//! coinformation, dual total correlation, Gács-Körner common information,
//! and the BROJA and Proj redundancies of two binary inputs (variables 0 and
//! 1) about an output (variable 2).

use conjecture_find::Distribution;
use std::collections::BTreeMap;

const GOLDEN_ITERATIONS: usize = 40;

/// Joint entropy of the variables at `indices`.
pub fn entropy(d: &Distribution, indices: &[usize]) -> f64 {
    if indices.is_empty() {
        return 0.0;
    }
    let marginal = d.marginal(indices).expect("indices within the outcome length");
    marginal
        .pmf()
        .iter()
        .filter(|&&p| p > 0.0)
        .map(|&p| -p * p.log2())
        .sum()
}

fn all_variables(d: &Distribution) -> Vec<usize> {
    (0..d.outcome_length()).collect()
}

/// `I[X_0 : ... : X_n-1]`, the alternating sum of the entropies of all
/// non-empty subsets of variables.
pub fn coinformation(d: &Distribution) -> f64 {
    let n = d.outcome_length();
    (1u32..(1 << n))
        .map(|mask| {
            let subset: Vec<usize> = (0..n).filter(|i| mask & (1 << i) != 0).collect();
            let sign = if subset.len() % 2 == 1 { 1.0 } else { -1.0 };
            sign * entropy(d, &subset)
        })
        .sum()
}

/// `B[X_0 : ... : X_n-1] = H(X) - sum_i H(X_i | X_rest)`.
pub fn dual_total_correlation(d: &Distribution) -> f64 {
    let all = all_variables(d);
    let joint = entropy(d, &all);
    let residual: f64 = all
        .iter()
        .map(|&i| {
            let rest: Vec<usize> = all.iter().copied().filter(|&j| j != i).collect();
            joint - entropy(d, &rest)
        })
        .sum();
    joint - residual
}

/// Entropy of the finest variable that is a function of every `X_i`: the
/// connected components of support outcomes sharing any coordinate value.
pub fn gk_common_information(d: &Distribution) -> f64 {
    let support: Vec<(&[usize], f64)> = d.support().collect();
    let mut parent: Vec<usize> = (0..support.len()).collect();

    fn root(parent: &mut [usize], mut i: usize) -> usize {
        while parent[i] != i {
            parent[i] = parent[parent[i]];
            i = parent[i];
        }
        i
    }

    for a in 0..support.len() {
        for b in (a + 1)..support.len() {
            let shares = support[a].0.iter().zip(support[b].0).any(|(x, y)| x == y);
            if shares {
                let (ra, rb) = (root(&mut parent, a), root(&mut parent, b));
                parent[ra] = rb;
            }
        }
    }

    let mut masses: BTreeMap<usize, f64> = BTreeMap::new();
    for (i, (_, p)) in support.iter().enumerate() {
        *masses.entry(root(&mut parent, i)).or_insert(0.0) += p;
    }
    masses.values().filter(|p| **p > 0.0).map(|p| -p * p.log2()).sum()
}

/// Mutual information between the variable sets `a` and `b`.
pub fn mutual_information(d: &Distribution, a: &[usize], b: &[usize]) -> f64 {
    let both: Vec<usize> = a.iter().chain(b).copied().collect();
    entropy(d, a) + entropy(d, b) - entropy(d, &both)
}

// Minimum of a convex function on [lo, hi].
fn golden_section<F: FnMut(f64) -> f64>(mut f: F, mut lo: f64, mut hi: f64) -> (f64, f64) {
    let ratio = (5f64.sqrt() - 1.0) / 2.0;
    let mut x1 = hi - ratio * (hi - lo);
    let mut x2 = lo + ratio * (hi - lo);
    let (mut f1, mut f2) = (f(x1), f(x2));
    for _ in 0..GOLDEN_ITERATIONS {
        if f1 <= f2 {
            hi = x2;
            x2 = x1;
            f2 = f1;
            x1 = hi - ratio * (hi - lo);
            f1 = f(x1);
        } else {
            lo = x1;
            x1 = x2;
            f1 = f2;
            x2 = lo + ratio * (hi - lo);
            f2 = f(x2);
        }
    }
    let x = (lo + hi) / 2.0;
    (x, f(x))
}

fn check_binary_inputs(d: &Distribution) {
    assert_eq!(d.outcome_length(), 3, "two inputs and one output");
    assert!(
        d.alphabets()[0] <= 2 && d.alphabets()[1] <= 2,
        "redundancy measures need binary inputs"
    );
}

// Per output symbol: p(y), P(X0 = 1 | y), P(X1 = 1 | y).
fn conditionals(d: &Distribution) -> Vec<(f64, f64, f64)> {
    let mut by_output: BTreeMap<usize, (f64, f64, f64)> = BTreeMap::new();
    for (outcome, p) in d.support() {
        let entry = by_output.entry(outcome[2]).or_insert((0.0, 0.0, 0.0));
        entry.0 += p;
        if outcome[0] == 1 {
            entry.1 += p;
        }
        if outcome[1] == 1 {
            entry.2 += p;
        }
    }
    by_output
        .into_values()
        .map(|(py, a, b)| (py, a / py, b / py))
        .collect()
}

// I_Q(Y; X0 X1) for the couplings q(1, 1 | y) = t[y].
fn coupled_information(conditionals: &[(f64, f64, f64)], t: &[f64]) -> f64 {
    let cells = |(_, a, b): (f64, f64, f64), t: f64| {
        [
            (1.0 - a - b + t).max(0.0),
            (b - t).max(0.0),
            (a - t).max(0.0),
            t.max(0.0),
        ]
    };
    let mut inputs = [0.0; 4];
    for (&c, &ty) in conditionals.iter().zip(t) {
        for (k, q) in cells(c, ty).iter().enumerate() {
            inputs[k] += c.0 * q;
        }
    }
    let mut info = 0.0;
    for (&c, &ty) in conditionals.iter().zip(t) {
        for (k, q) in cells(c, ty).iter().enumerate() {
            if *q > 0.0 && inputs[k] > 0.0 {
                info += c.0 * q * (q / inputs[k]).log2();
            }
        }
    }
    info
}

fn minimize_coupling(conditionals: &[(f64, f64, f64)], fixed: &mut Vec<f64>) -> f64 {
    let depth = fixed.len();
    if depth == conditionals.len() {
        return coupled_information(conditionals, fixed);
    }
    let (_, a, b) = conditionals[depth];
    let (lo, hi) = ((a + b - 1.0).max(0.0), a.min(b));
    if hi - lo < 1e-12 {
        fixed.push(lo);
        let value = minimize_coupling(conditionals, fixed);
        fixed.pop();
        return value;
    }
    let (_, value) = golden_section(
        |t| {
            fixed.push(t);
            let value = minimize_coupling(conditionals, fixed);
            fixed.pop();
            value
        },
        lo,
        hi,
    );
    value
}

/// BROJA redundancy: `I(Y;X0) + I(Y;X1) - min_Q I_Q(Y; X0 X1)` over the
/// distributions with the same input-output pair marginals.
pub fn broja_redundancy(d: &Distribution) -> f64 {
    check_binary_inputs(d);
    let union = minimize_coupling(&conditionals(d), &mut Vec::new());
    mutual_information(d, &[0], &[2]) + mutual_information(d, &[1], &[2]) - union
}

// p(Y | source = s) for each source symbol with positive mass, with p(s).
fn output_given(d: &Distribution, source: usize) -> Vec<(f64, Vec<f64>)> {
    let outputs = d.alphabets()[2];
    let mut by_source: BTreeMap<usize, Vec<f64>> = BTreeMap::new();
    for (outcome, p) in d.support() {
        by_source
            .entry(outcome[source])
            .or_insert_with(|| vec![0.0; outputs])[outcome[2]] += p;
    }
    by_source
        .into_values()
        .map(|joint| {
            let ps: f64 = joint.iter().sum();
            (ps, joint.iter().map(|p| p / ps).collect())
        })
        .collect()
}

fn kl(p: &[f64], q: &[f64]) -> f64 {
    p.iter()
        .zip(q)
        .filter(|&(&pi, _)| pi > 0.0)
        .map(|(&pi, &qi)| if qi > 0.0 { pi * (pi / qi).log2() } else { f64::INFINITY })
        .sum()
}

// Projection of p(Y | x) onto the hull of the p(Y | z).
fn project(target: &[f64], hull: &[(f64, Vec<f64>)]) -> Vec<f64> {
    match hull {
        [(_, only)] => only.clone(),
        [(_, first), (_, second)] => {
            let mix = |lambda: f64| -> Vec<f64> {
                first
                    .iter()
                    .zip(second)
                    .map(|(f, s)| lambda * f + (1.0 - lambda) * s)
                    .collect()
            };
            let (lambda, _) = golden_section(|lambda| kl(target, &mix(lambda)), 0.0, 1.0);
            mix(lambda)
        }
        _ => panic!("binary inputs have at most two conditionals"),
    }
}

fn projected_information(d: &Distribution, from: usize, onto: usize) -> f64 {
    let outputs = d.marginal(&[2]).expect("output variable");
    let py: Vec<f64> = (0..d.alphabets()[2])
        .map(|y| outputs.probability(&[y]))
        .collect();
    let hull = output_given(d, onto);
    output_given(d, from)
        .iter()
        .map(|(px, conditional)| {
            let projected = project(conditional, &hull);
            px * conditional
                .iter()
                .zip(&projected)
                .zip(&py)
                .filter(|&((&c, _), _)| c > 0.0)
                .map(|((&c, &r), &p)| c * (r / p).log2())
                .sum::<f64>()
        })
        .sum()
}

/// Proj redundancy (Harder, Salge and Polani): the smaller of the two
/// projected informations between the inputs.
pub fn proj_redundancy(d: &Distribution) -> f64 {
    check_binary_inputs(d);
    projected_information(d, 0, 1).min(projected_information(d, 1, 0))
}
