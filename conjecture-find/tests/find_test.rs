//! Searches over random distributions: measure-separating examples and the
//! general properties of the finder.

mod common;

use common::measures::{
    broja_redundancy, coinformation, dual_total_correlation, gk_common_information,
    proj_redundancy,
};
use common::{seeded, TOLERANCE};
use conjecture_find::{
    above, below, distributions, fallible, named, Distribution, ExampleFinder, ExhaustionReason,
    FindError, InvalidArgument, Predicate, Settings,
};
use std::cell::Cell;

#[test_log::test]
fn test_finds_strongly_negative_coinformation() {
    let predicate = below("coinformation", coinformation, -0.3);
    let mut finder = ExampleFinder::new(seeded(0));
    let d = finder.find(&distributions(3, 2), &predicate).unwrap();

    assert!(coinformation(&d) < -0.3);
    assert_eq!(predicate.evaluate(&d), Ok(true));
    assert!(finder.stats().draws <= 2000);
}

#[test_log::test]
fn test_common_information_never_exceeds_dual_total_correlation() {
    let predicate = named("G[X:Y:Z] > B[X:Y:Z]", |d: &Distribution| {
        gk_common_information(d) > dual_total_correlation(d) + 1e-9
    });
    let mut finder = ExampleFinder::default();
    let err = finder
        .find(&distributions(3, 3).uniform(true), &predicate)
        .unwrap_err();

    match err {
        FindError::NoExampleFound {
            predicate,
            draws,
            reason,
        } => {
            assert_eq!(predicate, "G[X:Y:Z] > B[X:Y:Z]");
            assert_eq!(draws, 2000);
            assert_eq!(reason, ExhaustionReason::MaxExamples);
        }
        other => panic!("expected exhaustion, got {}", other),
    }
    assert_eq!(finder.stats().valid, 2000);
}

#[test_log::test]
fn test_finds_distribution_where_broja_and_proj_disagree() {
    let predicate = named("I_BROJA != I_proj", |d: &Distribution| {
        (broja_redundancy(d) - proj_redundancy(d)).abs() > TOLERANCE
    });
    let mut finder = ExampleFinder::new(seeded(0).with_max_shrinks(100));
    let d = finder
        .find(&distributions(3, 2).uniform(true), &predicate)
        .unwrap();

    assert!((broja_redundancy(&d) - proj_redundancy(&d)).abs() > TOLERANCE);
    let p = d.pmf()[0];
    assert!(d.pmf().iter().all(|&q| (q - p).abs() < 1e-12));
}

#[test]
fn test_invalid_generator_fails_before_any_draw() {
    let calls = Cell::new(0);
    let predicate = named("counted", |_: &Distribution| {
        calls.set(calls.get() + 1);
        true
    });

    let mut finder = ExampleFinder::default();
    let err = finder.find(&distributions(0, 2), &predicate).unwrap_err();
    assert!(matches!(
        err,
        FindError::InvalidGenerator(InvalidArgument::ZeroSize)
    ));
    assert_eq!(finder.stats().draws, 0);

    let err = finder
        .find(&distributions(3, vec![2, 0, 2]), &predicate)
        .unwrap_err();
    assert!(matches!(
        err,
        FindError::InvalidGenerator(InvalidArgument::ZeroAlphabet { variable: 1 })
    ));
    assert_eq!(finder.stats().draws, 0);
    assert_eq!(calls.get(), 0);
}

#[test]
fn test_trivially_true_predicate_is_satisfied_by_the_first_draw() {
    let mut finder = ExampleFinder::default();
    let d = finder
        .find(&distributions(3, 2), &named("true", |_: &Distribution| true))
        .unwrap();
    assert_eq!(finder.stats().draws, 1);
    // Shrinks to a single event.
    assert_eq!(d.len(), 1);
    assert_eq!(d.outcomes(), &[vec![0, 0, 0]]);
}

#[test]
fn test_same_seed_same_candidate() {
    let predicate = above("coinformation", coinformation, 0.3);
    for shrink in [true, false] {
        let settings = seeded(99).with_shrink(shrink);
        let a = ExampleFinder::new(settings.clone())
            .find(&distributions(3, 2), &predicate)
            .unwrap();
        let b = ExampleFinder::new(settings)
            .find(&distributions(3, 2), &predicate)
            .unwrap();
        assert_eq!(a, b);
    }
}

#[test]
fn test_shrinking_never_makes_the_candidate_larger() {
    let predicate = below("coinformation", coinformation, -0.3);
    let strategy = distributions(3, 2);

    let mut finder = ExampleFinder::new(seeded(5).with_shrink(false));
    let first = finder.find(&strategy, &predicate).unwrap();
    let draws = finder.stats().draws;

    let mut finder = ExampleFinder::new(seeded(5));
    let shrunk = finder.find(&strategy, &predicate).unwrap();
    assert_eq!(finder.stats().draws, draws);
    assert!(shrunk.len() <= first.len());
    assert!(coinformation(&shrunk) < -0.3);
}

#[test]
fn test_unsatisfiable_predicate_reports_its_description() {
    let predicate = below("entropy", |_: &Distribution| 1.0, 0.0);
    let mut finder = ExampleFinder::new(Settings::default().with_max_examples(25));
    let err = finder.find(&distributions(2, 2), &predicate).unwrap_err();
    assert!(err.is_no_example_found());
    assert!(err.to_string().contains("entropy < 0"));
    assert_eq!(finder.stats().draws, 25);
}

#[derive(Debug, PartialEq)]
struct MeasureError(String);

#[test]
fn test_predicate_errors_are_returned_unchanged() {
    let predicate = fallible("fails on three variables", |d: &Distribution| {
        if d.outcome_length() == 3 {
            Err(MeasureError(format!("{} outcomes", d.len())))
        } else {
            Ok(false)
        }
    });
    let err = conjecture_find::find(&distributions(3, 2), &predicate).unwrap_err();
    let MeasureError(message) = err.into_predicate_error().unwrap();
    assert!(message.ends_with("outcomes"));
}

#[test]
fn test_predicate_is_only_called_with_shared_candidates() {
    let predicate = named("at least two events", |d: &Distribution| d.len() >= 2);
    let d = conjecture_find::find(&distributions(2, 2), &predicate).unwrap();
    assert_eq!(predicate.evaluate(&d), predicate.evaluate(&d));
    assert_eq!(d.len(), 2);
}
