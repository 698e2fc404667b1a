use std::collections::{HashMap, HashSet};

use warui_types::TermType;

use super::term;
use crate::error::SelectionError;
use crate::weighting::{
    WeightOptions, compute_weights, focus_rng, select_focus_terms, select_focus_terms_with_rng,
};

fn mixed_terms() -> Vec<warui_types::Term> {
    vec![
        term("v1", TermType::Vocab, 0),
        term("v2", TermType::Vocab, 50),
        term("v3", TermType::Vocab, 100),
        term("v4", TermType::Vocab, 90),
        term("k1", TermType::Kanji, 20),
        term("g1", TermType::Grammar, 70),
        term("g2", TermType::Grammar, 10),
    ]
}

#[test]
fn test_normalized_weights_sum_to_one() {
    let weights = compute_weights(&mixed_terms(), WeightOptions::default());
    assert_eq!(weights.len(), 7);
    assert!((weights.iter().sum::<f64>() - 1.0).abs() < 1e-9);
}

#[test]
fn test_each_type_gets_equal_share() {
    let terms = mixed_terms();
    let weights = compute_weights(&terms, WeightOptions::default());

    let mut per_type: HashMap<TermType, f64> = HashMap::new();
    for (term, weight) in terms.iter().zip(&weights) {
        *per_type.entry(term.term_type).or_default() += weight;
    }

    assert_eq!(per_type.len(), 3);
    for share in per_type.values() {
        assert!((share - 1.0 / 3.0).abs() < 1e-9);
    }
}

#[test]
fn test_unnormalized_weights_sum_to_one_per_type() {
    let weights = compute_weights(
        &mixed_terms(),
        WeightOptions {
            normalize: false,
            ..WeightOptions::default()
        },
    );
    assert!((weights.iter().sum::<f64>() - 3.0).abs() < 1e-9);
    // lone kanji term holds its type's whole share
    assert!((weights[4] - 1.0).abs() < 1e-9);
}

#[test]
fn test_low_mastery_weighs_more() {
    let terms = vec![
        term("a", TermType::Vocab, 0),
        term("b", TermType::Vocab, 100),
    ];
    let weights = compute_weights(&terms, WeightOptions::default());

    // raw 130 vs 30
    assert!((weights[0] - 130.0 / 160.0).abs() < 1e-9);
    assert!((weights[1] - 30.0 / 160.0).abs() < 1e-9);
}

#[test]
fn test_min_raw_weight_floor() {
    let terms = vec![
        term("a", TermType::Kanji, 100),
        term("b", TermType::Kanji, 100),
    ];
    let weights = compute_weights(
        &terms,
        WeightOptions {
            min_raw_weight: 0,
            normalize: true,
        },
    );
    // nothing left to weigh
    assert_eq!(weights, vec![0.0, 0.0]);
}

#[test]
fn test_empty_terms() {
    assert!(compute_weights(&[], WeightOptions::default()).is_empty());
    assert!(select_focus_terms(&[], 0, Some(1)).unwrap().is_empty());
}

#[test]
fn test_select_distinct_exact_count() {
    let terms = mixed_terms();

    for seed in 0..50 {
        let selected = select_focus_terms(&terms, 5, Some(seed)).unwrap();
        assert_eq!(selected.len(), 5);

        let ids: HashSet<&str> = selected.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids.len(), 5);
    }
}

#[test]
fn test_select_all_terms() {
    let terms = mixed_terms();
    let selected = select_focus_terms(&terms, terms.len(), None).unwrap();

    let mut ids: Vec<&str> = selected.iter().map(|t| t.id.as_str()).collect();
    ids.sort();
    let mut expected: Vec<&str> = terms.iter().map(|t| t.id.as_str()).collect();
    expected.sort();
    assert_eq!(ids, expected);
}

#[test]
fn test_select_more_than_available() {
    let terms = mixed_terms();
    let err = select_focus_terms(&terms, 8, Some(3)).unwrap_err();
    assert_eq!(
        err,
        SelectionError::InsufficientTerms {
            requested: 8,
            available: 7
        }
    );
}

#[test]
fn test_same_seed_same_draw() {
    let terms = mixed_terms();
    let first = select_focus_terms(&terms, 4, Some(42)).unwrap();
    let second = select_focus_terms(&terms, 4, Some(42)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_unsampleable_weights() {
    let terms = vec![term("a", TermType::Vocab, 100)];
    let options = WeightOptions {
        min_raw_weight: 0,
        normalize: true,
    };
    let err = select_focus_terms_with_rng(&terms, 1, options, &mut focus_rng(Some(0))).unwrap_err();
    assert_eq!(err, SelectionError::InvalidWeights);
}

#[test]
fn test_draw_favors_low_mastery() {
    let terms = vec![
        term("weak", TermType::Vocab, 0),
        term("strong", TermType::Vocab, 100),
    ];

    let mut rng = focus_rng(Some(7));
    let weak_first = (0..2000)
        .filter(|_| {
            let pick = select_focus_terms_with_rng(&terms, 1, WeightOptions::default(), &mut rng)
                .unwrap();
            pick[0].id == "weak"
        })
        .count();

    // expected share 130/160 ~ 0.81
    assert!(weak_first > 1400 && weak_first < 1850, "{weak_first}");
}
