//! Mastery-based focus term selection.
//!
//! Terms the student knows poorly get larger weights, but every term keeps a
//! floor weight so well-known terms still come up for review. Weights are
//! balanced per term type so a schedule with hundreds of vocabulary entries
//! does not crowd out a handful of grammar points.

use std::collections::HashMap;

use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use warui_types::{Term, TermType};

use crate::error::SelectionError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightOptions {
    /// Added to every raw weight
    pub min_raw_weight: u32,
    /// Scale the weights to sum to 1
    pub normalize: bool,
}

impl Default for WeightOptions {
    fn default() -> Self {
        Self {
            min_raw_weight: 30,
            normalize: true,
        }
    }
}

fn raw_weight(mastery: u8, min_raw_weight: u32) -> f64 {
    (100 - i32::from(mastery)).max(0) as f64 + f64::from(min_raw_weight)
}

/// One weight per term, in input order.
///
/// Within each type the weights sum to 1 before the optional overall
/// normalization, so every type present gets the same total share.
pub fn compute_weights(terms: &[Term], options: WeightOptions) -> Vec<f64> {
    let raw: Vec<f64> = terms
        .iter()
        .map(|t| raw_weight(t.mastery, options.min_raw_weight))
        .collect();

    let mut type_totals: HashMap<TermType, f64> = HashMap::new();
    for (term, weight) in terms.iter().zip(&raw) {
        *type_totals.entry(term.term_type).or_default() += weight;
    }

    let mut weights: Vec<f64> = terms
        .iter()
        .zip(raw)
        .map(|(term, weight)| {
            let total = type_totals[&term.term_type];
            if total > 0.0 { weight / total } else { 0.0 }
        })
        .collect();

    if options.normalize {
        let sum: f64 = weights.iter().sum();
        if sum > 0.0 {
            weights.iter_mut().for_each(|w| *w /= sum);
        }
    }

    weights
}

/// Random generator for a draw: seeded for reproducible runs, OS entropy otherwise
pub fn focus_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

/// Draw `n_terms` distinct terms with default weighting
pub fn select_focus_terms(
    terms: &[Term],
    n_terms: usize,
    seed: Option<u64>,
) -> Result<Vec<Term>, SelectionError> {
    select_focus_terms_with_rng(terms, n_terms, WeightOptions::default(), &mut focus_rng(seed))
}

/// Draw `n_terms` distinct terms without replacement.
///
/// Each draw picks from the remaining terms in proportion to their weights,
/// then removes the pick from the pool.
pub fn select_focus_terms_with_rng<R: Rng + ?Sized>(
    terms: &[Term],
    n_terms: usize,
    options: WeightOptions,
    rng: &mut R,
) -> Result<Vec<Term>, SelectionError> {
    if n_terms > terms.len() {
        return Err(SelectionError::InsufficientTerms {
            requested: n_terms,
            available: terms.len(),
        });
    }

    let mut weights = compute_weights(terms, options);
    let mut pool: Vec<usize> = (0..terms.len()).collect();
    let mut selected = Vec::with_capacity(n_terms);

    for _ in 0..n_terms {
        let index = WeightedIndex::new(&weights).map_err(|_| SelectionError::InvalidWeights)?;
        let pick = index.sample(rng);

        selected.push(terms[pool.remove(pick)].clone());
        weights.remove(pick);
    }

    tracing::info!(
        "Selected {} focus terms from {} candidates",
        selected.len(),
        terms.len()
    );

    Ok(selected)
}
