pub mod chat_log;
pub mod error;
pub mod interlocutor;
pub mod weighting;

pub use chat_log::TrimPolicy;
pub use error::{CoreError, SelectionError};
pub use interlocutor::{AdaptiveInterlocutor, ConversationState, Interlocutor, InterlocutorSettings};
pub use weighting::{WeightOptions, compute_weights, select_focus_terms};

use warui_renshuu::{TermQuery, TermSource};
use warui_types::Term;

/// Fetch the terms matching `query` and draw a focus set from them
pub async fn gather_focus_terms<S: TermSource + ?Sized>(
    source: &S,
    query: &TermQuery,
    n_terms: usize,
    options: WeightOptions,
    seed: Option<u64>,
) -> Result<Vec<Term>, CoreError> {
    let terms = warui_renshuu::fetch_terms_for_levels(source, query).await?;
    let mut rng = weighting::focus_rng(seed);
    let focus_terms = weighting::select_focus_terms_with_rng(&terms, n_terms, options, &mut rng)?;

    Ok(focus_terms)
}

#[cfg(test)]
mod tests;
