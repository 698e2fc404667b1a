use warui_llm::LlmError;
use warui_renshuu::RenshuuError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("Not enough terms: requested {requested}, available {available}")]
    InsufficientTerms { requested: usize, available: usize },

    #[error("Term weights cannot be sampled")]
    InvalidWeights,
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Language model error: {0}")]
    Llm(#[from] LlmError),

    #[error("Study service error: {0}")]
    Renshuu(#[from] RenshuuError),

    #[error(transparent)]
    Selection(#[from] SelectionError),
}

impl CoreError {
    /// Network or API failure of an external service
    pub fn is_transport(&self) -> bool {
        match self {
            CoreError::Llm(e) => !matches!(e, LlmError::InvalidResponse(_)),
            CoreError::Renshuu(e) => !e.is_data(),
            CoreError::Selection(_) => false,
        }
    }

    /// External service answered with an unexpected shape
    pub fn is_data(&self) -> bool {
        match self {
            CoreError::Llm(e) => matches!(e, LlmError::InvalidResponse(_)),
            CoreError::Renshuu(e) => e.is_data(),
            CoreError::Selection(_) => false,
        }
    }
}
