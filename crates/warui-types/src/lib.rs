pub mod chat;
pub mod types;

pub use chat::{ChatTurn, HistoryMessage, Role};
pub use types::{Level, Schedule, StudyCounters, Term, TermType};
