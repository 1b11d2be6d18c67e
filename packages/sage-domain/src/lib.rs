pub mod diagnostics;
pub mod entry;
pub mod knowledge_base;
pub mod normalize;

mod error;

pub use error::{Error, Result};
pub use entry::{Category, KnowledgeEntry, MAX_PRIORITY, MIN_PRIORITY, MatchableKeyword};
pub use knowledge_base::KnowledgeBase;
