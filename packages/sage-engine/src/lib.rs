//! Keyword intent matching over a knowledge-base snapshot.
//!
//! The matcher is a pure function of `(query, entries)`: it holds no state between calls, does no
//! I/O, and returns every entry with keyword evidence, ranked. Whether the top result counts as a
//! match is the caller's call; see [`decision`].

pub mod decision;
pub mod explain;
pub mod policy;
pub mod priority;
pub mod scorer;

mod rank;

pub use policy::ScoringPolicy;
pub use rank::{Matcher, RankedResult};

use sage_domain::KnowledgeEntry;

/// Ranks `entries` against `query` with the default scoring policy.
pub fn find_all_matches<'a>(query: &str, entries: &'a [KnowledgeEntry]) -> Vec<RankedResult<'a>> {
	Matcher::default().find_all_matches(query, entries)
}
