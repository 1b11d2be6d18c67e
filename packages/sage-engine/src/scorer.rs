//! Keyword evidence for one entry.
//!
//! A keyword fires when its normalized form is a literal substring of the normalized query. This
//! lets "wallet?" match `wallet` and multi-word phrases match without tokenization, and it also
//! lets short keywords fire inside longer words ("fx" in "fxpro"). Keyword text is never compiled
//! into a pattern.

use sage_domain::KnowledgeEntry;

#[derive(Clone, Debug, PartialEq)]
pub struct KeywordEvidence<'a> {
	/// Fired keywords as declared, in declaration order.
	pub matched_keywords: Vec<&'a str>,
	/// Non-overlapping occurrences of each fired keyword in the query. Reported, never scored.
	pub occurrences: Vec<usize>,
	pub base_score: f32,
}

/// `None` when no keyword of `entry` fires.
///
/// `normalized_query` must already be normalized; keywords are normalized here. Repeated
/// keywords count once.
pub fn score_keywords<'a>(
	normalized_query: &str,
	entry: &'a KnowledgeEntry,
	keyword_weight: f32,
) -> Option<KeywordEvidence<'a>> {
	if normalized_query.is_empty() {
		return None;
	}

	let mut matched_keywords = Vec::new();
	let mut occurrences = Vec::new();

	for keyword in entry.matchable_keywords() {
		let count = normalized_query.matches(keyword.normalized.as_str()).count();

		if count == 0 {
			continue;
		}

		matched_keywords.push(keyword.declared);
		occurrences.push(count);
	}

	if matched_keywords.is_empty() {
		return None;
	}

	let base_score = matched_keywords.len() as f32 * keyword_weight;

	Some(KeywordEvidence { matched_keywords, occurrences, base_score })
}
