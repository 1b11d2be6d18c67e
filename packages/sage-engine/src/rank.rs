use serde::Serialize;

use crate::{ScoringPolicy, priority, scorer};
use sage_domain::{KnowledgeEntry, normalize};

/// One candidate answer with its score breakdown.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RankedResult<'a> {
	pub entry: &'a KnowledgeEntry,
	/// Index of `entry` in the snapshot passed to the matcher; breaks score ties.
	pub position: usize,
	pub matched_keywords: Vec<&'a str>,
	pub occurrences: Vec<usize>,
	pub base_score: f32,
	pub priority_multiplier: f32,
	/// `base_score * priority_multiplier`.
	pub score: f32,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Matcher {
	policy: ScoringPolicy,
}
impl Matcher {
	pub fn new(policy: ScoringPolicy) -> Self {
		Self { policy }
	}

	pub fn policy(&self) -> &ScoringPolicy {
		&self.policy
	}

	/// Every active entry with at least one fired keyword, best first.
	///
	/// Inactive entries are skipped here, so callers may pass a whole snapshot. Order is by score
	/// descending, then by snapshot position ascending, which makes the output a function of the
	/// inputs alone.
	pub fn find_all_matches<'a>(
		&self,
		query: &str,
		entries: &'a [KnowledgeEntry],
	) -> Vec<RankedResult<'a>> {
		let normalized_query = normalize::normalize(query);

		if normalized_query.is_empty() || entries.is_empty() {
			tracing::debug!(entries = entries.len(), "Skipped intent match for empty input.");

			return Vec::new();
		}

		let mut results = Vec::new();

		for (position, entry) in entries.iter().enumerate() {
			if !entry.active {
				continue;
			}

			let Some(evidence) =
				scorer::score_keywords(&normalized_query, entry, self.policy.keyword_weight)
			else {
				continue;
			};
			let priority_multiplier =
				priority::priority_multiplier(entry.priority, self.policy.priority_step);

			results.push(RankedResult {
				entry,
				position,
				score: evidence.base_score * priority_multiplier,
				matched_keywords: evidence.matched_keywords,
				occurrences: evidence.occurrences,
				base_score: evidence.base_score,
				priority_multiplier,
			});
		}

		sort_results(&mut results);

		tracing::debug!(
			entries = entries.len(),
			results = results.len(),
			top_score = results.first().map(|result| result.score),
			"Intent match completed."
		);

		results
	}
}

fn sort_results(results: &mut [RankedResult<'_>]) {
	results.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.position.cmp(&b.position)));
}

#[cfg(test)]
mod tests {
	use super::*;

	fn assert_shareable<T: Clone + Send + Sync>() {}

	#[test]
	fn matcher_and_results_are_thread_safe() {
		assert_shareable::<Matcher>();
		assert_shareable::<RankedResult<'static>>();
	}
}
