//! Keyword analyzer.
//!
//! Reads a snapshot on its own, without calling the matcher, and reports the data-quality
//! conditions operators tune against: entries that can barely or never match, keywords shared by
//! several intents, and keywords short enough to fire inside unrelated words.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::{Category, KnowledgeEntry};

#[derive(Clone, Debug, Serialize)]
pub struct KeywordReport {
	pub total_entries: usize,
	pub active_entries: usize,
	/// Declared keywords over active entries, blanks and duplicates included.
	pub total_keywords: usize,
	pub distinct_keywords: usize,
	pub categories: Vec<CategoryCount>,
	pub low_coverage: Vec<LowCoverageEntry>,
	pub shared_keywords: Vec<SharedKeyword>,
	pub short_keywords: Vec<ShortKeyword>,
}

#[derive(Clone, Debug, Serialize)]
pub struct CategoryCount {
	pub category: Category,
	pub active_entries: usize,
}

#[derive(Clone, Debug, Serialize)]
pub struct LowCoverageEntry {
	pub id: String,
	pub intent: String,
	pub matchable_keywords: usize,
	/// No matchable keyword at all: no query can reach this entry.
	pub unreachable: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct SharedKeyword {
	pub keyword: String,
	pub entry_ids: Vec<String>,
	pub intents: Vec<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct ShortKeyword {
	pub keyword: String,
	pub entry_ids: Vec<String>,
}

pub fn analyze_keywords(
	entries: &[KnowledgeEntry],
	cfg: &sage_config::Diagnostics,
) -> KeywordReport {
	let min_keywords = cfg.low_coverage_min_keywords as usize;
	let short_max = cfg.short_keyword_max_chars as usize;
	let mut active_entries = 0_usize;
	let mut total_keywords = 0_usize;
	let mut per_category: BTreeMap<Category, usize> = BTreeMap::new();
	let mut low_coverage = Vec::new();
	let mut owners: BTreeMap<String, Vec<&KnowledgeEntry>> = BTreeMap::new();

	for entry in entries.iter().filter(|entry| entry.active) {
		active_entries += 1;
		total_keywords += entry.keywords.len();

		*per_category.entry(entry.category).or_default() += 1;

		let matchable = entry.matchable_keywords();

		if matchable.len() < min_keywords {
			low_coverage.push(LowCoverageEntry {
				id: entry.id.clone(),
				intent: entry.intent.clone(),
				matchable_keywords: matchable.len(),
				unreachable: matchable.is_empty(),
			});
		}

		for keyword in matchable {
			owners.entry(keyword.normalized).or_default().push(entry);
		}
	}

	let categories = Category::ALL
		.into_iter()
		.map(|category| CategoryCount {
			category,
			active_entries: per_category.get(&category).copied().unwrap_or(0),
		})
		.collect();
	let mut shared_keywords = Vec::new();
	let mut short_keywords = Vec::new();

	for (keyword, owned_by) in &owners {
		if owned_by.len() > 1 {
			shared_keywords.push(SharedKeyword {
				keyword: keyword.clone(),
				entry_ids: owned_by.iter().map(|entry| entry.id.clone()).collect(),
				intents: owned_by.iter().map(|entry| entry.intent.clone()).collect(),
			});
		}
		if keyword.chars().count() <= short_max {
			short_keywords.push(ShortKeyword {
				keyword: keyword.clone(),
				entry_ids: owned_by.iter().map(|entry| entry.id.clone()).collect(),
			});
		}
	}

	KeywordReport {
		total_entries: entries.len(),
		active_entries,
		total_keywords,
		distinct_keywords: owners.len(),
		categories,
		low_coverage,
		shared_keywords,
		short_keywords,
	}
}
