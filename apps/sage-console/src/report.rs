use serde::Serialize;

use sage_config::SampleQuery;
use sage_domain::{KnowledgeBase, diagnostics::KeywordReport, normalize};
use sage_engine::{
	Matcher, RankedResult,
	decision::{self, MatchDecision},
	explain::{self, MatchExplain, MatchTerm},
};

#[derive(Debug, Serialize)]
pub struct SnapshotInfo {
	pub entries: usize,
	pub active_entries: usize,
	pub fingerprint: String,
}
impl SnapshotInfo {
	pub fn of(kb: &KnowledgeBase) -> Self {
		Self { entries: kb.len(), active_entries: kb.active_count(), fingerprint: kb.fingerprint() }
	}

	fn short_fingerprint(&self) -> &str {
		self.fingerprint.get(..12).unwrap_or(&self.fingerprint)
	}
}

#[derive(Debug, Serialize)]
pub struct QueryReport<'a> {
	pub query: String,
	/// Words of the normalized query. Display only; matching uses the whole normalized string.
	pub tokens: Vec<String>,
	pub snapshot: SnapshotInfo,
	pub decision: MatchDecision,
	/// Candidates before `limit` was applied.
	pub total_candidates: usize,
	pub results: Vec<ResultView<'a>>,
}

#[derive(Debug, Serialize)]
pub struct ResultView<'a> {
	pub rank: usize,
	#[serde(flatten)]
	pub result: RankedResult<'a>,
	pub explain: MatchExplain,
}

#[derive(Debug, Serialize)]
pub struct SampleReport {
	pub query: String,
	pub category: Option<String>,
	pub decision: MatchDecision,
	pub candidates: usize,
	pub top_intent: Option<String>,
	pub top_terms: Vec<MatchTerm>,
}

/// The decision always sees every candidate; `limit` only trims what is shown.
pub fn query_report<'a>(
	matcher: &Matcher,
	kb: &'a KnowledgeBase,
	query: &str,
	threshold: f32,
	limit: usize,
) -> QueryReport<'a> {
	let results = matcher.find_all_matches(query, kb.entries());
	let decision = decision::decide(&results, threshold);
	let total_candidates = results.len();
	let results = results
		.into_iter()
		.take(limit)
		.enumerate()
		.map(|(idx, result)| {
			let explain = explain::explain(&result, matcher.policy());

			ResultView { rank: idx + 1, result, explain }
		})
		.collect();

	QueryReport {
		query: query.to_string(),
		tokens: normalize::tokenize(query),
		snapshot: SnapshotInfo::of(kb),
		decision,
		total_candidates,
		results,
	}
}

pub fn sample_reports(
	matcher: &Matcher,
	kb: &KnowledgeBase,
	samples: &[SampleQuery],
	threshold: f32,
) -> Vec<SampleReport> {
	samples
		.iter()
		.map(|sample| {
			let results = matcher.find_all_matches(&sample.query, kb.entries());
			let top = results.first();

			SampleReport {
				query: sample.query.clone(),
				category: sample.category.clone(),
				decision: decision::decide(&results, threshold),
				candidates: results.len(),
				top_intent: top.map(|result| result.entry.intent.clone()),
				top_terms: top
					.map(|result| explain::explain(result, matcher.policy()))
					.map(|breakdown| explain::strip_term_inputs(&breakdown.terms))
					.unwrap_or_default(),
			}
		})
		.collect()
}

pub fn render_query(report: &QueryReport<'_>) -> String {
	let mut lines = vec![
		format!("Query: {:?}", report.query),
		format!("Tokens: {}", report.tokens.join(" ")),
		format!(
			"Snapshot: {} entries ({} active), fingerprint {}",
			report.snapshot.entries,
			report.snapshot.active_entries,
			report.snapshot.short_fingerprint()
		),
		render_decision(&report.decision),
	];

	for view in &report.results {
		let entry = view.result.entry;

		lines.push(String::new());
		lines.push(format!(
			"#{:<3} {}  [{}] {}",
			view.rank, entry.id, entry.category, entry.intent
		));
		lines.push(format!("     keywords: {}", view.result.matched_keywords.join(", ")));
		lines.push(format!(
			"     score: {:.2} x {:.2} = {:.2}",
			view.result.base_score, view.result.priority_multiplier, view.result.score
		));
	}

	let hidden = report.total_candidates.saturating_sub(report.results.len());

	if hidden > 0 {
		lines.push(String::new());
		lines.push(format!("... {hidden} more candidate(s) below the display limit."));
	}

	lines.join("\n")
}

pub fn render_samples(samples: &[SampleReport]) -> String {
	samples
		.iter()
		.map(|sample| {
			let score =
				sample.decision.top_score.map(|score| format!("{score:.2}")).unwrap_or("-".into());
			let top = sample.decision.top_entry_id.as_deref().unwrap_or("-");
			let category = sample
				.category
				.as_deref()
				.map(|category| format!(" ({category})"))
				.unwrap_or_default();

			format!(
				"{:<9} {:>7} {:<24} {:?}{}",
				sample.decision.decision.as_label(),
				score,
				top,
				sample.query,
				category
			)
		})
		.collect::<Vec<_>>()
		.join("\n")
}

pub fn render_keyword_report(report: &KeywordReport, kb: &KnowledgeBase) -> String {
	let snapshot = SnapshotInfo::of(kb);
	let categories = report
		.categories
		.iter()
		.map(|count| format!("{} {}", count.category, count.active_entries))
		.collect::<Vec<_>>()
		.join(", ");
	let mut lines = vec![
		format!(
			"Snapshot: {} entries ({} active), fingerprint {}",
			report.total_entries,
			report.active_entries,
			snapshot.short_fingerprint()
		),
		format!(
			"Keywords: {} declared, {} distinct",
			report.total_keywords, report.distinct_keywords
		),
		format!("Categories: {categories}"),
		String::new(),
		format!("Low coverage ({}):", report.low_coverage.len()),
	];

	for low in &report.low_coverage {
		let note = if low.unreachable { " (unreachable)" } else { "" };

		lines.push(format!(
			"  {}  {:?}  {} keyword(s){note}",
			low.id, low.intent, low.matchable_keywords
		));
	}

	lines.push(format!("Shared keywords ({}):", report.shared_keywords.len()));

	for shared in &report.shared_keywords {
		lines.push(format!("  {:?} -> {}", shared.keyword, shared.entry_ids.join(", ")));
	}

	lines.push(format!("Short keywords ({}):", report.short_keywords.len()));

	for short in &report.short_keywords {
		lines.push(format!("  {:?} -> {}", short.keyword, short.entry_ids.join(", ")));
	}

	lines.join("\n")
}

fn render_decision(decision: &MatchDecision) -> String {
	match decision.top_score {
		Some(score) => format!(
			"Decision: {} (top {:.2} vs threshold {:.2})",
			decision.decision, score, decision.threshold
		),
		None => format!("Decision: {} (no candidates)", decision.decision),
	}
}
