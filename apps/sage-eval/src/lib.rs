use std::{
	fs,
	path::{Path, PathBuf},
	time::Instant,
};

use clap::Parser;
use color_eyre::eyre;
use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use sage_domain::KnowledgeBase;
use sage_engine::{
	Matcher, RankedResult, ScoringPolicy,
	decision::{self, Decision},
};

#[derive(Debug, Parser)]
#[command(
	version = sage_cli::VERSION,
	rename_all = "kebab",
	styles = sage_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
	#[arg(long, short = 'k', value_name = "FILE")]
	pub knowledge_base: Option<PathBuf>,
	#[arg(long, short = 'd', value_name = "FILE")]
	pub dataset: PathBuf,
	#[arg(long, value_name = "N", default_value_t = 1)]
	pub runs_per_query: u32,
	#[arg(long, value_name = "FILE")]
	pub out: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
pub struct EvalDataset {
	pub name: Option<String>,
	pub queries: Vec<EvalQuery>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct EvalQuery {
	pub id: Option<String>,
	pub query: String,
	/// Entry that should rank first.
	pub expected_entry_id: Option<String>,
	/// Whether the top result should clear the threshold.
	pub expect_matched: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct EvalOutput {
	pub dataset: EvalDatasetInfo,
	pub settings: EvalSettings,
	pub summary: EvalSummary,
	pub queries: Vec<QueryReport>,
}

#[derive(Debug, Serialize)]
pub struct EvalDatasetInfo {
	pub name: String,
	pub query_count: usize,
}

#[derive(Debug, Serialize)]
pub struct EvalSettings {
	pub config_path: String,
	pub threshold: f32,
	pub scoring: ScoringPolicy,
	pub runs_per_query: u32,
	pub knowledge_base_entries: usize,
	pub knowledge_base_fingerprint: String,
	pub generated_at: String,
}

#[derive(Debug, Serialize)]
pub struct EvalSummary {
	/// Over queries with `expected_entry_id`.
	pub top1_accuracy: Option<f64>,
	pub mean_rr: Option<f64>,
	/// Over queries with `expect_matched`.
	pub decision_accuracy: Option<f64>,
	pub matched_rate: f64,
	pub latency_us_p50: f64,
	pub latency_us_p95: f64,
	pub unstable_queries: usize,
}

#[derive(Clone, Debug, Serialize)]
pub struct QueryReport {
	pub id: String,
	pub query: String,
	pub top_entry_id: Option<String>,
	pub top_score: Option<f32>,
	pub decision: Decision,
	pub candidates: usize,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub expected_entry_id: Option<String>,
	/// 1-based rank of `expected_entry_id`, if it was returned at all.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub expected_rank: Option<usize>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub expect_matched: Option<bool>,
	/// Every run returned the same ids with bit-identical scores.
	pub stable: bool,
	/// Mean over runs.
	pub latency_us: f64,
}

pub fn run(args: Args) -> color_eyre::Result<()> {
	let config = sage_config::load(&args.config)?;

	sage_cli::init_tracing(&config);

	let kb_path = sage_cli::resolve_knowledge_base_path(
		args.knowledge_base.as_deref(),
		&config,
		&args.config,
	)?;
	let kb = KnowledgeBase::load(&kb_path)?;
	let dataset = load_dataset(&args.dataset)?;
	let matcher = Matcher::new(ScoringPolicy::from_config(&config.scoring));
	let runs_per_query = args.runs_per_query.max(1);
	let queries = dataset
		.queries
		.iter()
		.enumerate()
		.map(|(idx, query)| {
			evaluate_query(&matcher, &kb, query, idx, config.decision.threshold, runs_per_query)
		})
		.collect::<Vec<_>>();
	let summary = summarize(&queries);

	if summary.unstable_queries > 0 {
		tracing::warn!(unstable = summary.unstable_queries, "Unstable rankings detected.");
	}

	let output = EvalOutput {
		dataset: EvalDatasetInfo {
			name: dataset.name.clone().unwrap_or_else(|| args.dataset.display().to_string()),
			query_count: queries.len(),
		},
		settings: EvalSettings {
			config_path: args.config.display().to_string(),
			threshold: config.decision.threshold,
			scoring: *matcher.policy(),
			runs_per_query,
			knowledge_base_entries: kb.len(),
			knowledge_base_fingerprint: kb.fingerprint(),
			generated_at: OffsetDateTime::now_utc().format(&Rfc3339)?,
		},
		summary,
		queries,
	};
	let json = serde_json::to_string_pretty(&output)?;

	match args.out.as_ref() {
		Some(path) => {
			fs::write(path, &json)?;

			tracing::info!(path = %path.display(), "Evaluation report written.");
		},
		None => println!("{json}"),
	}

	Ok(())
}

pub fn load_dataset(path: &Path) -> color_eyre::Result<EvalDataset> {
	let raw = fs::read_to_string(path)?;
	let dataset: EvalDataset = serde_json::from_str(&raw)?;

	if dataset.queries.is_empty() {
		return Err(eyre::eyre!("Dataset must include at least one query."));
	}

	Ok(dataset)
}

pub fn evaluate_query(
	matcher: &Matcher,
	kb: &KnowledgeBase,
	query: &EvalQuery,
	idx: usize,
	threshold: f32,
	runs_per_query: u32,
) -> QueryReport {
	let runs = runs_per_query.max(1);
	let mut first: Option<Vec<RankedResult<'_>>> = None;
	let mut first_signature = Vec::new();
	let mut stable = true;
	let mut latency_total_us = 0.0_f64;

	for _ in 0..runs {
		let start = Instant::now();
		let results = matcher.find_all_matches(&query.query, kb.entries());

		latency_total_us += start.elapsed().as_secs_f64() * 1_000_000.0;

		let signature = ranking_signature(&results);

		if first.is_none() {
			first_signature = signature;
			first = Some(results);
		} else if signature != first_signature {
			stable = false;
		}
	}

	let results = first.unwrap_or_default();
	let decision = decision::decide(&results, threshold);
	let expected_rank = query.expected_entry_id.as_deref().and_then(|expected| {
		results.iter().position(|result| result.entry.id == expected).map(|idx| idx + 1)
	});

	QueryReport {
		id: query.id.clone().unwrap_or_else(|| format!("q{}", idx + 1)),
		query: query.query.clone(),
		top_entry_id: decision.top_entry_id,
		top_score: decision.top_score,
		decision: decision.decision,
		candidates: results.len(),
		expected_entry_id: query.expected_entry_id.clone(),
		expected_rank,
		expect_matched: query.expect_matched,
		stable,
		latency_us: latency_total_us / runs as f64,
	}
}

pub fn summarize(queries: &[QueryReport]) -> EvalSummary {
	let labelled: Vec<&QueryReport> =
		queries.iter().filter(|query| query.expected_entry_id.is_some()).collect();
	let (top1_accuracy, mean_rr) = if labelled.is_empty() {
		(None, None)
	} else {
		let hits = labelled.iter().filter(|query| query.expected_rank == Some(1)).count();
		let rr_sum: f64 = labelled.iter().map(|query| reciprocal_rank(query.expected_rank)).sum();

		(Some(hits as f64 / labelled.len() as f64), Some(rr_sum / labelled.len() as f64))
	};
	let decided: Vec<(bool, Decision)> = queries
		.iter()
		.filter_map(|query| query.expect_matched.map(|expected| (expected, query.decision)))
		.collect();
	let decision_accuracy = if decided.is_empty() {
		None
	} else {
		let correct = decided
			.iter()
			.filter(|(expected, decision)| *expected == (*decision == Decision::Matched))
			.count();

		Some(correct as f64 / decided.len() as f64)
	};
	let matched = queries.iter().filter(|query| query.decision == Decision::Matched).count();
	let matched_rate =
		if queries.is_empty() { 0.0 } else { matched as f64 / queries.len() as f64 };
	let mut latencies: Vec<f64> = queries.iter().map(|query| query.latency_us).collect();

	latencies.sort_by(f64::total_cmp);

	EvalSummary {
		top1_accuracy,
		mean_rr,
		decision_accuracy,
		matched_rate,
		latency_us_p50: percentile(&latencies, 0.50),
		latency_us_p95: percentile(&latencies, 0.95),
		unstable_queries: queries.iter().filter(|query| !query.stable).count(),
	}
}

fn reciprocal_rank(rank: Option<usize>) -> f64 {
	match rank {
		Some(rank) if rank > 0 => 1.0 / rank as f64,
		_ => 0.0,
	}
}

fn ranking_signature(results: &[RankedResult<'_>]) -> Vec<(String, u32)> {
	results.iter().map(|result| (result.entry.id.clone(), result.score.to_bits())).collect()
}

fn percentile(values: &[f64], percentile: f64) -> f64 {
	if values.is_empty() {
		return 0.0;
	}

	let clamped = percentile.clamp(0.0, 1.0);
	let pos = clamped * (values.len() as f64 - 1.0);
	let lower = pos.floor() as usize;
	let upper = pos.ceil() as usize;

	if lower == upper {
		values[lower]
	} else {
		let weight = pos - lower as f64;

		values[lower] * (1.0 - weight) + values[upper] * weight
	}
}
