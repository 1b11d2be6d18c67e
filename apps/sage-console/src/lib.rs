pub mod report;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre;

use sage_domain::{Category, KnowledgeBase, diagnostics};
use sage_engine::{Matcher, ScoringPolicy};

#[derive(Debug, Parser)]
#[command(
	version = sage_cli::VERSION,
	rename_all = "kebab",
	styles = sage_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
	/// Overrides `knowledge_base.path` from the config.
	#[arg(long, short = 'k', value_name = "FILE")]
	pub knowledge_base: Option<PathBuf>,
	#[command(subcommand)]
	pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
	/// Rank the knowledge base against one query.
	Query {
		text: String,
		#[arg(long)]
		json: bool,
		#[arg(long, value_name = "N")]
		limit: Option<u32>,
		/// Match only entries of this category.
		#[arg(long, value_name = "CATEGORY")]
		category: Option<String>,
	},
	/// Run the sample query library from the config.
	Samples {
		#[arg(long)]
		json: bool,
	},
	/// Report keyword coverage, shared keywords and short keywords.
	Analyze {
		#[arg(long)]
		json: bool,
	},
}

pub fn run(args: Args) -> color_eyre::Result<()> {
	let output = execute(args)?;

	println!("{output}");

	Ok(())
}

/// Runs one command and returns what `run` prints.
pub fn execute(args: Args) -> color_eyre::Result<String> {
	let config = sage_config::load(&args.config)?;

	sage_cli::init_tracing(&config);

	let kb_path = sage_cli::resolve_knowledge_base_path(
		args.knowledge_base.as_deref(),
		&config,
		&args.config,
	)?;
	let kb = KnowledgeBase::load(&kb_path)?;
	let matcher = Matcher::new(ScoringPolicy::from_config(&config.scoring));
	let output = match args.command {
		Command::Query { text, json, limit, category } => {
			let kb = match category {
				Some(category) => kb.with_category(category.parse::<Category>()?),
				None => kb,
			};
			let limit = limit.unwrap_or(config.console.max_results).min(config.console.max_results);
			let threshold = config.decision.threshold;
			let report = report::query_report(&matcher, &kb, &text, threshold, limit as usize);

			tracing::info!(
				query = %text,
				decision = %report.decision.decision,
				candidates = report.total_candidates,
				"Query evaluated."
			);

			if json {
				serde_json::to_string_pretty(&report)?
			} else {
				report::render_query(&report)
			}
		},
		Command::Samples { json } => {
			if config.samples.queries.is_empty() {
				return Err(eyre::eyre!("No [[samples.queries]] configured."));
			}

			let samples = report::sample_reports(
				&matcher,
				&kb,
				&config.samples.queries,
				config.decision.threshold,
			);

			if json {
				serde_json::to_string_pretty(&samples)?
			} else {
				report::render_samples(&samples)
			}
		},
		Command::Analyze { json } => {
			let keyword_report = diagnostics::analyze_keywords(kb.entries(), &config.diagnostics);

			if json {
				serde_json::to_string_pretty(&keyword_report)?
			} else {
				report::render_keyword_report(&keyword_report, &kb)
			}
		},
	};

	Ok(output)
}
