use std::{fs, path::PathBuf};

use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use sage_domain::KnowledgeBase;
use sage_engine::{Matcher, ScoringPolicy, decision::Decision};
use sage_eval::Args;
use sage_testkit::write_temp_file;

fn demos_dir() -> PathBuf {
	PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../demos")
}

#[test]
fn demo_dataset_is_fully_correct() {
	let config_path = demos_dir().join("config.toml");
	let config = sage_config::load(&config_path).expect("Demo config must be valid.");
	let kb_path = sage_cli::resolve_knowledge_base_path(None, &config, &config_path)
		.expect("Demo config must name a knowledge base.");
	let kb = KnowledgeBase::load(&kb_path).expect("Demo knowledge base must be valid.");
	let dataset = sage_eval::load_dataset(&demos_dir().join("eval_dataset.json"))
		.expect("Demo dataset must be valid.");
	let matcher = Matcher::new(ScoringPolicy::from_config(&config.scoring));
	let reports: Vec<_> = dataset
		.queries
		.iter()
		.enumerate()
		.map(|(idx, query)| {
			sage_eval::evaluate_query(&matcher, &kb, query, idx, config.decision.threshold, 3)
		})
		.collect();
	let summary = sage_eval::summarize(&reports);

	assert_eq!(summary.top1_accuracy, Some(1.0), "{reports:#?}");
	assert_eq!(summary.mean_rr, Some(1.0));
	assert_eq!(summary.decision_accuracy, Some(1.0), "{reports:#?}");
	assert_eq!(summary.unstable_queries, 0);

	let human = reports.iter().find(|report| report.id == "human").expect("Query exists.");

	assert_eq!(human.decision, Decision::Unmatched);
	assert_eq!(human.top_entry_id.as_deref(), Some("support"));
}

#[test]
fn empty_dataset_is_rejected() {
	let file = write_temp_file("sage_eval_dataset", "json", r#"{ "queries": [] }"#)
		.expect("Failed to write dataset.");
	let err = sage_eval::load_dataset(file.path()).expect_err("Expected empty dataset error.");

	assert!(err.to_string().contains("Dataset must include at least one query."), "{err}");
}

#[test]
fn run_writes_the_report_file() {
	let out = write_temp_file("sage_eval_out", "json", "").expect("Failed to reserve output file.");

	sage_eval::run(Args {
		config: demos_dir().join("config.toml"),
		knowledge_base: None,
		dataset: demos_dir().join("eval_dataset.json"),
		runs_per_query: 0,
		out: Some(out.path().to_path_buf()),
	})
	.expect("Evaluation must run.");

	let raw = fs::read_to_string(out.path()).expect("Failed to read report.");
	let report: serde_json::Value = serde_json::from_str(&raw).expect("Report must be JSON.");
	let kb = KnowledgeBase::load(&demos_dir().join("knowledge_base.json"))
		.expect("Demo knowledge base must be valid.");

	assert_eq!(report["dataset"]["name"], serde_json::json!("assistant-smoke"));
	assert_eq!(report["dataset"]["query_count"], serde_json::json!(8));
	assert_eq!(report["settings"]["runs_per_query"], serde_json::json!(1));
	assert_eq!(report["settings"]["threshold"], serde_json::json!(8.0));
	assert_eq!(
		report["settings"]["knowledge_base_fingerprint"],
		serde_json::json!(kb.fingerprint())
	);
	assert_eq!(report["summary"]["top1_accuracy"], serde_json::json!(1.0));
	assert_eq!(report["summary"]["unstable_queries"], serde_json::json!(0));

	let generated_at =
		report["settings"]["generated_at"].as_str().expect("Report must carry a timestamp.");

	OffsetDateTime::parse(generated_at, &Rfc3339).expect("Timestamp must be RFC 3339.");
}

#[test]
fn run_fails_on_a_missing_dataset() {
	let result = sage_eval::run(Args {
		config: demos_dir().join("config.toml"),
		knowledge_base: None,
		dataset: demos_dir().join("no_such_dataset.json"),
		runs_per_query: 1,
		out: None,
	});

	assert!(result.is_err());
}
