use sage_domain::{Category, Error, KnowledgeBase, diagnostics, normalize};
use sage_testkit::{EntryBuilder, entry, sample_entries, write_knowledge_base, write_temp_file};

fn diagnostics_config() -> sage_config::Diagnostics {
	sage_config::Diagnostics { low_coverage_min_keywords: 2, short_keyword_max_chars: 3 }
}

#[test]
fn loads_wrapped_snapshot() {
	let file = write_knowledge_base(&sample_entries()).expect("Failed to write snapshot.");
	let kb = KnowledgeBase::load(file.path()).expect("Failed to load snapshot.");

	assert_eq!(kb.len(), 8);
	assert_eq!(kb.active_count(), 7);
	assert_eq!(kb.entries()[0].id, "wallet-balance");
	assert_eq!(kb.get("stop-loss").map(|entry| entry.priority), Some(8));
}

#[test]
fn loads_bare_array_snapshot() {
	let raw = r#"[
		{
			"id": "1",
			"intent": "check wallet balance",
			"category": "platform",
			"keywords": ["wallet", "balance"],
			"answer": "See the Wallet tab.",
			"priority": 5,
			"active": true
		},
		{
			"id": "2",
			"intent": "wallet overview",
			"category": "platform",
			"keywords": ["wallet"],
			"answer": "The wallet holds your funds.",
			"priority": 9
		}
	]"#;
	let file = write_temp_file("sage_kb", "json", raw).expect("Failed to write snapshot.");
	let kb = KnowledgeBase::load(file.path()).expect("Failed to load snapshot.");

	assert_eq!(kb.len(), 2);
	assert!(kb.entries().iter().all(|entry| entry.active));
}

#[test]
fn loads_numeric_ids_in_both_shapes() {
	let record = r#"{ "id": 7, "intent": "check wallet balance", "category": "platform",
		"keywords": ["wallet"], "answer": "See the Wallet tab.", "priority": 5 }"#;

	for raw in [format!("[{record}]"), format!("{{ \"entries\": [{record}] }}")] {
		let file = write_temp_file("sage_kb", "json", &raw).expect("Failed to write snapshot.");
		let kb = KnowledgeBase::load(file.path()).expect("Numeric ids must load.");

		assert_eq!(kb.entries()[0].id, "7");
		assert!(kb.get("7").is_some());
	}
}

#[test]
fn rejects_duplicate_ids() {
	let err = KnowledgeBase::new(vec![entry("a", &["x"], 5), entry("a", &["y"], 5)])
		.expect_err("Expected duplicate id error.");

	assert!(err.to_string().contains("entries[1].id \"a\" is a duplicate."), "Unexpected: {err}");
}

#[test]
fn rejects_out_of_range_priority() {
	for priority in [0_u8, 11] {
		let err = KnowledgeBase::new(vec![entry("a", &["x"], priority)])
			.expect_err("Expected priority range error.");

		assert!(
			err.to_string().contains("entries[0].priority must be in the range 1-10."),
			"Unexpected error for priority {priority}: {err}"
		);
	}
}

#[test]
fn rejects_blank_id_and_intent() {
	let err = KnowledgeBase::new(vec![entry(" ", &["x"], 5)]).expect_err("Expected id error.");

	assert!(err.to_string().contains("entries[0].id must be non-empty."), "Unexpected: {err}");

	let err = KnowledgeBase::new(vec![EntryBuilder::new("a").intent("").keywords(&["x"]).build()])
		.expect_err("Expected intent error.");

	assert!(err.to_string().contains("entries[0].intent must be non-empty."), "Unexpected: {err}");
}

#[test]
fn reports_parse_errors_with_path() {
	let file = write_temp_file("sage_kb", "json", "{ \"entries\": 3 }")
		.expect("Failed to write snapshot.");
	let err = KnowledgeBase::load(file.path()).expect_err("Expected parse error.");

	assert!(matches!(err, Error::ParseKnowledgeBase { .. }), "Unexpected error: {err}");
}

#[test]
fn fingerprint_is_stable_and_sensitive() {
	let a = KnowledgeBase::new(sample_entries()).expect("Valid snapshot.");
	let b = KnowledgeBase::new(sample_entries()).expect("Valid snapshot.");

	assert_eq!(a.fingerprint(), b.fingerprint());
	assert_eq!(a.fingerprint().len(), 64);

	let mut edited = sample_entries();

	edited[2].keywords.push("sl".to_string());

	let c = KnowledgeBase::new(edited).expect("Valid snapshot.");

	assert_ne!(a.fingerprint(), c.fingerprint());

	// Moving a keyword between adjacent fields must not collide.
	let left = KnowledgeBase::new(vec![entry("a", &["ab", "c"], 5)]).expect("Valid snapshot.");
	let right = KnowledgeBase::new(vec![entry("a", &["a", "bc"], 5)]).expect("Valid snapshot.");

	assert_ne!(left.fingerprint(), right.fingerprint());
}

#[test]
fn category_filter_keeps_order() {
	let kb = KnowledgeBase::new(sample_entries()).expect("Valid snapshot.");
	let trading = kb.with_category(Category::Trading);
	let ids: Vec<&str> = trading.entries().iter().map(|entry| entry.id.as_str()).collect();

	assert_eq!(ids, vec!["stop-loss", "risk-management", "signals"]);
}

#[test]
fn normalizer_matches_multi_word_keywords_across_spacing() {
	let query = normalize::normalize("What is  RISK\nManagement?");

	assert!(query.contains(&normalize::normalize("risk management")));
}

#[test]
fn analyzer_reports_sample_knowledge_base() {
	let report = diagnostics::analyze_keywords(&sample_entries(), &diagnostics_config());

	assert_eq!(report.total_entries, 8);
	assert_eq!(report.active_entries, 7);
	assert_eq!(report.total_keywords, 22);
	assert_eq!(report.distinct_keywords, 20);
	assert!(report.low_coverage.is_empty());
	assert!(report.short_keywords.is_empty());

	let shared: Vec<(&str, Vec<&str>)> = report
		.shared_keywords
		.iter()
		.map(|shared| {
			(shared.keyword.as_str(), shared.entry_ids.iter().map(String::as_str).collect())
		})
		.collect();

	assert_eq!(
		shared,
		vec![
			("risk", vec!["stop-loss", "risk-management"]),
			("wallet", vec!["wallet-balance", "wallet-deposit"]),
		]
	);

	let counts: Vec<(Category, usize)> =
		report.categories.iter().map(|count| (count.category, count.active_entries)).collect();

	assert_eq!(
		counts,
		vec![
			(Category::Platform, 2),
			(Category::Trading, 3),
			(Category::General, 1),
			(Category::Edge, 1),
		]
	);
}

#[test]
fn analyzer_flags_low_coverage_and_short_keywords() {
	let entries = vec![
		entry("fx", &["fx", "", "FX"], 5),
		entry("blank", &["  "], 5),
		EntryBuilder::new("retired").keywords(&["fx", "eur"]).inactive().build(),
	];
	let report = diagnostics::analyze_keywords(&entries, &diagnostics_config());
	let low: Vec<(&str, usize, bool)> = report
		.low_coverage
		.iter()
		.map(|low| (low.id.as_str(), low.matchable_keywords, low.unreachable))
		.collect();

	assert_eq!(low, vec![("fx", 1, false), ("blank", 0, true)]);
	assert_eq!(report.short_keywords.len(), 1);
	assert_eq!(report.short_keywords[0].keyword, "fx");
	assert_eq!(report.short_keywords[0].entry_ids, vec!["fx".to_string()]);
	assert!(report.shared_keywords.is_empty());
}
