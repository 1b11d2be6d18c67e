use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{RankedResult, ScoringPolicy};
use sage_domain::{MAX_PRIORITY, MIN_PRIORITY};

pub const INTENT_MATCH_EXPLAIN_SCHEMA_V1: &str = "intent_match_explain/v1";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MatchTerm {
	pub name: String,
	pub value: f32,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub inputs: Option<BTreeMap<String, serde_json::Value>>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MatchExplain {
	pub schema: String,
	pub entry_id: String,
	pub position: usize,
	pub final_score: f32,
	pub terms: Vec<MatchTerm>,
}

pub fn strip_term_inputs(terms: &[MatchTerm]) -> Vec<MatchTerm> {
	terms
		.iter()
		.map(|term| MatchTerm { name: term.name.clone(), value: term.value, inputs: None })
		.collect()
}

/// Score breakdown of one result, in the order the terms were applied.
pub fn explain(result: &RankedResult<'_>, policy: &ScoringPolicy) -> MatchExplain {
	MatchExplain {
		schema: INTENT_MATCH_EXPLAIN_SCHEMA_V1.to_string(),
		entry_id: result.entry.id.clone(),
		position: result.position,
		final_score: result.score,
		terms: vec![build_keyword_term(result, policy), build_priority_term(result, policy)],
	}
}

fn build_keyword_term(result: &RankedResult<'_>, policy: &ScoringPolicy) -> MatchTerm {
	let matched: Vec<serde_json::Value> = result
		.matched_keywords
		.iter()
		.zip(&result.occurrences)
		.map(|(keyword, occurrences)| {
			serde_json::json!({ "keyword": keyword, "occurrences": occurrences })
		})
		.collect();
	let mut inputs = BTreeMap::new();

	inputs.insert("keyword_weight".to_string(), serde_json::json!(policy.keyword_weight));
	inputs.insert("matched_count".to_string(), serde_json::json!(result.matched_keywords.len()));
	inputs.insert("matched_keywords".to_string(), serde_json::Value::Array(matched));
	MatchTerm { name: "keywords.base".to_string(), value: result.base_score, inputs: Some(inputs) }
}

fn build_priority_term(result: &RankedResult<'_>, policy: &ScoringPolicy) -> MatchTerm {
	let mut inputs = BTreeMap::new();

	inputs.insert("priority".to_string(), serde_json::json!(result.entry.priority));
	inputs.insert("priority_step".to_string(), serde_json::json!(policy.priority_step));
	inputs.insert("min_priority".to_string(), serde_json::json!(MIN_PRIORITY));
	inputs.insert("max_priority".to_string(), serde_json::json!(MAX_PRIORITY));
	MatchTerm {
		name: "priority.multiplier".to_string(),
		value: result.priority_multiplier,
		inputs: Some(inputs),
	}
}
