//! Caller-side threshold decision.
//!
//! The matcher never consults a threshold. Callers apply one to the top result to decide between
//! answering automatically and handing over to human support.

use std::fmt;

use serde::Serialize;

use crate::RankedResult;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
	Matched,
	Unmatched,
}
impl Decision {
	pub fn as_label(self) -> &'static str {
		match self {
			Self::Matched => "MATCHED",
			Self::Unmatched => "UNMATCHED",
		}
	}
}
impl fmt::Display for Decision {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_label())
	}
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MatchDecision {
	pub decision: Decision,
	pub threshold: f32,
	pub top_entry_id: Option<String>,
	pub top_score: Option<f32>,
	/// `top_score - threshold`; negative for near-misses.
	pub margin: Option<f32>,
}

/// `Matched` when the first result scores at least `threshold`. Empty results are `Unmatched`.
pub fn decide(results: &[RankedResult<'_>], threshold: f32) -> MatchDecision {
	let Some(top) = results.first() else {
		return MatchDecision {
			decision: Decision::Unmatched,
			threshold,
			top_entry_id: None,
			top_score: None,
			margin: None,
		};
	};
	let decision = if top.score >= threshold { Decision::Matched } else { Decision::Unmatched };

	MatchDecision {
		decision,
		threshold,
		top_entry_id: Some(top.entry.id.clone()),
		top_score: Some(top.score),
		margin: Some(top.score - threshold),
	}
}
