use serde::Serialize;

pub const DEFAULT_KEYWORD_WEIGHT: f32 = 5.0;
pub const DEFAULT_PRIORITY_STEP: f32 = 0.1;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ScoringPolicy {
	pub keyword_weight: f32,
	pub priority_step: f32,
}
impl ScoringPolicy {
	pub fn from_config(cfg: &sage_config::Scoring) -> Self {
		Self { keyword_weight: cfg.keyword_weight, priority_step: cfg.priority_step }
	}
}
impl Default for ScoringPolicy {
	fn default() -> Self {
		Self { keyword_weight: DEFAULT_KEYWORD_WEIGHT, priority_step: DEFAULT_PRIORITY_STEP }
	}
}
