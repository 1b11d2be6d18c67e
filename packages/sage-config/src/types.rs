use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	#[serde(default)]
	pub knowledge_base: KnowledgeBase,
	#[serde(default)]
	pub scoring: Scoring,
	#[serde(default)]
	pub decision: Decision,
	#[serde(default)]
	pub diagnostics: Diagnostics,
	#[serde(default)]
	pub console: Console,
	#[serde(default)]
	pub samples: Samples,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub log_level: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct KnowledgeBase {
	/// Optional. JSON snapshot used when the caller does not pass one explicitly.
	pub path: Option<String>,
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default)]
pub struct Scoring {
	/// Base-score contribution of every distinct matched keyword.
	pub keyword_weight: f32,
	/// Multiplier added per priority level above 1.
	pub priority_step: f32,
}
impl Default for Scoring {
	fn default() -> Self {
		Self { keyword_weight: 5.0, priority_step: 0.1 }
	}
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default)]
pub struct Decision {
	pub threshold: f32,
}
impl Default for Decision {
	fn default() -> Self {
		Self { threshold: 8.0 }
	}
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default)]
pub struct Diagnostics {
	pub low_coverage_min_keywords: u32,
	pub short_keyword_max_chars: u32,
}
impl Default for Diagnostics {
	fn default() -> Self {
		Self { low_coverage_min_keywords: 2, short_keyword_max_chars: 3 }
	}
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default)]
pub struct Console {
	pub max_results: u32,
}
impl Default for Console {
	fn default() -> Self {
		Self { max_results: 10 }
	}
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Samples {
	pub queries: Vec<SampleQuery>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SampleQuery {
	pub query: String,
	/// Optional. Display label only, e.g. "platform".
	pub category: Option<String>,
}
