mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Config, Console, Decision, Diagnostics, KnowledgeBase, SampleQuery, Samples, Scoring, Service,
};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.log_level.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.log_level must be non-empty.".to_string(),
		});
	}
	if !cfg.scoring.keyword_weight.is_finite() {
		return Err(Error::Validation {
			message: "scoring.keyword_weight must be a finite number.".to_string(),
		});
	}
	if cfg.scoring.keyword_weight <= 0.0 {
		return Err(Error::Validation {
			message: "scoring.keyword_weight must be greater than zero.".to_string(),
		});
	}
	if !cfg.scoring.priority_step.is_finite() {
		return Err(Error::Validation {
			message: "scoring.priority_step must be a finite number.".to_string(),
		});
	}
	// Nine steps separate priority 1 from priority 10; the top multiplier must stay below 2.0.
	if cfg.scoring.priority_step <= 0.0 || 1.0 + 9.0 * cfg.scoring.priority_step >= 2.0 {
		return Err(Error::Validation {
			message: "scoring.priority_step must be greater than zero and less than 1/9."
				.to_string(),
		});
	}
	if !cfg.decision.threshold.is_finite() {
		return Err(Error::Validation {
			message: "decision.threshold must be a finite number.".to_string(),
		});
	}
	if cfg.decision.threshold < 0.0 {
		return Err(Error::Validation {
			message: "decision.threshold must be zero or greater.".to_string(),
		});
	}
	if cfg.diagnostics.low_coverage_min_keywords == 0 {
		return Err(Error::Validation {
			message: "diagnostics.low_coverage_min_keywords must be greater than zero.".to_string(),
		});
	}
	if cfg.console.max_results == 0 {
		return Err(Error::Validation {
			message: "console.max_results must be greater than zero.".to_string(),
		});
	}

	for (idx, sample) in cfg.samples.queries.iter().enumerate() {
		if sample.query.trim().is_empty() {
			return Err(Error::Validation {
				message: format!("samples.queries[{idx}].query must be non-empty."),
			});
		}
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	if cfg.knowledge_base.path.as_deref().map(|path| path.trim().is_empty()).unwrap_or(false) {
		cfg.knowledge_base.path = None;
	}

	for sample in &mut cfg.samples.queries {
		if sample.category.as_deref().map(|category| category.trim().is_empty()).unwrap_or(false) {
			sample.category = None;
		}
	}
}
