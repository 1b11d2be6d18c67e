use std::{collections::HashSet, fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize};

use crate::{Error, normalize};

pub const MIN_PRIORITY: u8 = 1;
pub const MAX_PRIORITY: u8 = 10;

/// UI grouping label. Scoring never reads it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
	Platform,
	Trading,
	General,
	Edge,
}
impl Category {
	pub const ALL: [Self; 4] = [Self::Platform, Self::Trading, Self::General, Self::Edge];

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Platform => "platform",
			Self::Trading => "trading",
			Self::General => "general",
			Self::Edge => "edge",
		}
	}
}
impl fmt::Display for Category {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}
impl FromStr for Category {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let wanted = s.trim().to_ascii_lowercase();

		Self::ALL.into_iter().find(|category| category.as_str() == wanted).ok_or_else(|| {
			Error::Validation {
				message: format!(
					"Unknown category {s:?}; expected one of platform, trading, general, or edge."
				),
			}
		})
	}
}

/// One canned answer of the assistant knowledge base.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeEntry {
	/// JSON numbers are accepted and kept as their decimal text.
	#[serde(deserialize_with = "deserialize_id")]
	pub id: String,
	pub intent: String,
	pub category: Category,
	pub keywords: Vec<String>,
	pub answer: String,
	/// 1 (lowest) to 10 (highest).
	pub priority: u8,
	#[serde(default = "default_active")]
	pub active: bool,
}
impl KnowledgeEntry {
	/// Distinct, non-blank keywords in declaration order.
	///
	/// Two keywords that normalize to the same text count once; the first declaration wins.
	pub fn matchable_keywords(&self) -> Vec<MatchableKeyword<'_>> {
		let mut seen = HashSet::new();
		let mut out = Vec::with_capacity(self.keywords.len());

		for declared in &self.keywords {
			let normalized = normalize::normalize(declared);

			if normalized.is_empty() {
				continue;
			}
			if !seen.insert(normalized.clone()) {
				continue;
			}

			out.push(MatchableKeyword { declared, normalized });
		}

		out
	}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchableKeyword<'a> {
	/// Keyword as the administrator wrote it.
	pub declared: &'a str,
	pub normalized: String,
}

fn default_active() -> bool {
	true
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
	D: Deserializer<'de>,
{
	#[derive(Deserialize)]
	#[serde(untagged)]
	enum RawId {
		Text(String),
		Number(i64),
	}

	Ok(match RawId::deserialize(deserializer)? {
		RawId::Text(id) => id,
		RawId::Number(id) => id.to_string(),
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	fn entry(keywords: &[&str]) -> KnowledgeEntry {
		KnowledgeEntry {
			id: "kb-1".to_string(),
			intent: "check wallet balance".to_string(),
			category: Category::Platform,
			keywords: keywords.iter().map(|keyword| keyword.to_string()).collect(),
			answer: "Open the wallet tab.".to_string(),
			priority: 5,
			active: true,
		}
	}

	#[test]
	fn duplicate_keywords_collapse_to_first_declaration() {
		let entry = entry(&["Wallet", "balance", "wallet ", "  ", "BALANCE"]);
		let keywords = entry.matchable_keywords();
		let declared: Vec<&str> = keywords.iter().map(|keyword| keyword.declared).collect();

		assert_eq!(declared, vec!["Wallet", "balance"]);
		assert_eq!(keywords[0].normalized, "wallet");
	}

	#[test]
	fn blank_keywords_are_not_matchable() {
		assert!(entry(&["", "   ", "\t"]).matchable_keywords().is_empty());
		assert!(entry(&[]).matchable_keywords().is_empty());
		assert_eq!(entry(&["", "deposit"]).matchable_keywords().len(), 1);
	}

	#[test]
	fn categories_parse_case_insensitively() {
		assert_eq!("Trading".parse::<Category>().expect("Known category."), Category::Trading);
		assert_eq!(" edge ".parse::<Category>().expect("Known category."), Category::Edge);
		assert!("billing".parse::<Category>().is_err());
	}

	#[test]
	fn active_defaults_to_true() {
		let raw = r#"{
			"id": "kb-2",
			"intent": "deposit funds",
			"category": "platform",
			"keywords": ["deposit"],
			"answer": "Use the deposit button.",
			"priority": 3
		}"#;
		let entry: KnowledgeEntry = serde_json::from_str(raw).expect("Failed to parse entry.");

		assert!(entry.active);
		assert_eq!(entry.category, Category::Platform);
	}

	#[test]
	fn numeric_ids_load_as_text() {
		let raw = r#"[
			{ "id": 1, "intent": "balance", "category": "platform", "keywords": ["wallet"],
			  "answer": "a", "priority": 5 },
			{ "id": "kb-2", "intent": "deposit", "category": "platform", "keywords": ["deposit"],
			  "answer": "b", "priority": 9 }
		]"#;
		let entries: Vec<KnowledgeEntry> =
			serde_json::from_str(raw).expect("Failed to parse entries.");

		assert_eq!(entries[0].id, "1");
		assert_eq!(entries[1].id, "kb-2");

		let fractional = r#"{ "id": 1.5, "intent": "x", "category": "edge", "keywords": [],
			"answer": "a", "priority": 1 }"#;

		assert!(serde_json::from_str::<KnowledgeEntry>(fractional).is_err());
	}
}
