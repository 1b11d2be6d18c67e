use std::{collections::HashSet, fs, path::Path};

use serde::Deserialize;

use crate::{Category, Error, KnowledgeEntry, MAX_PRIORITY, MIN_PRIORITY, Result};

#[derive(Deserialize)]
#[serde(untagged)]
enum SnapshotFile {
	Bare(Vec<KnowledgeEntry>),
	Wrapped { entries: Vec<KnowledgeEntry> },
}

/// Immutable, validated snapshot of the knowledge base.
///
/// Entry order is significant: it is the tie-break order of the matcher.
#[derive(Clone, Debug, Default)]
pub struct KnowledgeBase {
	entries: Vec<KnowledgeEntry>,
}
impl KnowledgeBase {
	pub fn new(entries: Vec<KnowledgeEntry>) -> Result<Self> {
		validate_entries(&entries)?;

		Ok(Self { entries })
	}

	/// Reads a JSON snapshot: either a bare array of entries or `{ "entries": [...] }`.
	pub fn load(path: &Path) -> Result<Self> {
		let raw = fs::read_to_string(path)
			.map_err(|err| Error::ReadKnowledgeBase { path: path.to_path_buf(), source: err })?;
		let file: SnapshotFile = serde_json::from_str(&raw)
			.map_err(|err| Error::ParseKnowledgeBase { path: path.to_path_buf(), source: err })?;
		let entries = match file {
			SnapshotFile::Bare(entries) => entries,
			SnapshotFile::Wrapped { entries } => entries,
		};
		let kb = Self::new(entries)?;

		tracing::info!(
			path = %path.display(),
			entries = kb.len(),
			active = kb.active_count(),
			fingerprint = %kb.fingerprint(),
			"Knowledge base loaded."
		);

		Ok(kb)
	}

	pub fn entries(&self) -> &[KnowledgeEntry] {
		&self.entries
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn active_count(&self) -> usize {
		self.entries.iter().filter(|entry| entry.active).count()
	}

	pub fn get(&self, id: &str) -> Option<&KnowledgeEntry> {
		self.entries.iter().find(|entry| entry.id == id)
	}

	/// Snapshot restricted to one category, keeping relative order.
	pub fn with_category(&self, category: Category) -> Self {
		let entries =
			self.entries.iter().filter(|entry| entry.category == category).cloned().collect();

		Self { entries }
	}

	/// BLAKE3 over every field of every entry, in snapshot order.
	///
	/// Fields are length-prefixed, so any edit to any entry changes the fingerprint.
	pub fn fingerprint(&self) -> String {
		let mut hasher = blake3::Hasher::new();

		for entry in &self.entries {
			hash_field(&mut hasher, entry.id.as_bytes());
			hash_field(&mut hasher, entry.intent.as_bytes());
			hash_field(&mut hasher, entry.category.as_str().as_bytes());
			hasher.update(&(entry.keywords.len() as u64).to_le_bytes());

			for keyword in &entry.keywords {
				hash_field(&mut hasher, keyword.as_bytes());
			}

			hash_field(&mut hasher, entry.answer.as_bytes());
			hasher.update(&[entry.priority, u8::from(entry.active)]);
		}

		hasher.finalize().to_hex().to_string()
	}
}

fn hash_field(hasher: &mut blake3::Hasher, bytes: &[u8]) {
	hasher.update(&(bytes.len() as u64).to_le_bytes());
	hasher.update(bytes);
}

fn validate_entries(entries: &[KnowledgeEntry]) -> Result<()> {
	let mut ids = HashSet::with_capacity(entries.len());

	for (idx, entry) in entries.iter().enumerate() {
		if entry.id.trim().is_empty() {
			return Err(Error::Validation {
				message: format!("entries[{idx}].id must be non-empty."),
			});
		}
		if !ids.insert(entry.id.as_str()) {
			return Err(Error::Validation {
				message: format!("entries[{idx}].id {:?} is a duplicate.", entry.id),
			});
		}
		if entry.intent.trim().is_empty() {
			return Err(Error::Validation {
				message: format!("entries[{idx}].intent must be non-empty."),
			});
		}
		if !(MIN_PRIORITY..=MAX_PRIORITY).contains(&entry.priority) {
			return Err(Error::Validation {
				message: format!(
					"entries[{idx}].priority must be in the range {MIN_PRIORITY}-{MAX_PRIORITY}."
				),
			});
		}
	}

	Ok(())
}
