mod error;

pub use error::{Error, Result};

use std::{
	env, fs,
	path::{Path, PathBuf},
	sync::atomic::{AtomicU64, Ordering},
	time::{SystemTime, UNIX_EPOCH},
};

use sage_domain::{Category, KnowledgeEntry};

/// Active entry with a generated intent and answer.
pub fn entry(id: &str, keywords: &[&str], priority: u8) -> KnowledgeEntry {
	EntryBuilder::new(id).keywords(keywords).priority(priority).build()
}

pub struct EntryBuilder {
	entry: KnowledgeEntry,
}
impl EntryBuilder {
	pub fn new(id: &str) -> Self {
		Self {
			entry: KnowledgeEntry {
				id: id.to_string(),
				intent: format!("intent {id}"),
				category: Category::General,
				keywords: Vec::new(),
				answer: format!("answer {id}"),
				priority: 5,
				active: true,
			},
		}
	}

	pub fn intent(mut self, intent: &str) -> Self {
		self.entry.intent = intent.to_string();

		self
	}

	pub fn category(mut self, category: Category) -> Self {
		self.entry.category = category;

		self
	}

	pub fn keywords(mut self, keywords: &[&str]) -> Self {
		self.entry.keywords = keywords.iter().map(|keyword| keyword.to_string()).collect();

		self
	}

	pub fn answer(mut self, answer: &str) -> Self {
		self.entry.answer = answer.to_string();

		self
	}

	pub fn priority(mut self, priority: u8) -> Self {
		self.entry.priority = priority;

		self
	}

	pub fn inactive(mut self) -> Self {
		self.entry.active = false;

		self
	}

	pub fn build(self) -> KnowledgeEntry {
		self.entry
	}
}

/// Small trading-education knowledge base with overlapping keywords across intents.
pub fn sample_entries() -> Vec<KnowledgeEntry> {
	vec![
		EntryBuilder::new("wallet-balance")
			.intent("check wallet balance")
			.category(Category::Platform)
			.keywords(&["wallet", "balance", "funds"])
			.answer("Your balance is shown at the top of the Wallet tab.")
			.priority(6)
			.build(),
		EntryBuilder::new("wallet-deposit")
			.intent("deposit to wallet")
			.category(Category::Platform)
			.keywords(&["deposit", "wallet", "top up", "add funds"])
			.answer("Open Wallet, then Deposit, and follow the payment steps.")
			.priority(7)
			.build(),
		EntryBuilder::new("stop-loss")
			.intent("explain stop loss")
			.category(Category::Trading)
			.keywords(&["stop loss", "stop-loss", "risk"])
			.answer("A stop loss closes a position once price reaches a level you set.")
			.priority(8)
			.build(),
		EntryBuilder::new("risk-management")
			.intent("risk management basics")
			.category(Category::Trading)
			.keywords(&["risk management", "risk", "position size"])
			.answer("Risk a small fixed fraction of your account on each trade.")
			.priority(6)
			.build(),
		EntryBuilder::new("signals")
			.intent("how signals work")
			.category(Category::Trading)
			.keywords(&["signal", "signals", "alert"])
			.answer("Signals are published in the Signals panel with entry, target and stop.")
			.priority(5)
			.build(),
		EntryBuilder::new("calendar")
			.intent("economic calendar")
			.category(Category::General)
			.keywords(&["calendar", "news", "event"])
			.answer("The calendar lists scheduled economic releases in your time zone.")
			.priority(4)
			.build(),
		EntryBuilder::new("support")
			.intent("contact support")
			.category(Category::Edge)
			.keywords(&["human", "support", "agent"])
			.answer("A member of the support team will join this chat shortly.")
			.priority(3)
			.build(),
		EntryBuilder::new("legacy-forex")
			.intent("legacy forex course")
			.category(Category::General)
			.keywords(&["forex", "course"])
			.answer("The legacy forex course has been retired.")
			.priority(9)
			.inactive()
			.build(),
	]
}

/// Temporary file removed on drop.
pub struct TempFile {
	path: PathBuf,
}
impl TempFile {
	pub fn path(&self) -> &Path {
		&self.path
	}
}
impl Drop for TempFile {
	fn drop(&mut self) {
		let _ = fs::remove_file(&self.path);
	}
}

pub fn write_temp_file(prefix: &str, extension: &str, contents: &str) -> Result<TempFile> {
	static COUNTER: AtomicU64 = AtomicU64::new(0);

	let nanos = SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.map_err(|err| Error::Message(format!("System time must be valid: {err}.")))?
		.as_nanos();
	let ordinal = COUNTER.fetch_add(1, Ordering::SeqCst);
	let pid = std::process::id();
	let mut path = env::temp_dir();

	path.push(format!("{prefix}_{nanos}_{pid}_{ordinal}.{extension}"));

	fs::write(&path, contents)?;

	Ok(TempFile { path })
}

/// Writes `entries` as a `{ "entries": [...] }` snapshot.
pub fn write_knowledge_base(entries: &[KnowledgeEntry]) -> Result<TempFile> {
	let payload = serde_json::to_string_pretty(&serde_json::json!({ "entries": entries }))?;

	write_temp_file("sage_kb", "json", &payload)
}
