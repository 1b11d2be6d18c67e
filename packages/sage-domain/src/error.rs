pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Failed to read knowledge base at {path:?}.")]
	ReadKnowledgeBase { path: std::path::PathBuf, source: std::io::Error },
	#[error("Failed to parse knowledge base at {path:?}.")]
	ParseKnowledgeBase { path: std::path::PathBuf, source: serde_json::Error },
	#[error("{message}")]
	Validation { message: String },
}
