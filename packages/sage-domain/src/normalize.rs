//! Query and keyword normalization.
//!
//! Matching compares whole normalized strings, so multi-word keywords such as
//! "risk management" line up with the query without token alignment. [`tokenize`] exists for
//! reporting only.

use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;

/// NFKC, lower-case, trimmed, with every whitespace run collapsed to one space.
pub fn normalize(text: &str) -> String {
	let folded = text.nfkc().collect::<String>().to_lowercase();
	let mut out = String::with_capacity(folded.len());

	for word in folded.split_whitespace() {
		if !out.is_empty() {
			out.push(' ');
		}

		out.push_str(word);
	}

	out
}

pub fn tokenize(text: &str) -> Vec<String> {
	normalize(text).unicode_words().map(str::to_string).collect()
}
