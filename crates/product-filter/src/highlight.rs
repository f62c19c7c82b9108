use regex::{Captures, RegexBuilder};
use tracing::warn;

pub const OPEN_TAG: &str = "<em>";
pub const CLOSE_TAG: &str = "</em>";

/// Wrap every case-insensitive occurrence of each term in `<em>` markers.
///
/// Terms are applied one after another against the already-marked text, so a
/// repeated or overlapping term nests markers. The matched text keeps its
/// original casing.
pub fn highlight(text: &str, terms: &[&str]) -> String {
    terms
        .iter()
        .fold(text.to_string(), |acc, term| highlight_term(&acc, term))
}

fn highlight_term(text: &str, term: &str) -> String {
    if term.is_empty() {
        return text.to_string();
    }
    let pattern = match RegexBuilder::new(&regex::escape(term))
        .case_insensitive(true)
        .build()
    {
        Ok(pattern) => pattern,
        Err(e) => {
            warn!(error = %e, term, "skipping unusable highlight term");
            return text.to_string();
        }
    };
    pattern
        .replace_all(text, |caps: &Captures| {
            format!("{OPEN_TAG}{}{CLOSE_TAG}", &caps[0])
        })
        .into_owned()
}
