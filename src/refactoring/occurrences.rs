//! Rewriting quoted occurrences of a literal to its declaration reference.

use super::types::Edit;
use regex::Regex;
use std::sync::LazyLock;

static CLOSING_PAREN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\)").expect("closing paren pattern is valid"));

const HASH_CALL_OPEN: &str = "hash(";

/// Replacement edits for every occurrence of `from` in `text`.
///
/// Each occurrence is handled one of three ways:
/// - inside `local <to> = hash(...)`: that is the declaration itself, skip it
/// - sole argument of any other `hash(...)`: the whole call becomes `to`
/// - anywhere else: just the quoted literal becomes `to`
pub fn replace_occurrences(text: &str, from: &str, to: &str) -> Vec<Edit> {
    let mut edits = Vec::new();
    if from.is_empty() {
        return edits;
    }

    let own_declaration = format!("local {to} = ");
    let mut search_start = 0;

    while let Some(found) = text[search_start..].find(from) {
        let index = search_start + found;
        let mut start = index;
        let mut end = index + from.len();

        let before = &text[..index];
        let trimmed = before.trim_end();
        if let Some(call_start) = trimmed
            .strip_suffix(HASH_CALL_OPEN)
            .map(|head| head.len())
        {
            if text[..call_start].ends_with(&own_declaration) {
                search_start = end;
                continue;
            }
            if let Some(closing) = CLOSING_PAREN.find(&text[end..]) {
                start = call_start;
                end += closing.end();
            }
        }

        edits.push(Edit::replace(to, start, end));
        search_start = end;
    }

    edits
}
