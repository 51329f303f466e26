//! Literal normalization, escaping and identifier derivation.

/// Strip one surrounding quote on each side and the configured prefix.
///
/// Interior escape sequences are left as written.
pub fn normalize_literal(selection: &str, prefix: &str) -> String {
    let mut value = selection;
    if let Some(rest) = value.strip_prefix(['"', '\'']) {
        value = rest;
    }
    if let Some(rest) = value.strip_suffix(['"', '\'']) {
        value = rest;
    }
    if !prefix.is_empty() {
        if let Some(rest) = value.strip_prefix(prefix) {
            value = rest;
        }
    }
    value.to_string()
}

/// Escape a literal payload for embedding in a Lua string.
///
/// Control characters are escaped first, then quotes. Backslashes are left
/// as selected: escape sequences inside a selection are already source text.
pub fn escape_lua(value: &str) -> String {
    value
        .replace('\r', "\\r")
        .replace('\n', "\\n")
        .replace('\t', "\\t")
        .replace('\u{0B}', "\\v")
        .replace('\'', "\\'")
        .replace('"', "\\\"")
}

/// Both quoted forms of a literal, built from the same escaped payload.
pub fn quoted_forms(value: &str) -> (String, String) {
    let escaped = escape_lua(value);
    (format!("\"{escaped}\""), format!("'{escaped}'"))
}

/// Replace anything outside `[0-9A-Za-z_]` with `_`.
pub fn sanitize_identifier(value: &str) -> String {
    value
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

/// Declaration name for a normalized literal.
pub fn declaration_name(value: &str, prefix: &str, capitalise: bool) -> String {
    let identifier = sanitize_identifier(value);
    let identifier = if capitalise {
        identifier.to_uppercase()
    } else {
        identifier
    };
    format!("{prefix}{identifier}")
}
