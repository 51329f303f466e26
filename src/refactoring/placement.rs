//! # Declaration Placement
//!
//! Pattern searches that decide whether a hash declaration already exists and
//! where new declarations and the module import go. These work on raw text
//! with line-anchored regular expressions; nothing here parses Lua.

use super::types::{Edit, MODULE_TABLE};
use regex::Regex;
use std::sync::LazyLock;

static LOCAL_HASH_DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:^|\n)local [a-zA-Z_][0-9a-zA-Z_]* = hash\(("[^\r\n]*)"#)
        .expect("local declaration pattern is valid")
});

static MODULE_HASH_DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:^|\n)M\.[a-zA-Z_][0-9a-zA-Z_]* = hash\(("[^\r\n]*)"#)
        .expect("module declaration pattern is valid")
});

static REQUIRE_BINDING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"local\s+([a-zA-Z_][0-9a-zA-Z_]*)\s*=\s*require(?:\(|\s)[^\r\n]*")
        .expect("require pattern is valid")
});

static TRAILING_RETURN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"return\s+[a-zA-Z_][a-zA-Z0-9_]*\s*$").expect("return pattern is valid")
});

/// Where a generated line goes and how it is padded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub offset: usize,
    pub newlines_before: usize,
    pub newlines_after: usize,
}

impl Placement {
    fn new(offset: usize, newlines_before: usize, newlines_after: usize) -> Self {
        Self {
            offset,
            newlines_before,
            newlines_after,
        }
    }

    /// Wrap `line` in its padding and turn it into an insertion.
    pub fn into_edit(self, line: &str) -> Edit {
        let text = format!(
            "{}{}{}",
            "\n".repeat(self.newlines_before),
            line,
            "\n".repeat(self.newlines_after)
        );
        Edit::insert(text, self.offset)
    }
}

/// Outcome of scanning for existing hash declarations.
enum DeclarationScan {
    /// A declaration of this exact literal is already there
    Duplicate,
    /// End of the last declaration line
    After(usize),
    None,
}

fn scan_declarations(pattern: &Regex, text: &str, quoted: &str) -> DeclarationScan {
    let mut last_end = None;
    for captures in pattern.captures_iter(text) {
        if captures[1].starts_with(quoted) {
            return DeclarationScan::Duplicate;
        }
        if let Some(whole) = captures.get(0) {
            last_end = Some(whole.end());
        }
    }
    last_end.map_or(DeclarationScan::None, DeclarationScan::After)
}

/// End offset of the last `local x = require ...` line, plus the binding of
/// every require seen on the way.
fn scan_requires(text: &str) -> (Option<usize>, Vec<&str>) {
    let mut last_end = None;
    let mut bindings = Vec::new();
    for captures in REQUIRE_BINDING.captures_iter(text) {
        if let (Some(whole), Some(binding)) = (captures.get(0), captures.get(1)) {
            last_end = Some(whole.end());
            bindings.push(binding.as_str());
        }
    }
    (last_end, bindings)
}

/// Whether `text` already binds `name` to a hash call at the start of a line.
///
/// Module mode looks for `M.name = hash(`, otherwise `local name = hash(`.
pub fn declaration_exists(text: &str, name: &str, module_mode: bool) -> bool {
    if text.is_empty() {
        return false;
    }
    let pattern = if module_mode {
        format!(
            r"(?:^|\n){}\.{}\s*=\s*hash\(",
            MODULE_TABLE,
            regex::escape(name)
        )
    } else {
        format!(r"(?:^|\n)local\s+{}\s*=\s*hash\(", regex::escape(name))
    };
    Regex::new(&pattern).is_ok_and(|re| re.is_match(text))
}

/// Placement for `local name = hash("...")` in the primary document.
///
/// After the last existing hash declaration, else after the last require,
/// else at the top of the file. `None` when the literal is already declared.
pub fn local_declaration_placement(text: &str, quoted: &str) -> Option<Placement> {
    match scan_declarations(&LOCAL_HASH_DECLARATION, text, quoted) {
        DeclarationScan::Duplicate => None,
        DeclarationScan::After(offset) => Some(Placement::new(offset, 1, 0)),
        DeclarationScan::None => match scan_requires(text).0 {
            Some(offset) => Some(Placement::new(offset, 2, 0)),
            None => Some(Placement::new(0, 0, 2)),
        },
    }
}

/// Placement for `M.name = hash("...")` in the hash module.
///
/// An empty module text means the module is about to be scaffolded, so the
/// line goes at the top with a single trailing newline.
pub fn module_declaration_placement(module_text: &str, quoted: &str) -> Option<Placement> {
    if module_text.is_empty() {
        return Some(Placement::new(0, 0, 1));
    }
    match scan_declarations(&MODULE_HASH_DECLARATION, module_text, quoted) {
        DeclarationScan::Duplicate => None,
        DeclarationScan::After(offset) => Some(Placement::new(offset, 1, 0)),
        DeclarationScan::None => match TRAILING_RETURN.find(module_text) {
            Some(found) => Some(Placement::new(found.start(), 0, 2)),
            None => Some(Placement::new(module_text.len(), 1, 0)),
        },
    }
}

/// Placement for `local binding = require "..."` in the primary document.
///
/// `None` when a require already binds `binding`.
pub fn module_require_placement(text: &str, binding: &str) -> Option<Placement> {
    let (last_end, bindings) = scan_requires(text);
    if bindings.contains(&binding) {
        return None;
    }
    match last_end {
        Some(offset) => Some(Placement::new(offset, 2, 0)),
        None => Some(Placement::new(0, 0, 2)),
    }
}

/// Dotted require path for a module file path.
///
/// `./scripts/hashes.lua` becomes `scripts.hashes`.
pub fn module_require_path(module_path: &str) -> String {
    let path = module_path
        .strip_prefix("./")
        .or_else(|| module_path.strip_prefix(".\\"))
        .unwrap_or(module_path);
    let path = path.strip_suffix(".lua").unwrap_or(path);
    path.replace(['/', '\\'], ".")
}

pub fn local_declaration_line(name: &str, quoted: &str) -> String {
    format!("local {name} = hash({quoted})")
}

pub fn module_declaration_line(name: &str, quoted: &str) -> String {
    format!("{MODULE_TABLE}.{name} = hash({quoted})")
}

pub fn module_require_line(binding: &str, module_path: &str) -> String {
    format!(
        "local {binding} = require \"{}\"",
        module_require_path(module_path)
    )
}
