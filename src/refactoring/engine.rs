//! # Hash Refactoring Engine
//!
//! Turns selected string literals into hash constant declarations and
//! rewrites their occurrences. The engine is a pure function of its inputs:
//! it reads two frozen text snapshots and returns edits against them.

use super::literal::{declaration_name, normalize_literal, quoted_forms};
use super::occurrences::replace_occurrences;
use super::placement::{
    declaration_exists, local_declaration_line, local_declaration_placement,
    module_declaration_line, module_declaration_placement, module_require_line,
    module_require_placement,
};
use super::types::*;
use std::collections::HashSet;
use tracing::debug;

/// Opening scaffold for a module file that does not exist yet.
pub const MODULE_SCAFFOLD_OPEN: &str = "local M = {}\n\n";

/// Closing scaffold for a module file that does not exist yet.
pub const MODULE_SCAFFOLD_CLOSE: &str = "\nreturn M\n";

/// Build one request per distinct literal, keeping selection order.
pub fn build_requests(
    selections: &[String],
    document_text: &str,
    module_text: &str,
    options: &RefactorOptions,
) -> Vec<HashRequest> {
    let module_mode = options.is_module_mode();
    let declaration_target = if module_mode { module_text } else { document_text };
    let mut seen = HashSet::new();
    let mut requests = Vec::new();

    for selection in selections {
        let value = normalize_literal(selection, &options.prefix);
        if !seen.insert(value.clone()) {
            continue;
        }

        let name = declaration_name(&value, &options.prefix, options.capitalise);
        let (double_quoted, single_quoted) = quoted_forms(&value);
        let should_declare = !declaration_exists(declaration_target, &name, module_mode);

        requests.push(HashRequest {
            value,
            name,
            double_quoted,
            single_quoted,
            should_declare,
        });
    }

    requests
}

/// Which requests get a declaration. Two literals can sanitize to the same
/// name; only the first of them declares it.
fn declaration_flags(requests: &[HashRequest]) -> Vec<bool> {
    let mut names = HashSet::new();
    requests
        .iter()
        .map(|request| request.should_declare && names.insert(request.name.as_str()))
        .collect()
}

/// Compute document and module edits for the selected literals.
///
/// `module_text` is empty when module mode is off or the module file does
/// not exist yet. Offsets in the result refer to the texts passed in.
pub fn refactor_hashes(
    selections: &[String],
    document_text: &str,
    module_text: &str,
    options: &RefactorOptions,
) -> RefactorEdits {
    let requests = build_requests(selections, document_text, module_text, options);
    if requests.is_empty() {
        return RefactorEdits::default();
    }

    let module_mode = options.is_module_mode();
    let binding = options.require_binding();
    let declares = declaration_flags(&requests);
    let mut document_edits = Vec::new();
    let mut require_emitted = false;

    for (request, &declare) in requests.iter().zip(&declares) {
        if declare {
            if module_mode {
                if !require_emitted {
                    require_emitted = true;
                    if let Some(placement) = module_require_placement(document_text, binding) {
                        document_edits.push(
                            placement.into_edit(&module_require_line(binding, &options.module_path)),
                        );
                    }
                }
            } else if let Some(placement) =
                local_declaration_placement(document_text, &request.double_quoted)
            {
                document_edits.push(
                    placement.into_edit(&local_declaration_line(&request.name, &request.double_quoted)),
                );
            }
        }

        let reference = if module_mode {
            format!("{binding}.{}", request.name)
        } else {
            request.name.clone()
        };
        document_edits.extend(replace_occurrences(
            document_text,
            &request.double_quoted,
            &reference,
        ));
        document_edits.extend(replace_occurrences(
            document_text,
            &request.single_quoted,
            &reference,
        ));
    }

    let mut module_edits = Vec::new();
    if module_mode {
        let fresh_module = module_text.is_empty();
        if fresh_module {
            module_edits.push(Edit::insert(MODULE_SCAFFOLD_OPEN, 0));
        }

        let declared = requests.iter().zip(&declares).filter(|&(_, &declare)| declare);
        for (request, _) in declared {
            if let Some(placement) = module_declaration_placement(module_text, &request.double_quoted) {
                module_edits.push(
                    placement.into_edit(&module_declaration_line(&request.name, &request.double_quoted)),
                );
            }
        }

        if fresh_module {
            module_edits.push(Edit::insert(MODULE_SCAFFOLD_CLOSE, 0));
        }
    }

    debug!(
        requests = requests.len(),
        document_edits = document_edits.len(),
        module_edits = module_edits.len(),
        "computed hash refactoring edits"
    );

    RefactorEdits {
        document_edits,
        module_edits,
        requests,
    }
}
