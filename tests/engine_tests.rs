use hash_refactor_mcp::apply::apply_edits;
use hash_refactor_mcp::refactoring::{Edit, RefactorEdits, RefactorOptions, refactor_hashes};

fn local_options() -> RefactorOptions {
    RefactorOptions {
        prefix: "h_".to_string(),
        ..Default::default()
    }
}

fn module_options() -> RefactorOptions {
    RefactorOptions {
        prefix: "h_".to_string(),
        module_path: "main/hashes.lua".to_string(),
        ..Default::default()
    }
}

fn selections(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

fn run(
    values: &[&str],
    document: &str,
    module: &str,
    options: &RefactorOptions,
) -> (RefactorEdits, String, String) {
    let edits = refactor_hashes(&selections(values), document, module, options);
    let new_document = apply_edits(document, &edits.document_edits).unwrap();
    let new_module = apply_edits(module, &edits.module_edits).unwrap();
    (edits, new_document, new_module)
}

fn replacements(edits: &[Edit]) -> Vec<&Edit> {
    edits.iter().filter(|edit| !edit.is_insert()).collect()
}

fn insertions(edits: &[Edit]) -> Vec<&Edit> {
    edits.iter().filter(|edit| edit.is_insert()).collect()
}

#[test]
fn test_single_declaration_at_top() {
    let edits = refactor_hashes(
        &selections(&["\"player\""]),
        "local x = 1\n",
        "",
        &local_options(),
    );
    assert_eq!(
        edits.document_edits,
        vec![Edit::insert("local h_player = hash(\"player\")\n\n", 0)]
    );
    assert!(edits.module_edits.is_empty());
}

#[test]
fn test_every_occurrence_replaced_once_declared() {
    let document = "go.set(go.get_id(), \"player\")\ngo.set(go.get_id(), \"player\")\n";
    let (edits, new_document, _) = run(&["\"player\""], document, "", &local_options());

    assert_eq!(insertions(&edits.document_edits).len(), 1);
    assert_eq!(replacements(&edits.document_edits).len(), 2);
    assert_eq!(
        new_document,
        "local h_player = hash(\"player\")\n\ngo.set(go.get_id(), h_player)\ngo.set(go.get_id(), h_player)\n"
    );
}

#[test]
fn test_fresh_module_scaffold_and_require() {
    let document = "msg.post(\"player\", \"enable\")\n";
    let (edits, new_document, new_module) = run(&["player"], document, "", &module_options());

    let module_texts: Vec<&str> = edits.module_edits.iter().map(|edit| edit.text()).collect();
    assert_eq!(
        module_texts,
        vec!["local M = {}\n\n", "M.h_player = hash(\"player\")\n", "\nreturn M\n"]
    );
    assert!(edits.module_edits.iter().all(|edit| edit.start() == 0));
    assert_eq!(
        new_module,
        "local M = {}\n\nM.h_player = hash(\"player\")\n\nreturn M\n"
    );

    let requires: Vec<&Edit> = insertions(&edits.document_edits);
    assert_eq!(requires.len(), 1);
    assert_eq!(requires[0].text(), "local h = require \"main.hashes\"\n\n");
    assert_eq!(replacements(&edits.document_edits)[0].text(), "h.h_player");
    assert_eq!(
        new_document,
        "local h = require \"main.hashes\"\n\nmsg.post(h.h_player, \"enable\")\n"
    );
}

#[test]
fn test_rerun_is_idempotent() {
    let document = "local x = 1\nprint(\"player\", 'enemy')\nif id == hash(\"player\") then end\n";
    let values = ["player", "'enemy'"];

    let (_, document_once, _) = run(&values, document, "", &local_options());
    let (again, document_twice, _) = run(&values, &document_once, "", &local_options());
    assert!(again.is_empty());
    assert_eq!(document_twice, document_once);

    let (_, document_once, module_once) = run(&values, document, "", &module_options());
    let (again, _, _) = run(&values, &document_once, &module_once, &module_options());
    assert!(again.is_empty());
}

#[test]
fn test_repeated_literals_declare_once() {
    let document = "print(\"player\")\n";
    let edits = refactor_hashes(
        &selections(&["player", "\"player\"", "'player'", "h_player"]),
        document,
        "",
        &local_options(),
    );
    assert_eq!(insertions(&edits.document_edits).len(), 1);
    assert_eq!(edits.requests.len(), 1);

    let edits = refactor_hashes(
        &selections(&["player", "'player'"]),
        document,
        "",
        &module_options(),
    );
    assert_eq!(
        edits
            .module_edits
            .iter()
            .filter(|edit| edit.text().contains("hash("))
            .count(),
        1
    );
}

#[test]
fn test_both_quote_styles_rewritten() {
    let document = "a(\"door\")\nb('door')\n";
    let (edits, new_document, _) = run(&["door"], document, "", &local_options());
    let replaced = replacements(&edits.document_edits);
    assert_eq!(replaced.len(), 2);
    assert!(replaced.iter().all(|edit| edit.text() == "h_door"));
    assert!(new_document.ends_with("a(h_door)\nb(h_door)\n"));
}

#[test]
fn test_hash_calls_collapse_to_reference() {
    let document = "local h_other = 1\nif message_id == hash(\"contact\") then\n  go.set(\".\", \"p\", hash( 'contact' ))\nend\n";
    let (_, new_document, _) = run(&["contact"], document, "", &local_options());
    assert!(new_document.contains("if message_id == h_contact then"));
    assert!(new_document.contains("go.set(\".\", \"p\", h_contact)"));
    assert!(!new_document.contains("hash(h_contact)"));
}

#[test]
fn test_correct_declaration_left_alone() {
    let document = "local h_foo = hash(\"foo\")\n\nprint(\"foo\")\n";
    let edits = refactor_hashes(&selections(&["foo"]), document, "", &local_options());
    assert!(insertions(&edits.document_edits).is_empty());
    let replaced = replacements(&edits.document_edits);
    assert_eq!(replaced.len(), 1);
    let occurrence = document.rfind("\"foo\"").unwrap();
    assert_eq!(replaced[0].start(), occurrence);
}

#[test]
fn test_declaration_bound_to_wrong_name_collapses() {
    let document = "local wrong = hash(\"foo\")\n";
    let (edits, new_document, _) = run(&["foo"], document, "", &local_options());
    // The literal is already declared, so no second declaration is inserted
    assert!(insertions(&edits.document_edits).is_empty());
    assert_eq!(new_document, "local wrong = h_foo\n");
}

#[test]
fn test_new_declaration_follows_existing_ones() {
    let document = "local h_a = hash(\"a\")\nlocal h_b = hash(\"b\")\n\nprint(\"c\")\n";
    let (_, new_document, _) = run(&["c"], document, "", &local_options());
    assert_eq!(
        new_document,
        "local h_a = hash(\"a\")\nlocal h_b = hash(\"b\")\nlocal h_c = hash(\"c\")\n\nprint(h_c)\n"
    );
}

#[test]
fn test_declaration_after_requires() {
    let document = "local util = require \"main.util\"\n\nprint(\"c\")\n";
    let (_, new_document, _) = run(&["c"], document, "", &local_options());
    assert_eq!(
        new_document,
        "local util = require \"main.util\"\n\nlocal h_c = hash(\"c\")\n\nprint(h_c)\n"
    );
}

#[test]
fn test_existing_require_binding_reused() {
    let document = "local h = require \"main.hashes\"\n\nprint(\"b\")\n";
    let module = "local M = {}\n\nM.h_a = hash(\"a\")\n\nreturn M\n";
    let (edits, new_document, new_module) = run(&["b"], document, module, &module_options());
    assert!(insertions(&edits.document_edits).is_empty());
    assert_eq!(
        new_document,
        "local h = require \"main.hashes\"\n\nprint(h.h_b)\n"
    );
    assert_eq!(
        new_module,
        "local M = {}\n\nM.h_a = hash(\"a\")\nM.h_b = hash(\"b\")\n\nreturn M\n"
    );
}

#[test]
fn test_capitalised_names_keep_prefix() {
    let options = RefactorOptions {
        capitalise: true,
        ..local_options()
    };
    let (_, new_document, _) = run(&["enemy-spawn"], "x(\"enemy-spawn\")", "", &options);
    assert_eq!(
        new_document,
        "local h_ENEMY_SPAWN = hash(\"enemy-spawn\")\n\nx(h_ENEMY_SPAWN)"
    );
}

#[test]
fn test_escaped_literal_matches_source_form() {
    let document = "print(\"a\\nb\")\n";
    let edits = refactor_hashes(&selections(&["a\nb"]), document, "", &local_options());
    let replaced = replacements(&edits.document_edits);
    assert_eq!(replaced.len(), 1);
    assert_eq!(insertions(&edits.document_edits)[0].text(), "local h_a_b = hash(\"a\\nb\")\n\n");
}
