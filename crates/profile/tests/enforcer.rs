//! Enforcement against YAML rule documents on disk.

use std::io::Write;

use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::NamedTempFile;
use verdict_profile::{enforce_profile, ProfileError, Value};

fn document(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn mesh_payload(nx: i64) -> Value {
    Value::from(json!({
        "domain": {"nx": nx, "dx": 0.25},
        "meta": {"run_id": "run-9"},
    }))
}

#[test]
fn degenerate_grid_rule_triggers_and_passes() {
    let file = document(concat!(
        "rules:\n",
        "  - if: \"domain.nx == 0\"\n",
        "    raise: \"Grid resolution is degenerate\"\n",
    ));

    assert!(enforce_profile(file.path(), &mesh_payload(64)).is_ok());

    let err = enforce_profile(file.path(), &mesh_payload(0)).unwrap_err();
    assert_eq!(err.to_string(), "[Rule 0] Grid resolution is degenerate");
}

#[test]
fn rules_are_enforced_in_document_order() {
    let file = document(concat!(
        "rules:\n",
        "  - if: \"domain.nx < 0\"\n",
        "    raise: \"negative resolution\"\n",
        "  - if: \"domain.dx == 0.25\"\n",
        "    raise: \"spacing too coarse\"\n",
        "  - if: \"domain.dx > 0.0\"\n",
        "    raise: \"also true, never reached\"\n",
    ));
    let err = enforce_profile(file.path(), &mesh_payload(64)).unwrap_err();
    assert_eq!(err.to_string(), "[Rule 1] spacing too coarse");
}

#[test]
fn evaluation_errors_name_rule_message_and_condition() {
    let file = document(concat!(
        "rules:\n",
        "  - if: \"solver.tolerance < 1\"\n",
        "    raise: \"tolerance too loose\"\n",
    ));
    let err = enforce_profile(file.path(), &mesh_payload(64)).unwrap_err();
    assert_eq!(
        err.to_string(),
        "[Rule 0] tolerance too loose — Evaluation error for 'solver.tolerance < 1': \
         Missing key in expression: solver.tolerance"
    );
}

#[test]
fn unsupported_operators_surface_as_evaluation_errors() {
    let file = document(concat!(
        "rules:\n",
        "  - if: \"domain.nx ++ 1\"\n",
        "    raise: \"bad operator\"\n",
    ));
    let err = enforce_profile(file.path(), &mesh_payload(64)).unwrap_err();
    let rendered = err.to_string();
    assert!(rendered.starts_with("[Rule 0] bad operator"), "{rendered}");
    assert!(rendered.contains("Unsupported operator '++'"), "{rendered}");
}

#[test]
fn null_literals_compare_against_missing_optional_values() {
    let file = document(concat!(
        "rules:\n",
        "  - if: \"meta.notes == null\"\n",
        "    raise: \"notes are required\"\n",
    ));
    let payload = Value::from(json!({"meta": {"notes": null}}));
    let err = enforce_profile(file.path(), &payload).unwrap_err();
    assert_eq!(err.to_string(), "[Rule 0] notes are required");
}

#[test]
fn relaxed_document_rules_coerce_stringly_typed_payloads() {
    let file = document(concat!(
        "rules:\n",
        "  - if: \"stats.count == 100\"\n",
        "    raise: \"count pinned at 100\"\n",
        "    type_check_mode: relaxed\n",
    ));
    let payload = Value::from(json!({"stats": {"count": "100"}}));
    let err = enforce_profile(file.path(), &payload).unwrap_err();
    assert_eq!(err.to_string(), "[Rule 0] count pinned at 100");
}

#[test]
fn strict_document_rules_fail_on_type_drift() {
    let file = document(concat!(
        "rules:\n",
        "  - if: \"stats.count == 100\"\n",
        "    raise: \"count pinned at 100\"\n",
    ));
    let payload = Value::from(json!({"stats": {"count": "100"}}));
    let err = enforce_profile(file.path(), &payload).unwrap_err();
    let ProfileError::Evaluation { source, .. } = &err else {
        panic!("expected an evaluation error, got {err}");
    };
    assert_eq!(source.to_string(), "Incompatible types: string vs integer");
}

#[test]
fn malformed_records_are_dropped_before_enforcement() {
    let file = document(concat!(
        "rules:\n",
        "  - raise: \"orphan message\"\n",
        "  - if: \"domain.nx == 0\"\n",
        "    raise: \"degenerate grid\"\n",
    ));
    assert!(enforce_profile(file.path(), &mesh_payload(64)).is_ok());
    let err = enforce_profile(file.path(), &mesh_payload(0)).unwrap_err();
    // Enforcement indexes the surviving rules, not the document records.
    assert_eq!(err.to_string(), "[Rule 0] degenerate grid");
}

#[test]
fn missing_documents_preserve_the_os_error() {
    let err = enforce_profile("/no/such/profile.yaml", &mesh_payload(64)).unwrap_err();
    let rendered = err.to_string();
    assert!(
        rendered.starts_with("Failed to load profile at '/no/such/profile.yaml':"),
        "{rendered}"
    );
    assert!(rendered.contains("No such file or directory"), "{rendered}");
}

#[test]
fn regex_rules_share_the_enforcer_evaluator() {
    let file = document(concat!(
        "rules:\n",
        "  - if: \"meta.run_id matches run-\\\\d+\"\n",
        "    raise: \"run id matched the reserved pattern\"\n",
    ));
    let err = enforce_profile(file.path(), &mesh_payload(64)).unwrap_err();
    assert_eq!(
        err.to_string(),
        "[Rule 0] run id matched the reserved pattern"
    );
}
