//! End-to-end CLI integration tests for the `regform` binary.
//!
//! Each test works in its own temporary directory with its own `.regform`
//! directory and `HOME`, and runs `regform` as a subprocess via `assert_cmd`.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const GALA: &str = r#"{
    "event": "spring-gala",
    "title": "Spring Gala",
    "fields": [
        {"name": "name", "displayName": "Full name", "type": "text", "required": true},
        {"name": "adults", "displayName": "Adults", "type": "number"},
        {"name": "children", "displayName": "Children", "type": "number"},
        {"name": "adultPrice", "type": "number", "valueType": "fixed", "fixedValue": 40},
        {"name": "extras", "displayName": "Extras", "type": "checkBoxGroup", "options": [
            {"fieldName": "dinner", "labelName": "Dinner"}
        ]},
        {"name": "subtotal", "type": "number", "valueType": "dynamic", "formula": [
            {"type": "customField", "fieldName": "adults"},
            {"type": "operation", "operationName": "*"},
            {"type": "customField", "fieldName": "adultPrice"}
        ]},
        {"name": "dinnerCost", "type": "number", "valueType": "dynamic", "formula": [
            {"type": "customField", "fieldName": "dinner"},
            {"type": "operation", "operationName": "*"},
            {"type": "number", "operationName": "25"}
        ]},
        {"name": "total", "displayName": "Total", "type": "number", "valueType": "dynamic", "formula": [
            {"type": "customField", "fieldName": "children"},
            {"type": "operation", "operationName": "*"},
            {"type": "number", "operationName": "15"},
            {"type": "operation", "operationName": "+"},
            {"type": "customField", "fieldName": "subtotal"},
            {"type": "operation", "operationName": "+"},
            {"type": "customField", "fieldName": "dinnerCost"}
        ]}
    ]
}"#;

/// Build a `Command` targeting the cargo-built `regform` binary, isolated
/// from the user's environment.
fn regform(tmp: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("regform").unwrap();
    cmd.current_dir(tmp.path())
        .env("HOME", tmp.path())
        .env("REGFORM_DIR", tmp.path().join(".regform"))
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}

/// A temp directory holding `spring-gala.event.json`.
fn gala_project() -> TempDir {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("spring-gala.event.json"), GALA).unwrap();
    tmp
}

/// Write a formula file and return its file name.
fn write_formula(tmp: &TempDir, name: &str, terms: &str) -> String {
    std::fs::write(tmp.path().join(name), terms).unwrap();
    name.to_string()
}

/// Run a command with `--json` and parse stdout.
fn json_output(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.arg("--json").output().unwrap();
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

fn eval_result(tmp: &TempDir, formula: &str, vars: &[&str]) -> f64 {
    let mut cmd = regform(tmp);
    cmd.args(["eval", formula]);
    for v in vars {
        cmd.args(["--var", v]);
    }
    json_output(&mut cmd)["result"].as_f64().unwrap()
}

// ---------------------------------------------------------------------------
// eval
// ---------------------------------------------------------------------------

#[test]
fn eval_formula_properties() {
    let tmp = TempDir::new().unwrap();

    let single = write_formula(&tmp, "single.json", r#"[{"type": "number", "operationName": "5"}]"#);
    assert_eq!(eval_result(&tmp, &single, &[]), 5.0);

    let sum = write_formula(
        &tmp,
        "sum.json",
        r#"[{"type": "number", "operationName": "2"},
            {"type": "operation", "operationName": "+"},
            {"type": "number", "operationName": "3"}]"#,
    );
    assert_eq!(eval_result(&tmp, &sum, &[]), 5.0);

    let div = write_formula(
        &tmp,
        "div.json",
        r#"[{"type": "number", "operationName": "4"},
            {"type": "operation", "operationName": "/"},
            {"type": "number", "operationName": "0"}]"#,
    );
    assert_eq!(eval_result(&tmp, &div, &[]), 4.0);

    let unknown_op = write_formula(
        &tmp,
        "mod.json",
        r#"[{"type": "number", "operationName": "2"},
            {"type": "operation", "operationName": "%"},
            {"type": "number", "operationName": "3"}]"#,
    );
    assert_eq!(eval_result(&tmp, &unknown_op, &[]), 5.0);
}

#[test]
fn eval_keeps_malformed_entries() {
    let tmp = TempDir::new().unwrap();
    let bad_operator = write_formula(
        &tmp,
        "bad-op.json",
        r#"[{"type": "number", "operationName": "5"},
            {"type": "operation", "operationName": "*"},
            {"type": "operation", "operationName": {}},
            {"type": "number", "operationName": "3"}]"#,
    );
    assert_eq!(eval_result(&tmp, &bad_operator, &[]), 8.0);

    let junk = write_formula(
        &tmp,
        "junk.json",
        r#"[{"type": "number", "operationName": "5"},
            {"type": "operation", "operationName": "*"},
            "junk"]"#,
    );
    assert_eq!(eval_result(&tmp, &junk, &[]), 0.0);

    let json = json_output(regform(&tmp).args(["eval", &junk, "--trace"]));
    assert_eq!(json["steps"].as_array().map(Vec::len), Some(2));
}

#[test]
fn eval_reads_field_values() {
    let tmp = TempDir::new().unwrap();
    let formula = write_formula(
        &tmp,
        "price.json",
        r#"{"formula": [
            {"type": "customField", "fieldName": "adults"},
            {"type": "operation", "operationName": "*"},
            {"type": "number", "operationName": "40"}
        ]}"#,
    );

    assert_eq!(eval_result(&tmp, &formula, &["adults=3"]), 120.0);
    assert_eq!(eval_result(&tmp, &formula, &["adults=\"2\""]), 80.0);
    // Missing fields count as zero.
    assert_eq!(eval_result(&tmp, &formula, &[]), 0.0);
}

#[test]
fn eval_toml_and_stdin() {
    let tmp = TempDir::new().unwrap();
    let formula = write_formula(
        &tmp,
        "sum.toml",
        r#"
[[formula]]
type = "number"
operationName = "7"

[[formula]]
type = "operation"
operationName = "-"

[[formula]]
type = "customField"
fieldName = "discount"
"#,
    );
    assert_eq!(eval_result(&tmp, &formula, &["discount=2"]), 5.0);

    regform(&tmp)
        .args(["eval", "-", "--quiet"])
        .write_stdin(r#"[{"type": "number", "operationName": "6"}, {"type": "operation", "operationName": "/"}, {"type": "number", "operationName": "4"}]"#)
        .assert()
        .success()
        .stdout("1.5\n");
}

#[test]
fn eval_trace_marks_skipped_steps() {
    let tmp = TempDir::new().unwrap();
    let formula = write_formula(
        &tmp,
        "div.json",
        r#"[{"type": "number", "operationName": "4"},
            {"type": "operation", "operationName": "/"},
            {"type": "number", "operationName": "0"}]"#,
    );

    let json = json_output(regform(&tmp).args(["eval", &formula, "--trace"]));
    assert_eq!(json["result"].as_f64(), Some(4.0));
    let steps = json["steps"].as_array().unwrap();
    assert_eq!(steps.len(), 2);
    assert_eq!(steps[1]["skipped"], serde_json::json!(true));

    regform(&tmp)
        .args(["eval", &formula, "--trace"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(skipped)"))
        .stdout(predicate::str::contains("Result: 4"));
}

#[test]
fn eval_rejects_bad_input() {
    let tmp = TempDir::new().unwrap();
    let formula = write_formula(&tmp, "f.json", r#"[{"type": "number", "operationName": "1"}]"#);

    regform(&tmp)
        .args(["eval", &formula, "--var", "adults"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected key=value"));

    regform(&tmp)
        .args(["eval", "missing.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load formula"));

    let bad = write_formula(&tmp, "bad.json", r#"{"terms": 3}"#);
    regform(&tmp)
        .args(["eval", &bad, "--json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("\"error\""));
}

// ---------------------------------------------------------------------------
// compute / fields
// ---------------------------------------------------------------------------

#[test]
fn compute_recomputes_dynamic_fields() {
    let tmp = gala_project();

    let json = json_output(regform(&tmp).args(["compute", "spring-gala"]));
    assert_eq!(json["dynamic"]["total"].as_f64(), Some(0.0));
    assert_eq!(json["missing_required"], serde_json::json!(["name"]));

    let json = json_output(regform(&tmp).args([
        "compute",
        "spring-gala",
        "--var",
        "adults=2",
        "--var",
        "children=1",
        "--var",
        "dinner=true",
    ]));
    assert_eq!(json["dynamic"]["subtotal"].as_f64(), Some(80.0));
    assert_eq!(json["dynamic"]["dinnerCost"].as_f64(), Some(25.0));
    assert_eq!(json["dynamic"]["total"].as_f64(), Some(120.0));
    assert_eq!(json["values"]["adultPrice"].as_f64(), Some(40.0));
}

#[test]
fn compute_table_uses_display_config() {
    let tmp = gala_project();
    regform(&tmp)
        .args(["config", "set", "display.currency", "€"])
        .assert()
        .success();

    regform(&tmp)
        .args(["compute", "spring-gala", "--var", "adults=1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Spring Gala"))
        .stdout(predicate::str::contains("€40.00"))
        .stdout(predicate::str::contains("extras.dinner"))
        .stdout(predicate::str::contains("Missing required: name"));
}

#[test]
fn compute_rejects_read_only_fields() {
    let tmp = gala_project();
    regform(&tmp)
        .args(["compute", "spring-gala", "--var", "total=5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not user-editable"));

    regform(&tmp)
        .args(["compute", "spring-gala", "--var", "nope=1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown field: nope"));
}

#[test]
fn compute_submit_requires_required_fields() {
    let tmp = gala_project();
    regform(&tmp)
        .args(["compute", "spring-gala", "--submit", "--var", "adults=1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing required fields: name"));

    let output = regform(&tmp)
        .args([
            "compute",
            "spring-gala",
            "--submit",
            "--var",
            "adults=1",
            "--var",
            "name=Ada",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["event"], "spring-gala");
    assert_eq!(json["values"]["name"], "Ada");
    assert_eq!(json["values"]["total"].as_f64(), Some(40.0));
}

#[test]
fn event_not_found() {
    let tmp = TempDir::new().unwrap();
    regform(&tmp)
        .args(["compute", "nowhere"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("event form 'nowhere' not found"));
}

#[test]
fn events_dir_is_searched() {
    let tmp = TempDir::new().unwrap();
    let events = tmp.path().join(".regform").join("events");
    std::fs::create_dir_all(&events).unwrap();
    std::fs::write(events.join("spring-gala.json"), GALA).unwrap();

    let json = json_output(regform(&tmp).args(["fields", "spring-gala", "--dynamic"]));
    let names: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["subtotal", "dinnerCost", "total"]);
    assert_eq!(json[0]["expression"], "adults * adultPrice");
    assert_eq!(json[2]["references"], serde_json::json!(["children", "subtotal", "dinnerCost"]));
}

#[test]
fn fields_table() {
    let tmp = gala_project();
    regform(&tmp)
        .args(["fields", "spring-gala"])
        .assert()
        .success()
        .stdout(predicate::str::contains("NAME"))
        .stdout(predicate::str::contains("= adults * adultPrice"))
        .stdout(predicate::str::contains("= 40"));
}

// ---------------------------------------------------------------------------
// lint
// ---------------------------------------------------------------------------

#[test]
fn lint_clean_form() {
    let tmp = gala_project();
    regform(&tmp)
        .args(["lint", "spring-gala"])
        .assert()
        .success()
        .stdout(predicate::str::contains("no problems found"));
}

#[test]
fn lint_errors_fail() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(
        tmp.path().join("broken.event.json"),
        r#"{"event": "broken", "fields": [
            {"name": "total", "valueType": "dynamic"}
        ]}"#,
    )
    .unwrap();

    regform(&tmp)
        .args(["lint", "broken"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("dynamic field 'total' has no formula"))
        .stderr(predicate::str::contains("broken has 1 error(s)"));
}

#[test]
fn lint_warnings_fail_in_strict_mode() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(
        tmp.path().join("loose.event.json"),
        r#"{"event": "loose", "fields": [
            {"name": "total", "valueType": "dynamic", "formula": [
                {"type": "customField", "fieldName": "ghost"}
            ]}
        ]}"#,
    )
    .unwrap();

    let output = regform(&tmp).args(["lint", "loose", "--json"]).output().unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["errors"], 0);
    assert_eq!(json["warnings"], 1);
    assert_eq!(json["diagnostics"][0]["severity"], "warning");

    regform(&tmp)
        .args(["lint", "loose", "--strict"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("strict mode"));

    regform(&tmp)
        .args(["config", "set", "lint.strict", "true"])
        .assert()
        .success();
    regform(&tmp).args(["lint", "loose"]).assert().failure();
}

// ---------------------------------------------------------------------------
// fill
// ---------------------------------------------------------------------------

#[test]
fn fill_from_piped_stdin() {
    let tmp = gala_project();
    // name, adults, children (skipped), dinner
    let output = regform(&tmp)
        .args(["fill", "spring-gala", "--json"])
        .write_stdin("Ada\n2\n\ny\n")
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "fill failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["values"]["name"], "Ada");
    assert_eq!(json["dynamic"]["total"].as_f64(), Some(105.0));
    assert_eq!(json["missing_required"], serde_json::json!([]));
}

#[test]
fn fill_stops_at_end_of_input() {
    let tmp = gala_project();
    regform(&tmp)
        .args(["fill", "spring-gala"])
        .write_stdin("Ada\nlots\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("skipped adults"))
        .stdout(predicate::str::contains("Spring Gala"));
}

// ---------------------------------------------------------------------------
// config / version / completion
// ---------------------------------------------------------------------------

#[test]
fn config_roundtrip() {
    let tmp = TempDir::new().unwrap();

    regform(&tmp)
        .args(["config", "set", "display.precision", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Set display.precision = 0"));
    assert!(tmp.path().join(".regform").join("config.yaml").is_file());

    regform(&tmp)
        .args(["config", "get", "display.precision"])
        .assert()
        .success()
        .stdout("0\n");

    let json = json_output(regform(&tmp).args(["config", "list"]));
    assert_eq!(json["display.precision"], "0");
    assert_eq!(json["display.currency"], "$");

    regform(&tmp)
        .args(["config", "unset", "display.precision"])
        .assert()
        .success();
    regform(&tmp)
        .args(["config", "get", "display.precision"])
        .assert()
        .success()
        .stdout("2\n");
}

#[test]
fn config_rejects_bad_keys_and_values() {
    let tmp = TempDir::new().unwrap();
    regform(&tmp)
        .args(["config", "set", "colour", "blue"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown configuration key 'colour'"));
    regform(&tmp)
        .args(["config", "set", "display.precision", "11"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid configuration value"));
}

#[test]
fn version_and_completion() {
    let tmp = TempDir::new().unwrap();
    regform(&tmp)
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with(format!(
            "regform {} (",
            env!("CARGO_PKG_VERSION")
        )));

    let json = json_output(regform(&tmp).arg("version"));
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));

    regform(&tmp)
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("regform"));
}
