//! End-to-end scenarios from spec.md §8, run through the real `axon`
//! binary against a temp file.
//!
//! Scenario 5's `while`/`if` conditions are parenthesized here; the
//! grammar in spec.md §4.2 requires parens around both, which the
//! literal prose of scenario 5 omits (see DESIGN.md for the resolution
//! of that inconsistency). Expected stdout is unchanged.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::NamedTempFile;
use std::io::Write;

fn run_program(source: &str) -> String {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{source}").unwrap();

    let assert = Command::cargo_bin("axon")
        .unwrap()
        .arg("run")
        .arg(file.path())
        .assert()
        .success();

    String::from_utf8(assert.get_output().stdout.clone()).unwrap()
}

#[test]
fn scenario_1_arithmetic_precedence() {
    assert_eq!(run_program("print(1+2*3);"), "7\n");
}

#[test]
fn scenario_2_two_locals_added() {
    assert_eq!(
        run_program("let x = 5; let y = 10; print(x+y);"),
        "15\n"
    );
}

#[test]
fn scenario_3_for_loop_sum() {
    assert_eq!(
        run_program("let s = 0; for i = 0; 5 { s = s + i; } print(s);"),
        "10\n"
    );
}

#[test]
fn scenario_4_function_call() {
    assert_eq!(
        run_program("fn add(a,b){ return a+b; } print(add(2,3));"),
        "5\n"
    );
}

#[test]
fn scenario_5_while_with_break() {
    assert_eq!(
        run_program(
            "let x = 0; while (x < 10) { x = x + 1; if (x == 7) { break; } } print(x);"
        ),
        "7\n"
    );
}

#[test]
fn scenario_6_list_and_dict_index() {
    assert_eq!(
        run_program(r#"let arr = [1,2,3]; let d = {"a":1,"b":2}; print(arr[1]); print(d["b"]);"#),
        "2\n2\n"
    );
}

#[test]
fn nonexistent_file_fails_with_nonzero_exit() {
    Command::cargo_bin("axon")
        .unwrap()
        .arg("run")
        .arg("/nonexistent/path/does_not_exist.axon")
        .assert()
        .failure();
}

#[test]
fn division_by_zero_reports_a_type_error() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "let x = 1 / 0;").unwrap();

    Command::cargo_bin("axon")
        .unwrap()
        .arg("run")
        .arg(file.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("TypeError"));
}
