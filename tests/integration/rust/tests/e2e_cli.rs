//! End-to-End CLI Integration Tests
//!
//! Tests the complete front end through the drake_cli API, from command
//! line arguments to the written artefact.

use clap::Parser as ClapParser;
use drake_cli::{Cli, CliError, DiagnosticPrinter, Driver, SourceInput};
use std::fs;
use tempfile::TempDir;

/// Run the CLI pipeline the way the `drake` binary does
fn run(args: &[&str]) -> Result<(), (String, CliError)> {
    let cli = Cli::try_parse_from(args.iter().copied()).expect("invalid arguments");
    let input = SourceInput::from_cli(&cli).map_err(|e| (String::new(), e))?;
    let driver = Driver::from_cli(&cli);
    driver
        .render(&input.text)
        .and_then(|rendered| driver.write_output(&rendered, cli.output.as_deref()))
        .map_err(|e| {
            let diagnostic = match &e {
                CliError::Drake(err) => DiagnosticPrinter::new(&input.name, &input.text).render(err),
                _ => String::new(),
            };
            (diagnostic, e)
        })
}

/// Test: file in, JSON AST out
#[test]
fn test_e2e_file_to_json_ast() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("main.dk");
    let output = dir.path().join("main.json");
    fs::write(&source, "square = (<int> n) -> n ** 2\nsquare(4)\n").unwrap();

    run(&[
        "drake",
        "--file",
        source.to_str().unwrap(),
        "--format",
        "json",
        "--output",
        output.to_str().unwrap(),
    ])
    .unwrap();

    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    let body = value["body"].as_array().unwrap();
    assert_eq!(body.len(), 2);
    assert!(body[0]["kind"]["Assignment"]["value"]["kind"]["Lambda"].is_object());
    assert!(body[1]["kind"]["Primary"].is_object());
}

/// Test: inline code, token listing out
#[test]
fn test_e2e_eval_to_tokens() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("tokens.txt");

    run(&[
        "drake",
        "--eval",
        "a not in b",
        "--emit",
        "tokens",
        "--output",
        output.to_str().unwrap(),
    ])
    .unwrap();

    let written = fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = written.lines().collect();
    assert_eq!(lines.len(), 5);
    assert!(lines[1].ends_with("keyword 'not'"));
    assert!(lines[4].ends_with("end of input"));
}

/// Test: malformed source produces a caret diagnostic
#[test]
fn test_e2e_parse_error_diagnostic() {
    let (diagnostic, err) = run(&["drake", "--eval", "if x\nthen"]).unwrap_err();
    assert!(matches!(err, CliError::Drake(_)));
    assert!(diagnostic.starts_with("error: expected expression, found end of input\n"));
    assert!(diagnostic.contains("<eval>:2:5"));
}

/// Test: missing file surfaces as an I/O error
#[test]
fn test_e2e_missing_file() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("absent.dk");
    let (_, err) = run(&["drake", "--file", missing.to_str().unwrap()]).unwrap_err();
    assert!(matches!(err, CliError::Io(_)));
}
