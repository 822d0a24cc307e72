//! Unit tests for CLI commands

use super::commands::execute;
use crate::cli::{Cli, Commands};
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;

fn routes_file(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn run(args: &[&str]) -> anyhow::Result<String> {
    let cli = Cli::try_parse_from(args)?;
    let mut out = Vec::new();
    execute(&cli.command, &mut out)?;
    Ok(String::from_utf8(out)?)
}

#[test]
fn test_match_command_parses() {
    let cli = Cli::try_parse_from([
        "routetable",
        "match",
        "--routes",
        "conf/routes",
        "POST",
        "/app/1",
        "--override",
        "PATCH",
    ])
    .unwrap();

    match cli.command {
        Commands::Match {
            source,
            method,
            path,
            override_verb,
            json,
        } => {
            assert_eq!(source.routes, PathBuf::from("conf/routes"));
            assert_eq!(method, "POST");
            assert_eq!(path, "/app/1");
            assert_eq!(override_verb.as_deref(), Some("PATCH"));
            assert!(!json);
        }
        _ => panic!("Expected Match command"),
    }
}

#[test]
fn test_reverse_args_are_key_value_pairs() {
    let cli = Cli::try_parse_from([
        "routetable",
        "reverse",
        "-r",
        "routes",
        "Application.Show",
        "--arg",
        "id=123",
        "-a",
        "c=http://x?y=z",
    ])
    .unwrap();

    match cli.command {
        Commands::Reverse { action, args, .. } => {
            assert_eq!(action, "Application.Show");
            assert_eq!(
                args,
                vec![
                    ("id".to_string(), "123".to_string()),
                    ("c".to_string(), "http://x?y=z".to_string())
                ]
            );
        }
        _ => panic!("Expected Reverse command"),
    }

    assert!(Cli::try_parse_from(["routetable", "reverse", "A.B", "--arg", "novalue"]).is_err());
    assert!(Cli::try_parse_from(["routetable", "reverse", "A.B", "--arg", "=v"]).is_err());
}

#[test]
fn test_all_commands_parse() {
    let commands = vec![
        vec!["routetable", "check", "--routes", "r", "--dump"],
        vec!["routetable", "check", "--actions", "a", "--app-root", "/base"],
        vec!["routetable", "match", "GET", "/", "--json"],
        vec!["routetable", "reverse", "A.B"],
        vec!["routetable", "watch", "--routes", "r"],
    ];
    for args in commands {
        assert!(Cli::try_parse_from(&args).is_ok(), "failed to parse {args:?}");
    }
}

#[test]
fn test_check_reports_route_count() {
    let file = routes_file("GET / Application.Index\nGET /app/:id Application.Show\n");
    let path = file.path().to_str().unwrap();
    let out = run(&["routetable", "check", "--routes", path, "--dump"]).unwrap();
    assert!(out.contains("2 routes OK"), "{out}");
    assert!(out.contains("/app/:id"), "{out}");
}

#[test]
fn test_check_with_actions_file_rejects_unknown_action() {
    let routes = routes_file("GET / Application.Index\nGET /x Application.Missing\n");
    let actions = routes_file("Application.Index\n");
    let err = run(&[
        "routetable",
        "check",
        "--routes",
        routes.path().to_str().unwrap(),
        "--actions",
        actions.path().to_str().unwrap(),
    ])
    .unwrap_err();
    assert!(err.to_string().contains(":2: Route validation error"), "{err}");
}

#[test]
fn test_match_prints_action_and_params() {
    let file = routes_file("GET /app/:id Application.Show\nGET /favicon.ico 404\n");
    let path = file.path().to_str().unwrap();

    let out = run(&["routetable", "match", "--routes", path, "GET", "/app/9"]).unwrap();
    assert_eq!(out, "Application.Show\n  id = 9\n");

    let out = run(&["routetable", "match", "--routes", path, "GET", "/favicon.ico"]).unwrap();
    assert_eq!(out, "404 (declared)\n");

    let out = run(&["routetable", "match", "--routes", path, "GET", "/nope"]).unwrap();
    assert_eq!(out, "no route\n");
}

#[test]
fn test_match_json_output() {
    let file = routes_file("GET /app/:id Application.Show\n");
    let path = file.path().to_str().unwrap();
    let out = run(&["routetable", "match", "--routes", path, "GET", "/app/9", "--json"]).unwrap();
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["action"], "Application.Show");
    assert_eq!(value["params"]["id"][0], "9");
}

#[test]
fn test_reverse_prints_method_and_url() {
    let file = routes_file("POST /app/:id Application.Save\n");
    let path = file.path().to_str().unwrap();
    let out = run(&[
        "routetable",
        "reverse",
        "--routes",
        path,
        "Application.Save",
        "--arg",
        "id=5",
        "--arg",
        "c=http://continue",
    ])
    .unwrap();
    assert_eq!(out, "POST /app/5?c=http%3A%2F%2Fcontinue\n");

    assert!(run(&["routetable", "reverse", "--routes", path, "Other.Action"]).is_err());
}

#[test]
fn test_missing_routes_file_is_an_error() {
    let err = run(&["routetable", "check", "--routes", "/nonexistent/routes"]).unwrap_err();
    assert!(err.to_string().contains("Failed to load routes file"), "{err}");
}
