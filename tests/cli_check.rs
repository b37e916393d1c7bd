mod common;

use common::TestWorkspace;

#[test]
fn test_clean_workspace_exits_zero() {
    let ws = TestWorkspace::new();
    ws.package("packages/errors", "@acme/errors", &[]);

    let result = ws.run(&["check"]);

    assert!(result.success, "check failed: {}", result.combined_output());
    assert!(result.stdout.contains("in sync"));
}

#[test]
fn test_drift_fails_check_and_names_the_module() {
    let ws = TestWorkspace::new();
    ws.package("packages/errors", "@acme/errors", &[]);
    ws.package("packages/core", "@acme/core", &["@acme/errors"]);

    let result = ws.run(&["check"]);

    assert_eq!(result.exit_code, 1);
    assert!(result.stdout.contains("would-change"));
    assert!(result.stdout.contains("@acme/core"));
    assert!(result.stdout.contains("out of sync"));
}

#[test]
fn test_check_never_writes() {
    let ws = TestWorkspace::new();
    ws.package("packages/errors", "@acme/errors", &[]);
    ws.package("packages/core", "@acme/core", &["@acme/errors"]);
    let before = ws.read("packages/core/tsconfig.build.json");

    ws.run(&["check"]);

    assert_eq!(ws.read("packages/core/tsconfig.build.json"), before);
}

#[test]
fn test_verbose_lists_unchanged_modules() {
    let ws = TestWorkspace::new();
    ws.package("packages/errors", "@acme/errors", &[]);

    let terse = ws.run(&["check"]);
    assert!(!terse.stdout.contains("@acme/errors"));

    let verbose = ws.run(&["check", "-v"]);
    assert!(verbose.stdout.contains("@acme/errors"));
    assert!(verbose.stdout.contains("unchanged"));
}
