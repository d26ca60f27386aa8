//! Integration tests for `--complete`

mod common;

use cmdlex::catalog::{Call, CommandGroup, Literal, Operation, ParamType, ParameterSpec, Returned};
use cmdlex::config::Settings;
use cmdlex::runner::{InvocationStatus, Runner};
use common::{days, run_with, Captured};
use std::sync::Arc;

fn noop(_: Call<'_>) -> anyhow::Result<Returned> {
    Ok(Returned::Unit)
}

fn op(name: &str) -> Operation {
    Operation::instance(name, noop)
}

fn object() -> Arc<CommandGroup> {
    CommandGroup::new("System.Object")
        .universal()
        .operation(op("ToString").overridable())
        .operation(op("GetHashCode").overridable())
        .build()
}

fn c1() -> Arc<CommandGroup> {
    CommandGroup::new("tests.C1").operation(op("M1")).build()
}

fn c2() -> Arc<CommandGroup> {
    CommandGroup::new("tests.C2")
        .extends(object())
        .operation(op("M1"))
        .operation(op("M2"))
        .operation(op("ToString").overridable())
        .operation(op("GetHashCode").overridable())
        .build()
}

fn c20() -> Arc<CommandGroup> {
    CommandGroup::new("tests.C20").extends(c2()).build()
}

fn c3() -> Arc<CommandGroup> {
    let days = days();
    let int = |name: &str| ParameterSpec::new(name, ParamType::int32());

    CommandGroup::new("tests.C3")
        .operation(
            op("M1")
                .param(int("foo").with_default(Literal::Int(0)))
                .param(int("bar").with_default(Literal::Int(0))),
        )
        .operation(op("M2").param(ParameterSpec::new("d", ParamType::enumeration(days.clone()))))
        .operation(op("M3").param(ParameterSpec::new(
            "d",
            ParamType::nullable(ParamType::enumeration(days.clone())),
        )))
        .operation(op("M4").param(ParameterSpec::new("b", ParamType::boolean())))
        .operation(op("M5").param(ParameterSpec::new("b", ParamType::nullable(ParamType::boolean()))))
        .operation(op("M6").param(ParameterSpec::new("d", ParamType::array(ParamType::enumeration(days)))))
        .operation(op("M7").param(int("foo1")).param(int("foo2")))
        .build()
}

fn c4() -> Vec<Arc<CommandGroup>> {
    let m1 = || {
        op("M1")
            .param(ParameterSpec::new("foo", ParamType::int32()).with_default(Literal::Int(0)))
            .param(ParameterSpec::new("bar", ParamType::int32()).with_default(Literal::Int(0)))
    };
    vec![
        CommandGroup::new("tests.C4").operation(m1()).build(),
        CommandGroup::new("tests.C4.C5").operation(m1()).build(),
    ]
}

/// Complete `line` as typed after a program called `foo`, cursor at `end + offset`
fn complete_at(groups: Vec<Arc<CommandGroup>>, line: &str, offset: isize) -> Vec<String> {
    let line = format!("foo {}", line);
    let position = (line.len() as isize + offset).to_string();
    let out = request(groups, &["--complete", "--position", &position, &line]);
    assert_eq!(out.result.status, InvocationStatus::Complete);
    out.stdout.lines().map(str::to_string).collect()
}

fn complete(groups: Vec<Arc<CommandGroup>>, line: &str) -> Vec<String> {
    complete_at(groups, line, 0)
}

fn request(groups: Vec<Arc<CommandGroup>>, args: &[&str]) -> Captured {
    let mut argv = vec!["prog"];
    argv.extend_from_slice(args);
    run_with(Runner::configure().with_groups(groups), Settings::default(), &argv)
}

#[test]
fn test_unambiguous_group_names() {
    let groups = || vec![c1(), c2()];
    assert_eq!(complete(groups(), "c2."), vec!["C2.M1", "C2.M2"]);
    assert_eq!(complete(groups(), "c2"), vec!["C2.M1", "C2.M2"]);
}

#[test]
fn test_ambiguous_group_names() {
    let groups = || vec![c1(), c2(), c20()];
    assert_eq!(complete(groups(), "c2."), vec!["C2.M1", "C2.M2"]);
    assert_eq!(complete(groups(), "c2"), vec!["C2.M1", "C2.M2", "C20."]);
    assert_eq!(complete(groups(), "c2.m"), vec!["C2.M1", "C2.M2"]);
    assert_eq!(complete(groups(), "c2.m1"), vec!["C2.M1"]);
    assert_eq!(complete(groups(), "c20."), vec!["C20.M1", "C20.M2"]);
}

#[test]
fn test_nested_group_next_to_operations() {
    assert_eq!(complete(c4(), "c4."), vec!["C4.M1", "C4.C5."]);
    assert_eq!(complete(c4(), "c4.c"), vec!["C4.C5.M1"]);
}

#[test]
fn test_operation_names() {
    let groups = || vec![c1(), c2()];
    for line in ["C1.", "C1.m", "C1.M", "C1.m1", "c1", "c1."] {
        assert_eq!(complete(groups(), line), vec!["C1.M1"], "{}", line);
    }
    assert_eq!(complete(groups(), "C2."), vec!["C2.M1", "C2.M2"]);
    assert_eq!(complete(groups(), "C2.m1"), vec!["C2.M1"]);
    assert!(complete(groups(), "C2.x").is_empty());
    assert_eq!(complete(groups(), "C"), vec!["C1.", "C2."]);
}

#[test]
fn test_no_completions() {
    let groups = || vec![c1(), c2()];
    for line in ["xx", "xx.", "xx.yy", "xx.yy -"] {
        assert!(complete(groups(), line).is_empty(), "{}", line);
    }
}

#[test]
fn test_parameter_names() {
    let groups = || vec![c1(), c2(), c3()];
    assert_eq!(complete(groups(), "C3.M1 -"), vec!["-foo", "-bar"]);
    for line in ["C3.M1 -f", "C3.M1 -foo", "C3.M1 -FOO"] {
        assert_eq!(complete(groups(), line), vec!["-foo"], "{}", line);
    }
    for line in ["C3.M1 -b", "C3.M1 -bar", "C3.M1 -BaR"] {
        assert_eq!(complete(groups(), line), vec!["-bar"], "{}", line);
    }
    assert_eq!(complete(groups(), "C3.M1 /f"), vec!["/foo"]);
}

#[test]
fn test_used_parameters_are_not_offered() {
    let groups = || vec![c1(), c2(), c3()];
    assert_eq!(complete(groups(), "C3.M1 -foo 1 -b"), vec!["-bar"]);
    assert_eq!(complete(groups(), "C3.M1 -foo 1 -"), vec!["-bar"]);
    assert_eq!(complete(groups(), "C3.M1 -bar 1 -"), vec!["-foo"]);
}

#[test]
fn test_numbers_are_not_completed() {
    let groups = || vec![c1(), c2(), c3()];
    for line in ["C3.M1 1", "C3.M1 1 2", "C3.M1 11", "C3.M1 11 22"] {
        assert!(complete(groups(), line).is_empty(), "{}", line);
    }
}

#[test]
fn test_no_parameter_names_after_marker() {
    let groups = || vec![c1(), c2(), c3()];
    for prefix in ["C3.M1", "C3.M1 1", "C3.M1 11", "C3.M1 -bar 1", "C3.M1 -bar 11"] {
        for cursor in ["", "-", "-f"] {
            let line = format!("{} -- {}", prefix, cursor);
            assert!(complete(groups(), &line).is_empty(), "{}", line);
        }
    }
}

#[test]
fn test_values() {
    let groups = || vec![c1(), c2(), c3()];
    let all = vec!["Sunday", "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday"];

    assert_eq!(complete(groups(), "C3.M2 -- "), all);
    assert_eq!(complete(groups(), "C3.M3 -- "), all);
    assert_eq!(complete(groups(), "C3.M3 -d "), all);
    for line in ["C3.M2 S", "C3.M2 s", "C3.M3 S", "C3.M3 s", "C3.M3 -d S", "C3.M3 -d s"] {
        assert_eq!(complete(groups(), line), vec!["Sunday", "Saturday"], "{}", line);
    }

    assert_eq!(complete(groups(), "C3.M2 "), vec!["-d"]);
    assert_eq!(complete(groups(), "C3.M3 "), vec!["-d"]);
}

#[test]
fn test_mid_word() {
    let groups = || vec![c1(), c2(), c3()];
    assert_eq!(complete_at(groups(), "C3.M3 -d szz", -3).len(), 7);
    assert_eq!(complete_at(groups(), "C3.M3 -d szz", -2), vec!["Sunday", "Saturday"]);
    assert!(complete_at(groups(), "C3.M3 -d szz", -1).is_empty());
}

#[test]
fn test_booleans_and_null() {
    let groups = || vec![c1(), c2(), c3()];
    assert_eq!(complete(groups(), "C3.M4 -b t"), vec!["true"]);
    assert_eq!(complete(groups(), "C3.M4 -b "), vec!["true", "false"]);
    assert_eq!(complete(groups(), "C3.M5 -b n"), vec!["null"]);
    assert_eq!(complete(groups(), "C3.M5 -b "), vec!["true", "false", "null"]);
}

#[test]
fn test_repeatable_parameters() {
    let groups = || vec![c1(), c2(), c3()];
    assert_eq!(complete(groups(), "C3.M6 -d ").len(), 7);
    assert_eq!(complete(groups(), "C3.M6 -d Sunday -d ").len(), 7);
    assert_eq!(complete(groups(), "C3.M6 -d Sunday -"), vec!["-d"]);
}

#[test]
fn test_similar_parameter_names() {
    let groups = || vec![c1(), c2(), c3()];
    for line in ["C3.M7 -", "C3.M7 -f", "C3.M7 -foo"] {
        assert_eq!(complete(groups(), line), vec!["-foo1", "-foo2"], "{}", line);
    }
    assert_eq!(complete(groups(), "C3.M7 -foo1"), vec!["-foo1"]);
}

#[test]
fn test_position_defaults_to_end_of_line() {
    let out = request(vec![c1(), c2()], &["--complete", "foo c2."]);
    assert_eq!(out.stdout, "C2.M1\nC2.M2\n");
}

#[test]
fn test_bad_requests() {
    let out = request(vec![c1()], &["--complete", "--position", "x", "foo c1"]);
    assert_eq!(out.result.status, InvocationStatus::ConversionFailed);
    assert_eq!(out.result.exit_code(), Some(1));
    assert_eq!(out.stderr, "Failed to parse number.  Argument: --position\n");

    let out = request(vec![c1()], &["--complete"]);
    assert_eq!(out.result.status, InvocationStatus::ConversionFailed);
    assert_eq!(out.stderr, "Missing required positional argument.  Argument: line\n");
}

#[test]
fn test_completion_scripts() {
    let out = request(vec![c1()], &["--bash-completion-script", "c"]);
    assert_eq!(out.result.status, InvocationStatus::CompletionScript);
    assert!(out.stdout.contains("complete -f -F _c_bash_complete c"));

    let out = request(vec![c1()], &["--powershell-completion-script", "c"]);
    assert!(out.stdout.contains("Register-ArgumentCompleter -Native -CommandName c"));

    let settings = Settings::default().with_program("my-tool");
    let out = run_with(
        Runner::configure().with_group(c1()),
        settings,
        &["prog", "--bash-completion-script", "c"],
    );
    assert!(out.stdout.starts_with("alias c=\"my-tool\"\n"));

    let out = request(vec![c1()], &["--bash-completion-script"]);
    assert_eq!(out.result.status, InvocationStatus::ConversionFailed);
    assert_eq!(out.stderr, "Missing required parameter command name.\n");
}
