use assert_cmd::Command;
use predicates::prelude::*;

fn parsedcmd(config_dir: &tempfile::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("parsedcmd").unwrap();
    cmd.arg("--config-dir").arg(config_dir.path());
    cmd
}

#[test]
fn test_print() {
    let temp_dir = tempfile::tempdir().unwrap();
    parsedcmd(&temp_dir)
        .args(["-c", "print"])
        .assert()
        .success()
        .stdout("abc\n");
}

#[test]
fn test_print_repeat() {
    let temp_dir = tempfile::tempdir().unwrap();
    parsedcmd(&temp_dir)
        .args(["-c", "print -repeat 3 def"])
        .assert()
        .success()
        .stdout("def\ndef\ndef\n");
}

#[test]
fn test_print_flag() {
    let temp_dir = tempfile::tempdir().unwrap();
    parsedcmd(&temp_dir)
        .args(["-c", "print -flag off -repeat 3 def"])
        .assert()
        .success()
        .stdout("");
}

#[test]
fn test_multiply_from_stdin() {
    let temp_dir = tempfile::tempdir().unwrap();
    parsedcmd(&temp_dir)
        .write_stdin("multiply 4 1 2 3\n")
        .assert()
        .success()
        .stdout("4\n8\n12\n");
}

#[test]
fn test_double_uses_explicit_annotation() {
    let temp_dir = tempfile::tempdir().unwrap();
    parsedcmd(&temp_dir)
        .args(["-c", "double 1 2 3"])
        .assert()
        .success()
        .stdout("2\n4\n6\n");
}

#[test]
fn test_shell_gets_raw_line() {
    let temp_dir = tempfile::tempdir().unwrap();
    parsedcmd(&temp_dir)
        .write_stdin("!print(1,   \"x\n")
        .assert()
        .success()
        .stdout("print(1,   \"x\n");
}

#[test]
fn test_shout_goes_through_wrapper() {
    let temp_dir = tempfile::tempdir().unwrap();
    parsedcmd(&temp_dir)
        .args(["-c", "shout -sep , a b"])
        .assert()
        .success()
        .stdout("A,B\n");
}

#[test]
fn test_help_print() {
    let temp_dir = tempfile::tempdir().unwrap();
    parsedcmd(&temp_dir)
        .args(["-c", "help print"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "print [-flag F(=true)] [-repeat R(=1)] [LINE(=abc)]\nPrint a given string",
        ));
}

#[test]
fn test_help_multiply_shorthand() {
    let temp_dir = tempfile::tempdir().unwrap();
    parsedcmd(&temp_dir)
        .args(["-c", "?multiply"])
        .assert()
        .success()
        .stdout("multiply MUL [*NUMS]\nPrint `mul` times the numbers given.\n");
}

#[test]
fn test_no_usage_flag() {
    let temp_dir = tempfile::tempdir().unwrap();
    parsedcmd(&temp_dir)
        .args(["--no-usage", "-c", "help double"])
        .assert()
        .success()
        .stdout("Print twice the numbers given.\n");
}

#[test]
fn test_marker_override() {
    let temp_dir = tempfile::tempdir().unwrap();
    parsedcmd(&temp_dir)
        .args(["--marker=--", "-c", "print --repeat 2 x"])
        .assert()
        .success()
        .stdout("x\nx\n");
}

#[test]
fn test_marker_from_config_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    std::fs::write(
        temp_dir.path().join("shell.json"),
        r#"{"option_marker": "+"}"#,
    )
    .unwrap();
    parsedcmd(&temp_dir)
        .args(["-c", "print +repeat 2 x"])
        .assert()
        .success()
        .stdout("x\nx\n");
}

#[test]
fn test_unknown_command_fails_without_crashing() {
    let temp_dir = tempfile::tempdir().unwrap();
    parsedcmd(&temp_dir)
        .args(["-c", "frobnicate", "-c", "print ok"])
        .assert()
        .failure()
        .stdout("*** Unknown syntax: frobnicate\nok\n")
        .stderr(predicate::str::contains("1 of 2 commands failed"));
}

#[test]
fn test_bad_line_in_loop_keeps_going() {
    let temp_dir = tempfile::tempdir().unwrap();
    parsedcmd(&temp_dir)
        .write_stdin("multiply x 1\nmultiply 2 5\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("While trying to cast \"x\""))
        .stdout(predicate::str::ends_with("10\n"));
}

#[test]
fn test_overflow_is_reported_not_fatal() {
    let temp_dir = tempfile::tempdir().unwrap();
    parsedcmd(&temp_dir)
        .write_stdin("multiply 9223372036854775807 2\ndouble 9223372036854775807\nmultiply 2 5\n")
        .assert()
        .success()
        .stdout("*** overflow\n*** overflow\n10\n");
}

#[test]
fn test_overflow_fails_command_line_run() {
    let temp_dir = tempfile::tempdir().unwrap();
    parsedcmd(&temp_dir)
        .args(["-c", "multiply 9223372036854775807 2"])
        .assert()
        .failure()
        .code(1)
        .stdout("*** overflow\n");
}

#[test]
fn test_value_spelled_like_a_positional_option() {
    let temp_dir = tempfile::tempdir().unwrap();
    parsedcmd(&temp_dir)
        .args(["-c", "say -words", "-c", "print -repeat"])
        .assert()
        .success()
        .stdout("-words\n-repeat\n");
}

#[test]
fn test_help_lists_commands() {
    let temp_dir = tempfile::tempdir().unwrap();
    parsedcmd(&temp_dir)
        .args(["-c", "help"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "Documented commands (type help <topic>):\n",
        ))
        .stdout(predicate::str::contains("Undocumented").not());
}

#[test]
fn test_quit_stops_reading() {
    let temp_dir = tempfile::tempdir().unwrap();
    parsedcmd(&temp_dir)
        .write_stdin("print one\nquit\nprint two\n")
        .assert()
        .success()
        .stdout("one\n");
}
